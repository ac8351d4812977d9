pub mod frame_policy;
pub mod metrics;
pub mod tracing;

pub use frame_policy::frame_policy_middleware;
pub use metrics::metrics_middleware;
pub use tracing::{REQUEST_ID_HEADER, request_id_middleware};
