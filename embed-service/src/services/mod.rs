pub mod access;
pub mod database;
pub mod memory;
pub mod metrics;
pub mod repository;
pub mod session;
pub mod vizjson;

pub use access::{decide, AccessDecision, DenialReason};
pub use database::MongoDb;
pub use memory::InMemoryRepository;
pub use metrics::{get_metrics, init_metrics};
pub use repository::{UserRepository, VisualizationRepository};
pub use session::{SessionClaims, SessionService};
