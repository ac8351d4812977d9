pub mod embeds;
pub mod health;

pub use embeds::{show_embed, show_protected_embed};
pub use health::{health_check, metrics_endpoint, readiness_check};
