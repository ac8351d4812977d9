use crate::models::{User, Visualization};
use async_trait::async_trait;
use service_core::error::AppError;

#[async_trait]
pub trait VisualizationRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Visualization>, AppError>;
    /// Insert or replace by id.
    async fn save(&self, visualization: &Visualization) -> Result<(), AppError>;
    /// Cheap reachability check for readiness probes.
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    /// Insert or replace by id.
    async fn save(&self, user: &User) -> Result<(), AppError>;
}
