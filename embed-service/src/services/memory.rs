use super::repository::{UserRepository, VisualizationRepository};
use crate::models::{Privacy, User, Visualization};
use crate::utils::password::Password;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use service_core::error::AppError;
use std::path::Path;
use uuid::Uuid;

/// Process-local store backed by concurrent maps. Used in development and
/// tests; contents are lost on restart.
#[derive(Default)]
pub struct InMemoryRepository {
    visualizations: DashMap<String, Visualization>,
    users: DashMap<String, User>,
}

/// Seed file layout. Passwords are plaintext here and hashed on load.
#[derive(Debug, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub visualizations: Vec<SeedVisualization>,
}

#[derive(Debug, Deserialize)]
pub struct SeedVisualization {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub privacy: Privacy,
    pub password: Option<String>,
    #[serde(default)]
    pub auth_tokens: Vec<String>,
    pub user_id: String,
    pub organization_id: Option<String>,
    #[serde(default)]
    pub shared_with: Vec<String>,
    pub map_id: Option<String>,
}

impl SeedVisualization {
    fn into_visualization(self) -> Result<Visualization, anyhow::Error> {
        let mut visualization = Visualization::new(self.user_id, self.name, self.privacy)
            .with_auth_tokens(self.auth_tokens);
        visualization.id = self.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        visualization.description = self.description;
        visualization.organization_id = self.organization_id;
        visualization.shared_with = self.shared_with;
        if self.map_id.is_some() {
            visualization.map_id = self.map_id;
        }
        if let Some(password) = self.password {
            visualization.set_password(&Password::new(password))?;
        }
        Ok(visualization)
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load users and visualizations from a JSON seed file.
    pub async fn load_seed(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::error!("Failed to read seed file {}: {}", path.display(), e);
            AppError::from(e)
        })?;

        let seed: Seed = serde_json::from_str(&raw).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid seed file {}: {}",
                path.display(),
                e
            ))
        })?;

        let user_count = seed.users.len();
        let visualization_count = seed.visualizations.len();

        for user in seed.users {
            self.users.insert(user.id.clone(), user);
        }
        for entry in seed.visualizations {
            let visualization = entry.into_visualization()?;
            self.visualizations
                .insert(visualization.id.clone(), visualization);
        }

        tracing::info!(
            users = user_count,
            visualizations = visualization_count,
            "Loaded seed data from {}",
            path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl VisualizationRepository for InMemoryRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Visualization>, AppError> {
        Ok(self.visualizations.get(id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, visualization: &Visualization) -> Result<(), AppError> {
        self.visualizations
            .insert(visualization.id.clone(), visualization.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, user: &User) -> Result<(), AppError> {
        self.users.insert(user.id.clone(), user.clone());
        Ok(())
    }
}
