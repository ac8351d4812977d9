use super::repository::{UserRepository, VisualizationRepository};
use crate::models::{User, Visualization};
use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReplaceOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for embed-service");

        let owner_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("owner_lookup".to_string())
                    .build(),
            )
            .build();

        self.visualizations()
            .create_index(owner_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create owner index on visualizations collection: {}",
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created index on visualizations.user_id");

        let organization_index = IndexModel::builder()
            .keys(doc! { "organization_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("organization_lookup".to_string())
                    .build(),
            )
            .build();

        self.users()
            .create_index(organization_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create organization index on users collection: {}",
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created index on users.organization_id");

        Ok(())
    }

    pub fn visualizations(&self) -> Collection<Visualization> {
        self.db.collection("visualizations")
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

fn upsert() -> ReplaceOptions {
    ReplaceOptions::builder().upsert(true).build()
}

#[async_trait]
impl VisualizationRepository for MongoDb {
    async fn find_by_id(&self, id: &str) -> Result<Option<Visualization>, AppError> {
        Ok(self
            .visualizations()
            .find_one(doc! { "_id": id }, None)
            .await?)
    }

    async fn save(&self, visualization: &Visualization) -> Result<(), AppError> {
        self.visualizations()
            .replace_one(doc! { "_id": &visualization.id }, visualization, upsert())
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.health_check().await
    }
}

#[async_trait]
impl UserRepository for MongoDb {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "_id": id }, None).await?)
    }

    async fn save(&self, user: &User) -> Result<(), AppError> {
        self.users()
            .replace_one(doc! { "_id": &user.id }, user, upsert())
            .await?;
        Ok(())
    }
}
