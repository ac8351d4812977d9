mod common;

use async_trait::async_trait;
use common::{test_sessions, TestApp};
use embed_service::models::Visualization;
use embed_service::services::{InMemoryRepository, VisualizationRepository};
use embed_service::startup::AppState;
use service_core::error::AppError;
use std::sync::Arc;

struct UnreachableStore;

#[async_trait]
impl VisualizationRepository for UnreachableStore {
    async fn find_by_id(&self, _id: &str) -> Result<Option<Visualization>, AppError> {
        Ok(None)
    }

    async fn save(&self, _visualization: &Visualization) -> Result<(), AppError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }
}

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "embed-service");
}

#[tokio::test]
async fn readiness_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/ready", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn readiness_check_fails_when_store_is_unreachable() {
    let repository = Arc::new(InMemoryRepository::new());
    let state = AppState {
        visualizations: Arc::new(UnreachableStore),
        users: repository.clone(),
        sessions: test_sessions(),
    };
    let app = TestApp::spawn_with_state(repository, state).await;

    let response = app
        .client
        .get(format!("{}/ready", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 503);
}
