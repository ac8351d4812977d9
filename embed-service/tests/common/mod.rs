#![allow(dead_code)]

use embed_service::models::{User, Visualization};
use embed_service::services::{
    InMemoryRepository, SessionService, UserRepository, VisualizationRepository,
};
use embed_service::startup::{AppState, Application};
use secrecy::Secret;
use std::sync::Arc;

pub const TEST_SESSION_SECRET: &str = "test-session-secret";
pub const TRUSTY_TOKEN: &str = "trusty_token";

pub fn test_sessions() -> SessionService {
    SessionService::new(&Secret::new(TEST_SESSION_SECRET.to_string()), 60)
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryRepository>,
    pub sessions: SessionService,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let repository = Arc::new(InMemoryRepository::new());
        let state = AppState {
            visualizations: repository.clone(),
            users: repository.clone(),
            sessions: test_sessions(),
        };
        Self::spawn_with_state(repository, state).await
    }

    /// Spawns with caller-provided state; `repository` still backs the helpers.
    pub async fn spawn_with_state(repository: Arc<InMemoryRepository>, state: AppState) -> Self {
        let sessions = state.sessions.clone();
        let app = Application::with_state(0, state)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            repository,
            sessions,
            client,
        }
    }

    pub async fn save_user(&self, user: &User) {
        UserRepository::save(self.repository.as_ref(), user)
            .await
            .expect("Failed to save user");
    }

    pub async fn save_visualization(&self, visualization: &Visualization) {
        VisualizationRepository::save(self.repository.as_ref(), visualization)
            .await
            .expect("Failed to save visualization");
    }

    /// Owner account plus a visualization of theirs carrying `trusty_token`.
    pub async fn seed(&self, privacy: embed_service::models::Privacy) -> (User, Visualization) {
        let user = User::new("valid_user");
        let visualization = Visualization::new(user.id.clone(), "Earthquakes 2016", privacy)
            .with_description("Seismic activity worldwide")
            .with_auth_tokens(vec![TRUSTY_TOKEN.to_string()]);

        self.save_user(&user).await;
        self.save_visualization(&visualization).await;
        (user, visualization)
    }

    pub fn session_token(&self, user_id: &str) -> String {
        self.sessions
            .issue(user_id)
            .expect("Failed to issue session token")
    }

    pub async fn get_embed(&self, visualization_id: &str, query: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/embed/{}{}", self.address, visualization_id, query))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_embed_as(
        &self,
        visualization_id: &str,
        query: &str,
        token: &str,
    ) -> reqwest::Response {
        self.client
            .get(format!("{}/embed/{}{}", self.address, visualization_id, query))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_protected(
        &self,
        visualization_id: &str,
        form: &[(&str, &str)],
    ) -> reqwest::Response {
        self.client
            .post(format!(
                "{}/embed/{}/protected",
                self.address, visualization_id
            ))
            .form(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_protected_query(&self, visualization_id: &str, query: &str) -> reqwest::Response {
        self.client
            .post(format!(
                "{}/embed/{}/protected{}",
                self.address, visualization_id, query
            ))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
