use crate::config::{EmbedConfig, StorageBackend};
use crate::handlers;
use crate::services::{
    InMemoryRepository, MongoDb, SessionService, UserRepository, VisualizationRepository,
};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    frame_policy_middleware, metrics_middleware, request_id_middleware, REQUEST_ID_HEADER,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub visualizations: Arc<dyn VisualizationRepository>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: SessionService,
}

impl AppState {
    /// Wire repositories for the configured storage backend.
    pub async fn from_config(config: &EmbedConfig) -> Result<Self, AppError> {
        let sessions = SessionService::new(&config.session.secret, config.session.expiry_minutes);

        match config.storage.backend {
            StorageBackend::Memory => {
                let repository = Arc::new(InMemoryRepository::new());
                if let Some(seed_path) = &config.storage.seed_path {
                    repository.load_seed(seed_path).await?;
                }
                tracing::info!("Using in-memory storage backend");
                Ok(Self {
                    visualizations: repository.clone(),
                    users: repository,
                    sessions,
                })
            }
            StorageBackend::Mongodb => {
                let mongo = config.storage.mongodb.as_ref().ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "MongoDB settings are required for the mongodb storage backend"
                    ))
                })?;
                let db = MongoDb::connect(&mongo.uri, &mongo.database).await?;
                db.initialize_indexes().await.map_err(|e| {
                    tracing::error!("Failed to initialize database indexes: {}", e);
                    e
                })?;
                let db = Arc::new(db);
                Ok(Self {
                    visualizations: db.clone(),
                    users: db,
                    sessions,
                })
            }
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/embed/:visualization_id", get(handlers::show_embed))
        .route(
            "/embed/:visualization_id/protected",
            post(handlers::show_protected_embed),
        )
        .layer(from_fn(frame_policy_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri().path(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: EmbedConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config).await?;
        Self::with_state(config.common.port, state).await
    }

    /// Bind `port` (0 picks a free one) and serve `state`.
    pub async fn with_state(port: u16, state: AppState) -> Result<Self, AppError> {
        let app = build_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
