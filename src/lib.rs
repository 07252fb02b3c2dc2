pub mod client;
pub mod config;
pub mod database;
pub mod docs;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::{Config, StorageBackend};
use crate::error::Result;
use crate::services::{
    candidate_service::{CandidateRepository, PgCandidateRepository},
    memory_store::MemoryCandidateRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub candidates: Arc<dyn CandidateRepository>,
}

impl AppState {
    pub fn new(candidates: Arc<dyn CandidateRepository>) -> Self {
        Self { candidates }
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self::new(Arc::new(PgCandidateRepository::new(pool)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCandidateRepository::new()))
    }

    /// Connects the configured storage backend. For PostgreSQL this opens the
    /// pool, verifies connectivity and applies pending migrations.
    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.storage_backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory candidate storage; data is lost on restart");
                Ok(Self::in_memory())
            }
            StorageBackend::Postgres => {
                let pool = database::pool::create_pool(&config.database).await?;
                database::pool::test_connection(&pool).await?;
                database::pool::run_migrations(&pool).await?;
                Ok(Self::with_pool(pool))
            }
        }
    }
}

/// Assembles the HTTP application: candidate API, health, OpenAPI document
/// and the optional static UI.
pub fn build_app(state: AppState, config: &Config) -> Result<Router> {
    let mut app = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .nest("/api/candidates", routes::candidates::router())
        .with_state(state);

    if let Some(dir) = &config.static_dir {
        tracing::info!("Serving UI from: {}", dir);
        app = app.fallback_service(ServeDir::new(dir));
    }

    Ok(app
        .layer(middleware::cors::cors_layer(
            config.cors_allowed_origin.as_deref(),
        )?)
        .layer(TraceLayer::new_for_http()))
}
