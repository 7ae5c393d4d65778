//! Banner and health endpoints

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "nse_scraper";

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub service: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the configured store does not answer
    pub status: &'static str,
    pub persistence: bool,
}

/// `GET /`
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        service: SERVICE_NAME,
        status: "ready",
    })
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match &state.ingestor {
        Some(ingestor) => match ingestor.store().ping().await {
            Ok(()) => "healthy",
            Err(e) => {
                tracing::warn!("Store ping failed: {}", e);
                "degraded"
            }
        },
        None => "healthy",
    };

    Json(HealthResponse {
        status,
        persistence: state.persistence_enabled(),
    })
}
