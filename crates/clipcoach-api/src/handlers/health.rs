//! Health check handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Liveness check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub model: String,
    /// Pipelines that could start right now without queueing
    pub available_slots: usize,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
}

/// Readiness check endpoint.
///
/// State only exists once the Gemini credential and access password were
/// loaded, so reaching this handler means the service is configured.
pub async fn ready(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let policy = state.pipeline.poll_policy();
    Json(ReadinessResponse {
        status: "ready".to_string(),
        model: state.pipeline.model().to_string(),
        available_slots: state.pipeline.available_permits(),
        poll_interval_ms: policy.interval.as_millis() as u64,
        max_poll_attempts: policy.max_attempts,
    })
}
