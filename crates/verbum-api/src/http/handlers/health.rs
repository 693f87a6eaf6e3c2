//! Liveness endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "verbum";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` with a live backend, `degraded` when answers are canned.
    pub status: String,
    pub service: String,
    pub version: String,
    pub active_sessions: usize,
}

/// GET /api/health and /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.backend_ready { "healthy" } else { "degraded" };
    Json(HealthResponse {
        status: status.to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: state.sessions.len(),
    })
}
