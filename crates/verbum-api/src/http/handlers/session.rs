//! Session management HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions               - Start a session
//! - GET    /api/v1/sessions/{id}/messages - Stored history of a session
//! - POST   /api/v1/sessions/{id}/reset    - Re-initialize a session
//! - DELETE /api/v1/sessions/{id}          - End a session

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde_json::json;
use uuid::Uuid;

use verbum_types::chat::Message;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// POST /api/v1/sessions
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = state.sessions.create();
    let session = state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::Internal("session vanished after creation".to_string()))?;
    let degraded = session.lock().await.is_degraded();

    let resp = ApiResponse::success(
        json!({ "session_id": id, "degraded": degraded }),
        request_id,
        elapsed_ms(start),
    )
    .with_link("messages", &format!("/api/v1/sessions/{id}/messages"));

    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Message>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&session_id)?;
    let session = state.sessions.get(id).ok_or(AppError::SessionNotFound(id))?;
    let messages = session.lock().await.history().to_vec();

    let resp = ApiResponse::success(messages, request_id, elapsed_ms(start))
        .with_link("self", &format!("/api/v1/sessions/{id}/messages"));

    Ok(Json(resp))
}

/// POST /api/v1/sessions/{id}/reset
pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&session_id)?;
    if !state.sessions.reset(id).await {
        return Err(AppError::SessionNotFound(id));
    }

    Ok(Json(ApiResponse::success(
        json!({ "session_id": id, "reset": true }),
        request_id,
        elapsed_ms(start),
    )))
}

/// DELETE /api/v1/sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&session_id)?;
    if !state.sessions.remove(id) {
        return Err(AppError::SessionNotFound(id));
    }

    Ok(Json(ApiResponse::success(
        json!({ "session_id": id, "deleted": true }),
        request_id,
        elapsed_ms(start),
    )))
}
