//! Question answering endpoint.
//!
//! Endpoints:
//! - POST /api/process_audio - Answer a transcribed utterance
//! - POST /api/v1/process    - Same handler under the versioned prefix
//!
//! The body is `{"text": ..., "session_id": "..."}`. Without a session id the
//! registry's default session answers, so a front end that only posts
//! `{"text"}` still keeps its conversation context.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use verbum_core::chat::coerce_input;
use verbum_core::intent::Assistant;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub text: Value,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub response: String,
    pub intent: String,
    pub session_id: Uuid,
    pub success: bool,
}

/// Extract the utterance, rejecting non-string or blank text in strict mode.
fn utterance(text: &Value, strict: bool) -> Result<String, AppError> {
    if !strict {
        return Ok(coerce_input(text));
    }
    match text {
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        Value::String(_) => Err(AppError::Validation("text must not be empty".to_string())),
        _ => Err(AppError::Validation("text must be a string".to_string())),
    }
}

/// POST /api/process_audio
pub async fn process_text(
    State(state): State<AppState>,
    Json(body): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, AppError> {
    let text = utterance(&body.text, state.config.server.strict_input)?;

    let (session_id, session) = state
        .sessions
        .get_or_default(body.session_id)
        .ok_or_else(|| AppError::SessionNotFound(body.session_id.unwrap_or_default()))?;

    let reply = {
        let mut session = session.lock().await;
        Assistant::handle(&mut session, &text).await
    };

    if let Some(speech) = state.speech.clone() {
        let spoken = reply.text.clone();
        tokio::spawn(async move { speech.speak_or_warn(&spoken).await });
    }

    Ok(Json(ProcessResponse {
        response: reply.text,
        intent: reply.intent.label().to_string(),
        session_id,
        success: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strict_mode_rejects_non_strings() {
        assert!(matches!(utterance(&json!(123), true), Err(AppError::Validation(_))));
        assert!(matches!(utterance(&Value::Null, true), Err(AppError::Validation(_))));
        assert!(matches!(utterance(&json!("   "), true), Err(AppError::Validation(_))));
        assert_eq!(utterance(&json!("Who was Moses?"), true).unwrap(), "Who was Moses?");
    }

    #[test]
    fn lenient_mode_coerces() {
        assert_eq!(utterance(&json!(123), false).unwrap(), "123");
        assert_eq!(utterance(&Value::Null, false).unwrap(), "");
        assert_eq!(utterance(&json!([]), false).unwrap(), "[]");
    }
}
