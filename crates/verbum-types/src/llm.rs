//! LLM request/response types for Verbum.
//!
//! These model the provider-agnostic shapes exchanged with a generative
//! backend. Provider-specific wire formats live in `verbum-infra`.

use serde::{Deserialize, Serialize};

use crate::chat::Message;

/// Request to an LLM provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Output cap; `None` leaves the provider's configured default in place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl CompletionRequest {
    /// A request carrying a single user prompt.
    pub fn from_prompt(prompt: impl Into<String>, temperature: f64) -> Self {
        Self {
            messages: vec![Message::user(prompt)],
            system: None,
            max_tokens: None,
            temperature: Some(temperature),
        }
    }
}

/// Response from an LLM provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

/// Token usage reported by the provider, when it reports any.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    /// The model or endpoint does not exist (HTTP 404 class).
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("provider returned an empty completion")]
    EmptyResponse,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No provider could be constructed.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl LlmError {
    /// Whether the remote resource is categorically unavailable rather than
    /// failing for this particular request.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LlmError::NotFound(_))
    }

    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::Provider { .. } => "provider",
            LlmError::NotFound(_) => "not_found",
            LlmError::AuthenticationFailed => "authentication_failed",
            LlmError::RateLimited { .. } => "rate_limited",
            LlmError::Deserialization(_) => "deserialization",
            LlmError::EmptyResponse => "empty_response",
            LlmError::InvalidRequest(_) => "invalid_request",
            LlmError::Unavailable(_) => "unavailable",
        }
    }
}
