//! Backend connectors.
//!
//! A connector knows how to obtain a live provider handle. `BackendClient`
//! asks it once per session initialization and falls back to degraded mode
//! when it fails.

use verbum_types::llm::LlmError;

use super::box_provider::BoxLlmProvider;

/// Factory for live provider handles.
pub trait BackendConnector: Send + Sync {
    /// Name used in logs (e.g., "gemini", "offline").
    fn name(&self) -> &str;

    /// Try to acquire a working provider.
    fn connect(&self) -> Result<BoxLlmProvider, LlmError>;
}

/// Connector that never yields a provider.
///
/// Every session built on it runs in degraded mode. Used for `--offline`
/// and whenever no credentials are configured on purpose.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineConnector;

impl BackendConnector for OfflineConnector {
    fn name(&self) -> &str {
        "offline"
    }

    fn connect(&self) -> Result<BoxLlmProvider, LlmError> {
        Err(LlmError::Unavailable("offline mode is enabled".to_string()))
    }
}
