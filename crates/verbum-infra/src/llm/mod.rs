//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined in
//! `verbum-core`, the [`GeminiConnector`] that builds it for each session, and
//! [`connector_from_config`] which picks the connector for a configuration.
//!
//! [`LlmProvider`]: verbum_core::llm::provider::LlmProvider

pub mod gemini;

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use verbum_core::llm::box_provider::BoxLlmProvider;
use verbum_core::llm::connector::{BackendConnector, OfflineConnector};
use verbum_types::config::BackendConfig;
use verbum_types::llm::LlmError;

use self::gemini::GeminiProvider;

/// Builds a [`GeminiProvider`] on each `connect()`.
///
/// Connection failures (no key, bad base URL, client construction) surface as
/// [`LlmError::Unavailable`], which sends the session into degraded mode.
pub struct GeminiConnector {
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
    max_output_tokens: u32,
    timeout: Duration,
}

impl GeminiConnector {
    pub fn new(config: &BackendConfig, api_key: Option<SecretString>) -> Self {
        Self {
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_output_tokens: config.max_output_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl BackendConnector for GeminiConnector {
    fn name(&self) -> &str {
        "gemini"
    }

    fn connect(&self) -> Result<BoxLlmProvider, LlmError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| LlmError::Unavailable("no API key configured".to_string()))?;

        reqwest::Url::parse(&self.base_url).map_err(|e| {
            LlmError::Unavailable(format!("invalid base URL '{}': {e}", self.base_url))
        })?;
        if self.model.trim().is_empty() {
            return Err(LlmError::Unavailable("no model configured".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| LlmError::Unavailable(format!("failed to create HTTP client: {e}")))?;

        Ok(BoxLlmProvider::new(GeminiProvider::new(
            client,
            api_key,
            self.base_url.clone(),
            self.model.clone(),
            self.max_output_tokens,
        )))
    }
}

/// Pick the connector for `config`: offline mode never touches the network.
pub fn connector_from_config(
    config: &BackendConfig,
    api_key: Option<SecretString>,
) -> Arc<dyn BackendConnector> {
    if config.offline {
        tracing::info!("Offline mode: sessions will answer from the canned fallback");
        Arc::new(OfflineConnector)
    } else {
        Arc::new(GeminiConnector::new(config, api_key))
    }
}
