//! Application state shared by the CLI commands and the REST API.
//!
//! AppState resolves configuration once, picks the backend connector, and
//! owns the session registry that HTTP handlers draw conversations from.

use std::path::Path;
use std::sync::Arc;

use secrecy::SecretString;

use verbum_core::chat::{ChatSession, SessionRegistry};
use verbum_core::llm::connector::BackendConnector;
use verbum_infra::config::{load_config, resolve_api_key};
use verbum_infra::llm::connector_from_config;
use verbum_infra::speech::SpeechSynthesizer;
use verbum_types::config::AssistantConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AssistantConfig>,
    pub connector: Arc<dyn BackendConnector>,
    pub sessions: Arc<SessionRegistry>,
    pub speech: Option<SpeechSynthesizer>,
    /// Whether the connector produced a live provider at startup.
    pub backend_ready: bool,
}

impl AppState {
    /// Load configuration and wire the backend.
    ///
    /// `offline` forces degraded mode on top of whatever the file says. A
    /// missing API key outside offline mode is fatal.
    pub async fn init(config_path: Option<&Path>, offline: bool) -> anyhow::Result<Self> {
        let mut config = load_config(config_path).await?;
        if offline {
            config.backend.offline = true;
        }

        let api_key = resolve_api_key(&config.backend, |name| std::env::var(name).ok())?;
        Ok(Self::from_config(config, api_key))
    }

    pub fn from_config(config: AssistantConfig, api_key: Option<SecretString>) -> Self {
        let connector = connector_from_config(&config.backend, api_key);
        Self::with_connector(config, connector)
    }

    pub fn with_connector(config: AssistantConfig, connector: Arc<dyn BackendConnector>) -> Self {
        let backend_ready = match connector.connect() {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(connector = connector.name(), error = %err, "Backend not available, answers will be canned");
                false
            }
        };
        let sessions = Arc::new(SessionRegistry::new(config.chat.clone(), connector.clone()));
        let speech = SpeechSynthesizer::from_config(&config.speech);

        Self {
            config: Arc::new(config),
            connector,
            sessions,
            speech,
            backend_ready,
        }
    }

    /// A standalone, initialized session for CLI use.
    pub fn new_session(&self) -> ChatSession {
        let mut session = ChatSession::new(&self.config.chat, self.connector.clone());
        session.initialize();
        session
    }

    /// Speech synthesizer for a command that asked for `--speak`.
    ///
    /// The flag enables speech even when the config leaves it off.
    pub fn speech_for(&self, speak: bool) -> Option<SpeechSynthesizer> {
        match (&self.speech, speak) {
            (Some(speech), _) => Some(speech.clone()),
            (None, true) => Some(SpeechSynthesizer::new(self.config.speech.command.clone())),
            (None, false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> AssistantConfig {
        let mut config = AssistantConfig::default();
        config.backend.offline = true;
        config
    }

    #[test]
    fn offline_state_is_not_ready() {
        let state = AppState::from_config(offline_config(), None);
        assert!(!state.backend_ready);
        assert_eq!(state.connector.name(), "offline");
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn keyed_state_is_ready() {
        let state = AppState::from_config(
            AssistantConfig::default(),
            Some(SecretString::from("test-key")),
        );
        assert!(state.backend_ready);
    }

    #[test]
    fn new_session_is_initialized() {
        let state = AppState::from_config(offline_config(), None);
        let session = state.new_session();
        assert!(session.is_degraded());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn speak_flag_enables_speech() {
        let state = AppState::from_config(offline_config(), None);
        assert!(state.speech_for(false).is_none());
        assert_eq!(state.speech_for(true).unwrap().command(), "say");
    }
}
