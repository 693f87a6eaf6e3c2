//! Configuration types for Verbum.
//!
//! `AssistantConfig` is the top-level `verbum.toml`. Every section and field
//! has a default, so an empty file (or no file at all) is a valid config.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration for the assistant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

impl AssistantConfig {
    /// Reject values no session could run with.
    ///
    /// `temperature` is deliberately not checked: it is handed to the backend verbatim.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chat.max_history == 0 {
            return Err(ConfigError::Invalid(
                "chat.max_history must be at least 1".to_string(),
            ));
        }
        if self.backend.model.trim().is_empty() {
            return Err(ConfigError::Invalid("backend.model must not be empty".to_string()));
        }
        if self.backend.api_key_env.trim().is_empty() && !self.backend.offline {
            return Err(ConfigError::Invalid(
                "backend.api_key_env must name an environment variable".to_string(),
            ));
        }
        if self.speech.enabled && self.speech.command.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "speech.command must not be empty when speech is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

/// Conversation-history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Upper bound on stored messages per session.
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Number of most recent messages used to build each prompt.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Sampling temperature passed to the backend.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Keep the system context when the history bound is exceeded.
    #[serde(default = "default_pin_system_context")]
    pub pin_system_context: bool,

    /// Replaces the built-in persona instruction when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_context: Option<String>,
}

fn default_max_history() -> usize {
    10
}

fn default_window_size() -> usize {
    5
}

fn default_temperature() -> f64 {
    0.7
}

fn default_pin_system_context() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
            window_size: default_window_size(),
            temperature: default_temperature(),
            pin_system_context: default_pin_system_context(),
            system_context: None,
        }
    }
}

/// Generative backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Per-request HTTP timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip the backend entirely and answer in degraded mode.
    #[serde(default)]
    pub offline: bool,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_max_output_tokens() -> u32 {
    2048
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
            offline: false,
        }
    }
}

/// REST server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Reject non-string or blank `text` payloads with 400 instead of coercing them.
    #[serde(default = "default_strict_input")]
    pub strict_input: bool,

    /// Directory of static UI files served for unknown paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_dir: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_strict_input() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            strict_input: default_strict_input(),
            web_dir: None,
        }
    }
}

/// Text-to-speech settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Command invoked with the text as its single argument.
    #[serde(default = "default_speech_command")]
    pub command: String,
}

fn default_speech_command() -> String {
    "say".to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: default_speech_command(),
        }
    }
}
