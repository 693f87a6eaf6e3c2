//! Text-to-speech through an external command.
//!
//! The configured program (`say` on macOS, `espeak` on Linux) is run with the
//! answer text as its last argument, after a `--` so text starting with `-`
//! is never read as an option, and awaited to completion.

use thiserror::Error;
use tokio::process::Command;

use verbum_types::config::SpeechConfig;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("nothing to speak")]
    EmptyText,

    #[error("failed to run speech command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("speech command '{command}' exited with {status}")]
    Failed { command: String, status: String },
}

#[derive(Debug, Clone)]
pub struct SpeechSynthesizer {
    command: String,
}

impl SpeechSynthesizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// A synthesizer for `config`, or `None` when speech is disabled.
    pub fn from_config(config: &SpeechConfig) -> Option<Self> {
        config.enabled.then(|| Self::new(config.command.clone()))
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Speak `text`, waiting for the command to finish.
    pub async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let output = self
            .command_for(text)
            .output()
            .await
            .map_err(|source| SpeechError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SpeechError::Failed {
                command: self.command.clone(),
                status: output.status.to_string(),
            });
        }
        tracing::debug!(command = %self.command, chars = text.chars().count(), "Spoke answer");
        Ok(())
    }

    fn command_for(&self, text: &str) -> Command {
        let mut command = Command::new(&self.command);
        command.arg("--").arg(text);
        command
    }

    /// Speak `text`, logging instead of returning any failure.
    pub async fn speak_or_warn(&self, text: &str) {
        if let Err(err) = self.speak(text).await {
            tracing::warn!(error = %err, "Speech synthesis failed");
        }
    }
}
