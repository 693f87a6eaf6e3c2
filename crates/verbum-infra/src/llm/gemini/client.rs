//! GeminiProvider -- concrete [`LlmProvider`] for the Google Gemini API.
//!
//! Sends non-streaming requests to `generateContent`. The API key is wrapped
//! in [`secrecy::SecretString`] and only exposed when building the request
//! header.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{Instrument, field, info_span};

use verbum_core::llm::provider::LlmProvider;
use verbum_observe::genai_attrs::{OP_CHAT, PROVIDER_GEMINI, span_name};
use verbum_types::chat::MessageRole;
use verbum_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use super::types::{
    GeminiContent, GeminiErrorEnvelope, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig,
};

/// Google Gemini LLM provider.
///
/// Has no `Debug` impl, so the key cannot end up in logs.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    max_output_tokens: u32,
}

impl GeminiProvider {
    const API_KEY_HEADER: &'static str = "x-goog-api-key";

    pub fn new(
        client: reqwest::Client,
        api_key: SecretString,
        base_url: impl Into<String>,
        model: impl Into<String>,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into(),
            model: model.into(),
            max_output_tokens,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Convert a generic [`CompletionRequest`] into a Gemini request body.
    ///
    /// System messages are folded into `systemInstruction`; assistant turns
    /// use Gemini's `model` role.
    fn to_gemini_request(&self, request: &CompletionRequest) -> GenerateContentRequest {
        let mut system_parts: Vec<&str> = request.system.as_deref().into_iter().collect();
        let mut contents = Vec::with_capacity(request.messages.len());

        for message in &request.messages {
            match message.role() {
                MessageRole::System => system_parts.push(message.content()),
                MessageRole::User => {
                    contents.push(GeminiContent::text(Some("user"), message.content()))
                }
                MessageRole::Assistant => {
                    contents.push(GeminiContent::text(Some("model"), message.content()))
                }
            }
        }

        GenerateContentRequest {
            contents,
            system_instruction: (!system_parts.is_empty())
                .then(|| GeminiContent::text(None, system_parts.join("\n\n"))),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: Some(request.max_tokens.unwrap_or(self.max_output_tokens)),
            },
        }
    }

    /// Map a non-2xx status and its body to an [`LlmError`].
    fn error_for_status(status: StatusCode, retry_after_secs: Option<u64>, body: &str) -> LlmError {
        let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.to_string());

        match status.as_u16() {
            400 if body.contains("API_KEY_INVALID") => LlmError::AuthenticationFailed,
            400 => LlmError::InvalidRequest(message),
            401 | 403 => LlmError::AuthenticationFailed,
            404 => LlmError::NotFound(message),
            429 => LlmError::RateLimited {
                retry_after_ms: retry_after_secs.map(|s| s * 1000),
            },
            _ => LlmError::Provider {
                message: format!("HTTP {status}: {message}"),
            },
        }
    }

    async fn send(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_gemini_request(request);

        let response = self
            .client
            .post(self.url())
            .header(Self::API_KEY_HEADER, self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::error_for_status(status, retry_after, &error_body));
        }

        let gemini_resp: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let candidate = gemini_resp.candidates.into_iter().next();
        let finish_reason = candidate.as_ref().and_then(|c| c.finish_reason.clone());
        let content = candidate
            .and_then(|c| c.content)
            .map(|c| c.joined_text())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        let usage = gemini_resp
            .usage_metadata
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: gemini_resp.model_version.unwrap_or_else(|| self.model.clone()),
            finish_reason,
            usage,
        })
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_GEMINI
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let span = info_span!(
            "chat",
            otel.name = %span_name(OP_CHAT, &self.model),
            gen_ai.operation.name = OP_CHAT,
            gen_ai.provider.name = PROVIDER_GEMINI,
            gen_ai.request.model = %self.model,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.usage.input_tokens = field::Empty,
            gen_ai.usage.output_tokens = field::Empty,
            gen_ai.response.finish_reasons = field::Empty,
        );

        let result = self.send(request).instrument(span.clone()).await;
        if let Ok(response) = &result {
            span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
            span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);
            if let Some(reason) = &response.finish_reason {
                span.record("gen_ai.response.finish_reasons", reason.as_str());
            }
        }
        result
    }
}
