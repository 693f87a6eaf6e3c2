//! LlmProvider trait definition.
//!
//! This is the core abstraction every generative backend implements.
//! Uses RPITIT for `complete`; see `BoxLlmProvider` for dynamic dispatch.

use verbum_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for generative backends (Gemini, test doubles, ...).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in verbum-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
