//! Google Gemini provider implementation.
//!
//! [`GeminiProvider`] implements
//! [`LlmProvider`](verbum_core::llm::provider::LlmProvider) over the
//! non-streaming `generateContent` endpoint.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
