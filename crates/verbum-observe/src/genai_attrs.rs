//! OpenTelemetry GenAI Semantic Convention attribute names.
//!
//! `tracing` span fields must be written as literal identifiers, so these
//! constants are the reference the span macros are kept in step with, and are
//! used directly wherever a name is built at runtime.
//!
//! Span naming convention: `"{operation} {model}"` (e.g. `"chat gemini-2.0-flash"`).

/// The name of the operation being performed.
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g. "gemini").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

/// The model ID requested.
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// The finish reasons for the response (e.g. "STOP", "MAX_TOKENS").
pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

/// Standard chat completion operation.
pub const OP_CHAT: &str = "chat";

/// Google Gemini provider identifier.
pub const PROVIDER_GEMINI: &str = "gemini";

/// Span name for `operation` against `model`.
pub fn span_name(operation: &str, model: &str) -> String {
    format!("{operation} {model}")
}
