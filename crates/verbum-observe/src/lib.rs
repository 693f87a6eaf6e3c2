//! Observability setup for Verbum: tracing subscriber and GenAI span attribute names.

pub mod genai_attrs;
pub mod tracing_setup;
