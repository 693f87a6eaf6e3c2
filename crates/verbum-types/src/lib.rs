//! Shared domain types for Verbum.
//!
//! Messages, LLM request/response shapes, configuration and the error types
//! that cross crate boundaries.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
