//! Infrastructure layer for Verbum.
//!
//! Implements the seams defined in `verbum-core` against the outside world:
//! the Gemini HTTP backend, the TOML configuration loader with environment
//! overrides and API-key resolution, and speech synthesis through an external
//! command.

pub mod config;
pub mod llm;
pub mod speech;
