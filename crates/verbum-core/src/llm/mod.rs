//! Generative backend abstractions for Verbum.
//!
//! - `LlmProvider`: RPITIT trait for concrete backends
//! - `BoxLlmProvider`: object-safe wrapper for dynamic dispatch
//! - `BackendConnector`: acquires a provider, or fails
//! - `BackendClient`: live provider or degraded canned responder

pub mod backend;
pub mod box_provider;
pub mod connector;
pub mod provider;
