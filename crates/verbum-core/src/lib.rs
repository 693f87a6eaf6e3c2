//! Business logic for Verbum.
//!
//! Conversation history, prompt assembly, backend fallback and intent routing.
//! Depends only on `verbum-types`: no HTTP, no filesystem. Concrete backends
//! live in `verbum-infra` and plug in through [`llm::connector::BackendConnector`].

pub mod chat;
pub mod intent;
pub mod llm;
