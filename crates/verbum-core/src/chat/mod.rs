//! Conversation state for the biblical Q&A mode.
//!
//! `MessageStore` holds the bounded history, `PromptAssembler` flattens a
//! window of it into a prompt, `ChatSession` drives one turn at a time and
//! `SessionRegistry` keeps many sessions for the HTTP server.

pub mod history;
pub mod input;
pub mod prompt;
pub mod registry;
pub mod session;

pub use history::{EvictionPolicy, MessageStore};
pub use input::coerce_input;
pub use prompt::{PromptAssembler, SYSTEM_CONTEXT};
pub use registry::{SessionRegistry, SharedSession};
pub use session::{ChatSession, SessionState};
