//! Local intent handling in front of the chat session.
//!
//! Greetings, time, date and arithmetic are answered on the spot. Everything
//! else is forwarded to the biblical Q&A session.

pub mod arithmetic;
pub mod classifier;
pub mod clock;
pub mod greeting;
pub mod router;

pub use arithmetic::ArithmeticError;
pub use classifier::{Intent, classify};
pub use greeting::GreetingKind;
pub use router::{Assistant, AssistantReply};
