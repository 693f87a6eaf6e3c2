//! Interactive CLI conversation.
//!
//! Welcome banner, slash commands, a thinking spinner per answer and optional
//! speech. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
