//! Dispatch of a classified utterance to its handler.

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::chat::session::ChatSession;

use super::arithmetic;
use super::classifier::{Intent, classify};
use super::clock;

/// Text answer plus the intent that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub text: String,
    pub intent: Intent,
}

/// Routes utterances between the local handlers and a chat session.
pub struct Assistant;

impl Assistant {
    /// Answer `text` using the local clock for time and date questions.
    pub async fn handle(session: &mut ChatSession, text: &str) -> AssistantReply {
        Self::handle_at(session, text, Local::now().naive_local()).await
    }

    /// Answer `text` as if the current time were `now`.
    ///
    /// Only scripture questions reach the session; local answers leave its
    /// history untouched.
    pub async fn handle_at(
        session: &mut ChatSession,
        text: &str,
        now: NaiveDateTime,
    ) -> AssistantReply {
        let intent = classify(text);
        debug!(intent = intent.label(), input_chars = text.chars().count(), "Intent classified");

        let reply = match &intent {
            Intent::Greeting(kind) => kind.reply().to_string(),
            Intent::Time => clock::describe_time(now),
            Intent::Date => clock::describe_date(now),
            Intent::Arithmetic(expr) => match arithmetic::evaluate(expr) {
                Ok(value) => format!("{expr} = {}", arithmetic::format_number(value)),
                Err(err) => format!("I couldn't work that out: {err}."),
            },
            Intent::Scripture => session.respond(text).await,
        };

        AssistantReply {
            text: reply,
            intent,
        }
    }
}
