//! Keyword classification of a user utterance.
//!
//! First match wins, in order: short greetings, time, date, arithmetic.
//! Anything else is a scripture question for the chat session.
//!
//! Time and date only match whole questions, so "what time did Jesus die?"
//! still reaches the session.

use super::arithmetic;
use super::greeting::{GREETING_PHRASES, GreetingKind};

/// Greetings longer than this are treated as questions ("hi, who was Paul?").
const MAX_GREETING_WORDS: usize = 4;

const TIME_QUESTIONS: &[&str] = &[
    "time",
    "the time",
    "current time",
    "what time is it",
    "what's the time",
    "what is the time",
    "what's the current time",
    "what is the current time",
    "tell me the time",
    "do you have the time",
    "quelle heure",
    "quelle heure est-il",
    "il est quelle heure",
];

const DATE_QUESTIONS: &[&str] = &[
    "date",
    "the date",
    "today's date",
    "what day is it",
    "what day is today",
    "what's the date",
    "what is the date",
    "what's today's date",
    "what is today's date",
    "tell me the date",
    "quel jour",
    "quel jour sommes-nous",
    "on est quel jour",
    "quelle est la date",
];

/// Trailing words that do not change a time or date question.
const QUESTION_SUFFIXES: &[&str] = &[" right now", " now", " today", " please"];

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Greeting(GreetingKind),
    Time,
    Date,
    /// Carries the normalized expression.
    Arithmetic(String),
    Scripture,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting(_) => "greeting",
            Intent::Time => "time",
            Intent::Date => "date",
            Intent::Arithmetic(_) => "arithmetic",
            Intent::Scripture => "scripture",
        }
    }
}

pub fn classify(text: &str) -> Intent {
    let lowered = text
        .trim()
        .trim_end_matches(['?', '!', '.'])
        .trim()
        .to_lowercase();

    if let Some(kind) = greeting_kind(&lowered) {
        return Intent::Greeting(kind);
    }
    if is_question(&lowered, TIME_QUESTIONS) {
        return Intent::Time;
    }
    if is_question(&lowered, DATE_QUESTIONS) {
        return Intent::Date;
    }

    let expr = arithmetic::normalize(&lowered);
    if arithmetic::looks_like_expression(&expr) {
        return Intent::Arithmetic(expr);
    }
    Intent::Scripture
}

/// `lowered` is one of `questions`, ignoring a courtesy suffix.
fn is_question(lowered: &str, questions: &[&str]) -> bool {
    if questions.contains(&lowered) {
        return true;
    }
    QUESTION_SUFFIXES.iter().any(|suffix| {
        lowered
            .strip_suffix(suffix)
            .map(|core| core.trim_end_matches([',', ' ']))
            .is_some_and(|core| questions.contains(&core))
    })
}

fn greeting_kind(lowered: &str) -> Option<GreetingKind> {
    if lowered.split_whitespace().count() > MAX_GREETING_WORDS {
        return None;
    }
    GREETING_PHRASES.iter().find_map(|(kind, phrases)| {
        phrases
            .iter()
            .any(|p| starts_with_word(lowered, p))
            .then_some(*kind)
    })
}

/// `text` starts with `phrase` followed by a non-alphanumeric char or the end.
fn starts_with_word(text: &str, phrase: &str) -> bool {
    text.strip_prefix(phrase)
        .is_some_and(|rest| rest.chars().next().is_none_or(|c| !c.is_alphanumeric()))
}
