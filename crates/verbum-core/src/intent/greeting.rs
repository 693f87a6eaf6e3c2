use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GreetingKind {
    Hello,
    Thanks,
    Farewell,
}

impl GreetingKind {
    pub fn reply(self) -> &'static str {
        match self {
            GreetingKind::Hello => {
                "Hello! Ask me anything about the Bible, or for the time, the date or a quick calculation."
            }
            GreetingKind::Thanks => "You're welcome. May the Lord bless you and keep you (Numbers 6:24).",
            GreetingKind::Farewell => "Goodbye, and grace and peace to you (Philippians 1:2).",
        }
    }
}

/// Leading phrases for each kind, checked in order.
pub(crate) const GREETING_PHRASES: &[(GreetingKind, &[&str])] = &[
    (
        GreetingKind::Thanks,
        &["thank you", "thanks", "merci"],
    ),
    (
        GreetingKind::Farewell,
        &["goodbye", "bye", "see you", "au revoir"],
    ),
    (
        GreetingKind::Hello,
        &["hello", "hi", "hey", "good morning", "good evening", "bonjour", "salut"],
    ),
];
