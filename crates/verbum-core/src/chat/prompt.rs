//! Prompt assembly from a context window.
//!
//! The backend receives a single flat prompt rather than structured turns:
//!
//! ```text
//! Assistant: <system context>
//! User: <earlier question>
//! Assistant: <earlier answer>
//!
//! User: <new input>
//! ```
//!
//! The last window entry is always left out, since in a normal turn it is the
//! user message that the trailing `User:` line repeats.

use verbum_types::chat::{Message, MessageRole};

/// Persona instruction seeded as the first message of every fresh session.
pub const SYSTEM_CONTEXT: &str = "You are an expert in Christian theology and biblical studies, \
with deep knowledge of the Bible, its history and its interpretation.

Your main mission is to:
1. Answer questions about the Bible and the Christian faith with wisdom and kindness
2. Always cite relevant Bible passages with precise references (for example John 3:16)
3. Explain theological concepts simply and accessibly
4. Help apply biblical teaching to everyday life
5. Keep a pastoral and encouraging tone

For each answer:
- Start by answering the question directly
- Quote at least one relevant passage with its reference
- Explain the historical context when needed
- Finish with a practical application or a spiritual reflection

Use respectful, accessible language while staying faithful to biblical teaching. \
Avoid theological controversies and focus on the fundamental truths of the Christian faith.";

/// Renders a window of messages plus new input into one prompt string.
pub struct PromptAssembler;

impl PromptAssembler {
    /// Label used for a stored role. System context is presented as the assistant speaking.
    pub fn display_role(role: MessageRole) -> &'static str {
        match role {
            MessageRole::User => "User",
            MessageRole::System | MessageRole::Assistant => "Assistant",
        }
    }

    pub fn assemble(window: &[Message], user_input: &str) -> String {
        let earlier = match window.split_last() {
            Some((_, earlier)) => earlier,
            None => &[],
        };

        let mut prompt = earlier
            .iter()
            .map(|m| format!("{}: {}", Self::display_role(m.role()), m.content()))
            .collect::<Vec<_>>()
            .join("\n");

        if !prompt.is_empty() {
            prompt.push_str("\n\n");
        }
        prompt.push_str("User: ");
        prompt.push_str(user_input);
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_example() {
        let window = vec![
            Message::system("SYS"),
            Message::user("Hi"),
            Message::assistant("Hello"),
        ];
        assert_eq!(
            PromptAssembler::assemble(&window, "How are you?"),
            "Assistant: SYS\nUser: Hi\n\nUser: How are you?"
        );
    }

    #[test]
    fn test_empty_and_single_windows() {
        assert_eq!(PromptAssembler::assemble(&[], "Hi"), "User: Hi");
        assert_eq!(
            PromptAssembler::assemble(&[Message::user("Hi")], "Hi"),
            "User: Hi"
        );
    }

    #[test]
    fn test_empty_input() {
        let window = vec![Message::system("SYS"), Message::user("x")];
        assert_eq!(PromptAssembler::assemble(&window, ""), "Assistant: SYS\n\nUser: ");
    }

    #[test]
    fn test_deterministic() {
        let window = vec![Message::system("SYS"), Message::user("q")];
        let a = PromptAssembler::assemble(&window, "¿§¶°");
        let b = PromptAssembler::assemble(&window, "¿§¶°");
        assert_eq!(a, b);
    }

    #[test]
    fn test_system_context_names_a_reference() {
        assert!(SYSTEM_CONTEXT.contains("John 3:16"));
    }
}
