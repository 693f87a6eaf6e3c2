//! Async line input for the chat loop.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// A submitted line, trimmed.
    Message(String),
    /// Ctrl+D, or the terminal went away.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

impl From<Result<ReadlineEvent, ReadlineError>> for InputEvent {
    fn from(event: Result<ReadlineEvent, ReadlineError>) -> Self {
        match event {
            Ok(ReadlineEvent::Line(line)) => InputEvent::Message(line.trim().to_string()),
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Ok(ReadlineEvent::Eof) | Err(_) => InputEvent::Eof,
        }
    }
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// The returned `SharedWriter` prints above the prompt without garbling it.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    pub async fn read_line(&mut self) -> InputEvent {
        let event = self.rl.readline().await;
        if let Ok(ReadlineEvent::Line(line)) = &event {
            if !line.trim().is_empty() {
                self.rl.add_history_entry(line.clone());
            }
        }
        event.into()
    }

    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }
}
