//! Bounded, ordered conversation history.
//!
//! `MessageStore` keeps at most `max_history` messages in insertion order.
//! Blank content is never stored. When the bound is exceeded the store evicts
//! according to its [`EvictionPolicy`].

use serde::{Deserialize, Serialize};
use verbum_types::chat::{Message, MessageRole};

/// Which message goes first when the store is over capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Drop the oldest message, whatever its role.
    Fifo,
    /// Drop the oldest non-system message; system messages go only when
    /// nothing else is left.
    #[default]
    PinSystem,
}

impl EvictionPolicy {
    pub fn from_pin_flag(pin_system_context: bool) -> Self {
        if pin_system_context {
            EvictionPolicy::PinSystem
        } else {
            EvictionPolicy::Fifo
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageStore {
    messages: Vec<Message>,
    max_history: usize,
    policy: EvictionPolicy,
}

impl MessageStore {
    /// An empty store. `max_history` is clamped to at least one.
    pub fn new(max_history: usize, policy: EvictionPolicy) -> Self {
        let max_history = max_history.max(1);
        Self {
            messages: Vec::with_capacity(max_history + 1),
            max_history,
            policy,
        }
    }

    /// Append a message, then evict until the bound holds.
    ///
    /// Blank or whitespace-only content is silently ignored.
    pub fn add_message(&mut self, role: MessageRole, content: impl Into<String>) {
        let message = Message::new(role, content);
        if message.is_blank() {
            return;
        }
        self.messages.push(message);
        while self.messages.len() > self.max_history {
            self.evict_one();
        }
    }

    fn evict_one(&mut self) {
        let index = match self.policy {
            EvictionPolicy::Fifo => 0,
            EvictionPolicy::PinSystem => self
                .messages
                .iter()
                .position(|m| m.role() != MessageRole::System)
                .unwrap_or(0),
        };
        self.messages.remove(index);
    }

    /// The last `window_size` messages, or all of them if there are fewer.
    pub fn get_context_window(&self, window_size: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(window_size);
        &self.messages[start..]
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Stored messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }
}
