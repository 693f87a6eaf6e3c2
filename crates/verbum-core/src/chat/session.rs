//! One conversation: history, prompt window and backend handle.
//!
//! A session starts `Uninitialized`. `initialize()` seeds the history with the
//! system context and picks a backend (live or degraded); `respond()` runs a
//! full turn and never fails.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;
use verbum_types::chat::{Message, MessageRole};
use verbum_types::config::ChatConfig;

use crate::llm::backend::BackendClient;
use crate::llm::connector::BackendConnector;

use super::history::{EvictionPolicy, MessageStore};
use super::prompt::{PromptAssembler, SYSTEM_CONTEXT};

#[derive(Debug)]
pub enum SessionState {
    Uninitialized,
    Active { backend: BackendClient },
}

pub struct ChatSession {
    id: Uuid,
    store: MessageStore,
    system_context: String,
    window_size: usize,
    temperature: f64,
    connector: Arc<dyn BackendConnector>,
    state: SessionState,
    turn_count: u32,
    created_at: DateTime<Utc>,
    last_active_at: DateTime<Utc>,
}

impl ChatSession {
    /// A new, uninitialized session with an empty history.
    ///
    /// The persona comes from `config.system_context` when set, otherwise
    /// [`SYSTEM_CONTEXT`].
    pub fn new(config: &ChatConfig, connector: Arc<dyn BackendConnector>) -> Self {
        Self::with_id(Uuid::now_v7(), config, connector)
    }

    /// Like [`ChatSession::new`], under a caller-chosen id.
    pub fn with_id(id: Uuid, config: &ChatConfig, connector: Arc<dyn BackendConnector>) -> Self {
        let now = Utc::now();
        Self {
            id,
            store: MessageStore::new(
                config.max_history,
                EvictionPolicy::from_pin_flag(config.pin_system_context),
            ),
            system_context: config
                .system_context
                .clone()
                .unwrap_or_else(|| SYSTEM_CONTEXT.to_string()),
            window_size: config.window_size,
            temperature: config.temperature,
            connector,
            state: SessionState::Uninitialized,
            turn_count: 0,
            created_at: now,
            last_active_at: now,
        }
    }

    /// Reset the conversation and (re)acquire a backend.
    ///
    /// Safe to call any number of times; each call leaves only the system
    /// context in the history.
    pub fn initialize(&mut self) {
        self.store.clear();
        self.store
            .add_message(MessageRole::System, self.system_context.clone());
        let backend = BackendClient::initialize(self.connector.as_ref());
        info!(
            session_id = %self.id,
            provider = backend.provider_name(),
            degraded = backend.is_degraded(),
            "Chat session initialized"
        );
        self.state = SessionState::Active { backend };
        self.turn_count = 0;
        self.last_active_at = Utc::now();
    }

    /// Run one turn and return the answer text.
    ///
    /// Initializes the session first if needed. Empty input is accepted: it is
    /// not stored, but still produces a prompt and an answer.
    pub async fn respond(&mut self, user_input: &str) -> String {
        if !self.is_active() {
            self.initialize();
        }

        let span = info_span!(
            "chat.turn",
            session_id = %self.id,
            turn = self.turn_count + 1,
            input_chars = user_input.chars().count(),
        );

        async move {
            self.store.add_message(MessageRole::User, user_input);
            let window = self.store.get_context_window(self.window_size);
            let prompt = PromptAssembler::assemble(window, user_input);
            debug!(window_len = window.len(), prompt_chars = prompt.len(), "Prompt assembled");

            let text = match &self.state {
                SessionState::Active { backend } => backend.send(&prompt, self.temperature).await,
                SessionState::Uninitialized => {
                    BackendClient::degraded()
                        .send(&prompt, self.temperature)
                        .await
                }
            };

            self.store.add_message(MessageRole::Assistant, text.as_str());
            self.turn_count += 1;
            self.last_active_at = Utc::now();
            text
        }
        .instrument(span)
        .await
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    /// Whether the session answers from the canned fallback.
    ///
    /// False before initialization.
    pub fn is_degraded(&self) -> bool {
        match &self.state {
            SessionState::Active { backend } => backend.is_degraded(),
            SessionState::Uninitialized => false,
        }
    }

    pub fn history(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Completed turns since the last `initialize()`.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active_at(&self) -> DateTime<Utc> {
        self.last_active_at
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("history_len", &self.store.len())
            .field("turn_count", &self.turn_count)
            .finish()
    }
}
