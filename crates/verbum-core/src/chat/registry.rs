//! Concurrent map of live chat sessions.
//!
//! Each session sits behind its own `tokio::sync::Mutex`, so turns within one
//! conversation are serialized while different conversations run in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;
use verbum_types::config::ChatConfig;

use crate::llm::connector::BackendConnector;

use super::session::ChatSession;

pub type SharedSession = Arc<Mutex<ChatSession>>;

pub struct SessionRegistry {
    sessions: DashMap<Uuid, SharedSession>,
    /// Id of the conversation shared by callers that name no session.
    default_id: Uuid,
    config: ChatConfig,
    connector: Arc<dyn BackendConnector>,
}

impl SessionRegistry {
    pub fn new(config: ChatConfig, connector: Arc<dyn BackendConnector>) -> Self {
        Self {
            sessions: DashMap::new(),
            default_id: Uuid::now_v7(),
            config,
            connector,
        }
    }

    /// Create and initialize a session, returning its id.
    pub fn create(&self) -> Uuid {
        let (id, _) = self.insert_new();
        id
    }

    fn insert_new(&self) -> (Uuid, SharedSession) {
        let id = Uuid::now_v7();
        let shared = self.build(id);
        self.sessions.insert(id, shared.clone());
        info!(session_id = %id, total = self.sessions.len(), "Session created");
        (id, shared)
    }

    fn build(&self, id: Uuid) -> SharedSession {
        let mut session = ChatSession::with_id(id, &self.config, self.connector.clone());
        session.initialize();
        Arc::new(Mutex::new(session))
    }

    /// The shared conversation for callers that name no session.
    ///
    /// Created on first use, and again after it has been removed. Always
    /// under the same id, so sessionless callers keep their context.
    pub fn default_session(&self) -> (Uuid, SharedSession) {
        let id = self.default_id;
        let shared = self
            .sessions
            .entry(id)
            .or_insert_with(|| {
                info!(session_id = %id, "Default session created");
                self.build(id)
            })
            .value()
            .clone();
        (id, shared)
    }

    pub fn default_id(&self) -> Uuid {
        self.default_id
    }

    pub fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.get(&id).map(|entry| entry.value().clone())
    }

    /// Look up `id`, or fall back to the default session when no id is given.
    ///
    /// Returns `None` for an id that is not registered.
    pub fn get_or_default(&self, id: Option<Uuid>) -> Option<(Uuid, SharedSession)> {
        match id {
            Some(id) => self.get(id).map(|session| (id, session)),
            None => Some(self.default_session()),
        }
    }

    /// Re-initialize a session in place. Returns false for an unknown id.
    pub async fn reset(&self, id: Uuid) -> bool {
        let Some(session) = self.get(id) else {
            return false;
        };
        session.lock().await.initialize();
        true
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Session removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    /// Name of the connector new sessions are built from.
    pub fn connector_name(&self) -> &str {
        self.connector.name()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .field("connector", &self.connector.name())
            .finish()
    }
}
