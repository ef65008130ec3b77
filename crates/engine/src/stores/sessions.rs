//! Creation session storage.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use kindred_domain::{CreationSession, SessionId};

/// A session shared between requests. Edits hold the lock for the whole cascade.
pub type SharedSession = Arc<Mutex<CreationSession>>;

/// Sessions keyed by id. Nothing is persisted.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, SharedSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: SessionId, session: CreationSession) -> SharedSession {
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, Arc::clone(&shared));
        tracing::debug!(session_id = %id, "Session stored");
        shared
    }

    pub fn get(&self, id: SessionId) -> Option<SharedSession> {
        self.sessions.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, id: SessionId) -> Option<SharedSession> {
        let removed = self.sessions.remove(&id).map(|(_, session)| session);
        if removed.is_some() {
            tracing::debug!(session_id = %id, "Session removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
