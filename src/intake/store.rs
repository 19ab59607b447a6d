//! Session store — one single-writer guard per intake session.
//!
//! The chat UI presents one question at a time, but the store does not rely
//! on caller discipline: each session lives behind its own `tokio::sync::Mutex`,
//! so answer N+1 cannot interleave with answer N's state transition. Sessions
//! of different patients share nothing and proceed independently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::questions;
use super::session::IntakeSession;

/// Shared handle to a single session. Lock it for the full operation.
pub type SessionHandle = Arc<Mutex<IntakeSession>>;

/// All live intake sessions, keyed by session id.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session for a patient. Returns its id and the first prompt.
    pub async fn create(&self, patient_id: u64) -> (Uuid, &'static str) {
        let session = IntakeSession::new(patient_id);
        let id = session.id();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        (id, questions::first_question())
    }

    /// Look up a session handle.
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Drop a session. Abandoning an intake needs no compensation —
    /// nothing is persisted before routing.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
