//! Per-user session store

use crate::state_machine::Session;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Maps user id to that user's session.
///
/// Each session sits behind its own lock so one user's read-modify-write
/// never blocks another's.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<i64, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session for `user_id`, created at step NONE on first use
    pub async fn handle(&self, user_id: i64) -> Arc<Mutex<Session>> {
        if let Some(existing) = self.sessions.read().await.get(&user_id) {
            return existing.clone();
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(user_id)
            .or_insert_with(|| {
                tracing::debug!(user_id, "Created session");
                Arc::new(Mutex::new(Session::default()))
            })
            .clone()
    }

    /// Copy of the current session, if the user has one
    #[cfg(test)]
    pub async fn snapshot(&self, user_id: i64) -> Option<Session> {
        let handle = self.sessions.read().await.get(&user_id).cloned()?;
        let session = handle.lock().await;
        Some(session.clone())
    }
}
