//! Process-local session store.

use assess_domain::{Session, SessionRepository, StoreError, check_revision};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Sessions kept in a map; nothing survives the process.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionStore {
    async fn find(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn upsert(&self, session: &Session) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        check_revision(sessions.get(&session.session_id), session)?;
        sessions.insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn find_latest_in_progress(&self, owner_id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.is_owned_by(owner_id) && !s.is_finished())
            .max_by_key(|s| s.updated_at)
            .cloned())
    }
}
