use std::collections::HashMap;

use async_trait::async_trait;
use boutique_core::{ChatSession, SessionStore, StoreError};
use tokio::sync::RwLock;

/// Keyed in-memory session store. Conversation state dies with the
/// process; a deployment that needs durability swaps in another
/// [`SessionStore`] implementation.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, ChatSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<ChatSession>, StoreError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn put(&self, session: ChatSession) -> Result<(), StoreError> {
        self.sessions.write().await.insert(session.id.clone(), session);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }
}
