//! Durable storage for session documents.

use crate::document::SessionDocument;
use crate::error::SessionError;
use crate::key::ActorKey;
use async_trait::async_trait;
use dashmap::DashMap;

/// Trait for loading and saving session documents.
///
/// Each key is only ever accessed by its own actor, so implementations
/// need no cross-call coordination for a single key.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Loads the document stored under `key`, if any.
    async fn load(&self, key: &ActorKey) -> Result<Option<SessionDocument>, SessionError>;

    /// Stores `document` under `key`, replacing any previous value.
    async fn save(&self, key: &ActorKey, document: &SessionDocument) -> Result<(), SessionError>;
}

/// Process-local storage.
///
/// Documents survive actor restarts but not process restarts.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: DashMap<ActorKey, SessionDocument>,
}

impl MemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn load(&self, key: &ActorKey) -> Result<Option<SessionDocument>, SessionError> {
        Ok(self.documents.get(key).map(|entry| entry.value().clone()))
    }

    async fn save(&self, key: &ActorKey, document: &SessionDocument) -> Result<(), SessionError> {
        self.documents.insert(key.clone(), document.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magnolia_core::ConversationId;

    #[tokio::test]
    async fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        let key = ActorKey::for_conversation(&ConversationId::new("c1"));
        assert_eq!(storage.load(&key).await.expect("load"), None);

        let mut doc = SessionDocument::new();
        doc.active_deal_id = Some("D1".to_string());
        storage.save(&key, &doc).await.expect("save");

        assert_eq!(storage.load(&key).await.expect("load"), Some(doc));
        assert_eq!(storage.len(), 1);
    }
}
