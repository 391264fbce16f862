//! Registry of session actors.

use crate::actor::SessionHandle;
use crate::key::ActorKey;
use crate::storage::SessionStorage;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use magnolia_core::ConversationId;
use std::sync::Arc;
use tracing::{info, warn};

/// Default mailbox size of each session actor.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 64;

/// Routes conversations to their session actors.
///
/// Actors are spawned on first use and live until the store is dropped.
/// Conversations never share an actor, so they are processed in parallel
/// without a common lock.
pub struct SessionStore {
    actors: DashMap<ActorKey, SessionHandle>,
    storage: Arc<dyn SessionStorage>,
    mailbox_capacity: usize,
}

impl SessionStore {
    /// Creates a store backed by `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            actors: DashMap::new(),
            storage,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }

    /// Sets the mailbox size for actors spawned from now on.
    #[must_use]
    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity;
        self
    }

    /// Returns the handle for a conversation, spawning its actor if needed.
    ///
    /// A handle whose actor has stopped is replaced.
    pub fn handle(&self, conversation: &ConversationId) -> SessionHandle {
        let key = ActorKey::for_conversation(conversation);
        match self.actors.entry(key.clone()) {
            Entry::Occupied(entry) if !entry.get().is_closed() => entry.get().clone(),
            Entry::Occupied(mut entry) => {
                warn!(key = %key, "session actor stopped, respawning");
                let handle = self.spawn(key);
                entry.insert(handle.clone());
                handle
            }
            Entry::Vacant(entry) => {
                info!(key = %key, "starting session actor");
                let handle = self.spawn(key);
                entry.insert(handle.clone());
                handle
            }
        }
    }

    /// Returns the number of live actors.
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.actors
            .iter()
            .filter(|entry| !entry.value().is_closed())
            .count()
    }

    fn spawn(&self, key: ActorKey) -> SessionHandle {
        SessionHandle::spawn(key, Arc::clone(&self.storage), self.mailbox_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MapViewport, SessionDocument, SessionPatch, ToolCallRecord};
    use crate::error::SessionError;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use serde_json::{Map, json};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory storage whose writes can be made to fail.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        failing: AtomicBool,
    }

    #[async_trait]
    impl SessionStorage for FlakyStorage {
        async fn load(&self, key: &ActorKey) -> Result<Option<SessionDocument>, SessionError> {
            self.inner.load(key).await
        }

        async fn save(
            &self,
            key: &ActorKey,
            document: &SessionDocument,
        ) -> Result<(), SessionError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(SessionError::StorageFailed {
                    reason: "disk unavailable".to_string(),
                });
            }
            self.inner.save(key, document).await
        }
    }

    fn store() -> (SessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (SessionStore::new(storage.clone()), storage)
    }

    fn call(n: usize) -> ToolCallRecord {
        ToolCallRecord::new(format!("tool_{n}"), Map::new(), "ok")
    }

    #[tokio::test]
    async fn fresh_session_reads_default_without_persisting() {
        let (store, storage) = store();
        let session = store.handle(&ConversationId::new("fresh"));

        let doc = session.read().await.expect("read succeeds");

        assert!(doc.selected_parcels.is_empty());
        assert_eq!(doc.active_deal_id, None);
        assert_eq!(doc.map_viewport, None);
        assert!(doc.recent_tool_calls.is_empty());
        assert_eq!(doc.conversation_id, None);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn defaults_are_independent_per_conversation() {
        let (store, _) = store();
        let a = store.handle(&ConversationId::new("a"));
        let b = store.handle(&ConversationId::new("b"));

        a.merge(SessionPatch::default().selected_parcels(vec!["P1".to_string()]))
            .await
            .expect("merge succeeds");

        let doc = b.read().await.expect("read succeeds");
        assert!(doc.selected_parcels.is_empty());
    }

    #[tokio::test]
    async fn same_conversation_routes_to_same_actor() {
        let (store, _) = store();
        let id = ConversationId::new("conv");
        let first = store.handle(&id);
        let second = store.handle(&id);

        assert_eq!(first.key(), second.key());
        assert_eq!(store.active_sessions(), 1);

        first
            .merge(SessionPatch::default().active_deal(Some("D1".to_string())))
            .await
            .expect("merge succeeds");
        let doc = second.read().await.expect("read succeeds");
        assert_eq!(doc.active_deal_id.as_deref(), Some("D1"));
    }

    #[tokio::test]
    async fn append_keeps_the_last_twenty() {
        let (store, _) = store();
        let session = store.handle(&ConversationId::new("history"));

        for n in 1..=25 {
            session.append_tool_call(call(n)).await.expect("append succeeds");
        }

        let doc = session.read().await.expect("read succeeds");
        let tools: Vec<&str> = doc.recent_tool_calls.iter().map(|c| c.tool.as_str()).collect();
        let expected: Vec<String> = (6..=25).map(|n| format!("tool_{n}")).collect();
        assert_eq!(tools, expected);
    }

    #[tokio::test]
    async fn explicit_null_clears_active_deal() {
        let (store, _) = store();
        let session = store.handle(&ConversationId::new("deal"));

        session
            .merge(serde_json::from_value(json!({"active_deal_id": "D1"})).expect("patch"))
            .await
            .expect("merge succeeds");
        let doc = session
            .merge(serde_json::from_value(json!({"active_deal_id": null})).expect("patch"))
            .await
            .expect("merge succeeds");

        assert_eq!(doc.active_deal_id, None);
    }

    #[tokio::test]
    async fn replace_twice_advances_timestamp() {
        let (store, _) = store();
        let session = store.handle(&ConversationId::new("replace"));
        let mut doc = SessionDocument::new();
        doc.selected_parcels = vec!["P1".to_string()];

        session.replace(doc.clone()).await.expect("replace succeeds");
        let first = session.read().await.expect("read succeeds");
        session.replace(doc).await.expect("replace succeeds");
        let second = session.read().await.expect("read succeeds");

        assert!(second.updated_at > first.updated_at);
        let mut normalized = second.clone();
        normalized.updated_at = first.updated_at;
        assert_eq!(normalized, first);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_merge_and_append_are_both_kept() {
        let (store, _) = store();
        let id = ConversationId::new("race");

        let mut tasks = Vec::new();
        for n in 0..10 {
            let session = store.handle(&id);
            tasks.push(tokio::spawn(async move {
                session.append_tool_call(call(n)).await.expect("append succeeds");
            }));
            let session = store.handle(&id);
            tasks.push(tokio::spawn(async move {
                session
                    .merge(SessionPatch::default().map_viewport(Some(
                        MapViewport {
                            center: (n as f64, 0.0),
                            zoom: 10.0,
                            bbox: None,
                        },
                    )))
                    .await
                    .expect("merge succeeds");
            }));
        }
        futures::future::join_all(tasks).await;

        let doc = store.handle(&id).read().await.expect("read succeeds");
        assert_eq!(doc.recent_tool_calls.len(), 10);
        assert!(doc.map_viewport.is_some());
    }

    #[tokio::test]
    async fn storage_failure_surfaces_and_keeps_last_commit() {
        let storage = Arc::new(FlakyStorage::default());
        let store = SessionStore::new(storage.clone());
        let session = store.handle(&ConversationId::new("flaky"));

        session
            .merge(SessionPatch::default().active_deal(Some("D1".to_string())))
            .await
            .expect("merge succeeds");

        storage.failing.store(true, Ordering::SeqCst);
        let err = session
            .merge(SessionPatch::default().active_deal(Some("D2".to_string())))
            .await
            .expect_err("save fails");
        assert!(matches!(
            err.current_context(),
            SessionError::StorageFailed { .. }
        ));

        storage.failing.store(false, Ordering::SeqCst);
        let doc = session.read().await.expect("read succeeds");
        assert_eq!(doc.active_deal_id.as_deref(), Some("D1"));
    }

    #[tokio::test]
    async fn reset_restores_default_and_persists_it() {
        let (store, storage) = store();
        let session = store.handle(&ConversationId::new("reset"));

        session
            .merge(SessionPatch::default().selected_parcels(vec!["P1".to_string()]))
            .await
            .expect("merge succeeds");
        let before = session.read().await.expect("read succeeds");
        session.reset().await.expect("reset succeeds");
        let after = session.read().await.expect("read succeeds");

        assert!(after.selected_parcels.is_empty());
        assert!(after.updated_at > before.updated_at);
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn state_survives_a_new_store() {
        let storage = Arc::new(MemoryStorage::new());
        let id = ConversationId::new("durable");

        {
            let store = SessionStore::new(storage.clone());
            store
                .handle(&id)
                .merge(SessionPatch::default().active_deal(Some("D9".to_string())))
                .await
                .expect("merge succeeds");
        }

        let store = SessionStore::new(storage);
        let doc = store.handle(&id).read().await.expect("read succeeds");
        assert_eq!(doc.active_deal_id.as_deref(), Some("D9"));
    }
}
