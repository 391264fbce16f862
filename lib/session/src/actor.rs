//! The per-conversation session actor.
//!
//! One actor task owns the document for one conversation. Commands arrive
//! on a bounded mailbox and are applied one at a time in arrival order, so
//! two mutations of the same conversation never interleave. Every mutation
//! is written through to storage before the cached copy changes.

use crate::document::{SessionDocument, SessionPatch, ToolCallRecord, next_stamp};
use crate::error::SessionError;
use crate::key::ActorKey;
use crate::storage::SessionStorage;
use chrono::Utc;
use magnolia_core::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, instrument};

/// Operations understood by a session actor.
#[derive(Debug)]
enum Operation {
    Read,
    Replace(SessionDocument),
    Merge(SessionPatch),
    AppendToolCall(ToolCallRecord),
    Reset,
}

impl Operation {
    fn name(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Replace(_) => "replace",
            Self::Merge(_) => "merge",
            Self::AppendToolCall(_) => "append_tool_call",
            Self::Reset => "reset",
        }
    }
}

/// A command sent to an actor.
struct Command {
    operation: Operation,
    reply: oneshot::Sender<std::result::Result<SessionDocument, SessionError>>,
}

/// Client side of a session actor.
///
/// Handles are cheap to clone. All clones address the same actor.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    key: ActorKey,
    sender: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Spawns an actor for `key` and returns its handle.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn(key: ActorKey, storage: Arc<dyn SessionStorage>, mailbox_capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(mailbox_capacity.max(1));
        let actor = SessionActor {
            key: key.clone(),
            storage,
            cached: None,
            receiver,
        };
        tokio::spawn(actor.run());
        debug!(key = %key, "spawned session actor");
        Self { key, sender }
    }

    /// Returns the address of the actor.
    #[must_use]
    pub fn key(&self) -> &ActorKey {
        &self.key
    }

    /// Returns true if the actor has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Returns the current document, or a fresh default if none is stored.
    ///
    /// Reading never persists the default.
    pub async fn read(&self) -> Result<SessionDocument, SessionError> {
        self.call(Operation::Read).await
    }

    /// Replaces the whole document. `updated_at` is stamped by the actor.
    pub async fn replace(&self, document: SessionDocument) -> Result<(), SessionError> {
        self.call(Operation::Replace(document)).await.map(drop)
    }

    /// Merges a partial update and returns the resulting document.
    pub async fn merge(&self, patch: SessionPatch) -> Result<SessionDocument, SessionError> {
        self.call(Operation::Merge(patch)).await
    }

    /// Appends one entry to the tool call history.
    pub async fn append_tool_call(&self, record: ToolCallRecord) -> Result<(), SessionError> {
        self.call(Operation::AppendToolCall(record)).await.map(drop)
    }

    /// Restores the default document.
    pub async fn reset(&self) -> Result<(), SessionError> {
        self.call(Operation::Reset).await.map(drop)
    }

    async fn call(&self, operation: Operation) -> Result<SessionDocument, SessionError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Command { operation, reply })
            .await
            .map_err(|_| SessionError::ActorUnavailable {
                key: self.key.clone(),
            })?;

        let outcome = response.await.map_err(|_| SessionError::ActorUnavailable {
            key: self.key.clone(),
        })?;
        Ok(outcome?)
    }
}

struct SessionActor {
    key: ActorKey,
    storage: Arc<dyn SessionStorage>,
    /// Last committed document, loaded on first use.
    cached: Option<SessionDocument>,
    receiver: mpsc::Receiver<Command>,
}

impl SessionActor {
    async fn run(mut self) {
        while let Some(command) = self.receiver.recv().await {
            let outcome = self.handle(command.operation).await;
            // The caller may have gone away; the mutation still stands.
            let _ = command.reply.send(outcome);
        }
        debug!(key = %self.key, "session actor stopped");
    }

    #[instrument(skip(self, operation), fields(key = %self.key, operation = operation.name()))]
    async fn handle(
        &mut self,
        operation: Operation,
    ) -> std::result::Result<SessionDocument, SessionError> {
        let outcome = match operation {
            Operation::Read => self.current().await,
            Operation::Replace(mut document) => {
                let previous = self.current().await?;
                document.updated_at = next_stamp(previous.updated_at, Utc::now());
                self.commit(document).await
            }
            Operation::Merge(patch) => {
                let mut document = self.current().await?;
                document.apply(patch);
                document.updated_at = next_stamp(document.updated_at, Utc::now());
                self.commit(document).await
            }
            Operation::AppendToolCall(record) => {
                let mut document = self.current().await?;
                document.push_tool_call(record);
                document.updated_at = next_stamp(document.updated_at, Utc::now());
                self.commit(document).await
            }
            Operation::Reset => {
                let previous = self.current().await?;
                let mut document = SessionDocument::new();
                document.updated_at = next_stamp(previous.updated_at, document.updated_at);
                self.commit(document).await
            }
        };

        if let Err(err) = &outcome {
            error!(error = %err, "session operation failed");
        }
        outcome
    }

    async fn current(&mut self) -> std::result::Result<SessionDocument, SessionError> {
        if let Some(document) = &self.cached {
            return Ok(document.clone());
        }

        let document = match self.storage.load(&self.key).await? {
            Some(document) => document,
            None => SessionDocument::new(),
        };
        self.cached = Some(document.clone());
        Ok(document)
    }

    async fn commit(
        &mut self,
        document: SessionDocument,
    ) -> std::result::Result<SessionDocument, SessionError> {
        self.storage.save(&self.key, &document).await?;
        self.cached = Some(document.clone());
        Ok(document)
    }
}
