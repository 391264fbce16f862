//! Error types for the session crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `SessionError`: Errors from session operations and storage

use crate::key::ActorKey;
use std::fmt;

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The durable store failed to load or save a document.
    StorageFailed { reason: String },
    /// A stored document could not be decoded.
    CorruptDocument { key: ActorKey, reason: String },
    /// The actor for a conversation stopped before answering.
    ActorUnavailable { key: ActorKey },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StorageFailed { reason } => write!(f, "session storage failed: {reason}"),
            Self::CorruptDocument { key, reason } => {
                write!(f, "stored session {key} is corrupt: {reason}")
            }
            Self::ActorUnavailable { key } => write!(f, "session actor {key} is unavailable"),
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;
    use magnolia_core::ConversationId;

    #[test]
    fn session_error_display() {
        let err = SessionError::StorageFailed {
            reason: "disk full".to_string(),
        };
        assert!(err.to_string().contains("disk full"));

        let key = ActorKey::for_conversation(&ConversationId::new("c1"));
        let err = SessionError::ActorUnavailable { key: key.clone() };
        assert!(err.to_string().contains(key.as_str()));
    }
}
