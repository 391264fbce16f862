//! Actor addressing.

use magnolia_core::ConversationId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Stable address of a conversation's session actor.
///
/// The key is the lowercase hex SHA-256 of the conversation ID. It is also
/// the partition key under which the document is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorKey(String);

impl ActorKey {
    /// Derives the key for a conversation.
    #[must_use]
    pub fn for_conversation(conversation: &ConversationId) -> Self {
        let digest = Sha256::digest(conversation.as_str().as_bytes());
        Self(hex::encode(digest))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_ids_share_a_key() {
        let a = ActorKey::for_conversation(&ConversationId::new("conv-1"));
        let b = ActorKey::for_conversation(&ConversationId::new("conv-1"));
        let c = ActorKey::for_conversation(&ConversationId::new("conv-2"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn key_is_hex_sha256() {
        let key = ActorKey::for_conversation(&ConversationId::new("abc"));
        assert_eq!(
            key.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
