//! Identifiers shared across crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a host conversation.
///
/// Conversation IDs are opaque strings chosen by the host. They are the
/// partition key for per-conversation session state, so two requests that
/// carry the same ID always address the same session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Conversation used when the host does not name one.
    pub const DEFAULT: &'static str = "default";

    /// Creates a conversation ID from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the conversation ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ConversationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_id_display() {
        let id = ConversationId::new("conv_123");
        assert_eq!(id.to_string(), "conv_123");
        assert_eq!(id.as_str(), "conv_123");
    }

    #[test]
    fn conversation_id_default() {
        assert_eq!(ConversationId::default().as_str(), "default");
    }

    #[test]
    fn conversation_id_serializes_transparently() {
        let id = ConversationId::from("conv_abc");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"conv_abc\"");

        let parsed: ConversationId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, id);
    }
}
