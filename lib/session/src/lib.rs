//! Per-conversation session state for the Magnolia tool gateway.
//!
//! This crate provides:
//!
//! - **Session Document**: Selected parcels, active deal, map viewport and
//!   recent tool calls for one conversation
//! - **Session Actors**: One task per conversation that serializes every
//!   read and mutation of its document
//! - **Session Store**: Registry that routes conversations to actors by a
//!   stable hash of the conversation ID
//! - **Storage**: Pluggable durable backing for documents

pub mod actor;
pub mod document;
pub mod error;
pub mod key;
pub mod storage;
pub mod store;

pub use actor::SessionHandle;
pub use document::{
    MAX_RECENT_TOOL_CALLS, MapViewport, SessionDocument, SessionPatch, ToolCallRecord,
};
pub use error::SessionError;
pub use key::ActorKey;
pub use storage::{MemoryStorage, SessionStorage};
pub use store::{DEFAULT_MAILBOX_CAPACITY, SessionStore};
