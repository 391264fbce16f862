//! Database repositories for the Magnolia server.
//!
//! This module provides data access for:
//! - Per-conversation session documents

pub mod session;

pub use session::PgSessionStorage;
