//! Shared application state.

use crate::config::ServerConfig;
use magnolia_session::SessionStore;
use magnolia_tools::ToolDispatcher;
use std::sync::Arc;

/// State shared by every handler.
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
    /// Tool catalog and gateway access.
    pub dispatcher: ToolDispatcher,
    /// Per-conversation session actors.
    pub sessions: SessionStore,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: ServerConfig, dispatcher: ToolDispatcher, sessions: SessionStore) -> Self {
        Self {
            config,
            dispatcher,
            sessions,
        }
    }
}

/// Handle to the shared state, as extracted by handlers.
pub type SharedState = Arc<AppState>;
