//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables. Nested
//! sections use `__` as separator, e.g. `GATEWAY__BASE_URL`.
//!
//! See [`GatewayConfig`] for the gateway client settings.

use magnolia_gateway::GatewayConfig;
use magnolia_session::DEFAULT_MAILBOX_CAPACITY;
use serde::Deserialize;
use std::fmt;

/// Environment name that disables bearer authentication.
pub const DEVELOPMENT: &str = "development";

/// Server configuration composed from library configs.
#[derive(Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Deployment environment name, reported by the health endpoint.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Token hosts must present as `Authorization: Bearer <token>`.
    #[serde(default)]
    pub mcp_api_key: Option<String>,

    /// PostgreSQL connection URL for durable session state.
    /// Sessions are kept in memory when unset.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Gateway client configuration.
    pub gateway: GatewayConfig,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Queue depth of each session actor's mailbox.
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_environment() -> String {
    "production".to_string()
}

fn default_mailbox_capacity() -> usize {
    DEFAULT_MAILBOX_CAPACITY
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: default_mailbox_capacity(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns true if bearer authentication is skipped.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.environment == DEVELOPMENT
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("environment", &self.environment)
            .field("mcp_api_key", &self.mcp_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("gateway", &self.gateway)
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json(value: serde_json::Value) -> ServerConfig {
        serde_json::from_value(value).expect("config deserializes")
    }

    #[test]
    fn server_config_has_correct_defaults() {
        let config = from_json(serde_json::json!({
            "gateway": { "base_url": "https://gw.example", "api_key": "k" }
        }));

        assert_eq!(config.bind_addr, "127.0.0.1:8787");
        assert_eq!(config.environment, "production");
        assert!(!config.is_development());
        assert_eq!(config.mcp_api_key, None);
        assert_eq!(config.database_url, None);
        assert_eq!(config.session.mailbox_capacity, DEFAULT_MAILBOX_CAPACITY);
        assert_eq!(config.gateway.max_retries(), 2);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = from_json(serde_json::json!({
            "environment": "development",
            "gateway": { "base_url": "https://gw.example", "api_key": "gateway-secret" }
        }));
        config.mcp_api_key = Some("host-secret".to_string());
        config.database_url = Some("postgres://user:pw@db/magnolia".to_string());

        let debug = format!("{config:?}");
        assert!(config.is_development());
        assert!(!debug.contains("host-secret"));
        assert!(!debug.contains("pw@db"));
        assert!(!debug.contains("gateway-secret"));
    }
}
