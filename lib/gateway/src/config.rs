//! Gateway client configuration.
//!
//! All settings are supplied at construction and never change afterwards.
//! Fields with defaults can be omitted when loading from environment
//! variables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How 2xx response bodies are shaped by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeMode {
    /// The body is the payload itself.
    #[default]
    Bare,
    /// The body is always `{ "success": bool, "data": ..., "error": ... }`.
    ///
    /// A 2xx body that is not JSON is a decode failure in this mode.
    Wrapped,
    /// Unwrap only bodies that carry a boolean `success` field.
    Auto,
}

/// Configuration for the gateway client.
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the gateway (e.g., "https://gw.example").
    base_url: String,
    /// API key sent as a bearer token.
    api_key: String,
    /// Per-attempt timeout in milliseconds.
    /// Default: 30000
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
    /// Additional attempts after the first for retryable failures.
    /// Default: 2
    #[serde(default = "default_max_retries")]
    max_retries: u32,
    /// Response envelope convention.
    /// Default: bare
    #[serde(default)]
    envelope: EnvelopeMode,
    /// Value of the `X-Client` identification header.
    /// Default: "magnolia-mcp/1.0"
    #[serde(default = "default_client_header")]
    client_header: String,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_client_header() -> String {
    "magnolia-mcp/1.0".to_string()
}

impl GatewayConfig {
    /// Creates a configuration with defaults for optional fields.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            envelope: EnvelopeMode::default(),
            client_header: default_client_header(),
        }
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the retry budget.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the envelope convention.
    #[must_use]
    pub fn with_envelope(mut self, envelope: EnvelopeMode) -> Self {
        self.envelope = envelope;
        self
    }

    /// Sets the client identification header value.
    #[must_use]
    pub fn with_client_header(mut self, client_header: impl Into<String>) -> Self {
        self.client_header = client_header.into();
        self
    }

    /// Returns the base URL as configured.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the bearer credential.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the per-attempt timeout in milliseconds.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the retry budget.
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the envelope convention.
    #[must_use]
    pub fn envelope(&self) -> EnvelopeMode {
        self.envelope
    }

    /// Returns the client identification header value.
    #[must_use]
    pub fn client_header(&self) -> &str {
        &self.client_header
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .field("envelope", &self.envelope)
            .field("client_header", &self.client_header)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_has_correct_defaults() {
        let config = GatewayConfig::new("https://gw.example", "secret");
        assert_eq!(config.timeout_ms(), 30_000);
        assert_eq!(config.max_retries(), 2);
        assert_eq!(config.envelope(), EnvelopeMode::Bare);
        assert_eq!(config.client_header(), "magnolia-mcp/1.0");
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: GatewayConfig = serde_json::from_value(serde_json::json!({
            "base_url": "https://gw.example",
            "api_key": "secret",
            "envelope": "wrapped"
        }))
        .expect("config should deserialize");

        assert_eq!(config.base_url(), "https://gw.example");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.envelope(), EnvelopeMode::Wrapped);
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = GatewayConfig::new("https://gw.example", "super-secret-key");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
