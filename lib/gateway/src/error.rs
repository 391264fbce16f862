//! Error types for the gateway crate.
//!
//! Every failure a caller can observe is a `GatewayError`, reported through
//! rootcause. The variant decides the failure class, and the class alone
//! decides whether the client retries.

use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Fallback error code for structured error bodies without a `code` field.
pub const API_ERROR: &str = "API_ERROR";

/// Error code for error responses whose body is not JSON.
pub const HTTP_ERROR: &str = "HTTP_ERROR";

/// Maximum number of characters of a non-JSON error body kept in a message.
pub const MAX_BODY_EXCERPT: usize = 500;

/// Coarse classification of a failed gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The request never reached a server (DNS, connect, timeout).
    Network,
    /// The gateway answered with status 500 or above.
    Server,
    /// The gateway rejected the request (status below 500).
    Client,
    /// The response could not be decoded as declared.
    Decode,
}

impl FailureClass {
    /// Returns true if failures of this class are worth another attempt.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::Server)
    }
}

/// Errors from gateway calls.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The request could not be delivered.
    Network { reason: String },
    /// The attempt exceeded its timeout and was aborted.
    Timeout { timeout_ms: u64 },
    /// The gateway answered with an error.
    Api {
        status: u16,
        code: String,
        message: String,
        details: Map<String, JsonValue>,
    },
    /// The response body did not match its declared shape.
    Decode { reason: String },
    /// The request could not be built.
    InvalidRequest { reason: String },
}

impl GatewayError {
    /// Builds an `Api` error from a JSON error body.
    ///
    /// Fields are read in a fixed priority order:
    /// - `code`: the `code` field (string or number), else [`API_ERROR`]
    /// - `message`: `detail` (strings verbatim, anything else as compact
    ///   JSON), else `message`, else `error`, else a generic message
    /// - `details`: the `details` field if it is an object, else empty
    #[must_use]
    pub fn from_json_body(status: u16, body: &JsonValue) -> Self {
        let code = match body.get("code") {
            Some(JsonValue::String(code)) => code.clone(),
            Some(JsonValue::Number(code)) => code.to_string(),
            _ => API_ERROR.to_string(),
        };

        let message = match body.get("detail") {
            Some(JsonValue::String(detail)) => Some(detail.clone()),
            Some(JsonValue::Null) | None => None,
            Some(other) => Some(other.to_string()),
        }
        .or_else(|| string_field(body, "message"))
        .or_else(|| string_field(body, "error"))
        .unwrap_or_else(|| "Unknown gateway error".to_string());

        let details = match body.get("details") {
            Some(JsonValue::Object(details)) => details.clone(),
            _ => Map::new(),
        };

        Self::Api {
            status,
            code,
            message,
            details,
        }
    }

    /// Builds an `Api` error from a non-JSON error body.
    #[must_use]
    pub fn from_text_body(status: u16, body: &str) -> Self {
        let excerpt: String = body.chars().take(MAX_BODY_EXCERPT).collect();
        Self::Api {
            status,
            code: HTTP_ERROR.to_string(),
            message: format!("Gateway returned {status}: {excerpt}"),
            details: Map::new(),
        }
    }

    /// Returns the failure class of this error.
    #[must_use]
    pub fn class(&self) -> FailureClass {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => FailureClass::Network,
            Self::Api { status, .. } if *status >= 500 => FailureClass::Server,
            Self::Api { .. } | Self::InvalidRequest { .. } => FailureClass::Client,
            Self::Decode { .. } => FailureClass::Decode,
        }
    }

    /// Returns true if the client should try again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.class().is_retryable()
    }

    /// Returns the HTTP status, if the gateway answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Api { code, .. } => code,
            Self::Decode { .. } => "DECODE_ERROR",
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Network { reason } => format!("network failure: {reason}"),
            Self::Timeout { timeout_ms } => format!("request timed out after {timeout_ms}ms"),
            Self::Api { message, .. } => message.clone(),
            Self::Decode { reason } => format!("failed to decode response: {reason}"),
            Self::InvalidRequest { reason } => format!("invalid request: {reason}"),
        }
    }

    /// Returns the structured details supplied by the gateway.
    #[must_use]
    pub fn details(&self) -> Option<&Map<String, JsonValue>> {
        match self {
            Self::Api { details, .. } => Some(details),
            _ => None,
        }
    }
}

fn string_field(body: &JsonValue, field: &str) -> Option<String> {
    body.get(field)
        .and_then(JsonValue::as_str)
        .map(ToString::to_string)
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api { status, code, message, .. } => {
                write!(f, "gateway error {status} ({code}): {message}")
            }
            other => write!(f, "{}: {}", other.code(), other.message()),
        }
    }
}

impl std::error::Error for GatewayError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_body_prefers_detail_over_message() {
        let err = GatewayError::from_json_body(
            404,
            &json!({"code": "NOT_FOUND", "detail": "deal missing", "message": "ignored"}),
        );
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.message(), "deal missing");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn structured_body_falls_back_through_message_fields() {
        let err = GatewayError::from_json_body(422, &json!({"message": "name too short"}));
        assert_eq!(err.code(), API_ERROR);
        assert_eq!(err.message(), "name too short");

        let err = GatewayError::from_json_body(400, &json!({"error": "bad input"}));
        assert_eq!(err.message(), "bad input");

        let err = GatewayError::from_json_body(400, &json!({}));
        assert_eq!(err.message(), "Unknown gateway error");
    }

    #[test]
    fn non_string_detail_is_rendered_as_json() {
        let err = GatewayError::from_json_body(
            422,
            &json!({"detail": [{"loc": ["body", "name"], "msg": "field required"}]}),
        );
        assert!(err.message().contains("field required"));
    }

    #[test]
    fn numeric_code_is_stringified() {
        let err = GatewayError::from_json_body(409, &json!({"code": 1042}));
        assert_eq!(err.code(), "1042");
    }

    #[test]
    fn details_object_is_kept() {
        let err = GatewayError::from_json_body(
            400,
            &json!({"code": "VALIDATION", "details": {"field": "name"}}),
        );
        let details = err.details().expect("api errors carry details");
        assert_eq!(details.get("field"), Some(&json!("name")));
    }

    #[test]
    fn text_body_is_truncated() {
        let body = "x".repeat(2_000);
        let err = GatewayError::from_text_body(502, &body);
        assert_eq!(err.code(), HTTP_ERROR);
        assert!(err.message().starts_with("Gateway returned 502: "));
        assert!(err.message().len() < 600);
    }

    #[test]
    fn classification_drives_retryability() {
        assert!(GatewayError::Network { reason: "refused".to_string() }.is_retryable());
        assert!(GatewayError::Timeout { timeout_ms: 10 }.is_retryable());
        assert!(GatewayError::from_text_body(503, "down").is_retryable());
        assert!(!GatewayError::from_text_body(429, "slow down").is_retryable());
        assert!(!GatewayError::Decode { reason: "eof".to_string() }.is_retryable());
        assert_eq!(
            GatewayError::from_text_body(500, "boom").class(),
            FailureClass::Server
        );
    }

    #[test]
    fn gateway_error_display() {
        let err = GatewayError::from_json_body(422, &json!({"code": "VALIDATION", "message": "bad"}));
        let text = err.to_string();
        assert!(text.contains("422"));
        assert!(text.contains("VALIDATION"));
        assert!(text.contains("bad"));
    }
}
