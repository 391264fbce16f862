//! Success-envelope handling.
//!
//! Some gateway deployments return payloads bare, others wrap them as
//! `{ "success": bool, "data": ..., "error": ... }`. The configured
//! [`EnvelopeMode`] decides which shape a 2xx body is read as.

use crate::config::EnvelopeMode;
use crate::error::GatewayError;
use serde_json::Value as JsonValue;

/// Extracts the payload from a decoded 2xx body.
///
/// # Errors
///
/// Returns `Api` when a wrapped body reports `success: false`, and
/// `Decode` when `Wrapped` mode receives a body without a boolean
/// `success` field.
pub fn unwrap_payload(
    mode: EnvelopeMode,
    status: u16,
    body: JsonValue,
) -> Result<JsonValue, GatewayError> {
    match mode {
        EnvelopeMode::Bare => Ok(body),
        EnvelopeMode::Wrapped => match success_flag(&body) {
            Some(success) => open(success, status, body),
            None => Err(GatewayError::Decode {
                reason: "expected an envelope with a boolean 'success' field".to_string(),
            }),
        },
        EnvelopeMode::Auto => match success_flag(&body) {
            Some(success) => open(success, status, body),
            None => Ok(body),
        },
    }
}

fn success_flag(body: &JsonValue) -> Option<bool> {
    body.as_object()?.get("success")?.as_bool()
}

fn open(success: bool, status: u16, mut body: JsonValue) -> Result<JsonValue, GatewayError> {
    if success {
        return Ok(body
            .get_mut("data")
            .map(JsonValue::take)
            .unwrap_or(JsonValue::Null));
    }

    // The error may be an object with code/message fields or a bare string.
    let error = match body.get("error") {
        Some(JsonValue::String(message)) => serde_json::json!({ "message": message }),
        Some(error @ JsonValue::Object(_)) => error.clone(),
        _ => JsonValue::Object(Default::default()),
    };
    Err(GatewayError::from_json_body(status, &error))
}
