//! Liveness endpoint.

use crate::state::SharedState;
use axum::{Json, extract::State};
use serde_json::{Value as JsonValue, json};

/// Public service name.
pub const SERVICE_NAME: &str = "Magnolia Intelligence Platform";

/// Public service version.
pub const SERVICE_VERSION: &str = "1.0.0";

/// Reports service identity and environment.
pub async fn health(State(state): State<SharedState>) -> Json<JsonValue> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "status": "ok",
        "environment": state.config.environment,
    }))
}
