//! Session wire contract.
//!
//! The conversation is selected by the `id` query parameter and defaults
//! to [`ConversationId::DEFAULT`]. Every route answers JSON; malformed
//! bodies are rejected with 400 before the session is touched.

use crate::error::ApiError;
use crate::state::SharedState;
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use magnolia_core::ConversationId;
use magnolia_session::{SessionDocument, SessionHandle, SessionPatch, ToolCallRecord};
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

/// Query parameters shared by session routes.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    id: Option<String>,
}

impl SessionQuery {
    fn conversation(&self) -> ConversationId {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(ConversationId::new)
            .unwrap_or_default()
    }
}

fn handle(state: &SharedState, query: &SessionQuery) -> SessionHandle {
    state.sessions.handle(&query.conversation())
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest {
            reason: rejection.body_text(),
        })
}

fn ok() -> Json<JsonValue> {
    Json(json!({ "ok": true }))
}

/// Returns the current document.
pub async fn read(
    State(state): State<SharedState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<SessionDocument>, ApiError> {
    Ok(Json(handle(&state, &query).read().await?))
}

/// Replaces the whole document.
pub async fn replace(
    State(state): State<SharedState>,
    Query(query): Query<SessionQuery>,
    payload: Result<Json<SessionDocument>, JsonRejection>,
) -> Result<Json<JsonValue>, ApiError> {
    let document = body(payload)?;
    handle(&state, &query).replace(document).await?;
    Ok(ok())
}

/// Merges a partial update and returns the result.
pub async fn merge(
    State(state): State<SharedState>,
    Query(query): Query<SessionQuery>,
    payload: Result<Json<SessionPatch>, JsonRejection>,
) -> Result<Json<SessionDocument>, ApiError> {
    let patch = body(payload)?;
    Ok(Json(handle(&state, &query).merge(patch).await?))
}

/// Resets the document to defaults.
pub async fn reset(
    State(state): State<SharedState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<JsonValue>, ApiError> {
    handle(&state, &query).reset().await?;
    Ok(ok())
}

/// Appends one tool call to the history.
pub async fn append_tool_call(
    State(state): State<SharedState>,
    Query(query): Query<SessionQuery>,
    payload: Result<Json<ToolCallRecord>, JsonRejection>,
) -> Result<Json<JsonValue>, ApiError> {
    let record = body(payload)?;
    handle(&state, &query).append_tool_call(record).await?;
    Ok(ok())
}

/// Fallback for unsupported methods.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
