//! JSON-RPC endpoint for AI hosts.
//!
//! Serves the request/response subset of the Model Context Protocol:
//! `initialize`, `ping`, `tools/list` and `tools/call`. Notifications
//! (requests without an `id`) are acknowledged with 202 and no body.

use crate::state::SharedState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use magnolia_core::ConversationId;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use tracing::{debug, instrument};

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "magnolia-intelligence";

/// Version reported in `serverInfo`.
pub const SERVER_VERSION: &str = "1.0.0";

/// Protocol revision offered when the host does not name one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-03-26";

/// Header carrying the host's conversation ID.
pub const CONVERSATION_HEADER: &str = "x-conversation-id";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

/// A JSON-RPC request.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: JsonValue,
}

/// Parameters of `tools/call`.
#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Option<JsonValue>,
}

fn success(id: JsonValue, result: JsonValue) -> Response {
    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result })).into_response()
}

fn failure(status: StatusCode, id: JsonValue, code: i64, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message.into() },
        })),
    )
        .into_response()
}

/// Handles one JSON-RPC message.
#[instrument(skip_all)]
pub async fn handle(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Response {
    let message = match payload {
        Ok(Json(message)) => message,
        Err(rejection) => {
            return failure(
                StatusCode::BAD_REQUEST,
                JsonValue::Null,
                PARSE_ERROR,
                rejection.body_text(),
            );
        }
    };
    let request: RpcRequest = match serde_json::from_value(message) {
        Ok(request) => request,
        Err(e) => {
            return failure(
                StatusCode::BAD_REQUEST,
                JsonValue::Null,
                INVALID_REQUEST,
                e.to_string(),
            );
        }
    };

    let Some(id) = request.id.filter(|id| !id.is_null()) else {
        debug!(method = %request.method, "notification acknowledged");
        return StatusCode::ACCEPTED.into_response();
    };
    debug!(method = %request.method, "rpc request");

    match request.method.as_str() {
        "initialize" => {
            let protocol = request
                .params
                .get("protocolVersion")
                .and_then(JsonValue::as_str)
                .unwrap_or(DEFAULT_PROTOCOL_VERSION);
            success(
                id,
                json!({
                    "protocolVersion": protocol,
                    "capabilities": { "tools": { "listChanged": false } },
                    "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
                }),
            )
        }
        "ping" => success(id, json!({})),
        "tools/list" => {
            let tools: Vec<_> = state.dispatcher.definitions().collect();
            success(id, json!({ "tools": tools }))
        }
        "tools/call" => {
            let params: CallParams = match serde_json::from_value(request.params) {
                Ok(params) => params,
                Err(e) => return failure(StatusCode::OK, id, INVALID_PARAMS, e.to_string()),
            };
            let session = conversation(&headers).map(|c| state.sessions.handle(&c));
            let response = state
                .dispatcher
                .call(&params.name, params.arguments, session.as_ref())
                .await;
            match serde_json::to_value(response) {
                Ok(result) => success(id, result),
                Err(e) => failure(StatusCode::OK, id, INTERNAL_ERROR, e.to_string()),
            }
        }
        other => failure(
            StatusCode::OK,
            id,
            METHOD_NOT_FOUND,
            format!("Method not found: {other}"),
        ),
    }
}

fn conversation(headers: &HeaderMap) -> Option<ConversationId> {
    headers
        .get(CONVERSATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ConversationId::new)
}
