//! Magnolia tool gateway server.
//!
//! This crate provides the HTTP surface AI hosts talk to:
//! - Health reporting at `/` and `/health`
//! - The JSON-RPC tool endpoint at `/mcp`
//! - The per-conversation session contract at `/session`
//!
//! `/mcp` and `/session` sit behind bearer authentication.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use state::SharedState;
use tower_http::trace::TraceLayer;

/// Builds the application router.
pub fn router(state: SharedState) -> Router {
    let session = get(routes::session::read)
        .put(routes::session::replace)
        .patch(routes::session::merge)
        .delete(routes::session::reset)
        .fallback(routes::session::method_not_allowed);
    let tool_call =
        post(routes::session::append_tool_call).fallback(routes::session::method_not_allowed);

    let protected = Router::new()
        .route("/mcp", post(routes::mcp::handle))
        .route("/session", session.clone())
        .route("/session/", session)
        .route("/session/tool-call", tool_call)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .route("/", get(routes::health::health))
        .route("/health", get(routes::health::health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::state::AppState;
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use magnolia_gateway::{
        GatewayClient, GatewayRequest, Transport, TransportError, TransportResponse,
    };
    use magnolia_session::{
        ActorKey, MemoryStorage, SessionDocument, SessionError, SessionStorage, SessionStore,
    };
    use magnolia_tools::ToolDispatcher;
    use serde_json::{Value as JsonValue, json};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    /// Answers every gateway request with `{"zone": "AE"}`.
    #[derive(Default)]
    struct StubTransport {
        seen: Mutex<Vec<GatewayRequest>>,
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(&self, request: &GatewayRequest) -> Result<TransportResponse, TransportError> {
            self.seen.lock().expect("lock").push(request.clone());
            Ok(TransportResponse {
                status: 200,
                content_type: "application/json".to_string(),
                body: br#"{"zone":"AE"}"#.to_vec(),
            })
        }
    }

    /// Storage that reads nothing and refuses every write.
    struct UnavailableStorage;

    #[async_trait]
    impl SessionStorage for UnavailableStorage {
        async fn load(&self, _key: &ActorKey) -> Result<Option<SessionDocument>, SessionError> {
            Ok(None)
        }

        async fn save(
            &self,
            _key: &ActorKey,
            _document: &SessionDocument,
        ) -> Result<(), SessionError> {
            Err(SessionError::StorageFailed {
                reason: "connection refused".to_string(),
            })
        }
    }

    fn app(environment: &str, api_key: Option<&str>) -> (Router, Arc<StubTransport>) {
        app_with_storage(environment, api_key, Arc::new(MemoryStorage::new()))
    }

    fn app_with_storage(
        environment: &str,
        api_key: Option<&str>,
        storage: Arc<dyn SessionStorage>,
    ) -> (Router, Arc<StubTransport>) {
        let mut config: ServerConfig = serde_json::from_value(json!({
            "environment": environment,
            "gateway": { "base_url": "https://gw.example", "api_key": "k", "max_retries": 0 }
        }))
        .expect("config");
        config.mcp_api_key = api_key.map(str::to_string);

        let transport = Arc::new(StubTransport::default());
        let client = GatewayClient::with_transport(config.gateway.clone(), transport.clone());
        let sessions = SessionStore::new(storage);
        let state = Arc::new(AppState::new(config, ToolDispatcher::new(client), sessions));
        (router(state), transport)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, JsonValue) {
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    fn json_request(method: &str, uri: &str, body: JsonValue) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn rpc(method: &str, params: JsonValue) -> JsonValue {
        json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params })
    }

    #[tokio::test]
    async fn health_reports_environment() {
        let (app, _) = app("staging", None);
        let (status, body) = send(&app, empty_request("GET", "/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "service": "Magnolia Intelligence Platform",
                "version": "1.0.0",
                "status": "ok",
                "environment": "staging"
            })
        );
        let (status, _) = send(&app, empty_request("GET", "/")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_a_bearer_token() {
        let (app, _) = app("production", Some("secret"));

        let (status, body) = send(&app, empty_request("GET", "/session?id=c1")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTH_FAILED");

        let mut request = json_request("POST", "/mcp", rpc("ping", json!({})));
        request
            .headers_mut()
            .insert(header::AUTHORIZATION, "Bearer wrong".parse().expect("header"));
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid API key");

        let mut request = json_request("POST", "/mcp", rpc("ping", json!({})));
        request
            .headers_mut()
            .insert(header::AUTHORIZATION, "Bearer secret".parse().expect("header"));
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], json!({}));
    }

    #[tokio::test]
    async fn session_contract_round_trip() {
        let (app, _) = app("development", None);

        let (status, body) = send(&app, empty_request("GET", "/session?id=c1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected_parcels"], json!([]));
        assert_eq!(body["active_deal_id"], JsonValue::Null);

        let (status, body) = send(
            &app,
            json_request("PATCH", "/session/?id=c1", json!({"active_deal_id": "D1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active_deal_id"], "D1");

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/session/tool-call?id=c1",
                json!({"tool": "deal_get", "args": {"deal_id": "D1"}, "result_summary": "ok"}),
            ),
        )
        .await;
        assert_eq!((status, body), (StatusCode::OK, json!({"ok": true})));

        let (_, body) = send(&app, empty_request("GET", "/session?id=c1")).await;
        assert_eq!(body["recent_tool_calls"][0]["tool"], "deal_get");

        let (_, other) = send(&app, empty_request("GET", "/session?id=c2")).await;
        assert_eq!(other["active_deal_id"], JsonValue::Null);

        let (status, body) = send(&app, empty_request("DELETE", "/session?id=c1")).await;
        assert_eq!((status, body), (StatusCode::OK, json!({"ok": true})));
        let (_, body) = send(&app, empty_request("GET", "/session?id=c1")).await;
        assert_eq!(body["recent_tool_calls"], json!([]));
    }

    #[tokio::test]
    async fn session_rejects_bad_bodies_and_methods() {
        let (app, _) = app("development", None);

        let request = Request::builder()
            .method("PUT")
            .uri("/session?id=c1")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .expect("request");
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(&app, empty_request("POST", "/session?id=c1")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn session_storage_failures_are_server_errors() {
        let (app, _) = app_with_storage("development", None, Arc::new(UnavailableStorage));

        let (status, body) = send(
            &app,
            json_request("PATCH", "/session?id=c1", json!({"active_deal_id": "D1"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Session storage unavailable");
        assert!(!body["error"].as_str().expect("message").contains("connection refused"));

        let (status, body) = send(&app, empty_request("GET", "/session?id=c1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active_deal_id"], JsonValue::Null);
    }

    #[tokio::test]
    async fn rpc_lists_and_calls_tools() {
        let (app, transport) = app("development", None);

        let request = json_request("POST", "/mcp", rpc("initialize", json!({})));
        let (_, body) = send(&app, request).await;
        assert_eq!(body["result"]["serverInfo"]["name"], "magnolia-intelligence");

        let request = json_request("POST", "/mcp", rpc("tools/list", json!({})));
        let (_, body) = send(&app, request).await;
        let tools = body["result"]["tools"].as_array().expect("tools");
        assert!(tools.iter().any(|tool| tool["name"] == "flood_zone_detail"));
        assert!(tools[0]["inputSchema"].is_object());

        send(
            &app,
            json_request(
                "PATCH",
                "/session?id=host-1",
                json!({"selected_parcels": ["P7"]}),
            ),
        )
        .await;
        let mut request = json_request(
            "POST",
            "/mcp",
            rpc("tools/call", json!({"name": "zoning_history", "arguments": {}})),
        );
        request
            .headers_mut()
            .insert("x-conversation-id", "host-1".parse().expect("header"));
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["structuredContent"], json!({"zone": "AE"}));
        let seen = transport.seen.lock().expect("lock").clone();
        assert_eq!(seen[0].url.path(), "/api/zoning/history");
        assert_eq!(seen[0].body.as_ref().expect("body")["parcel_id"], "P7");
    }

    #[tokio::test]
    async fn rpc_reports_unknown_methods_and_acknowledges_notifications() {
        let (app, _) = app("development", None);

        let request = json_request("POST", "/mcp", rpc("resources/list", json!({})));
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"]["code"], -32601);

        let notification = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        let (status, body) = send(&app, json_request("POST", "/mcp", notification)).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body, JsonValue::Null);
    }
}
