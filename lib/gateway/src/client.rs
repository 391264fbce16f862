//! The gateway client.
//!
//! Every call to the backend goes through [`GatewayClient`]. It builds the
//! authenticated request, bounds each attempt with a timeout, normalizes
//! the response shape and retries network and server failures with
//! exponential backoff.
//!
//! Each attempt has its own timeout window and there is no deadline across
//! attempts, so a call may take up to `(max_retries + 1) * timeout` plus
//! the backoff delays before it fails.

use crate::config::{EnvelopeMode, GatewayConfig};
use crate::envelope::unwrap_payload;
use crate::error::GatewayError;
use crate::request::{GatewayRequest, HttpMethod, compose_url, normalize_base_url};
use crate::resources::{
    AgentsClient, DealsClient, DocumentsClient, MarketClient, ParcelsClient, ScreeningClient,
    WorkflowsClient,
};
use crate::retry::RetryPolicy;
use crate::transport::{ReqwestTransport, Transport, TransportResponse};
use magnolia_core::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

struct ClientInner {
    config: GatewayConfig,
    base_url: String,
    retry: RetryPolicy,
    transport: Arc<dyn Transport>,
}

/// Client for the GPC-CRES gateway.
///
/// Cloning is cheap and clones share one transport. The client holds no
/// mutable state, so it can serve many concurrent calls.
#[derive(Clone)]
pub struct GatewayClient {
    inner: Arc<ClientInner>,
}

/// A decoded response body.
enum Body {
    Json(JsonValue),
    Text(String),
}

impl GatewayClient {
    /// Creates a client that talks to the gateway over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let transport = ReqwestTransport::new().map_err(|e| GatewayError::Network {
            reason: e.reason,
        })?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client over an explicit transport.
    #[must_use]
    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        let base_url = normalize_base_url(config.base_url());
        let retry = RetryPolicy::new(config.max_retries());
        Self {
            inner: Arc::new(ClientInner {
                config,
                base_url,
                retry,
                transport,
            }),
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Returns the base URL with its trailing slash removed.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the retry policy derived from the configuration.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.inner.retry
    }

    /// Deal management endpoints.
    #[must_use]
    pub fn deals(&self) -> DealsClient {
        DealsClient::new(self.clone())
    }

    /// Parcel endpoints.
    #[must_use]
    pub fn parcels(&self) -> ParcelsClient {
        ParcelsClient::new(self.clone())
    }

    /// Property screening endpoints.
    #[must_use]
    pub fn screening(&self) -> ScreeningClient {
        ScreeningClient::new(self.clone())
    }

    /// Market data endpoints.
    #[must_use]
    pub fn market(&self) -> MarketClient {
        MarketClient::new(self.clone())
    }

    /// Document and knowledge base endpoints.
    #[must_use]
    pub fn documents(&self) -> DocumentsClient {
        DocumentsClient::new(self.clone())
    }

    /// Workflow orchestration endpoints.
    #[must_use]
    pub fn workflows(&self) -> WorkflowsClient {
        WorkflowsClient::new(self.clone())
    }

    /// Specialist agent endpoints.
    #[must_use]
    pub fn agents(&self) -> AgentsClient {
        AgentsClient::new(self.clone())
    }

    /// Sends a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.request(HttpMethod::Get, path, None, None).await
    }

    /// Sends a GET request with query parameters.
    ///
    /// `query` must serialize to a JSON object. Null members are omitted and
    /// array members are sent as repeated parameters.
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let query = to_json(query)?;
        self.request(HttpMethod::Get, path, Some(query), None).await
    }

    /// Sends a POST request with a JSON body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_json(body)?;
        self.request(HttpMethod::Post, path, None, Some(body)).await
    }

    /// Sends a PUT request with a JSON body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_json(body)?;
        self.request(HttpMethod::Put, path, None, Some(body)).await
    }

    /// Sends a PATCH request with a JSON body.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = to_json(body)?;
        self.request(HttpMethod::Patch, path, None, Some(body)).await
    }

    /// Sends a DELETE request without a body.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.request(HttpMethod::Delete, path, None, None).await
    }

    /// Sends a request and decodes the payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns the last classified failure once the retry budget is spent,
    /// or immediately for failures that are not retryable.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Option<JsonValue>,
        body: Option<JsonValue>,
    ) -> Result<T, GatewayError> {
        let payload = self.execute(method, path, query, body).await?;
        serde_json::from_value(payload).map_err(|e| {
            GatewayError::Decode {
                reason: e.to_string(),
            }
            .into()
        })
    }

    #[instrument(skip(self, query, body), fields(method = %method, path = %path))]
    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        query: Option<JsonValue>,
        body: Option<JsonValue>,
    ) -> std::result::Result<JsonValue, GatewayError> {
        let url = compose_url(&self.inner.base_url, path, query.as_ref())?;
        let retry = self.inner.retry;
        let mut request = GatewayRequest {
            method,
            url,
            body,
            bearer: self.inner.config.api_key().to_string(),
            client_header: self.inner.config.client_header().to_string(),
            attempt: 0,
        };

        loop {
            match self.attempt(&request).await {
                Ok(payload) => {
                    debug!(attempt = request.attempt, "gateway call succeeded");
                    return Ok(payload);
                }
                Err(err) if err.is_retryable() && retry.allows_retry_after(request.attempt) => {
                    let next = request.attempt + 1;
                    let delay = retry.delay_before(next);
                    warn!(
                        attempt = request.attempt,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "retryable gateway failure"
                    );
                    tokio::time::sleep(delay).await;
                    request.attempt = next;
                }
                Err(err) => {
                    warn!(
                        attempt = request.attempt,
                        error = %err,
                        retryable = err.is_retryable(),
                        "gateway call failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    async fn attempt(
        &self,
        request: &GatewayRequest,
    ) -> std::result::Result<JsonValue, GatewayError> {
        let config = &self.inner.config;
        let response =
            match tokio::time::timeout(config.timeout(), self.inner.transport.send(request)).await
            {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => return Err(GatewayError::Network { reason: e.reason }),
                Err(_) => {
                    return Err(GatewayError::Timeout {
                        timeout_ms: config.timeout_ms(),
                    });
                }
            };

        let status = response.status;
        let body = decode_body(&response)?;

        if !response.is_success() {
            return Err(match body {
                Body::Json(json) if json.is_object() => GatewayError::from_json_body(status, &json),
                Body::Json(json) => GatewayError::from_text_body(status, &json.to_string()),
                Body::Text(text) => GatewayError::from_text_body(status, &text),
            });
        }

        match (body, config.envelope()) {
            (Body::Json(json), envelope) => unwrap_payload(envelope, status, json),
            (Body::Text(_), EnvelopeMode::Wrapped) => Err(GatewayError::Decode {
                reason: format!("expected an enveloped JSON body, got {}", response.content_type),
            }),
            (Body::Text(text), _) => Ok(JsonValue::String(text)),
        }
    }
}

fn decode_body(response: &TransportResponse) -> std::result::Result<Body, GatewayError> {
    if !response.is_json() {
        return Ok(Body::Text(String::from_utf8_lossy(&response.body).into_owned()));
    }
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Body::Json(JsonValue::Null));
    }
    serde_json::from_slice(&response.body)
        .map(Body::Json)
        .map_err(|e| GatewayError::Decode {
            reason: e.to_string(),
        })
}

fn to_json<S: Serialize + ?Sized>(value: &S) -> Result<JsonValue, GatewayError> {
    serde_json::to_value(value).map_err(|e| {
        GatewayError::InvalidRequest {
            reason: format!("failed to serialize request: {e}"),
        }
        .into()
    })
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("config", &self.inner.config)
            .field("retry", &self.inner.retry)
            .finish_non_exhaustive()
    }
}
