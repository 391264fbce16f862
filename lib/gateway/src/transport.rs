//! The transport primitive: one outbound HTTP call.
//!
//! A transport performs exactly one round trip and knows nothing about
//! retries or timeouts. The client bounds every call with its own timer and
//! cancels it by dropping the future.

use crate::request::{GatewayRequest, HttpMethod};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::fmt;

/// Header carrying the client identification string.
pub const CLIENT_HEADER: &str = "X-Client";

/// A raw response as received from the gateway.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header, empty if absent.
    pub content_type: String,
    /// Response body.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true if the response declares a JSON body.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type.contains("application/json")
    }
}

/// A failure to complete the round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    /// What went wrong.
    pub reason: String,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport failure: {}", self.reason)
    }
}

impl std::error::Error for TransportError {}

/// Trait for performing a single HTTP round trip.
///
/// This abstraction allows testing the client without a network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and reads the full response.
    async fn send(&self, request: &GatewayRequest) -> Result<TransportResponse, TransportError>;
}

/// Transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError {
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Wraps an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &GatewayRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(reqwest_method(request.method), request.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", request.bearer))
            .header(CLIENT_HEADER, &request.client_header);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| TransportError {
            reason: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.bytes().await.map_err(|e| TransportError {
            reason: e.to_string(),
        })?;

        Ok(TransportResponse {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}
