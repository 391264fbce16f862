//! Resilient client for the GPC-CRES analytical gateway.
//!
//! This crate provides:
//!
//! - **Client**: Authenticated JSON calls with per-attempt timeouts and
//!   exponential-backoff retries
//! - **Errors**: Uniform classification of network, server, client and
//!   decode failures
//! - **Envelopes**: Bare and `{success, data}` response conventions
//! - **Resources**: Thin sub-clients for deals, parcels, screening, market
//!   data, documents, workflows and agents

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod request;
pub mod resources;
pub mod retry;
pub mod transport;

pub use client::GatewayClient;
pub use config::{EnvelopeMode, GatewayConfig};
pub use error::{FailureClass, GatewayError};
pub use request::{GatewayRequest, HttpMethod};
pub use retry::RetryPolicy;
pub use transport::{ReqwestTransport, Transport, TransportError, TransportResponse};
