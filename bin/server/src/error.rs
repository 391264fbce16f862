//! Error types for HTTP handlers.
//!
//! Errors are designed for layered context using rootcause:
//! - `StartupError`: Failures while bringing the server up
//! - `ApiError`: What a handler reports to the host, mapped to a status
//!   code and a `{ "error": ... }` body
//!
//! Storage details are logged but never echoed to the host.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use magnolia_session::SessionError;
use rootcause::Report;
use serde_json::json;
use std::fmt;

/// Errors that prevent the server from starting.
#[derive(Debug)]
pub enum StartupError {
    /// Configuration is missing or invalid.
    Config { details: String },
    /// The gateway client could not be built.
    Gateway { details: String },
    /// The session database could not be reached or migrated.
    Database { details: String },
    /// The listener could not be bound or the server stopped abnormally.
    Serve { details: String },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "invalid configuration: {}", details),
            Self::Gateway { details } => write!(f, "gateway client error: {}", details),
            Self::Database { details } => write!(f, "session database error: {}", details),
            Self::Serve { details } => write!(f, "server error: {}", details),
        }
    }
}

impl std::error::Error for StartupError {}

/// Errors surfaced by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be parsed.
    BadRequest { reason: String },
    /// The route does not accept this method.
    MethodNotAllowed,
    /// Session state could not be read or written.
    Session { error: SessionError },
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Session { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::BadRequest { reason } => format!("Invalid request body: {reason}"),
            Self::MethodNotAllowed => "Method not allowed".to_string(),
            Self::Session { .. } => "Session storage unavailable".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest { reason } => write!(f, "bad request: {}", reason),
            Self::MethodNotAllowed => write!(f, "method not allowed"),
            Self::Session { error } => write!(f, "session failure: {}", error),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<Report<SessionError>> for ApiError {
    fn from(report: Report<SessionError>) -> Self {
        Self::Session {
            error: report.current_context().clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Session { error } = &self {
            tracing::error!(error = %error, "session request failed");
        }
        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}
