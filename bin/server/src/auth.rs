//! Bearer authentication for host-facing routes.
//!
//! Authentication is skipped entirely in the development environment.
//! Otherwise every request must carry `Authorization: Bearer <token>`, and
//! when an API key is configured the token must equal it.

use crate::state::SharedState;
use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Realm advertised in `WWW-Authenticate` challenges.
pub const REALM: &str = "Magnolia Intelligence Platform";

/// Rejection returned by [`require_bearer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `Authorization: Bearer` header.
    MissingToken,
    /// The token does not match the configured key.
    InvalidToken,
}

impl AuthRejection {
    fn message(self) -> &'static str {
        match self {
            Self::MissingToken => "Missing Authorization header. Expected: Bearer <api-key>",
            Self::InvalidToken => "Invalid API key",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let mut response = (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Unauthorized",
                "message": self.message(),
                "code": "AUTH_FAILED",
            })),
        )
            .into_response();
        if let Ok(challenge) = HeaderValue::from_str(&format!("Bearer realm=\"{REALM}\"")) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, challenge);
        }
        response
    }
}

/// Middleware that rejects unauthenticated requests.
pub async fn require_bearer(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    if !state.config.is_development() {
        let authorization = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        check_bearer(authorization, state.config.mcp_api_key.as_deref()).inspect_err(|rejection| {
            tracing::debug!(path = %request.uri().path(), ?rejection, "rejected request");
        })?;
    }
    Ok(next.run(request).await)
}

fn check_bearer(authorization: Option<&str>, expected: Option<&str>) -> Result<(), AuthRejection> {
    let token = authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AuthRejection::MissingToken)?;

    match expected {
        Some(expected) if token != expected => Err(AuthRejection::InvalidToken),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_is_required() {
        assert_eq!(check_bearer(None, None), Err(AuthRejection::MissingToken));
        assert_eq!(
            check_bearer(Some("Basic abc"), Some("abc")),
            Err(AuthRejection::MissingToken)
        );
    }

    #[test]
    fn configured_key_must_match() {
        assert_eq!(check_bearer(Some("Bearer abc"), Some("abc")), Ok(()));
        assert_eq!(check_bearer(Some("Bearer  abc "), Some("abc")), Ok(()));
        assert_eq!(
            check_bearer(Some("Bearer xyz"), Some("abc")),
            Err(AuthRejection::InvalidToken)
        );
    }

    #[test]
    fn any_token_passes_without_a_configured_key() {
        assert_eq!(check_bearer(Some("Bearer anything"), None), Ok(()));
    }

    #[test]
    fn rejection_carries_challenge() {
        let response = AuthRejection::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            "Bearer realm=\"Magnolia Intelligence Platform\""
        );
    }
}
