//! Bearer token and origin middleware.
//!
//! Both checks delegate to predicates injected through [`McpState`]; this
//! module only extracts the inputs and maps a rejection to a status code.

use crate::error::ExtensionError;
use crate::state::McpState;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use mcpgate_transport::headers::bearer_token;
use tracing::warn;

/// The token from an `Authorization: Bearer` header.
pub(crate) fn bearer_from(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
}

/// Reject requests without an acceptable bearer token with 401.
pub async fn require_bearer_token(
    State(state): State<McpState>,
    request: Request,
    next: Next,
) -> Result<Response, ExtensionError> {
    if !state.token_allowed(bearer_from(request.headers())) {
        warn!(path = %request.uri().path(), "Rejecting request with missing or invalid token");
        return Err(ExtensionError::Unauthorized);
    }
    Ok(next.run(request).await)
}

/// Reject requests whose `Origin` header is present and not accepted with 403.
pub async fn enforce_origin(
    State(state): State<McpState>,
    request: Request,
    next: Next,
) -> Result<Response, ExtensionError> {
    let rejected = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|origin| !state.origin_allowed(origin))
        .map(str::to_string);

    if let Some(origin) = rejected {
        warn!(origin = %origin, "Rejecting request from disallowed origin");
        return Err(ExtensionError::OriginRejected(origin));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_from() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_from(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_from(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_from(&headers), Some("abc"));
    }
}
