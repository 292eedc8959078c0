//! Extension-specific error types.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Transport-level failures reported as HTTP statuses.
///
/// Handler failures never show up here; they travel as JSON-RPC error
/// bodies.
#[derive(Error, Debug)]
pub enum ExtensionError {
    /// The session id is unknown or expired.
    #[error("session not found or expired")]
    SessionNotFound(String),

    /// A session id header was required but absent.
    #[error("missing mcp-session-id header")]
    MissingSession,

    /// A stream was requested without `Accept: text/event-stream`.
    #[error("streaming requires Accept: text/event-stream")]
    NotAcceptable,

    /// Missing or rejected bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// The `Origin` header was rejected.
    #[error("Origin '{0}' is not allowed")]
    OriginRejected(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtensionError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::MissingSession => StatusCode::BAD_REQUEST,
            Self::NotAcceptable => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::OriginRejected(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ExtensionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_string();

        match self {
            Self::NotAcceptable => (status, [(header::ALLOW, "POST")], body).into_response(),
            Self::Unauthorized => {
                (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ExtensionError::SessionNotFound("x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ExtensionError::NotAcceptable.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(ExtensionError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ExtensionError::OriginRejected("o".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ExtensionError::Internal("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_acceptable_advertises_post() {
        let response = ExtensionError::NotAcceptable.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "POST");
    }

    #[test]
    fn test_session_message_hides_id() {
        let err = ExtensionError::SessionNotFound("secret-id".to_string());
        assert_eq!(err.to_string(), "session not found or expired");
    }
}
