//! HTTP POST and DELETE handlers for `/mcp`.

use crate::error::ExtensionError;
use crate::state::McpState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use mcpgate_core::capability::PROTOCOL_VERSION;
use mcpgate_core::protocol::{Request, Response as RpcResponse};
use mcpgate_server::methods;
use mcpgate_transport::headers::{PROTOCOL_VERSION_HEADER, SESSION_ID_HEADER, forwarded_headers};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Whitelisted request headers, lower-cased.
pub(crate) fn forwarded_from(headers: &HeaderMap) -> HashMap<String, String> {
    forwarded_headers(
        headers
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?))),
    )
}

/// The `mcp-session-id` header, if present and readable.
pub(crate) fn session_id_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn json_response(response: &RpcResponse, session_id: Option<&str>) -> Response {
    let mut http = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::HeaderName::from_static(PROTOCOL_VERSION_HEADER), PROTOCOL_VERSION),
        ],
        response.to_json_string(),
    )
        .into_response();

    if let Some(value) = session_id.and_then(|id| HeaderValue::from_str(id).ok()) {
        http.headers_mut()
            .insert(header::HeaderName::from_static(SESSION_ID_HEADER), value);
    }
    http
}

/// Handle MCP POST requests.
///
/// # Headers
///
/// - `mcp-session-id`: Optional. Must name a live session for every method
///   except `initialize`.
///
/// # Response
///
/// A JSON-RPC response body, including for malformed input (code -32700)
/// and for notifications, which are answered with `"id": null`. If the
/// session has an open SSE stream waiting for a response, the response is
/// also delivered there.
pub async fn handle_mcp_post(
    State(state): State<McpState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let session_header = session_id_from(&headers);
    let forwarded = forwarded_from(&headers);

    let request = match Request::decode(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Failed to parse JSON-RPC message");
            return json_response(&RpcResponse::parse_error(&e), session_header.as_deref());
        }
    };

    let sessions = state.server.sessions();
    let (session_id, effective) = if request.method() == methods::INITIALIZE {
        // Client-chosen ids are never adopted; only live ones are kept.
        let id = match session_header {
            Some(id) if sessions.validate(&id) => id,
            _ => sessions.open(),
        };
        sessions.set_headers(&id, forwarded.clone());
        (Some(id), forwarded)
    } else if let Some(id) = session_header {
        if !sessions.validate(&id) {
            warn!(session_id = %id, method = %request.method(), "Rejecting request for unknown session");
            return ExtensionError::SessionNotFound(id).into_response();
        }
        let effective = sessions
            .headers(&id)
            .map_or(forwarded, |stored| (*stored).clone());
        (Some(id), effective)
    } else {
        (None, forwarded)
    };

    info!(
        method = %request.method(),
        id = ?request.id,
        session_id = ?session_id,
        "Handling MCP request"
    );

    let response = state.server.dispatch(request.with_headers(effective)).await;

    if let Some(id) = &session_id {
        if sessions.deliver(id, &response) {
            debug!(session_id = %id, "Response delivered to waiting stream");
        }
    }

    json_response(&response, session_id.as_deref())
}

/// Handle MCP DELETE requests: end a session and close its stream.
pub async fn handle_mcp_delete(
    State(state): State<McpState>,
    headers: HeaderMap,
) -> Result<StatusCode, ExtensionError> {
    let id = session_id_from(&headers).ok_or(ExtensionError::MissingSession)?;
    if state.server.sessions().remove(&id) {
        info!(session_id = %id, "Session terminated by client");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ExtensionError::SessionNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_from_filters() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert("x-request-id", HeaderValue::from_static("req-1"));
        headers.insert(header::COOKIE, HeaderValue::from_static("secret"));

        let forwarded = forwarded_from(&headers);
        assert_eq!(forwarded.len(), 2);
        assert_eq!(forwarded["authorization"], "Bearer abc");
        assert_eq!(forwarded["x-request-id"], "req-1");
        assert!(!forwarded.contains_key("cookie"));
    }

    #[test]
    fn test_json_response_headers() {
        let response = json_response(
            &RpcResponse::success(Some(1i64.into()), serde_json::json!({})),
            Some("abc"),
        );
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[PROTOCOL_VERSION_HEADER], PROTOCOL_VERSION);
        assert_eq!(response.headers()[SESSION_ID_HEADER], "abc");
    }
}
