//! Server-Sent Events adapter.
//!
//! A stream carries exactly one correlated response. Opening it mints a
//! session and sends a `connected` event with the session id. The response
//! then comes from the `request` query parameter, dispatched immediately, or
//! from the first `POST /mcp` carrying that session id. After the `message`
//! (or `error`) event the stream ends.

use crate::error::ExtensionError;
use crate::handler::forwarded_from;
use crate::state::McpState;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, header};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::Stream;
use mcpgate_core::error::JsonRpcError;
use mcpgate_core::protocol::{Request, Response as RpcResponse};
use mcpgate_server::connection::{ConnectionGuard, ConnectionKind};
use mcpgate_server::{Server, StreamHandle};
use mcpgate_transport::sse::SseEvent;
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use tracing::{debug, info, warn};

/// Query parameters accepted when opening a stream.
#[derive(Debug, Default, Deserialize)]
pub struct SseQuery {
    /// A JSON-RPC request to dispatch as soon as the stream opens.
    pub request: Option<String>,
}

fn accepts_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains("text/event-stream"))
}

fn to_axum_event(event: SseEvent) -> Event {
    let mut out = Event::default().data(event.data);
    if let Some(name) = event.event {
        out = out.event(name);
    }
    if let Some(id) = event.id {
        out = out.id(id);
    }
    out
}

/// Handle SSE stream requests on `GET /mcp` and `GET /sse`.
///
/// # Events
///
/// - `connected`: sent first, data is the session id.
/// - `message`: the correlated JSON-RPC response, numbered per session.
/// - `error`: sent instead of `message` if the dispatch was lost.
pub async fn handle_sse(
    State(state): State<McpState>,
    Query(query): Query<SseQuery>,
    headers: HeaderMap,
) -> Result<Response, ExtensionError> {
    if !accepts_event_stream(&headers) {
        warn!("Rejecting stream request without Accept: text/event-stream");
        return Err(ExtensionError::NotAcceptable);
    }

    let server = state.server.clone();
    let sessions = server.sessions();
    let session_id = sessions.open();
    let forwarded = forwarded_from(&headers);
    sessions.set_headers(&session_id, forwarded.clone());
    let handle = sessions
        .attach_stream(&session_id)
        .ok_or_else(|| ExtensionError::Internal("session vanished while opening stream".to_string()))?;
    let guard = server
        .connections()
        .register(ConnectionKind::Sse, Some(session_id.clone()));

    info!(session_id = %session_id, "SSE stream opened");

    if let Some(raw) = query.request {
        dispatch_inline(server.clone(), session_id.clone(), raw, forwarded);
    }

    let stream = event_stream(server, session_id, handle, guard);
    Ok(Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response())
}

fn dispatch_inline(server: Server, session_id: String, raw: String, headers: HashMap<String, String>) {
    tokio::spawn(async move {
        let response = match Request::decode(raw.as_bytes()) {
            Ok(request) => server.dispatch(request.with_headers(headers)).await,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Malformed request parameter");
                RpcResponse::parse_error(&e)
            }
        };
        server.sessions().deliver(&session_id, &response);
    });
}

fn event_stream(
    server: Server,
    session_id: String,
    handle: StreamHandle,
    guard: ConnectionGuard,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        let shutdown = guard.shutdown_token();
        let StreamHandle { closer, response } = handle;

        yield Ok(to_axum_event(SseEvent::connected(&session_id)));

        let outcome = tokio::select! {
            () = closer.cancelled() => None,
            () = shutdown.cancelled() => None,
            received = response => Some(received),
        };

        let last = match outcome {
            Some(Ok(response)) => {
                let event_id = server.sessions().next_event_id(&session_id);
                Some(SseEvent::message(event_id, response.to_json_string()))
            }
            Some(Err(_)) => {
                let failure = RpcResponse::error(
                    None,
                    JsonRpcError::internal_error("Dispatch ended without a response"),
                );
                Some(SseEvent::error(failure.to_json_string()))
            }
            None => {
                debug!(session_id = %session_id, "SSE stream closed before a response arrived");
                None
            }
        };

        if let Some(event) = last {
            yield Ok(to_axum_event(event));
        }

        info!(session_id = %session_id, "SSE stream closed");
        drop(guard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_accepts_event_stream() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_event_stream(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        assert!(!accepts_event_stream(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/event-stream"),
        );
        assert!(accepts_event_stream(&headers));
    }
}
