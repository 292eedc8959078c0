//! WebSocket adapter.
//!
//! Each text frame is one JSON-RPC request, dispatched on its own task so a
//! slow handler never blocks later frames. Responses go back through a
//! single writer task, so they may arrive out of order; clients correlate by
//! id.
//!
//! On server shutdown the socket stops reading, waits up to the shutdown
//! grace period for in-flight frames to answer, and only then sends close
//! 1001. Responses still pending after that are logged as abandoned.

use crate::auth::bearer_from;
use crate::handler::{forwarded_from, session_id_from};
use crate::state::McpState;
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::Response;
use futures::{FutureExt, SinkExt, StreamExt};
use mcpgate_core::error::JsonRpcError;
use mcpgate_core::protocol::{Notification, Request, Response as RpcResponse};
use mcpgate_server::Server;
use mcpgate_server::connection::ConnectionKind;
use mcpgate_transport::websocket::{
    CLOSE_GOING_AWAY, CLOSE_UNAUTHORIZED, WELCOME_METHOD, close_reason,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Query parameters accepted on upgrade.
#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    /// Bearer token, as an alternative to the `Authorization` header.
    pub token: Option<String>,
}

enum Closed {
    ByPeer,
    Shutdown,
}

fn close_message(code: u16) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: close_reason(code).into(),
    }))
}

/// Handle WebSocket upgrade requests on `GET /ws`.
///
/// When a token validator is configured, the token comes from `?token=` or
/// `Authorization: Bearer`; a missing or rejected token closes the socket
/// with code 4001 right after the upgrade.
pub async fn handle_ws(
    ws: WebSocketUpgrade,
    State(state): State<McpState>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
) -> Response {
    let token = query
        .token
        .or_else(|| bearer_from(&headers).map(str::to_string));
    let authorized = state.token_allowed(token.as_deref());
    let requested_session = session_id_from(&headers);
    let forwarded = forwarded_from(&headers);
    let server = state.server;

    ws.on_upgrade(move |socket| async move {
        if authorized {
            run_socket(socket, server, requested_session, forwarded).await;
        } else {
            reject(socket).await;
        }
    })
}

async fn reject(mut socket: WebSocket) {
    warn!("Closing WebSocket with missing or invalid token");
    if let Err(e) = socket.send(close_message(CLOSE_UNAUTHORIZED)).await {
        debug!(error = %e, "Failed to send close frame");
    }
}

async fn run_socket(
    socket: WebSocket,
    server: Server,
    requested_session: Option<String>,
    forwarded: HashMap<String, String>,
) {
    let sessions = server.sessions();
    let session_id = match requested_session {
        Some(id) if sessions.validate(&id) => id,
        _ => sessions.open(),
    };
    if sessions.headers(&session_id).is_none() {
        sessions.set_headers(&session_id, forwarded);
    }

    let guard = server
        .connections()
        .register(ConnectionKind::WebSocket, Some(session_id.clone()));
    let shutdown = guard.shutdown_token();
    info!(session_id = %session_id, connection_id = guard.id(), "WebSocket connected");

    let (mut sink, mut frames) = socket.split();
    let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    let writer = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            let closing = matches!(message, Message::Close(_));
            if let Err(e) = sink.send(message).await {
                debug!(error = %e, "WebSocket write failed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    let welcome = Notification::with_params(
        WELCOME_METHOD,
        json!({ "sessionId": session_id, "server": server.info() }),
    );
    match serde_json::to_string(&welcome) {
        Ok(text) => {
            let _ = outbound.send(Message::Text(text.into()));
        }
        Err(e) => warn!(error = %e, "Failed to encode welcome notification"),
    }

    let in_flight = TaskTracker::new();
    let closed = loop {
        let frame = tokio::select! {
            () = shutdown.cancelled() => break Closed::Shutdown,
            frame = frames.next() => frame,
        };

        match frame {
            Some(Ok(Message::Text(text))) => {
                let server = server.clone();
                let session_id = session_id.clone();
                let outbound = outbound.clone();
                in_flight.spawn(async move {
                    let response = handle_frame(&server, &session_id, text.as_str()).await;
                    if outbound
                        .send(Message::Text(response.to_json_string().into()))
                        .is_err()
                    {
                        warn!(session_id = %session_id, id = ?response.id, "Dropping response for closed WebSocket");
                    }
                });
            }
            Some(Ok(Message::Close(_))) | None => break Closed::ByPeer,
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                debug!(error = %e, "WebSocket read failed");
                break Closed::ByPeer;
            }
        }
    };

    in_flight.close();
    match closed {
        Closed::Shutdown => {
            info!(session_id = %session_id, pending = in_flight.len(), "Closing WebSocket for shutdown");
            let grace = server.shutdown().grace();
            if tokio::time::timeout(grace, in_flight.wait()).await.is_err() {
                warn!(
                    session_id = %session_id,
                    abandoned = in_flight.len(),
                    "In-flight WebSocket requests did not finish within grace period"
                );
            }
            let _ = outbound.send(close_message(CLOSE_GOING_AWAY));
        }
        Closed::ByPeer => {
            info!(session_id = %session_id, "WebSocket closed by peer");
            sessions.remove(&session_id);
        }
    }

    drop(outbound);
    if let Err(e) = writer.await {
        warn!(error = %e, "WebSocket writer task failed");
    }
    drop(guard);
}

async fn handle_frame(server: &Server, session_id: &str, text: &str) -> RpcResponse {
    let request = match Request::decode(text.as_bytes()) {
        Ok(request) => request,
        Err(e) => {
            debug!(session_id = %session_id, error = %e, "Malformed WebSocket frame");
            return RpcResponse::parse_error(&e);
        }
    };

    let sessions = server.sessions();
    sessions.touch(session_id);
    let request = match sessions.headers(session_id) {
        Some(stored) => request.with_headers(stored.iter().map(|(k, v)| (k.clone(), v.clone()))),
        None => request,
    };

    let id = request.id.clone();
    match AssertUnwindSafe(server.dispatch(request)).catch_unwind().await {
        Ok(response) => response,
        Err(_) => {
            warn!(session_id = %session_id, "Dispatch panicked");
            RpcResponse::error(id, JsonRpcError::internal_error("Internal error: dispatch failed"))
        }
    }
}
