//! Axum adapters for mcpgate.
//!
//! This crate exposes an mcpgate [`Server`](mcpgate_server::Server) over
//! HTTP, Server-Sent Events and WebSocket.
//!
//! # Features
//!
//! - `POST /mcp` for one request and one response
//! - SSE streams on `GET /mcp` and `GET /sse`, one correlated response each
//! - A WebSocket at `GET /ws` for any number of requests
//! - `DELETE /mcp` to end a session
//! - `/health` and `/status` reports
//! - Optional bearer token and origin checks
//! - Graceful shutdown through the server's coordinator
//!
//! # Sessions
//!
//! `initialize` over POST returns an `mcp-session-id` header. Later
//! requests carrying it run with the headers captured at `initialize`.
//! Requests naming an unknown or expired session get 404.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mcpgate_axum::McpRouter;
//! use mcpgate_core::types::Tool;
//! use mcpgate_server::{CallContext, ServerBuilder};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let server = ServerBuilder::new("my-server", "1.0.0")
//!         .tool(
//!             Tool::new("hello").with_string_param("name", "Who to greet", true),
//!             |ctx: CallContext| async move {
//!                 let name: String = ctx.require("name")?;
//!                 Ok(format!("Hello, {name}!"))
//!             },
//!         )
//!         .build();
//!
//!     McpRouter::new(server).with_tracing().serve("0.0.0.0:3000").await
//! }
//! ```
//!
//! # Client Example (curl)
//!
//! ```bash
//! # Initialize and capture the session id
//! curl -i -X POST http://localhost:3000/mcp \
//!   -H "Content-Type: application/json" \
//!   -d '{"jsonrpc":"2.0","id":1,"method":"initialize"}'
//!
//! # Call a tool
//! curl -X POST http://localhost:3000/mcp \
//!   -H "Content-Type: application/json" \
//!   -H "Mcp-Session-Id: <id>" \
//!   -d '{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"hello","arguments":{"name":"World"}}}'
//! ```

#![deny(missing_docs)]

mod auth;
mod error;
mod handler;
mod router;
mod sse;
mod state;
mod status;
mod websocket;

pub use auth::{enforce_origin, require_bearer_token};
pub use error::ExtensionError;
pub use handler::{handle_mcp_delete, handle_mcp_post};
pub use router::McpRouter;
pub use sse::{SseQuery, handle_sse};
pub use state::{McpState, OriginValidator, TokenValidator};
pub use status::{handle_health, handle_not_found, handle_status};
pub use websocket::{WsQuery, handle_ws};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use mcpgate_axum::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::ExtensionError;
    pub use crate::router::McpRouter;
    pub use crate::state::McpState;
}
