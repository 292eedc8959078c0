//! Framing primitives for mcpgate transports.
//!
//! This crate holds the byte-level pieces the transport adapters share:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`stdio`] | Newline-delimited JSON over any async reader/writer |
//! | [`sse`] | `text/event-stream` frame encoding and incremental parsing |
//! | [`websocket`] | Close codes and the welcome notification method |
//! | [`headers`] | Session headers and the forwarded-header whitelist |
//!
//! The network adapters themselves live in `mcpgate-axum`; the stdio serve
//! loop lives in `mcpgate-server`.

#![deny(missing_docs)]

pub mod error;
pub mod headers;
pub mod sse;
pub mod stdio;
pub mod websocket;

pub use error::TransportError;
pub use headers::{FORWARDED_HEADERS, PROTOCOL_VERSION_HEADER, SESSION_ID_HEADER};
pub use sse::{SseEvent, SseParser};
pub use stdio::{LineTransport, StdioTransport, MAX_MESSAGE_SIZE};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::TransportError;
    pub use crate::headers::{forwarded_headers, SESSION_ID_HEADER};
    pub use crate::sse::{SseEvent, SseParser};
    pub use crate::stdio::{LineTransport, StdioTransport};
}
