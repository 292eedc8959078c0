//! # mcpgate
//!
//! A Model Context Protocol server engine. Register tools, resources and
//! prompts once; serve them over stdio, HTTP POST, Server-Sent Events and
//! WebSocket with shared sessions and coordinated shutdown.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mcpgate::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let server = ServerBuilder::new("greeter", "1.0.0")
//!         .tool(
//!             Tool::new("greet")
//!                 .description("Say hello")
//!                 .with_string_param("name", "Who to greet", true),
//!             |ctx: CallContext| async move {
//!                 let name: String = ctx.require("name")?;
//!                 Ok(format!("Hello, {name}!"))
//!             },
//!         )
//!         .build();
//!
//!     McpRouter::new(server).serve("127.0.0.1:3000").await
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`mcpgate_core`] - Message model, content types, arguments and errors (no I/O)
//! - [`mcpgate_transport`] - Line framing, SSE framing, header whitelist, close codes
//! - [`mod@mcpgate_server`] - Registries, dispatcher, sessions, connections, shutdown, stdio loop
//! - `mcpgate_axum` - HTTP, SSE and WebSocket adapters (feature `http`)

#![deny(missing_docs)]

// Re-export all public items from core
pub use mcpgate_core::*;

// Re-export server types
pub use mcpgate_server::{
    CallContext, CapabilityRegistry, ConnectionKind, ConnectionRegistry, Dispatcher,
    HealthReport, Server, ServerBuilder, SessionConfig, SessionManager, ShutdownCoordinator,
    StatusReport, ToolBuilder, serve_lines, serve_stdio,
};

// Re-export transport types
pub use mcpgate_transport::{LineTransport, StdioTransport, TransportError};

#[cfg(feature = "http")]
pub use mcpgate_axum::McpRouter;

pub mod prelude;

/// Server module re-exports
pub mod server {
    //! Server implementation types.
    pub use mcpgate_server::*;
}

/// Transport module re-exports
pub mod transport {
    //! Transport layer types.
    pub use mcpgate_transport::*;
}

/// HTTP adapter re-exports
#[cfg(feature = "http")]
pub mod http {
    //! HTTP, SSE and WebSocket adapters.
    pub use mcpgate_axum::*;
}
