//! # mcpgate-server
//!
//! Capability registry, request dispatch, and shared runtime state for
//! mcpgate servers.
//!
//! This crate is transport-agnostic. It provides:
//!
//! - **Registries**: Named tools, resources, and prompts with async handlers
//! - **Dispatcher**: Maps every request onto exactly one response
//! - **Sessions**: Expiring session table with outbound stream slots
//! - **Connections**: Registry of live streams for health and shutdown
//! - **Shutdown**: Ordered, bounded teardown of all runtime state
//! - **Stdio**: A line-delimited serving loop
//!
//! HTTP, SSE and WebSocket adapters live in `mcpgate-axum`.
//!
//! # Example
//!
//! ```rust
//! use mcpgate_server::prelude::*;
//! use mcpgate_core::protocol::Request;
//! use serde_json::json;
//!
//! # async fn example() {
//! let server = ServerBuilder::new("calculator", "1.0.0")
//!     .tool(
//!         Tool::new("add")
//!             .with_number_param("a", "First operand", true)
//!             .with_number_param("b", "Second operand", true),
//!         |ctx: CallContext| async move {
//!             let a: f64 = ctx.require("a")?;
//!             let b: f64 = ctx.require("b")?;
//!             Ok(json!({ "sum": a + b }))
//!         },
//!     )
//!     .build();
//!
//! let request = Request::new("tools/call", 1i64)
//!     .params(json!({ "name": "add", "arguments": { "a": 1, "b": 2 } }));
//! let response = server.dispatch(request).await;
//! assert!(response.is_success());
//! # }
//! ```

#![deny(missing_docs)]

pub mod builder;
pub mod capability;
pub mod connection;
pub mod context;
pub mod health;
pub mod router;
pub mod server;
pub mod session;
pub mod shutdown;
pub mod stdio;
pub mod sweeper;

pub use builder::ServerBuilder;
pub use capability::{
    CapabilityRegistry, PromptRegistry, ResourceRegistry, ToolBuilder, ToolRegistry,
};
pub use connection::{ConnectionGuard, ConnectionInfo, ConnectionKind, ConnectionRegistry};
pub use context::CallContext;
pub use health::{CapabilityNames, HealthReport, StatusReport};
pub use router::{Dispatcher, methods};
pub use server::Server;
pub use session::{SessionConfig, SessionManager, StreamHandle};
pub use shutdown::{DEFAULT_SHUTDOWN_GRACE, ShutdownCoordinator};
pub use stdio::{serve_lines, serve_stdio};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builder::ServerBuilder;
    pub use crate::capability::ToolBuilder;
    pub use crate::context::CallContext;
    pub use crate::server::Server;
    pub use crate::session::SessionConfig;
    pub use mcpgate_core::prelude::*;
}
