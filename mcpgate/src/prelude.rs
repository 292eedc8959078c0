//! Prelude module for convenient imports.
//!
//! ```rust
//! use mcpgate::prelude::*;
//!
//! let info = ServerInfo::new("my-server", "1.0.0");
//! let caps = ServerCapabilities::new().with_tools();
//! let server = ServerBuilder::new(info.name, info.version)
//!     .capabilities(caps)
//!     .build();
//! assert!(server.tools().is_empty());
//! ```

// Core types
pub use mcpgate_core::prelude::*;

// Server types
pub use mcpgate_server::{
    CallContext, Server, ServerBuilder, SessionConfig, ToolBuilder, serve_stdio,
};

// HTTP adapters
#[cfg(feature = "http")]
pub use mcpgate_axum::McpRouter;
