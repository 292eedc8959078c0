//! Unified error handling for mcpgate.
//!
//! All failures flow through [`McpError`], which converts into the wire-level
//! [`JsonRpcError`]. The taxonomy is deliberately small:
//!
//! | Kind | Variants | Code |
//! |------|----------|------|
//! | Parse | [`McpError::Parse`] | -32700 |
//! | Not found | `MethodNotFound`, `ToolNotFound`, `ResourceNotFound`, `PromptNotFound` | -32601 |
//! | Invalid params | `InvalidParams`, `MissingArgument`, `ArgumentType` | -32602 |
//! | Internal | `Handler`, `Internal` | -32603 |
//!
//! Handler failures are reported with code -32603 even when the handler
//! itself raised an argument error; only the dispatcher's own pre-invocation
//! checks produce -32602 on the wire.
//!
//! ```rust
//! use mcpgate_core::error::{JsonRpcError, McpError, codes};
//!
//! let err = McpError::tool_not_found("search");
//! let wire: JsonRpcError = err.into();
//! assert_eq!(wire.code, codes::METHOD_NOT_FOUND);
//! assert_eq!(wire.message, "Tool not found: search");
//! ```

pub mod codes;
mod jsonrpc;
mod types;

pub use codes::*;
pub use jsonrpc::JsonRpcError;
pub use types::{BoxError, McpError};
