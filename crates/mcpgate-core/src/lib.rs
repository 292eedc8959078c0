//! Message model for the mcpgate MCP server engine.
//!
//! Everything a transport or handler exchanges lives here: the JSON-RPC
//! envelopes, tool/resource/prompt definitions, content blocks, typed
//! argument access and the error taxonomy that maps onto JSON-RPC codes.
//! Nothing in this crate performs I/O.
//!
//! The protocol revision spoken is [`PROTOCOL_VERSION`].
//!
//! ```rust
//! use mcpgate_core::{JsonRpcError, Request, Response};
//! use serde_json::json;
//!
//! let request = Request::decode(br#"{"jsonrpc":"2.0","method":"ping","id":7}"#).unwrap();
//! assert_eq!(request.method(), "ping");
//! assert!(!request.is_notification());
//!
//! let ok = Response::success(request.id.clone(), json!({"status": "ok"}));
//! assert_eq!(ok.encode()["id"], 7);
//!
//! let failed = Response::error(None, JsonRpcError::parse_error("bad frame"));
//! assert_eq!(failed.encode()["error"]["code"], -32700);
//! ```

#![deny(missing_docs)]

pub mod capability;
pub mod error;
pub mod protocol;
pub mod types;

pub use capability::{InitializeResult, ServerCapabilities, ServerInfo, PROTOCOL_VERSION};
pub use error::{JsonRpcError, McpError};
pub use protocol::{Notification, Request, RequestId, Response, JSONRPC_VERSION};

/// Glob-importable set of the types handlers and adapters touch most.
pub mod prelude {
    pub use crate::capability::{
        InitializeResult, ServerCapabilities, ServerInfo, PROTOCOL_VERSION,
    };
    pub use crate::error::{JsonRpcError, McpError};
    pub use crate::protocol::{Notification, Request, RequestId, Response};
    pub use crate::types::{
        // Content types
        Annotations,
        Content,
        Role,
        // Tool types
        Arguments,
        CallToolResult,
        Tool,
        ToolAnnotations,
        ToolOutput,
        // Resource types
        ReadResourceResult,
        Resource,
        ResourceContents,
        // Prompt types
        GetPromptResult,
        Prompt,
        PromptArgument,
        PromptMessage,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let _tool = Tool::new("test");
        let _caps = ServerCapabilities::new().with_tools();
        let _args = Arguments::default();
    }

    #[test]
    fn test_protocol_version() {
        assert_eq!(PROTOCOL_VERSION, "2025-11-25");
        assert_eq!(JSONRPC_VERSION, "2.0");
    }
}
