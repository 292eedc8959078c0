//! JSON-RPC 2.0 error codes used by mcpgate.
//!
//! Only the reserved range is used. Unknown tools, resources and prompts
//! share [`METHOD_NOT_FOUND`] with unknown methods.

/// Invalid JSON was received, or the envelope is structurally invalid.
pub const PARSE_ERROR: i32 = -32700;

/// The JSON sent is not a valid Request object.
pub const INVALID_REQUEST: i32 = -32600;

/// The method, tool, resource or prompt does not exist.
pub const METHOD_NOT_FOUND: i32 = -32601;

/// Missing or mistyped parameters.
pub const INVALID_PARAMS: i32 = -32602;

/// Handler failure or unexpected error while routing.
pub const INTERNAL_ERROR: i32 = -32603;
