//! The `error` member of a JSON-RPC response.
//!
//! [`McpError`] converts into this at exactly one place, the dispatcher.
//! Argument failures carry the offending argument in `data` so clients can
//! point at it without parsing the message.

use serde::{Deserialize, Serialize};

use super::codes;
use super::types::McpError;

/// Wire form of a failed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// One of the codes in [`codes`].
    pub code: i32,
    /// Human-readable summary.
    pub message: String,
    /// Structured detail, omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    /// Error with any code.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// -32700: the frame could not be decoded.
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, message)
    }

    /// -32601: unknown method, tool, resource or prompt.
    pub fn method_not_found(message: impl Into<String>) -> Self {
        Self::new(codes::METHOD_NOT_FOUND, message)
    }

    /// -32602: required parameter missing or mistyped.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(codes::INVALID_PARAMS, message)
    }

    /// -32603: handler or routing failure.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL_ERROR, message)
    }

    /// Replace the `data` member.
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<&McpError> for JsonRpcError {
    fn from(err: &McpError) -> Self {
        let data = match err {
            McpError::MissingArgument { name } => Some(serde_json::json!({ "argument": name })),
            McpError::ArgumentType {
                name,
                expected,
                actual,
            } => Some(serde_json::json!({
                "argument": name,
                "expected": expected,
                "actual": actual,
            })),
            _ => None,
        };

        Self {
            code: err.code(),
            message: err.to_string(),
            data,
        }
    }
}

impl From<McpError> for JsonRpcError {
    fn from(err: McpError) -> Self {
        Self::from(&err)
    }
}
