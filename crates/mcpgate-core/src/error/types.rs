//! The primary error type for mcpgate.

use miette::Diagnostic;
use thiserror::Error;

use super::codes;

/// A boxed error type for error sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type for mcpgate.
///
/// Every failure that can surface to a client flows through this enum;
/// [`McpError::code`] maps each variant onto the JSON-RPC reserved range.
#[derive(Error, Diagnostic, Debug)]
pub enum McpError {
    // ========================================================================
    // Envelope Errors
    // ========================================================================
    /// Invalid JSON, or a structurally invalid envelope.
    #[error("Parse error: {message}")]
    #[diagnostic(
        code(mcpgate::protocol::parse_error),
        help("Ensure the message is a JSON-RPC 2.0 object with a non-empty method")
    )]
    Parse {
        /// Human-readable error message.
        message: String,
        /// The underlying parse error, if available.
        #[source]
        source: Option<BoxError>,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// The top-level method does not exist.
    #[error("Method not found: {method}")]
    #[diagnostic(code(mcpgate::protocol::method_not_found))]
    MethodNotFound {
        /// The method that was requested.
        method: String,
    },

    /// No tool is registered under the requested name.
    #[error("Tool not found: {name}")]
    #[diagnostic(code(mcpgate::tool::not_found))]
    ToolNotFound {
        /// The requested tool name.
        name: String,
    },

    /// No resource is registered under the requested URI.
    #[error("Resource not found: {uri}")]
    #[diagnostic(
        code(mcpgate::resource::not_found),
        help("Resource URIs are matched exactly")
    )]
    ResourceNotFound {
        /// The requested URI.
        uri: String,
    },

    /// No prompt is registered under the requested name.
    #[error("Prompt not found: {name}")]
    #[diagnostic(code(mcpgate::prompt::not_found))]
    PromptNotFound {
        /// The requested prompt name.
        name: String,
    },

    // ========================================================================
    // Parameter Errors
    // ========================================================================
    /// Top-level method parameters are missing or malformed.
    #[error("Invalid params for '{method}': {message}")]
    #[diagnostic(code(mcpgate::protocol::invalid_params))]
    InvalidParams {
        /// The method whose parameters were rejected.
        method: String,
        /// Human-readable error message.
        message: String,
    },

    /// A required call argument was absent.
    #[error("Missing required argument: {name}")]
    #[diagnostic(code(mcpgate::argument::missing))]
    MissingArgument {
        /// The argument name.
        name: String,
    },

    /// A call argument was present but held the wrong JSON type.
    #[error("Argument '{name}' has type {actual}, expected {expected}")]
    #[diagnostic(code(mcpgate::argument::type_mismatch))]
    ArgumentType {
        /// The argument name.
        name: String,
        /// The requested type.
        expected: &'static str,
        /// The JSON type actually stored.
        actual: &'static str,
    },

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// A capability handler reported a failure.
    #[error("{message}")]
    #[diagnostic(code(mcpgate::handler::failed))]
    Handler {
        /// Human-readable error message.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<BoxError>,
    },

    /// Internal error.
    #[error("Internal error: {message}")]
    #[diagnostic(code(mcpgate::internal), severity(error))]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<BoxError>,
    },
}

// ============================================================================
// Error Construction Helpers
// ============================================================================

impl McpError {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a parse error with a source.
    pub fn parse_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Parse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a method not found error.
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    /// Create a tool not found error.
    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::ToolNotFound { name: name.into() }
    }

    /// Create a resource not found error.
    pub fn resource_not_found(uri: impl Into<String>) -> Self {
        Self::ResourceNotFound { uri: uri.into() }
    }

    /// Create a prompt not found error.
    pub fn prompt_not_found(name: impl Into<String>) -> Self {
        Self::PromptNotFound { name: name.into() }
    }

    /// Create an invalid params error.
    pub fn invalid_params(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParams {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Create a missing argument error.
    pub fn missing_argument(name: impl Into<String>) -> Self {
        Self::MissingArgument { name: name.into() }
    }

    /// Create an argument type mismatch error.
    pub fn argument_type(
        name: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::ArgumentType {
            name: name.into(),
            expected,
            actual,
        }
    }

    /// Create a handler failure.
    ///
    /// This is the error capability handlers return for domain failures.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler {
            message: message.into(),
            source: None,
        }
    }

    /// Create a handler failure with a source.
    pub fn handler_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Handler {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error with a source.
    pub fn internal_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get the JSON-RPC error code for this error.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::Parse { .. } => codes::PARSE_ERROR,
            Self::MethodNotFound { .. }
            | Self::ToolNotFound { .. }
            | Self::ResourceNotFound { .. }
            | Self::PromptNotFound { .. } => codes::METHOD_NOT_FOUND,
            Self::InvalidParams { .. } | Self::MissingArgument { .. } | Self::ArgumentType { .. } => {
                codes::INVALID_PARAMS
            }
            Self::Handler { .. } | Self::Internal { .. } => codes::INTERNAL_ERROR,
        }
    }

    /// Check whether this error was raised while validating call arguments.
    #[must_use]
    pub const fn is_argument_error(&self) -> bool {
        matches!(self, Self::MissingArgument { .. } | Self::ArgumentType { .. })
    }
}

// ============================================================================
// Standard Error Conversions
// ============================================================================

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_with_source(err.to_string(), err)
    }
}
