//! Per-call context handed to tool handlers.

use mcpgate_core::error::McpError;
use mcpgate_core::protocol::RequestId;
use mcpgate_core::types::{ArgumentType, Arguments};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything a tool handler can see about the call it is serving.
///
/// The context is owned by the handler's future, so a handler may move it
/// into spawned work. Headers are shared with the originating request and
/// never change after construction.
#[derive(Debug, Clone)]
pub struct CallContext {
    tool_name: String,
    arguments: Arguments,
    request_id: Option<RequestId>,
    headers: Arc<HashMap<String, String>>,
}

impl CallContext {
    /// Create a call context.
    #[must_use]
    pub fn new(
        tool_name: impl Into<String>,
        arguments: Arguments,
        request_id: Option<RequestId>,
        headers: Arc<HashMap<String, String>>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            request_id,
            headers,
        }
    }

    /// Name of the tool being called.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// The call's arguments.
    #[must_use]
    pub const fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Id of the originating request, if it was not a notification.
    #[must_use]
    pub const fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Look up a forwarded header, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.headers.get(name) {
            return Some(value);
        }
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// All forwarded headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Get a required argument. See [`Arguments::require`].
    pub fn require<T: ArgumentType>(&self, name: &str) -> Result<T, McpError> {
        self.arguments.require(name)
    }

    /// Get an argument with a default. See [`Arguments::require_or`].
    pub fn require_or<T: ArgumentType>(&self, name: &str, default: T) -> Result<T, McpError> {
        self.arguments.require_or(name, default)
    }

    /// Get an optional argument. See [`Arguments::optional`].
    #[must_use]
    pub fn optional<T: ArgumentType>(&self, name: &str) -> Option<T> {
        self.arguments.optional(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(headers: &[(&str, &str)]) -> CallContext {
        let headers = headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CallContext::new(
            "greet",
            Arguments::try_from(json!({"name": "World"})).unwrap(),
            Some(RequestId::String("1".to_string())),
            Arc::new(headers),
        )
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let ctx = context(&[("x-request-id", "abc"), ("User-Agent", "test")]);
        assert_eq!(ctx.header("X-Request-ID"), Some("abc"));
        assert_eq!(ctx.header("user-agent"), Some("test"));
        assert_eq!(ctx.header("authorization"), None);
        assert_eq!(ctx.headers().len(), 2);
    }

    #[test]
    fn test_accessors() {
        let ctx = context(&[]);
        assert_eq!(ctx.tool_name(), "greet");
        assert_eq!(ctx.request_id(), Some(&RequestId::String("1".to_string())));
        assert_eq!(ctx.require::<String>("name").unwrap(), "World");
        assert_eq!(ctx.optional::<i64>("name"), None);
        assert_eq!(ctx.require_or("times", 1i64).unwrap(), 1);
        assert!(ctx.require::<bool>("loud").is_err());
    }
}
