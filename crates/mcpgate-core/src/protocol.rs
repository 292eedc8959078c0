//! JSON-RPC 2.0 envelope types.
//!
//! Every transport decodes inbound bytes into a [`Request`] and encodes the
//! dispatcher's [`Response`] back onto the same channel. Server-originated
//! messages that expect no reply (such as the WebSocket welcome) use
//! [`Notification`].
//!
//! # Example
//!
//! ```rust
//! use mcpgate_core::protocol::{Request, RequestId, Response};
//!
//! let request = Request::decode(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#).unwrap();
//! assert_eq!(request.id, Some(RequestId::Number(1)));
//!
//! let response = Response::success(request.id.clone(), serde_json::json!({}));
//! assert_eq!(response.encode()["id"], 1);
//! ```

use crate::error::{JsonRpcError, McpError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// The JSON-RPC version string. Always "2.0".
pub const JSONRPC_VERSION: &str = "2.0";

fn default_jsonrpc() -> Cow<'static, str> {
    Cow::Borrowed(JSONRPC_VERSION)
}

// Keeps an explicit `"result": null` distinct from an absent result.
fn deserialize_some<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A JSON-RPC request ID.
///
/// Request IDs are used to correlate requests with their responses.
/// They can be either numbers or strings per the JSON-RPC 2.0 specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID.
    Number(i64),
    /// String request ID.
    String(String),
}

impl RequestId {
    /// Convert the ID into its JSON representation.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::from(*n),
            Self::String(s) => Value::String(s.clone()),
        }
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self::String(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self::String(id.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// A JSON-RPC 2.0 request.
///
/// A request without an `id` (absent or `null`) is a notification. The
/// dispatcher still answers notifications, echoing a `null` id.
///
/// `headers` never travels on the wire. Transports attach the forwarded
/// header set with [`Request::with_headers`], which is copy-on-write: other
/// clones of the same request keep their own view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// The JSON-RPC version. Always "2.0".
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: Cow<'static, str>,
    /// The method to invoke.
    pub method: String,
    /// The method parameters, if any. Must be a JSON object when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    /// The request ID, or `None` for notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    /// Forwarded transport headers.
    #[serde(skip)]
    pub headers: Arc<HashMap<String, String>>,
}

impl Request {
    /// Create a new request with no parameters.
    #[must_use]
    pub fn new(method: impl Into<String>, id: impl Into<RequestId>) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            method: method.into(),
            params: None,
            id: Some(id.into()),
            headers: Arc::default(),
        }
    }

    /// Create a notification (a request without an id).
    #[must_use]
    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            method: method.into(),
            params: None,
            id: None,
            headers: Arc::default(),
        }
    }

    /// Set the parameters for this request.
    ///
    /// Non-object values are ignored, since params must be a JSON object.
    #[must_use]
    pub fn params(mut self, params: Value) -> Self {
        if let Value::Object(map) = params {
            self.params = Some(map);
        }
        self
    }

    /// Decode a request from raw bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, McpError> {
        let request: Self = serde_json::from_slice(bytes)
            .map_err(|e| McpError::parse_with_source(format!("Invalid request: {e}"), e))?;
        request.validated()
    }

    /// Decode a request from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, McpError> {
        let request: Self = serde_json::from_value(value)
            .map_err(|e| McpError::parse_with_source(format!("Invalid request: {e}"), e))?;
        request.validated()
    }

    fn validated(self) -> Result<Self, McpError> {
        if self.method.is_empty() {
            return Err(McpError::parse("Missing method"));
        }
        Ok(self)
    }

    /// Merge `additional` over the existing headers.
    ///
    /// Keys in `additional` win on collision. Merging an empty set returns
    /// the receiver unchanged.
    #[must_use]
    pub fn with_headers<I, K, V>(mut self, additional: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut additional = additional.into_iter().peekable();
        if additional.peek().is_none() {
            return self;
        }
        let headers = Arc::make_mut(&mut self.headers);
        headers.extend(additional.map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Get the method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Check whether this request is a notification.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Look up a single top-level parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref().and_then(|p| p.get(name))
    }

    /// Get the forwarded headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Get a shared handle to the forwarded headers.
    #[must_use]
    pub fn shared_headers(&self) -> Arc<HashMap<String, String>> {
        Arc::clone(&self.headers)
    }
}

/// A JSON-RPC 2.0 response.
///
/// Exactly one of `result` and `error` is set. The `id` is always encoded,
/// as `null` when the request id was absent or unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// The JSON-RPC version. Always "2.0".
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: Cow<'static, str>,
    /// The request ID this response corresponds to.
    #[serde(default)]
    pub id: Option<RequestId>,
    /// The result on success.
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    /// The error on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl Response {
    /// Create a successful response.
    #[must_use]
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    #[must_use]
    pub fn error(id: Option<RequestId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Create a parse-error response with a `null` id.
    #[must_use]
    pub fn parse_error(err: &McpError) -> Self {
        Self::error(None, JsonRpcError::parse_error(err.to_string()))
    }

    /// Check if this response indicates success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_some() && self.error.is_none()
    }

    /// Check if this response indicates an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Get the result, consuming self.
    ///
    /// Returns `Err` if this was an error response.
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        if let Some(error) = self.error {
            Err(error)
        } else {
            self.result.ok_or_else(|| {
                JsonRpcError::internal_error("Response contained neither result nor error")
            })
        }
    }

    /// Encode into the canonical JSON object.
    ///
    /// Absent optional fields are omitted; `id` is always present.
    #[must_use]
    pub fn encode(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| self.encode_failure(&e))
    }

    /// Encode into a single-line JSON string.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| self.encode_failure(&e).to_string())
    }

    // Only reachable if a result value refuses to serialize.
    fn encode_failure(&self, error: &serde_json::Error) -> Value {
        serde_json::json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": self.id.as_ref().map_or(Value::Null, RequestId::to_value),
            "error": {
                "code": crate::error::INTERNAL_ERROR,
                "message": format!("Failed to encode response: {error}"),
            },
        })
    }

    /// Decode a response from raw bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, McpError> {
        let response: Self = serde_json::from_slice(bytes)
            .map_err(|e| McpError::parse_with_source(format!("Invalid response: {e}"), e))?;
        match (&response.result, &response.error) {
            (Some(_), None) | (None, Some(_)) => Ok(response),
            _ => Err(McpError::parse(
                "Response must contain exactly one of result or error",
            )),
        }
    }
}

/// A JSON-RPC 2.0 notification message sent by the server.
///
/// Notifications are one-way messages that do not expect a response.
/// They have no ID field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// The JSON-RPC version. Always "2.0".
    pub jsonrpc: Cow<'static, str>,
    /// The notification method.
    pub method: Cow<'static, str>,
    /// The notification parameters, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Notification {
    /// Create a new notification with parameters.
    #[must_use]
    pub fn with_params(method: impl Into<Cow<'static, str>>, params: Value) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            method: method.into(),
            params: Some(params),
        }
    }
}
