//! Tool types.
//!
//! Tools are callable capabilities with a JSON-Schema-shaped input
//! description. Handlers return a [`ToolOutput`], which the dispatcher turns
//! into a [`CallToolResult`].

use super::content::Content;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tool definition exposed by the server.
///
/// # Example
///
/// ```rust
/// use mcpgate_core::types::Tool;
///
/// let tool = Tool::new("greet")
///     .description("Greet someone by name")
///     .input_schema(serde_json::json!({
///         "properties": { "name": { "type": "string" } },
///         "required": ["name"]
///     }));
///
/// assert_eq!(tool.input_schema["type"], "object");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Unique name of the tool.
    pub name: String,
    /// Human-readable description of what the tool does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema defining the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    /// Optional annotations providing hints about tool behavior.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<ToolAnnotations>,
}

impl Tool {
    /// Create a new tool with the given name and an empty object schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: normalize_schema(Value::Null),
            annotations: None,
        }
    }

    /// Set the tool's description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the tool's input schema.
    ///
    /// The schema is normalized with [`normalize_schema`].
    #[must_use]
    pub fn input_schema(mut self, schema: Value) -> Self {
        self.input_schema = normalize_schema(schema);
        self
    }

    /// Set the tool's annotations.
    #[must_use]
    pub fn annotations(mut self, annotations: ToolAnnotations) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Add a string parameter to the tool's input schema.
    #[must_use]
    pub fn with_string_param(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.with_param(name.into(), "string", description.into(), required)
    }

    /// Add a number parameter to the tool's input schema.
    #[must_use]
    pub fn with_number_param(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.with_param(name.into(), "number", description.into(), required)
    }

    /// Add a boolean parameter to the tool's input schema.
    #[must_use]
    pub fn with_boolean_param(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.with_param(name.into(), "boolean", description.into(), required)
    }

    fn with_param(mut self, name: String, kind: &str, description: String, required: bool) -> Self {
        let Value::Object(schema) = &mut self.input_schema else {
            return self;
        };
        let properties = schema
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(props) = properties {
            props.insert(
                name.clone(),
                serde_json::json!({ "type": kind, "description": description }),
            );
        }
        if required {
            let list = schema
                .entry("required")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = list {
                items.push(Value::String(name));
            }
        }
        self
    }
}

/// Normalize a tool input schema.
///
/// An absent or `null` schema becomes `{"type":"object","properties":{}}`,
/// and an object schema without `type` gets `"type":"object"`. Other values
/// are kept as they are.
#[must_use]
pub fn normalize_schema(schema: Value) -> Value {
    match schema {
        Value::Null => serde_json::json!({ "type": "object", "properties": {} }),
        Value::Object(mut obj) => {
            obj.entry("type")
                .or_insert_with(|| Value::String("object".to_string()));
            Value::Object(obj)
        }
        other => other,
    }
}

/// Annotations providing hints about tool behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolAnnotations {
    /// Human-readable title for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// If true, the tool only reads data (no side effects).
    #[serde(rename = "readOnlyHint", skip_serializing_if = "Option::is_none")]
    pub read_only_hint: Option<bool>,
    /// If true, the tool may perform destructive operations.
    #[serde(rename = "destructiveHint", skip_serializing_if = "Option::is_none")]
    pub destructive_hint: Option<bool>,
    /// If true, repeated calls with the same input yield the same result.
    #[serde(rename = "idempotentHint", skip_serializing_if = "Option::is_none")]
    pub idempotent_hint: Option<bool>,
    /// If true, the tool interacts with an open world of external entities.
    #[serde(rename = "openWorldHint", skip_serializing_if = "Option::is_none")]
    pub open_world_hint: Option<bool>,
}

impl ToolAnnotations {
    /// Create annotations for a read-only tool.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            read_only_hint: Some(true),
            ..Default::default()
        }
    }

    /// Create annotations for a destructive tool.
    #[must_use]
    pub fn destructive() -> Self {
        Self {
            destructive_hint: Some(true),
            ..Default::default()
        }
    }
}

/// Output of a tool handler.
///
/// Handlers either return content blocks directly or a plain JSON value
/// that the dispatcher encodes into a single text block.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Content blocks, passed through unchanged.
    Content(Vec<Content>),
    /// A plain value, JSON-encoded into one text block.
    Value(Value),
}

impl ToolOutput {
    /// A single text block, passed through unchanged.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Content(vec![Content::text(text)])
    }

    /// A plain value.
    #[must_use]
    pub const fn value(value: Value) -> Self {
        Self::Value(value)
    }

    /// Serialize any value into a plain-value output.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Value)
    }

    /// Convert into the wire result.
    ///
    /// A plain value that is already content-block shaped is passed
    /// through; any other value is JSON-encoded into one text block.
    #[must_use]
    pub fn into_call_result(self) -> CallToolResult {
        let content = match self {
            Self::Content(blocks) => blocks,
            Self::Value(value) => Content::blocks_from_value(&value)
                .unwrap_or_else(|| vec![Content::text(value.to_string())]),
        };
        CallToolResult {
            content,
            is_error: None,
        }
    }
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<String> for ToolOutput {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<&str> for ToolOutput {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<Content> for ToolOutput {
    fn from(content: Content) -> Self {
        Self::Content(vec![content])
    }
}

impl From<Vec<Content>> for ToolOutput {
    fn from(content: Vec<Content>) -> Self {
        Self::Content(content)
    }
}

/// Result of a `tools/call` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolResult {
    /// The content blocks.
    pub content: Vec<Content>,
    /// Set when the tool reports an in-band failure.
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_schema_normalization() {
        assert_eq!(
            normalize_schema(Value::Null),
            json!({"type": "object", "properties": {}})
        );
        assert_eq!(
            normalize_schema(json!({"properties": {"q": {"type": "string"}}})),
            json!({"properties": {"q": {"type": "string"}}, "type": "object"})
        );
        assert_eq!(
            normalize_schema(json!({"type": "object", "properties": {}})),
            json!({"type": "object", "properties": {}})
        );
    }

    #[test]
    fn test_tool_params() {
        let tool = Tool::new("search")
            .with_string_param("query", "Search text", true)
            .with_number_param("limit", "Max results", false);

        assert_eq!(tool.input_schema["properties"]["query"]["type"], "string");
        assert_eq!(tool.input_schema["properties"]["limit"]["type"], "number");
        assert_eq!(tool.input_schema["required"], json!(["query"]));
    }

    #[test]
    fn test_tool_serialization() {
        let tool = Tool::new("echo")
            .description("Echo input")
            .annotations(ToolAnnotations::read_only());
        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["name"], "echo");
        assert_eq!(json["inputSchema"]["type"], "object");
        assert_eq!(json["annotations"]["readOnlyHint"], true);
        assert!(json["annotations"].get("destructiveHint").is_none());
    }

    #[test]
    fn test_value_output_is_json_encoded() {
        let result = ToolOutput::from("Hello, World!").into_call_result();
        assert_eq!(result.content.len(), 1);
        let text = result.content[0].as_text().unwrap();
        assert_eq!(text, "\"Hello, World!\"");
        let decoded: String = serde_json::from_str(text).unwrap();
        assert_eq!(decoded, "Hello, World!");
    }

    #[test]
    fn test_structured_value_output() {
        let result = ToolOutput::value(json!({"sum": 3})).into_call_result();
        assert_eq!(result.content, vec![Content::text(r#"{"sum":3}"#)]);
    }

    #[test]
    fn test_content_shaped_value_passes_through() {
        let result = ToolOutput::value(json!({"type": "text", "text": "raw"})).into_call_result();
        assert_eq!(result.content, vec![Content::text("raw")]);
    }

    #[test]
    fn test_value_with_extra_fields_keeps_them() {
        let value = json!({"type": "text", "text": "x", "author": "bob", "score": 3});
        let result = ToolOutput::value(value.clone()).into_call_result();

        assert_eq!(result.content.len(), 1);
        let decoded: Value = serde_json::from_str(result.content[0].as_text().unwrap()).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_content_output_passes_through() {
        let blocks = vec![Content::text("a"), Content::image("aGk=", "image/png")];
        let result = ToolOutput::from(blocks.clone()).into_call_result();
        assert_eq!(result.content, blocks);
        assert_eq!(
            serde_json::to_value(&result).unwrap().get("isError"),
            None
        );
    }
}
