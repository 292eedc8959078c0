//! Content blocks returned by tools and prompts.
//!
//! Content is a closed set: text, image, or an embedded resource.

use super::resource::ResourceContents;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a message participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation.
    User,
    /// The model side of the conversation.
    Assistant,
}

/// Annotations that can be attached to content and resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    /// Intended audience (e.g., user, assistant).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<Vec<Role>>,
    /// Priority level (0.0 to 1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    /// RFC 3339 timestamp of the last modification.
    #[serde(rename = "lastModified", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl Annotations {
    /// Create annotations targeted at a single audience.
    #[must_use]
    pub fn for_audience(role: Role) -> Self {
        Self {
            audience: Some(vec![role]),
            ..Self::default()
        }
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the last-modified timestamp.
    #[must_use]
    pub fn with_last_modified(mut self, timestamp: impl Into<String>) -> Self {
        self.last_modified = Some(timestamp.into());
        self
    }
}

/// A single content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Plain text content.
    Text(TextContent),
    /// Image content (base64 encoded).
    Image(ImageContent),
    /// An embedded resource.
    Resource(EmbeddedResource),
}

impl Content {
    /// Create text content.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextContent {
            text: text.into(),
            annotations: None,
        })
    }

    /// Create image content from base64 data.
    #[must_use]
    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Image(ImageContent {
            data: data.into(),
            mime_type: mime_type.into(),
            annotations: None,
        })
    }

    /// Embed resource contents.
    #[must_use]
    pub fn resource(resource: ResourceContents) -> Self {
        Self::Resource(EmbeddedResource {
            resource,
            annotations: None,
        })
    }

    /// Interpret a raw value as one or more content blocks.
    ///
    /// Returns `None` unless the value is a content block, or a non-empty
    /// array made only of content blocks. A value counts as a block only if
    /// it re-serializes to exactly itself, so objects carrying fields a
    /// block does not have are left alone.
    #[must_use]
    pub fn blocks_from_value(value: &Value) -> Option<Vec<Self>> {
        match value {
            Value::Object(_) => Self::block_from_value(value).map(|c| vec![c]),
            Value::Array(items) if !items.is_empty() => {
                items.iter().map(Self::block_from_value).collect()
            }
            _ => None,
        }
    }

    fn block_from_value(value: &Value) -> Option<Self> {
        let Value::Object(obj) = value else {
            return None;
        };
        if !obj.contains_key("type") {
            return None;
        }
        let block: Self = serde_json::from_value(value.clone()).ok()?;
        (serde_json::to_value(&block).ok()? == *value).then_some(block)
    }

    /// Get the text if this is text content.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(&t.text),
            _ => None,
        }
    }
}

/// Text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// The text content.
    pub text: String,
    /// Optional annotations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

/// Image content (base64 encoded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    /// Base64-encoded image data.
    pub data: String,
    /// MIME type (e.g., "image/png").
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Optional annotations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

/// A resource embedded in a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedResource {
    /// The resource contents.
    pub resource: ResourceContents,
    /// Optional annotations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}
