//! Resource types.
//!
//! Resources are URI-addressed data items. A read returns
//! [`ResourceContents`] carrying exactly one of inline text or a base64 blob.

use super::content::Annotations;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// A resource definition exposed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// URI identifying the resource (unique within the resource table).
    pub uri: String,
    /// Human-readable name for the resource.
    pub name: String,
    /// Description of what the resource contains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of the resource content.
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Resource {
    /// Create a new resource with a URI and name.
    #[must_use]
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: None,
            mime_type: None,
        }
    }

    /// Set the resource description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the MIME type.
    #[must_use]
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// The payload of a resource read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourcePayload {
    /// Inline text.
    Text {
        /// The text content.
        text: String,
    },
    /// Base64-encoded binary data.
    Blob {
        /// The encoded bytes.
        blob: String,
    },
}

/// The contents of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceContents {
    /// URI of the resource.
    pub uri: String,
    /// Human-readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Display title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description of the contents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of the content.
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Text or blob payload.
    #[serde(flatten)]
    pub payload: ResourcePayload,
    /// Size of the raw content in bytes, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Audience, priority and last-modified hints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

impl ResourceContents {
    fn with_payload(uri: impl Into<String>, payload: ResourcePayload) -> Self {
        Self {
            uri: uri.into(),
            name: None,
            title: None,
            description: None,
            mime_type: None,
            payload,
            size: None,
            annotations: None,
        }
    }

    /// Create text resource contents.
    #[must_use]
    pub fn text(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_payload(uri, ResourcePayload::Text { text: text.into() })
            .mime_type("text/plain")
    }

    /// Create JSON resource contents.
    pub fn json<T: Serialize>(
        uri: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        let text = serde_json::to_string_pretty(value)?;
        Ok(Self::with_payload(uri, ResourcePayload::Text { text }).mime_type("application/json"))
    }

    /// Create binary resource contents, base64-encoding `data`.
    #[must_use]
    pub fn blob(uri: impl Into<String>, data: &[u8], mime_type: impl Into<String>) -> Self {
        let blob = base64::engine::general_purpose::STANDARD.encode(data);
        let mut contents = Self::with_payload(uri, ResourcePayload::Blob { blob });
        contents.mime_type = Some(mime_type.into());
        contents.size = Some(data.len() as u64);
        contents
    }

    /// Set the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the MIME type.
    #[must_use]
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the size in bytes.
    #[must_use]
    pub const fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the annotations.
    #[must_use]
    pub fn annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Get the inline text, if this is a text payload.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            ResourcePayload::Text { text } => Some(text),
            ResourcePayload::Blob { .. } => None,
        }
    }

    /// Decode the blob payload, if this is a blob.
    #[must_use]
    pub fn decode_blob(&self) -> Option<Vec<u8>> {
        match &self.payload {
            ResourcePayload::Blob { blob } => {
                base64::engine::general_purpose::STANDARD.decode(blob).ok()
            }
            ResourcePayload::Text { .. } => None,
        }
    }
}

/// Result of a `resources/read` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadResourceResult {
    /// The resource contents.
    pub contents: Vec<ResourceContents>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::content::Role;
    use serde_json::json;

    #[test]
    fn test_text_contents_serialization() {
        let contents = ResourceContents::text("config://app", "debug=true").name("app config");
        let json = serde_json::to_value(&contents).unwrap();
        assert_eq!(json["uri"], "config://app");
        assert_eq!(json["text"], "debug=true");
        assert_eq!(json["mimeType"], "text/plain");
        assert_eq!(json["name"], "app config");
        assert!(json.get("blob").is_none());
        assert!(json.get("title").is_none());
    }

    #[test]
    fn test_blob_contents() {
        let contents = ResourceContents::blob("bin://logo", &[0xde, 0xad], "image/png");
        let json = serde_json::to_value(&contents).unwrap();
        assert_eq!(json["blob"], "3q0=");
        assert_eq!(json["size"], 2);
        assert!(json.get("text").is_none());
        assert_eq!(contents.decode_blob(), Some(vec![0xde, 0xad]));
        assert_eq!(contents.as_text(), None);
    }

    #[test]
    fn test_annotations() {
        let contents = ResourceContents::text("mem://x", "x").annotations(
            Annotations::for_audience(Role::Assistant)
                .with_priority(0.5)
                .with_last_modified("2025-01-01T00:00:00Z"),
        );
        let json = serde_json::to_value(&contents).unwrap();
        assert_eq!(
            json["annotations"],
            json!({
                "audience": ["assistant"],
                "priority": 0.5,
                "lastModified": "2025-01-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn test_contents_deserialization() {
        let text: ResourceContents =
            serde_json::from_value(json!({"uri": "a://b", "text": "hi"})).unwrap();
        assert_eq!(text.as_text(), Some("hi"));

        let blob: ResourceContents =
            serde_json::from_value(json!({"uri": "a://b", "blob": "aGk="})).unwrap();
        assert_eq!(blob.decode_blob(), Some(b"hi".to_vec()));

        assert!(serde_json::from_value::<ResourceContents>(json!({"uri": "a://b"})).is_err());
    }
}
