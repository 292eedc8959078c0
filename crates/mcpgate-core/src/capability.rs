//! What the server declares at `initialize`.
//!
//! Only the three capability families this engine serves are modelled.
//! Change notifications and resource subscriptions are never emitted, so
//! every flag is `false`; the flags exist so clients see a well-formed
//! declaration.

use serde::{Deserialize, Serialize};

/// Protocol revision reported in `initialize` results and the
/// `mcp-protocol-version` header.
pub const PROTOCOL_VERSION: &str = "2025-11-25";

/// Flags for one declared capability family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityFlags {
    /// `resources` only: whether `resources/subscribe` is served.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<bool>,
    /// Whether `notifications/*/list_changed` is ever sent.
    #[serde(default)]
    pub list_changed: bool,
}

impl CapabilityFlags {
    /// Flags for a list-only family (tools, prompts).
    #[must_use]
    pub const fn listing() -> Self {
        Self {
            subscribe: None,
            list_changed: false,
        }
    }

    /// Flags for resources, which also report subscription support.
    #[must_use]
    pub const fn subscribable() -> Self {
        Self {
            subscribe: Some(false),
            list_changed: false,
        }
    }
}

/// The capability families a server declares.
///
/// An absent family is omitted from the wire object entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// `tools/list` and `tools/call`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<CapabilityFlags>,
    /// `resources/list` and `resources/read`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<CapabilityFlags>,
    /// `prompts/list` and `prompts/get`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<CapabilityFlags>,
}

impl ServerCapabilities {
    /// No families declared.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every family this engine can serve.
    #[must_use]
    pub fn all() -> Self {
        Self {
            tools: Some(CapabilityFlags::listing()),
            resources: Some(CapabilityFlags::subscribable()),
            prompts: Some(CapabilityFlags::listing()),
        }
    }

    /// Declare tools.
    #[must_use]
    pub fn with_tools(mut self) -> Self {
        self.tools = Some(CapabilityFlags::listing());
        self
    }

    /// Declare resources.
    #[must_use]
    pub fn with_resources(mut self) -> Self {
        self.resources = Some(CapabilityFlags::subscribable());
        self
    }

    /// Declare prompts.
    #[must_use]
    pub fn with_prompts(mut self) -> Self {
        self.prompts = Some(CapabilityFlags::listing());
        self
    }

    /// Whether tools are declared.
    #[must_use]
    pub const fn has_tools(&self) -> bool {
        self.tools.is_some()
    }

    /// Whether resources are declared.
    #[must_use]
    pub const fn has_resources(&self) -> bool {
        self.resources.is_some()
    }

    /// Whether prompts are declared.
    #[must_use]
    pub const fn has_prompts(&self) -> bool {
        self.prompts.is_some()
    }
}

/// Name, version and optional description reported as `serverInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version string.
    pub version: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ServerInfo {
    /// Identity without a description.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Body of a successful `initialize` response.
///
/// Built from declared flags only; registry contents never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Always [`PROTOCOL_VERSION`] when built with [`InitializeResult::new`].
    pub protocol_version: String,
    /// Declared families.
    pub capabilities: ServerCapabilities,
    /// Server identity.
    pub server_info: ServerInfo,
}

impl InitializeResult {
    /// Result for this server's protocol revision.
    #[must_use]
    pub fn new(server_info: ServerInfo, capabilities: ServerCapabilities) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities,
            server_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_all_capabilities() {
        let caps = ServerCapabilities::all();
        assert!(caps.has_tools());
        assert!(caps.has_resources());
        assert!(caps.has_prompts());
        assert_eq!(
            serde_json::to_value(&caps).unwrap(),
            json!({
                "tools": {"listChanged": false},
                "resources": {"subscribe": false, "listChanged": false},
                "prompts": {"listChanged": false}
            })
        );
    }

    #[test]
    fn test_partial_capabilities() {
        let caps = ServerCapabilities::new().with_tools();
        let json = serde_json::to_value(&caps).unwrap();
        assert!(json.get("resources").is_none());
        assert!(json.get("prompts").is_none());
    }

    #[test]
    fn test_initialize_result() {
        let result = InitializeResult::new(
            ServerInfo::new("demo", "1.0.0").description("A demo"),
            ServerCapabilities::new().with_prompts(),
        );
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "protocolVersion": "2025-11-25",
                "capabilities": {"prompts": {"listChanged": false}},
                "serverInfo": {"name": "demo", "version": "1.0.0", "description": "A demo"}
            })
        );
    }

    #[test]
    fn test_server_info_without_description() {
        let json = serde_json::to_value(ServerInfo::new("s", "0.1.0")).unwrap();
        assert!(json.get("description").is_none());
    }
}
