//! Fluent server construction.
//!
//! # Example
//!
//! ```rust
//! use mcpgate_server::ServerBuilder;
//! use mcpgate_server::context::CallContext;
//! use mcpgate_core::types::Tool;
//!
//! let server = ServerBuilder::new("greeter", "1.0.0")
//!     .description("Says hello")
//!     .tool(
//!         Tool::new("greet").with_string_param("name", "Who to greet", true),
//!         |ctx: CallContext| async move {
//!             let name: String = ctx.require("name")?;
//!             Ok(format!("Hello, {name}!"))
//!         },
//!     )
//!     .build();
//!
//! assert!(server.capabilities().has_tools());
//! assert_eq!(server.tools().len(), 1);
//! ```

use crate::capability::CapabilityRegistry;
use crate::context::CallContext;
use crate::server::Server;
use crate::session::{SessionConfig, SessionManager};
use crate::shutdown::DEFAULT_SHUTDOWN_GRACE;
use mcpgate_core::capability::{ServerCapabilities, ServerInfo};
use mcpgate_core::error::McpError;
use mcpgate_core::types::{Prompt, Resource, ResourceContents, Tool, ToolOutput};
use serde_json::{Map, Value};
use std::future::Future;
use std::time::Duration;

/// Builder for [`Server`].
#[must_use = "builders do nothing until .build() is called"]
pub struct ServerBuilder {
    info: ServerInfo,
    capabilities: ServerCapabilities,
    session_config: SessionConfig,
    shutdown_grace: Duration,
    registry: CapabilityRegistry,
}

impl ServerBuilder {
    /// Start building a server. Tools, resources and prompts are declared
    /// by default.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: ServerInfo::new(name, version),
            capabilities: ServerCapabilities::all(),
            session_config: SessionConfig::default(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            registry: CapabilityRegistry::new(),
        }
    }

    /// Set the server description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.info = self.info.description(description);
        self
    }

    /// Replace the declared capability flags.
    pub fn capabilities(mut self, capabilities: ServerCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set session lifetime configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Set how long each connection gets to close during shutdown.
    pub const fn shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Register a tool.
    pub fn tool<F, Fut, T>(self, tool: Tool, handler: F) -> Self
    where
        F: Fn(CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, McpError>> + Send + 'static,
        T: Into<ToolOutput> + Send + 'static,
    {
        self.registry.tools().register(tool, handler);
        self
    }

    /// Register a resource.
    pub fn resource<F, Fut>(self, resource: Resource, handler: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResourceContents, McpError>> + Send + 'static,
    {
        self.registry.resources().register(resource, handler);
        self
    }

    /// Register a prompt.
    pub fn prompt<F, Fut, T>(self, prompt: Prompt, handler: F) -> Self
    where
        F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, McpError>> + Send + 'static,
        T: Into<String> + Send + 'static,
    {
        self.registry.prompts().register(prompt, handler);
        self
    }

    /// Build the server.
    pub fn build(self) -> Server {
        Server::new(
            self.info,
            self.capabilities,
            self.registry,
            SessionManager::new(self.session_config),
            self.shutdown_grace,
        )
    }
}
