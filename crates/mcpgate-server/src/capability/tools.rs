//! Tool registry.
//!
//! Tools are keyed by name and listed in registration order. Registering an
//! existing name replaces the definition and handler in place.

use crate::context::CallContext;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use mcpgate_core::error::McpError;
use mcpgate_core::types::tool::{Tool, ToolAnnotations, ToolOutput};
use parking_lot::RwLock;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// A shared async tool handler.
pub type ToolHandlerFn =
    Arc<dyn Fn(CallContext) -> BoxFuture<'static, Result<ToolOutput, McpError>> + Send + Sync>;

/// A registered tool with metadata and handler.
#[derive(Clone)]
pub struct RegisteredTool {
    /// Tool metadata.
    pub tool: Tool,
    /// Handler function.
    pub handler: ToolHandlerFn,
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("tool", &self.tool)
            .finish_non_exhaustive()
    }
}

/// Registry of callable tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<IndexMap<String, RegisteredTool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with a handler.
    ///
    /// The handler may return anything convertible into a [`ToolOutput`]:
    /// content blocks pass through, plain values are JSON-encoded.
    pub fn register<F, Fut, T>(&self, tool: Tool, handler: F)
    where
        F: Fn(CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, McpError>> + Send + 'static,
        T: Into<ToolOutput> + Send + 'static,
    {
        let handler: ToolHandlerFn = Arc::new(move |ctx| {
            let fut = handler(ctx);
            Box::pin(async move { fut.await.map(Into::into) })
        });
        self.register_arc(tool, handler);
    }

    /// Register a tool with an already shared handler.
    pub fn register_arc(&self, tool: Tool, handler: ToolHandlerFn) {
        let name = tool.name.clone();
        tracing::debug!(tool = %name, "registering tool");
        self.tools
            .write()
            .insert(name, RegisteredTool { tool, handler });
    }

    /// Look up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<RegisteredTool> {
        self.tools.read().get(name).cloned()
    }

    /// Check if a tool exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.read().contains_key(name)
    }

    /// Snapshot of all tool definitions, in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<Tool> {
        self.tools.read().values().map(|r| r.tool.clone()).collect()
    }

    /// Names of all tools, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.tools.read().keys().cloned().collect()
    }

    /// Get the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.read().len()
    }

    /// Check if the registry has no tools.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.read().is_empty()
    }
}

/// Builder for creating tools with a fluent API.
pub struct ToolBuilder {
    name: String,
    description: Option<String>,
    input_schema: Value,
    title: Option<String>,
    destructive: Option<bool>,
    idempotent: Option<bool>,
    read_only: Option<bool>,
    open_world: Option<bool>,
}

impl ToolBuilder {
    /// Create a new tool builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: Value::Null,
            title: None,
            destructive: None,
            idempotent: None,
            read_only: None,
            open_world: None,
        }
    }

    /// Set the tool description.
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Set the input schema.
    #[must_use]
    pub fn input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    /// Set a display title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Mark this tool as destructive.
    #[must_use]
    pub fn destructive(mut self, value: bool) -> Self {
        self.destructive = Some(value);
        self
    }

    /// Mark this tool as idempotent.
    #[must_use]
    pub fn idempotent(mut self, value: bool) -> Self {
        self.idempotent = Some(value);
        self
    }

    /// Mark this tool as read-only.
    #[must_use]
    pub fn read_only(mut self, value: bool) -> Self {
        self.read_only = Some(value);
        self
    }

    /// Mark this tool as reaching outside the server.
    #[must_use]
    pub fn open_world(mut self, value: bool) -> Self {
        self.open_world = Some(value);
        self
    }

    /// Build the tool.
    #[must_use]
    pub fn build(self) -> Tool {
        let has_annotations = self.title.is_some()
            || self.destructive.is_some()
            || self.idempotent.is_some()
            || self.read_only.is_some()
            || self.open_world.is_some();

        let mut tool = Tool::new(self.name).input_schema(self.input_schema);
        tool.description = self.description;
        if has_annotations {
            tool.annotations = Some(ToolAnnotations {
                title: self.title,
                read_only_hint: self.read_only,
                destructive_hint: self.destructive,
                idempotent_hint: self.idempotent,
                open_world_hint: self.open_world,
            });
        }
        tool
    }
}
