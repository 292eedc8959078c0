//! Capability registries.
//!
//! Three tables map names (tools, prompts) or URIs (resources) to a
//! definition and an async handler. Each table sits behind its own
//! read/write lock; lookups clone the shared handler out, so no lock is
//! held while a handler runs.

pub mod prompts;
pub mod resources;
pub mod tools;

pub use prompts::{PromptHandlerFn, PromptRegistry, RegisteredPrompt};
pub use resources::{RegisteredResource, ResourceHandlerFn, ResourceRegistry};
pub use tools::{RegisteredTool, ToolBuilder, ToolHandlerFn, ToolRegistry};

/// The three capability tables of a server.
#[derive(Default)]
pub struct CapabilityRegistry {
    tools: ToolRegistry,
    resources: ResourceRegistry,
    prompts: PromptRegistry,
}

impl CapabilityRegistry {
    /// Create empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tool table.
    #[must_use]
    pub const fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// The resource table.
    #[must_use]
    pub const fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    /// The prompt table.
    #[must_use]
    pub const fn prompts(&self) -> &PromptRegistry {
        &self.prompts
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("tools", &self.tools.len())
            .field("resources", &self.resources.len())
            .field("prompts", &self.prompts.len())
            .finish()
    }
}
