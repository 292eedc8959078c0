//! Resource registry, keyed by exact URI.

use futures::future::BoxFuture;
use indexmap::IndexMap;
use mcpgate_core::error::McpError;
use mcpgate_core::types::resource::{Resource, ResourceContents};
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;

/// A shared async resource reader. Receives the requested URI.
pub type ResourceHandlerFn =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<ResourceContents, McpError>> + Send + Sync>;

/// A registered resource with metadata and handler.
#[derive(Clone)]
pub struct RegisteredResource {
    /// Resource metadata.
    pub resource: Resource,
    /// Handler function.
    pub handler: ResourceHandlerFn,
}

impl std::fmt::Debug for RegisteredResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredResource")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

/// Registry of readable resources.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: RwLock<IndexMap<String, RegisteredResource>>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource with a reader.
    pub fn register<F, Fut>(&self, resource: Resource, handler: F)
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResourceContents, McpError>> + Send + 'static,
    {
        let handler: ResourceHandlerFn = Arc::new(move |uri| Box::pin(handler(uri)));
        let uri = resource.uri.clone();
        tracing::debug!(uri = %uri, "registering resource");
        self.resources
            .write()
            .insert(uri, RegisteredResource { resource, handler });
    }

    /// Look up a resource by URI.
    #[must_use]
    pub fn get(&self, uri: &str) -> Option<RegisteredResource> {
        self.resources.read().get(uri).cloned()
    }

    /// Snapshot of all resource definitions, in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<Resource> {
        self.resources
            .read()
            .values()
            .map(|r| r.resource.clone())
            .collect()
    }

    /// URIs of all resources, in registration order.
    #[must_use]
    pub fn uris(&self) -> Vec<String> {
        self.resources.read().keys().cloned().collect()
    }

    /// Get the number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    /// Check if the registry has no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_read() {
        let registry = ResourceRegistry::new();
        registry.register(
            Resource::new("config://app", "App config").mime_type("text/plain"),
            |uri| async move { Ok(ResourceContents::text(uri, "debug=true")) },
        );

        let entry = registry.get("config://app").unwrap();
        let contents = (entry.handler)("config://app".to_string()).await.unwrap();
        assert_eq!(contents.uri, "config://app");
        assert_eq!(contents.as_text(), Some("debug=true"));
        assert!(registry.get("config://other").is_none());
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let registry = ResourceRegistry::new();
        let read = |uri: String| async move { Ok::<_, McpError>(ResourceContents::text(uri, "")) };
        registry.register(Resource::new("a://1", "one"), read);
        registry.register(Resource::new("a://2", "two"), read);
        registry.register(Resource::new("a://1", "uno"), read);

        assert_eq!(registry.uris(), vec!["a://1".to_string(), "a://2".to_string()]);
        assert_eq!(registry.list()[0].name, "uno");
    }
}
