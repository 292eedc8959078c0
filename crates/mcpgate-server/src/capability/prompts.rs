//! Prompt registry.

use futures::future::BoxFuture;
use indexmap::IndexMap;
use mcpgate_core::error::McpError;
use mcpgate_core::types::prompt::Prompt;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;

/// A shared async prompt renderer.
pub type PromptHandlerFn = Arc<
    dyn Fn(Map<String, Value>) -> BoxFuture<'static, Result<String, McpError>> + Send + Sync,
>;

/// A registered prompt with metadata and handler.
#[derive(Clone)]
pub struct RegisteredPrompt {
    /// Prompt metadata.
    pub prompt: Prompt,
    /// Handler function.
    pub handler: PromptHandlerFn,
}

impl std::fmt::Debug for RegisteredPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredPrompt")
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

/// Registry of prompt templates.
#[derive(Default)]
pub struct PromptRegistry {
    prompts: RwLock<IndexMap<String, RegisteredPrompt>>,
}

impl PromptRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prompt with a renderer.
    pub fn register<F, Fut, T>(&self, prompt: Prompt, handler: F)
    where
        F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, McpError>> + Send + 'static,
        T: Into<String> + Send + 'static,
    {
        let handler: PromptHandlerFn = Arc::new(move |args| {
            let fut = handler(args);
            Box::pin(async move { fut.await.map(Into::into) })
        });
        let name = prompt.name.clone();
        tracing::debug!(prompt = %name, "registering prompt");
        self.prompts
            .write()
            .insert(name, RegisteredPrompt { prompt, handler });
    }

    /// Look up a prompt by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<RegisteredPrompt> {
        self.prompts.read().get(name).cloned()
    }

    /// Snapshot of all prompt definitions, in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<Prompt> {
        self.prompts
            .read()
            .values()
            .map(|r| r.prompt.clone())
            .collect()
    }

    /// Names of all prompts, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.prompts.read().keys().cloned().collect()
    }

    /// Get the number of registered prompts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prompts.read().len()
    }

    /// Check if the registry has no prompts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prompts.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_render() {
        let registry = PromptRegistry::new();
        registry.register(
            Prompt::new("greeting").required_arg("name", "Who to greet"),
            |args: Map<String, Value>| async move {
                let name = args.get("name").and_then(Value::as_str).unwrap_or("friend");
                Ok(format!("Say hello to {name}"))
            },
        );

        let entry = registry.get("greeting").unwrap();
        let Value::Object(args) = json!({"name": "Ada"}) else {
            unreachable!()
        };
        let text = (entry.handler)(args).await.unwrap();
        assert_eq!(text, "Say hello to Ada");
        assert_eq!(registry.names(), vec!["greeting".to_string()]);
    }
}
