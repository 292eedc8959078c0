//! Request routing.
//!
//! The [`Dispatcher`] maps a decoded [`Request`] onto exactly one
//! [`Response`]. It never fails: lookup misses, bad parameters, handler
//! errors and handler panics all become JSON-RPC error responses.
//!
//! # Method Categories
//!
//! - **Lifecycle**: `initialize`, `ping`
//! - **Tools**: `tools/list`, `tools/call`
//! - **Resources**: `resources/list`, `resources/read`
//! - **Prompts**: `prompts/list`, `prompts/get`

use crate::capability::CapabilityRegistry;
use crate::context::CallContext;
use futures::FutureExt;
use mcpgate_core::capability::{InitializeResult, ServerCapabilities, ServerInfo};
use mcpgate_core::error::{JsonRpcError, McpError};
use mcpgate_core::protocol::{Request, Response};
use mcpgate_core::types::{Arguments, GetPromptResult, ReadResourceResult};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Method names understood by the dispatcher.
pub mod methods {
    /// Initialize the connection and report capabilities.
    pub const INITIALIZE: &str = "initialize";
    /// Liveness check.
    pub const PING: &str = "ping";

    /// List available tools.
    pub const TOOLS_LIST: &str = "tools/list";
    /// Call a specific tool with arguments.
    pub const TOOLS_CALL: &str = "tools/call";

    /// List available resources.
    pub const RESOURCES_LIST: &str = "resources/list";
    /// Read the contents of a resource.
    pub const RESOURCES_READ: &str = "resources/read";

    /// List available prompts.
    pub const PROMPTS_LIST: &str = "prompts/list";
    /// Get a specific prompt with arguments.
    pub const PROMPTS_GET: &str = "prompts/get";
}

/// Routes requests to capability handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    info: ServerInfo,
    capabilities: ServerCapabilities,
    registry: Arc<CapabilityRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher over a set of capability tables.
    #[must_use]
    pub const fn new(
        info: ServerInfo,
        capabilities: ServerCapabilities,
        registry: Arc<CapabilityRegistry>,
    ) -> Self {
        Self {
            info,
            capabilities,
            registry,
        }
    }

    /// Dispatch one request and produce its response.
    ///
    /// Notifications are answered too, with a `null` id.
    pub async fn dispatch(&self, request: Request) -> Response {
        let id = request.id.clone();
        let method = request.method.clone();
        tracing::debug!(method = %method, id = ?id, "dispatching request");

        match AssertUnwindSafe(self.route(request)).catch_unwind().await {
            Ok(Ok(result)) => Response::success(id, result),
            Ok(Err(err)) => {
                tracing::warn!(method = %method, code = err.code(), error = %err, "request failed");
                Response::error(id, JsonRpcError::from(&err))
            }
            Err(panic) => {
                let err = McpError::internal(panic_message(panic.as_ref()));
                tracing::error!(method = %method, error = %err, "request routing panicked");
                Response::error(id, JsonRpcError::from(&err))
            }
        }
    }

    async fn route(&self, request: Request) -> Result<Value, McpError> {
        match request.method.as_str() {
            methods::INITIALIZE => to_value(&InitializeResult::new(
                self.info.clone(),
                self.capabilities.clone(),
            )),
            methods::PING => Ok(json!({
                "status": "ok",
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
            methods::TOOLS_LIST => Ok(json!({ "tools": self.registry.tools().list() })),
            methods::TOOLS_CALL => self.call_tool(request).await,
            methods::RESOURCES_LIST => {
                Ok(json!({ "resources": self.registry.resources().list() }))
            }
            methods::RESOURCES_READ => self.read_resource(&request).await,
            methods::PROMPTS_LIST => Ok(json!({ "prompts": self.registry.prompts().list() })),
            methods::PROMPTS_GET => self.get_prompt(&request).await,
            other => Err(McpError::method_not_found(other)),
        }
    }

    async fn call_tool(&self, request: Request) -> Result<Value, McpError> {
        let name = string_param(&request, "name")
            .ok_or_else(|| McpError::invalid_params(methods::TOOLS_CALL, "Missing tool name"))?;
        let arguments = Arguments::new(object_param(&request, methods::TOOLS_CALL, "arguments")?);
        let tool = self
            .registry
            .tools()
            .get(name)
            .ok_or_else(|| McpError::tool_not_found(name))?;

        let ctx = CallContext::new(
            name,
            arguments,
            request.id.clone(),
            request.shared_headers(),
        );
        let output = guarded(async move { (tool.handler)(ctx).await })
            .await
            .map_err(|e| wrap_handler_error("Tool execution error", e))?;
        to_value(&output.into_call_result())
    }

    async fn read_resource(&self, request: &Request) -> Result<Value, McpError> {
        let uri = string_param(request, "uri")
            .ok_or_else(|| McpError::invalid_params(methods::RESOURCES_READ, "Missing resource uri"))?;
        let resource = self
            .registry
            .resources()
            .get(uri)
            .ok_or_else(|| McpError::resource_not_found(uri))?;

        let contents = guarded(async { (resource.handler)(uri.to_string()).await })
            .await
            .map_err(|e| wrap_handler_error("Resource read error", e))?;
        to_value(&ReadResourceResult {
            contents: vec![contents],
        })
    }

    async fn get_prompt(&self, request: &Request) -> Result<Value, McpError> {
        let name = string_param(request, "name")
            .ok_or_else(|| McpError::invalid_params(methods::PROMPTS_GET, "Missing prompt name"))?;
        let arguments = object_param(request, methods::PROMPTS_GET, "arguments")?;
        let prompt = self
            .registry
            .prompts()
            .get(name)
            .ok_or_else(|| McpError::prompt_not_found(name))?;

        let text = guarded(async { (prompt.handler)(arguments).await })
            .await
            .map_err(|e| wrap_handler_error("Prompt execution error", e))?;
        to_value(&GetPromptResult::rendered(prompt.prompt.description, text))
    }
}

fn string_param<'a>(request: &'a Request, key: &str) -> Option<&'a str> {
    request.param(key).and_then(Value::as_str)
}

/// An absent or `null` object parameter defaults to an empty map.
fn object_param(request: &Request, method: &str, key: &str) -> Result<Map<String, Value>, McpError> {
    match request.param(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(McpError::invalid_params(
            method,
            format!("'{key}' must be an object"),
        )),
    }
}

/// Await a handler future, turning a panic into a handler error.
async fn guarded<T, F>(fut: F) -> Result<T, McpError>
where
    F: std::future::Future<Output = Result<T, McpError>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(McpError::handler(format!(
            "handler panicked: {}",
            panic_message(panic.as_ref())
        ))),
    }
}

fn wrap_handler_error(prefix: &str, err: McpError) -> McpError {
    McpError::handler_with_source(format!("{prefix}: {err}"), err)
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, McpError> {
    serde_json::to_value(value)
        .map_err(|e| McpError::internal_with_source("Failed to encode result", e))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpgate_core::error::codes;
    use mcpgate_core::protocol::RequestId;
    use mcpgate_core::types::{Content, Prompt, Resource, ResourceContents, Tool, ToolOutput};
    use pretty_assertions::assert_eq;

    fn dispatcher() -> Dispatcher {
        let registry = CapabilityRegistry::new();
        registry.tools().register(
            Tool::new("greet").with_string_param("name", "Who to greet", true),
            |ctx: CallContext| async move {
                let name: String = ctx.require("name")?;
                Ok(format!("Hello, {name}!"))
            },
        );
        registry.tools().register(Tool::new("fail"), |_ctx| async {
            Err::<ToolOutput, _>(McpError::handler("database unavailable"))
        });
        registry.tools().register(Tool::new("panic"), |_ctx| async {
            if true {
                panic!("kaboom");
            }
            Ok("unreachable")
        });
        registry.tools().register(Tool::new("whoami"), |ctx: CallContext| async move {
            Ok(ctx.header("x-request-id").unwrap_or("none").to_string())
        });
        registry.resources().register(
            Resource::new("mem://notes", "Notes").mime_type("text/plain"),
            |uri| async move { Ok(ResourceContents::text(uri, "remember the milk")) },
        );
        registry.prompts().register(
            Prompt::new("hello")
                .description("Say hello")
                .required_arg("name", "Who"),
            |args: Map<String, Value>| async move {
                match args.get("name").and_then(Value::as_str) {
                    Some(name) => Ok(format!("Hello {name}")),
                    None => Err(McpError::missing_argument("name")),
                }
            },
        );

        Dispatcher::new(
            ServerInfo::new("test", "1.0.0"),
            ServerCapabilities::all(),
            Arc::new(registry),
        )
    }

    fn request(method: &str, id: &str, params: Value) -> Request {
        Request::new(method, id).params(params)
    }

    #[tokio::test]
    async fn test_tool_call_success() {
        let response = dispatcher()
            .dispatch(request(
                "tools/call",
                "1",
                json!({"name": "greet", "arguments": {"name": "World"}}),
            ))
            .await;

        assert_eq!(response.id, Some(RequestId::String("1".to_string())));
        assert!(response.error.is_none());
        let result = response.result.unwrap();
        let text = result["content"][0]["text"].as_str().unwrap();
        let decoded: String = serde_json::from_str(text).unwrap();
        assert_eq!(decoded, "Hello, World!");
        assert_eq!(result["content"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_tool_call_errors() {
        let d = dispatcher();

        let missing = d
            .dispatch(request("tools/call", "2", json!({"arguments": {}})))
            .await;
        assert_eq!(missing.error.unwrap().code, codes::INVALID_PARAMS);

        let unknown = d
            .dispatch(request("tools/call", "4", json!({"name": "nonexistent", "arguments": {}})))
            .await;
        let err = unknown.error.unwrap();
        assert_eq!(err.code, codes::METHOD_NOT_FOUND);
        assert!(err.message.contains("Tool not found"));

        let bad_args = d
            .dispatch(request("tools/call", "5", json!({"name": "greet", "arguments": [1]})))
            .await;
        assert_eq!(bad_args.error.unwrap().code, codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_handler_failures_are_internal_errors() {
        let d = dispatcher();

        for (tool, needle) in [
            ("fail", "database unavailable"),
            ("panic", "kaboom"),
            ("greet", "Missing required argument: name"),
        ] {
            let response = d
                .dispatch(request("tools/call", "3", json!({"name": tool})))
                .await;
            let err = response.error.unwrap();
            assert_eq!(err.code, codes::INTERNAL_ERROR, "tool {tool}");
            assert!(err.message.contains("Tool execution error"), "{}", err.message);
            assert!(err.message.contains(needle), "{}", err.message);
        }
    }

    #[tokio::test]
    async fn test_headers_reach_handler() {
        let req = request("tools/call", "6", json!({"name": "whoami"}))
            .with_headers([("x-request-id", "req-42")]);
        let response = dispatcher().dispatch(req).await;
        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["text"], "\"req-42\"");
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = dispatcher()
            .dispatch(request("initialize", "0", json!({})))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-11-25");
        assert_eq!(result["serverInfo"]["name"], "test");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert_eq!(result["capabilities"]["resources"]["subscribe"], false);
    }

    #[tokio::test]
    async fn test_ping() {
        let response = dispatcher().dispatch(Request::new("ping", 7i64)).await;
        let result = response.result.unwrap();
        assert_eq!(result["status"], "ok");
        let timestamp = result["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_lists_keep_registration_order() {
        let d = dispatcher();
        let tools = d.dispatch(Request::new("tools/list", 1i64)).await.result.unwrap();
        let names: Vec<&str> = tools["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["greet", "fail", "panic", "whoami"]);
        assert_eq!(tools["tools"][3]["inputSchema"]["type"], "object");

        let resources = d.dispatch(Request::new("resources/list", 2i64)).await.result.unwrap();
        assert_eq!(resources["resources"][0]["uri"], "mem://notes");

        let prompts = d.dispatch(Request::new("prompts/list", 3i64)).await.result.unwrap();
        assert_eq!(prompts["prompts"][0]["arguments"][0]["required"], true);
    }

    #[tokio::test]
    async fn test_resource_read() {
        let d = dispatcher();
        let response = d
            .dispatch(request("resources/read", "r", json!({"uri": "mem://notes"})))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["contents"][0]["text"], "remember the milk");

        let missing = d.dispatch(request("resources/read", "r", json!({}))).await;
        assert_eq!(missing.error.unwrap().code, codes::INVALID_PARAMS);

        let unknown = d
            .dispatch(request("resources/read", "r", json!({"uri": "mem://other"})))
            .await;
        assert_eq!(unknown.error.unwrap().code, codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_prompt_get() {
        let d = dispatcher();
        let response = d
            .dispatch(request("prompts/get", "p", json!({"name": "hello", "arguments": {"name": "Bob"}})))
            .await;
        let result: GetPromptResult = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(result.description.as_deref(), Some("Say hello"));
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].content, Content::text("Hello Bob"));

        let failed = d.dispatch(request("prompts/get", "p", json!({"name": "hello"}))).await;
        let err = failed.error.unwrap();
        assert_eq!(err.code, codes::INTERNAL_ERROR);
        assert!(err.message.contains("Prompt execution error"));

        let missing = d.dispatch(request("prompts/get", "p", json!({}))).await;
        assert_eq!(missing.error.unwrap().code, codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = dispatcher().dispatch(Request::new("tasks/list", 9i64)).await;
        let err = response.error.unwrap();
        assert_eq!(err.code, codes::METHOD_NOT_FOUND);
        assert!(err.message.contains("tasks/list"));
    }

    #[tokio::test]
    async fn test_notification_is_answered_with_null_id() {
        let response = dispatcher().dispatch(Request::notification("ping")).await;
        assert_eq!(response.id, None);
        assert!(response.is_success());
    }
}
