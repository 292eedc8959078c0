//! Shared fixtures for the axum integration tests.

#![allow(dead_code)]

use mcpgate_core::types::{Prompt, Resource, ResourceContents, Tool};
use mcpgate_server::{CallContext, Server, ServerBuilder};

/// A server with one of each capability plus a header-echo tool.
pub fn test_server() -> Server {
    ServerBuilder::new("axum-test", "1.0.0")
        .description("Integration test server")
        .tool(
            Tool::new("greet").with_string_param("name", "Who to greet", true),
            |ctx: CallContext| async move {
                let name: String = ctx.require("name")?;
                Ok(format!("Hello, {name}!"))
            },
        )
        .tool(Tool::new("whoami"), |ctx: CallContext| async move {
            Ok(ctx
                .header("authorization")
                .unwrap_or("anonymous")
                .to_string())
        })
        .resource(Resource::new("mem://motd", "motd"), |uri| async move {
            Ok(ResourceContents::text(uri, "hello"))
        })
        .prompt(Prompt::new("summary"), |_args| async { Ok("Summarize this") })
        .build()
}

/// Decode the JSON text block a tool call returns.
pub fn tool_text(response: &serde_json::Value) -> String {
    let text = response["result"]["content"][0]["text"]
        .as_str()
        .expect("text block");
    serde_json::from_str(text).expect("json-encoded text")
}
