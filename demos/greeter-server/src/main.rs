//! Greeter MCP server.
//!
//! Serves one tool, one resource and one prompt over either the HTTP
//! adapter (POST, SSE and WebSocket on a single listener) or stdio.
//!
//! # Running
//!
//! ```bash
//! cargo run -p greeter-server
//! MCP_TRANSPORT=stdio cargo run -p greeter-server
//! ```
//!
//! # Testing with curl
//!
//! ```bash
//! curl -X POST http://127.0.0.1:3000/mcp \
//!   -H "Content-Type: application/json" \
//!   -d '{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"greet","arguments":{"name":"World"}}}'
//! ```

use std::time::Duration;

use mcpgate::prelude::*;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn build_server() -> Server {
    ServerBuilder::new("greeter-server", env!("CARGO_PKG_VERSION"))
        .description("Says hello")
        .session_config(SessionConfig::default().with_timeout(Duration::from_secs(15 * 60)))
        .tool(
            Tool::new("greet")
                .description("Greet someone by name")
                .with_string_param("name", "Who to greet", true),
            |ctx: CallContext| async move {
                let name: String = ctx.require("name")?;
                Ok(format!("Hello, {name}!"))
            },
        )
        .tool(
            Tool::new("add")
                .description("Add two numbers")
                .with_number_param("a", "First operand", true)
                .with_number_param("b", "Second operand", true),
            |ctx: CallContext| async move {
                let a: f64 = ctx.require("a")?;
                let b: f64 = ctx.require("b")?;
                Ok(ToolOutput::value(json!({ "sum": a + b })))
            },
        )
        .resource(
            Resource::new("greeter://about", "about")
                .description("What this server is")
                .mime_type("application/json"),
            |uri| async move {
                Ok(ResourceContents::json(
                    uri,
                    &json!({ "name": "greeter-server", "tools": ["greet", "add"] }),
                )?)
            },
        )
        .prompt(
            Prompt::new("welcome")
                .description("Write a welcome message")
                .required_arg("name", "Who is arriving"),
            |args| async move {
                let name = args
                    .get("name")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| McpError::missing_argument("name"))?;
                Ok(format!("Write a short, warm welcome message for {name}."))
            },
        )
        .build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays clean for the stdio transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("greeter_server=info,mcpgate_axum=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let server = build_server();

    match std::env::var("MCP_TRANSPORT").as_deref() {
        Ok("stdio") => {
            info!("Starting stdio MCP server");
            serve_stdio(&server).await?;
        }
        _ => {
            // Use MCP_BIND_ADDR for containerized deployments (default: 127.0.0.1:3000)
            let addr =
                std::env::var("MCP_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
            info!(addr = %addr, "Starting HTTP MCP server");
            McpRouter::new(server).with_tracing().serve(addr).await?;
        }
    }

    Ok(())
}
