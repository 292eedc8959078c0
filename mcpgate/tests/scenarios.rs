//! End-to-end scenarios through the public facade.

use axum::body::Body;
use axum::http::{Request as HttpRequest, StatusCode, header};
use http_body_util::BodyExt;
use mcpgate::prelude::*;
use mcpgate::transport::SESSION_ID_HEADER;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn greeter() -> Server {
    ServerBuilder::new("scenarios", "1.0.0")
        .tool(
            Tool::new("greet").with_string_param("name", "Who to greet", true),
            |ctx: CallContext| async move {
                let name: String = ctx.require("name")?;
                Ok(format!("Hello, {name}!"))
            },
        )
        .tool(Tool::new("slow_whoami"), |ctx: CallContext| async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(ctx.header("x-request-id").unwrap_or("none").to_string())
        })
        .build()
}

fn call(id: &str, name: &str, arguments: Value) -> Request {
    Request::new("tools/call", id).params(json!({ "name": name, "arguments": arguments }))
}

#[tokio::test]
async fn scenario_a_greet_world() -> TestResult {
    let response = greeter()
        .dispatch(call("1", "greet", json!({"name": "World"})))
        .await;

    assert_eq!(response.id, Some(RequestId::String("1".to_string())));
    assert!(response.error.is_none());
    let result = response.into_result().map_err(|e| format!("{e:?}"))?;
    let content = result["content"].as_array().ok_or("content array")?;
    assert_eq!(content.len(), 1);
    let decoded: String = serde_json::from_str(content[0]["text"].as_str().ok_or("text")?)?;
    assert_eq!(decoded, "Hello, World!");
    Ok(())
}

#[tokio::test]
async fn scenario_b_unknown_tool() -> TestResult {
    let response = greeter()
        .dispatch(call("4", "nonexistent", json!({})))
        .await;

    let error = response.error.ok_or("expected error")?;
    assert_eq!(error.code, -32601);
    assert!(error.message.contains("Tool not found"));
    Ok(())
}

#[tokio::test]
async fn scenario_c_sse_requires_event_stream_accept() -> TestResult {
    let response = McpRouter::new(greeter())
        .into_router()
        .oneshot(HttpRequest::builder().uri("/sse").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "POST");
    Ok(())
}

#[tokio::test]
async fn scenario_d_sessions_do_not_share_headers() -> TestResult {
    let app = McpRouter::new(greeter()).into_router();

    let mut sessions = Vec::new();
    for request_id in ["req-a", "req-b"] {
        let init = json!({"jsonrpc": "2.0", "id": 0, "method": "initialize"});
        let response = app
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header("x-request-id", request_id)
                    .body(Body::from(init.to_string()))?,
            )
            .await?;
        let session = response
            .headers()
            .get(SESSION_ID_HEADER)
            .ok_or("missing session")?
            .to_str()?
            .to_string();
        sessions.push((session, request_id));
    }

    let calls = sessions.iter().map(|(session, expected)| {
        let app = app.clone();
        let session = session.clone();
        let expected = *expected;
        async move {
            let body = json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "slow_whoami"}
            });
            let response = app
                .oneshot(
                    HttpRequest::builder()
                        .method("POST")
                        .uri("/mcp")
                        .header(SESSION_ID_HEADER, session)
                        .body(Body::from(body.to_string()))?,
                )
                .await?;
            let bytes = response.into_body().collect().await?.to_bytes();
            let json: Value = serde_json::from_slice(&bytes)?;
            let text: String =
                serde_json::from_str(json["result"]["content"][0]["text"].as_str().ok_or("text")?)?;
            Ok::<_, Box<dyn std::error::Error>>((expected, text))
        }
    });

    for outcome in futures::future::join_all(calls).await {
        let (expected, seen) = outcome?;
        assert_eq!(seen, expected);
    }
    Ok(())
}
