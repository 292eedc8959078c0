//! Line-delimited serving loop.
//!
//! Reads one JSON-RPC request per line and writes one response per line, in
//! arrival order. Malformed lines get a parse-error response and the loop
//! keeps going; end of input or a listener shutdown ends it.

use crate::server::Server;
use mcpgate_core::error::McpError;
use mcpgate_core::protocol::{Request, Response};
use mcpgate_transport::TransportError;
use mcpgate_transport::stdio::{LineTransport, StdioTransport};
use tokio::io::{AsyncRead, AsyncWrite};

/// Serve over the process's stdin and stdout until end of input.
pub async fn serve_stdio(server: &Server) -> Result<(), TransportError> {
    tracing::info!(server = %server.info().name, "serving on stdio");
    serve_lines(server, StdioTransport::stdio()).await
}

/// Serve over any line transport until end of input or shutdown.
pub async fn serve_lines<R, W>(
    server: &Server,
    mut transport: LineTransport<R, W>,
) -> Result<(), TransportError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let stop = server.shutdown().listener_token();

    loop {
        let line = tokio::select! {
            () = stop.cancelled() => {
                tracing::debug!("line transport stopped by shutdown");
                break;
            }
            line = transport.recv_line() => line,
        };

        let response = match line {
            Ok(Some(line)) => match Request::decode(line.as_bytes()) {
                Ok(request) => server.dispatch(request).await,
                Err(e) => {
                    tracing::warn!(error = %e, "rejecting malformed line");
                    Response::parse_error(&e)
                }
            },
            Ok(None) => {
                tracing::debug!("end of input");
                break;
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!(error = %e, "rejecting unreadable line");
                Response::parse_error(&McpError::from(e))
            }
            Err(e) => return Err(e),
        };

        transport.send_value(&response.encode()).await?;
    }

    transport.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerBuilder;
    use crate::context::CallContext;
    use mcpgate_core::types::Tool;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn server() -> Server {
        ServerBuilder::new("stdio-test", "0.1.0")
            .tool(
                Tool::new("echo").with_string_param("text", "Text to echo", true),
                |ctx: CallContext| async move {
                    let text: String = ctx.require("text")?;
                    Ok(text)
                },
            )
            .build()
    }

    fn output_lines(bytes: Vec<u8>) -> Vec<Value> {
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    async fn run(input: &'static [u8]) -> Vec<Value> {
        let server = server();
        let mut output = Vec::new();
        serve_lines(&server, LineTransport::new(input, &mut output))
            .await
            .unwrap();
        output_lines(output)
    }

    #[tokio::test]
    async fn test_responses_follow_arrival_order() {
        let input = b"{\"jsonrpc\":\"2.0\",\"method\":\"ping\",\"id\":1}\n\n\
{\"jsonrpc\":\"2.0\",\"method\":\"tools/call\",\"id\":2,\"params\":{\"name\":\"echo\",\"arguments\":{\"text\":\"hi\"}}}\n";
        let responses = run(input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"]["status"], "ok");
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"]["content"][0]["text"], "\"hi\"");
    }

    #[tokio::test]
    async fn test_malformed_line_gets_parse_error_and_loop_continues() {
        let input = b"{not json\n{\"jsonrpc\":\"2.0\",\"method\":\"ping\",\"id\":\"after\"}\n";
        let responses = run(input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[1]["id"], "after");
    }

    #[tokio::test]
    async fn test_unreadable_line_is_rejected_without_stopping() {
        let responses = run(b"\xff\xfe\n{\"jsonrpc\":\"2.0\",\"method\":\"ping\",\"id\":2}\n").await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert_eq!(responses[1]["id"], json!(2));
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let server = server();
        let (_client, io) = tokio::io::duplex(1024);
        let (read_half, write_half) = tokio::io::split(io);
        let task = {
            let server = server.clone();
            tokio::spawn(async move {
                serve_lines(&server, LineTransport::new(read_half, write_half)).await
            })
        };

        server.shutdown().shutdown().await;
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
        assert!(server.shutdown().is_shutting_down());
    }
}
