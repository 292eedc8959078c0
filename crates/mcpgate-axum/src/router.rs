//! Router builder for MCP endpoints.

use crate::auth::{enforce_origin, require_bearer_token};
use crate::handler::{handle_mcp_delete, handle_mcp_post};
use crate::sse::handle_sse;
use crate::state::McpState;
use crate::status::{handle_health, handle_not_found, handle_status};
use crate::websocket::handle_ws;
use axum::Router;
use axum::middleware;
use axum::routing::get;
use mcpgate_server::Server;
use std::future::Future;
use std::sync::Arc;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Builder for MCP Axum routers.
///
/// # Routes
///
/// | Route | Purpose |
/// |-------|---------|
/// | `POST /mcp` | One JSON-RPC request, one response |
/// | `DELETE /mcp` | End a session |
/// | `GET /mcp`, `GET /sse` | SSE stream |
/// | `GET /ws` | WebSocket |
/// | `GET /health`, `GET /status` | Reports |
///
/// # Example
///
/// ```rust,no_run
/// use mcpgate_axum::McpRouter;
/// use mcpgate_server::ServerBuilder;
///
/// # async fn example() -> std::io::Result<()> {
/// let server = ServerBuilder::new("my-server", "1.0.0").build();
///
/// McpRouter::new(server)
///     .with_tracing()
///     .with_token_validator(|token| token == "let-me-in")
///     .serve("127.0.0.1:3000")
///     .await
/// # }
/// ```
pub struct McpRouter {
    state: McpState,
    enable_tracing: bool,
}

impl McpRouter {
    /// Create a router over a server.
    #[must_use]
    pub const fn new(server: Server) -> Self {
        Self {
            state: McpState::new(server),
            enable_tracing: false,
        }
    }

    /// Enable request tracing.
    #[must_use]
    pub fn with_tracing(mut self) -> Self {
        self.enable_tracing = true;
        self
    }

    /// Require a bearer token on `/mcp`, `/sse` and `/ws`.
    #[must_use]
    pub fn with_token_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.state.token_validator = Some(Arc::new(validator));
        self
    }

    /// Refuse requests whose `Origin` header the predicate rejects.
    #[must_use]
    pub fn with_origin_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.state.origin_validator = Some(Arc::new(validator));
        self
    }

    /// The underlying server.
    #[must_use]
    pub const fn server(&self) -> &Server {
        &self.state.server
    }

    /// Build the router.
    #[must_use]
    pub fn into_router(self) -> Router {
        let protected = Router::new()
            .route(
                "/mcp",
                get(handle_sse).post(handle_mcp_post).delete(handle_mcp_delete),
            )
            .route("/sse", get(handle_sse))
            .route_layer(middleware::from_fn_with_state(
                self.state.clone(),
                require_bearer_token,
            ));

        let mut router = Router::new()
            .route("/health", get(handle_health))
            .route("/status", get(handle_status))
            .route("/ws", get(handle_ws))
            .merge(protected)
            .fallback(handle_not_found)
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                enforce_origin,
            ))
            .with_state(self.state);

        if self.enable_tracing {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Bind `addr` and serve until Ctrl-C.
    pub async fn serve(self, addr: impl ToSocketAddrs) -> std::io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        self.serve_with_shutdown(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl-C; serving until stopped");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve on an already-bound listener until `signal` resolves.
    ///
    /// The sweeper runs for the lifetime of the server. When `signal`
    /// resolves, the shutdown coordinator closes every connection and
    /// session and then releases the listener.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let server = self.state.server.clone();
        let coordinator = Arc::clone(server.shutdown());
        let sweeper = server.start_sweeper();

        let trigger = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                signal.await;
                info!("Shutdown signal received");
                coordinator.shutdown().await;
            })
        };
        let listener_closed = {
            let coordinator = Arc::clone(&coordinator);
            async move { coordinator.listener_closed().await }
        };

        info!(
            addr = ?listener.local_addr().ok(),
            server = %server.info().name,
            "Serving MCP over HTTP"
        );
        let result = axum::serve(listener, self.into_router())
            .with_graceful_shutdown(listener_closed)
            .await;

        coordinator.shutdown().await;
        trigger.abort();
        if let Err(e) = sweeper.await {
            warn!(error = %e, "Sweeper task failed");
        }
        info!("Server stopped");
        result
    }
}

impl std::fmt::Debug for McpRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpRouter")
            .field("state", &self.state)
            .field("enable_tracing", &self.enable_tracing)
            .finish()
    }
}
