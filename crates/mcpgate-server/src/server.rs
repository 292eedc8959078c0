//! The assembled server.

use crate::capability::{CapabilityRegistry, PromptRegistry, ResourceRegistry, ToolRegistry};
use crate::connection::ConnectionRegistry;
use crate::health::{CapabilityNames, HealthReport, StatusReport};
use crate::router::Dispatcher;
use crate::session::SessionManager;
use crate::shutdown::ShutdownCoordinator;
use crate::sweeper::spawn_sweeper;
use mcpgate_core::capability::{ServerCapabilities, ServerInfo};
use mcpgate_core::protocol::{Request, Response};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// A configured server: capability tables plus shared runtime state.
///
/// Cloning is cheap; every clone shares the same registries, sessions and
/// connections. Build one with [`crate::ServerBuilder`].
#[derive(Debug, Clone)]
pub struct Server {
    info: Arc<ServerInfo>,
    capabilities: Arc<ServerCapabilities>,
    registry: Arc<CapabilityRegistry>,
    dispatcher: Arc<Dispatcher>,
    sessions: Arc<SessionManager>,
    connections: Arc<ConnectionRegistry>,
    shutdown: Arc<ShutdownCoordinator>,
    started_at: Instant,
}

impl Server {
    pub(crate) fn new(
        info: ServerInfo,
        capabilities: ServerCapabilities,
        registry: CapabilityRegistry,
        sessions: SessionManager,
        shutdown_grace: Duration,
    ) -> Self {
        let registry = Arc::new(registry);
        let sessions = Arc::new(sessions);
        let connections = Arc::new(ConnectionRegistry::new());
        let dispatcher = Dispatcher::new(info.clone(), capabilities.clone(), Arc::clone(&registry));
        let shutdown = ShutdownCoordinator::new(
            Arc::clone(&sessions),
            Arc::clone(&connections),
            shutdown_grace,
        );

        Self {
            info: Arc::new(info),
            capabilities: Arc::new(capabilities),
            registry,
            dispatcher: Arc::new(dispatcher),
            sessions,
            connections,
            shutdown: Arc::new(shutdown),
            started_at: Instant::now(),
        }
    }

    /// Server identity.
    #[must_use]
    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Declared capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }

    /// All capability tables.
    #[must_use]
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// The tool table. Registering here after start is allowed.
    #[must_use]
    pub fn tools(&self) -> &ToolRegistry {
        self.registry.tools()
    }

    /// The resource table.
    #[must_use]
    pub fn resources(&self) -> &ResourceRegistry {
        self.registry.resources()
    }

    /// The prompt table.
    #[must_use]
    pub fn prompts(&self) -> &PromptRegistry {
        self.registry.prompts()
    }

    /// The request dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The session table.
    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// The live connection registry.
    #[must_use]
    pub fn connections(&self) -> &Arc<ConnectionRegistry> {
        &self.connections
    }

    /// The shutdown coordinator.
    #[must_use]
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Time since the server was built.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Dispatch one request.
    pub async fn dispatch(&self, request: Request) -> Response {
        self.dispatcher.dispatch(request).await
    }

    /// Start the periodic sweeper. It stops when shutdown begins.
    pub fn start_sweeper(&self) -> JoinHandle<()> {
        spawn_sweeper(
            Arc::clone(&self.sessions),
            Arc::clone(&self.connections),
            self.sessions.config().sweep_interval,
            self.shutdown.sweeper_token(),
        )
    }

    /// Current liveness report.
    #[must_use]
    pub fn health_report(&self) -> HealthReport {
        HealthReport::ok(self.sessions.len(), self.connections.len())
    }

    /// Current identity and load report.
    #[must_use]
    pub fn status_report(&self) -> StatusReport {
        StatusReport {
            server: (*self.info).clone(),
            capabilities: CapabilityNames {
                tools: self.registry.tools().names(),
                resources: self.registry.resources().uris(),
                prompts: self.registry.prompts().names(),
            },
            connections: self.connections.len(),
            sessions: self.sessions.len(),
            uptime_seconds: self.uptime().as_secs(),
        }
    }
}
