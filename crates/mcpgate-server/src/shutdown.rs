//! Graceful shutdown coordination.
//!
//! Shutdown runs once, in a fixed order:
//!
//! 1. Stop the periodic sweeper.
//! 2. Ask every registered connection to close, concurrently, and wait for
//!    all of them up to the grace period.
//! 3. Close every outbound stream and forget all sessions.
//! 4. Release the listener.
//!
//! Every step is best effort: a connection that fails to close in time is
//! logged and skipped.

use crate::connection::ConnectionRegistry;
use crate::session::SessionManager;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default time a connection gets to close during shutdown.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Drives the shutdown sequence.
#[derive(Debug)]
pub struct ShutdownCoordinator {
    sessions: Arc<SessionManager>,
    connections: Arc<ConnectionRegistry>,
    grace: Duration,
    sweeper: CancellationToken,
    listener: CancellationToken,
    started: AtomicBool,
}

impl ShutdownCoordinator {
    /// Create a coordinator over shared session and connection state.
    #[must_use]
    pub fn new(
        sessions: Arc<SessionManager>,
        connections: Arc<ConnectionRegistry>,
        grace: Duration,
    ) -> Self {
        Self {
            sessions,
            connections,
            grace,
            sweeper: CancellationToken::new(),
            listener: CancellationToken::new(),
            started: AtomicBool::new(false),
        }
    }

    /// Token the sweeper watches.
    #[must_use]
    pub fn sweeper_token(&self) -> CancellationToken {
        self.sweeper.clone()
    }

    /// Token cancelled as the last shutdown step.
    ///
    /// Listeners and the stdio loop stop accepting input when it fires.
    #[must_use]
    pub fn listener_token(&self) -> CancellationToken {
        self.listener.clone()
    }

    /// Wait until the listener has been released.
    pub async fn listener_closed(&self) {
        self.listener.cancelled().await;
    }

    /// Check whether shutdown has begun.
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// The configured grace period.
    #[must_use]
    pub const fn grace(&self) -> Duration {
        self.grace
    }

    /// Run the shutdown sequence. Later calls return immediately.
    pub async fn shutdown(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::debug!("shutdown already in progress");
            return;
        }

        tracing::info!("shutting down");

        self.sweeper.cancel();
        tracing::debug!("sweeper stopped");

        let total = self.connections.len();
        let closed = self.connections.close_all(self.grace).await;
        if closed < total {
            tracing::warn!(closed, total, "some connections did not close cleanly");
        }

        let sessions = self.sessions.len();
        self.sessions.close_all();
        tracing::debug!(sessions, "sessions closed");

        self.listener.cancel();
        tracing::info!("shutdown complete");
    }
}
