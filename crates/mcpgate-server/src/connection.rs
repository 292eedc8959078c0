//! Live connection registry.
//!
//! Every open WebSocket or SSE stream holds a [`ConnectionGuard`]. Dropping
//! the guard deregisters the connection, so an adapter can never leak an
//! entry by returning early. Registry membership feeds health reporting and
//! shutdown fan-out.

use dashmap::DashMap;
use futures::future::join_all;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// The kind of a registered connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    /// A duplex WebSocket.
    WebSocket,
    /// An outbound-only SSE stream.
    Sse,
}

impl std::fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WebSocket => write!(f, "websocket"),
            Self::Sse => write!(f, "sse"),
        }
    }
}

#[derive(Debug)]
struct ConnectionEntry {
    kind: ConnectionKind,
    session_id: Option<String>,
    opened_at: Instant,
    shutdown: CancellationToken,
    closed: CancellationToken,
}

/// A snapshot of one registered connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Registry-assigned id.
    pub id: u64,
    /// Connection kind.
    pub kind: ConnectionKind,
    /// Associated session, if any.
    pub session_id: Option<String>,
    /// How long the connection has been open.
    pub age: Duration,
}

/// Concurrent registry of live connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<u64, ConnectionEntry>,
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection. The returned guard deregisters it on drop.
    #[must_use]
    pub fn register(
        self: &Arc<Self>,
        kind: ConnectionKind,
        session_id: Option<String>,
    ) -> ConnectionGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let shutdown = CancellationToken::new();
        let closed = CancellationToken::new();
        self.connections.insert(
            id,
            ConnectionEntry {
                kind,
                session_id: session_id.clone(),
                opened_at: Instant::now(),
                shutdown: shutdown.clone(),
                closed: closed.clone(),
            },
        );
        tracing::debug!(connection_id = id, kind = %kind, session_id = ?session_id, "connection registered");

        ConnectionGuard {
            id,
            registry: Arc::clone(self),
            shutdown,
            closed,
        }
    }

    /// Remove a connection. Removing twice is a no-op.
    pub fn deregister(&self, id: u64) -> bool {
        let removed = self.connections.remove(&id);
        if let Some((_, entry)) = &removed {
            entry.closed.cancel();
            tracing::debug!(connection_id = id, kind = %entry.kind, "connection deregistered");
        }
        removed.is_some()
    }

    /// Drop entries whose connection has already signalled closure.
    pub fn sweep_stale(&self) -> usize {
        let before = self.connections.len();
        self.connections
            .retain(|_, entry| !entry.closed.is_cancelled());
        before.saturating_sub(self.connections.len())
    }

    /// Number of live connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Check if there are no live connections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Number of live connections of one kind.
    #[must_use]
    pub fn count_by_kind(&self, kind: ConnectionKind) -> usize {
        self.connections
            .iter()
            .filter(|entry| entry.kind == kind)
            .count()
    }

    /// Snapshot of all live connections.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ConnectionInfo> {
        let mut list: Vec<ConnectionInfo> = self
            .connections
            .iter()
            .map(|entry| ConnectionInfo {
                id: *entry.key(),
                kind: entry.kind,
                session_id: entry.session_id.clone(),
                age: entry.opened_at.elapsed(),
            })
            .collect();
        list.sort_by_key(|info| info.id);
        list
    }

    /// Ask every connection to close and wait for all of them.
    ///
    /// Each connection gets up to `grace` to finish; a slow one does not
    /// hold up the others. Returns how many closed within the grace period.
    pub async fn close_all(&self, grace: Duration) -> usize {
        let pending: Vec<(u64, CancellationToken, CancellationToken)> = self
            .connections
            .iter()
            .map(|entry| (*entry.key(), entry.shutdown.clone(), entry.closed.clone()))
            .collect();
        let total = pending.len();

        // No shard lock may be held while guards react to cancellation.
        for (_, shutdown, _) in &pending {
            shutdown.cancel();
        }

        let results = join_all(pending.iter().map(|(id, _, closed)| async move {
            let done = tokio::time::timeout(grace, closed.cancelled()).await.is_ok();
            if !done {
                tracing::warn!(connection_id = id, "connection did not close within grace period");
            }
            done
        }))
        .await;

        let closed = results.into_iter().filter(|done| *done).count();
        tracing::info!(closed, total, "connections closed");
        closed
    }
}

/// Registration handle for one live connection.
#[derive(Debug)]
pub struct ConnectionGuard {
    id: u64,
    registry: Arc<ConnectionRegistry>,
    shutdown: CancellationToken,
    closed: CancellationToken,
}

impl ConnectionGuard {
    /// Registry-assigned id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Token cancelled when the server asks this connection to close.
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Check whether the server asked this connection to close.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.deregister(self.id);
        self.closed.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_deregisters_on_drop() {
        let registry = Arc::new(ConnectionRegistry::new());
        let ws = registry.register(ConnectionKind::WebSocket, Some("s1".to_string()));
        let sse = registry.register(ConnectionKind::Sse, None);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.count_by_kind(ConnectionKind::Sse), 1);
        assert_ne!(ws.id(), sse.id());

        let snapshot = registry.snapshot();
        assert_eq!(snapshot[0].session_id.as_deref(), Some("s1"));

        drop(ws);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.count_by_kind(ConnectionKind::WebSocket), 0);
    }

    #[test]
    fn test_deregister_is_idempotent() {
        let registry = Arc::new(ConnectionRegistry::new());
        let guard = registry.register(ConnectionKind::Sse, None);
        let id = guard.id();

        assert!(registry.deregister(id));
        assert!(!registry.deregister(id));
        drop(guard);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_close_all_waits_for_connections() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut tasks = Vec::new();
        for _ in 0..3 {
            let guard = registry.register(ConnectionKind::WebSocket, None);
            tasks.push(tokio::spawn(async move {
                guard.shutdown_token().cancelled().await;
                drop(guard);
            }));
        }

        let closed = registry.close_all(Duration::from_secs(5)).await;
        assert_eq!(closed, 3);
        assert!(registry.is_empty());
        for task in tasks {
            task.await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_all_bounds_slow_connections() {
        let registry = Arc::new(ConnectionRegistry::new());
        let _stuck = registry.register(ConnectionKind::WebSocket, None);
        let quick = registry.register(ConnectionKind::Sse, None);
        let quick_task = tokio::spawn(async move {
            quick.shutdown_token().cancelled().await;
            drop(quick);
        });

        let closed = registry.close_all(Duration::from_secs(1)).await;
        assert_eq!(closed, 1);
        assert_eq!(registry.len(), 1);
        quick_task.await.unwrap();
    }

    #[test]
    fn test_sweep_stale() {
        let registry = Arc::new(ConnectionRegistry::new());
        let guard = registry.register(ConnectionKind::Sse, None);
        guard.closed.cancel();
        assert_eq!(registry.sweep_stale(), 1);
        assert!(registry.is_empty());
    }
}
