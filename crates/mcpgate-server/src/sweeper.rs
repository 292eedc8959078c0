//! Periodic eviction of expired sessions and stale connections.

use crate::connection::ConnectionRegistry;
use crate::session::SessionManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawn the sweeper. It ticks every `period` until `stop` is cancelled.
pub fn spawn_sweeper(
    sessions: Arc<SessionManager>,
    connections: Arc<ConnectionRegistry>,
    period: Duration,
    stop: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tracing::debug!(period = ?period, "sweeper started");

        loop {
            tokio::select! {
                () = stop.cancelled() => break,
                _ = interval.tick() => {
                    let expired = sessions.sweep_expired();
                    let stale = connections.sweep_stale();
                    if expired > 0 || stale > 0 {
                        tracing::info!(
                            expired,
                            stale,
                            sessions = sessions.len(),
                            connections = connections.len(),
                            "sweep complete"
                        );
                    }
                }
            }
        }

        tracing::debug!("sweeper stopped");
    })
}
