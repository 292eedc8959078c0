//! Session tracking.
//!
//! The [`SessionManager`] exclusively owns session state. Adapters only ever
//! hold a session id and go through the manager for every read or write.
//! Each operation locks a single map shard, so operations on one session are
//! atomic with respect to each other and to the sweeper.

use dashmap::DashMap;
use mcpgate_core::protocol::Response;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Default idle time before a session expires.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Default interval between expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Session lifetime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Idle time after which a session expires.
    pub timeout: Duration,
    /// How often the sweeper evicts expired sessions.
    pub sweep_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SESSION_TIMEOUT,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl SessionConfig {
    /// Set the idle timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the sweep interval.
    #[must_use]
    pub const fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

/// The receiving side of a stream attached to a session.
///
/// `response` resolves with the first response delivered to the session;
/// `closer` is cancelled when the session is removed, evicted or closed.
#[derive(Debug)]
pub struct StreamHandle {
    /// Cancelled when the stream must close.
    pub closer: CancellationToken,
    /// The one response correlated with this stream.
    pub response: oneshot::Receiver<Response>,
}

#[derive(Debug)]
struct StreamSlot {
    closer: CancellationToken,
    responder: Option<oneshot::Sender<Response>>,
}

impl StreamSlot {
    fn close(&self) {
        self.closer.cancel();
    }
}

#[derive(Debug)]
struct Session {
    last_seen: Instant,
    event_counter: u64,
    headers: Option<Arc<HashMap<String, String>>>,
    stream: Option<StreamSlot>,
}

impl Session {
    fn new() -> Self {
        Self {
            last_seen: Instant::now(),
            event_counter: 0,
            headers: None,
            stream: None,
        }
    }

    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() >= timeout
    }

    fn close_stream(&self) {
        if let Some(stream) = &self.stream {
            stream.close();
        }
    }
}

/// Concurrent session table.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: DashMap<String, Session>,
    config: SessionConfig,
}

impl SessionManager {
    /// Create a manager with the given configuration.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Generate a fresh session id.
    ///
    /// Ids are UUID v7 strings: time-ordered with 74 random bits, so
    /// concurrent calls never collide in practice.
    #[must_use]
    pub fn generate_id() -> String {
        uuid::Uuid::now_v7().to_string()
    }

    /// Register a session under `id`, resetting any existing state.
    pub fn create(&self, id: impl Into<String>) {
        let id = id.into();
        tracing::debug!(session_id = %id, "session created");
        if let Some(previous) = self.sessions.insert(id, Session::new()) {
            previous.close_stream();
        }
    }

    /// Mint a new session and return its id.
    #[must_use]
    pub fn open(&self) -> String {
        let id = Self::generate_id();
        self.create(id.clone());
        id
    }

    /// Refresh a session's last-seen time. Returns `false` if unknown.
    pub fn touch(&self, id: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut session) => {
                session.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Check that a session is known and not expired.
    #[must_use]
    pub fn is_valid(&self, id: &str) -> bool {
        self.sessions
            .get(id)
            .is_some_and(|s| !s.is_expired(self.config.timeout))
    }

    /// Check validity and refresh in one step.
    pub fn validate(&self, id: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut session) if !session.is_expired(self.config.timeout) => {
                session.last_seen = Instant::now();
                true
            }
            _ => false,
        }
    }

    /// Increment and return the session's event counter.
    ///
    /// Returns `None` for an unknown session.
    pub fn next_event_id(&self, id: &str) -> Option<u64> {
        self.sessions.get_mut(id).map(|mut session| {
            session.event_counter += 1;
            session.event_counter
        })
    }

    /// Store the header set captured when the session was established.
    pub fn set_headers(&self, id: &str, headers: HashMap<String, String>) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut session) => {
                session.headers = Some(Arc::new(headers));
                true
            }
            None => false,
        }
    }

    /// Get the stored header set, if any.
    #[must_use]
    pub fn headers(&self, id: &str) -> Option<Arc<HashMap<String, String>>> {
        self.sessions.get(id).and_then(|s| s.headers.clone())
    }

    /// Attach an outbound stream to a session.
    ///
    /// A previously attached stream is closed. Returns `None` if the session
    /// is unknown.
    pub fn attach_stream(&self, id: &str) -> Option<StreamHandle> {
        let mut session = self.sessions.get_mut(id)?;
        session.close_stream();

        let closer = CancellationToken::new();
        let (tx, rx) = oneshot::channel();
        session.stream = Some(StreamSlot {
            closer: closer.clone(),
            responder: Some(tx),
        });
        Some(StreamHandle {
            closer,
            response: rx,
        })
    }

    /// Hand a response to the session's waiting stream.
    ///
    /// Only the first delivery per stream succeeds.
    pub fn deliver(&self, id: &str, response: &Response) -> bool {
        let responder = self
            .sessions
            .get_mut(id)
            .and_then(|mut s| s.stream.as_mut().and_then(|slot| slot.responder.take()));
        match responder {
            Some(tx) => tx.send(response.clone()).is_ok(),
            None => false,
        }
    }

    /// Remove a session and close its stream. Removing twice is a no-op.
    pub fn remove(&self, id: &str) -> bool {
        match self.sessions.remove(id) {
            Some((_, session)) => {
                session.close_stream();
                tracing::debug!(session_id = %id, "session removed");
                true
            }
            None => false,
        }
    }

    /// Evict every expired session, closing its stream.
    pub fn sweep_expired(&self) -> usize {
        let timeout = self.config.timeout;
        let mut evicted = 0;
        self.sessions.retain(|id, session| {
            if session.is_expired(timeout) {
                session.close_stream();
                tracing::debug!(session_id = %id, "session expired");
                evicted += 1;
                false
            } else {
                true
            }
        });
        evicted
    }

    /// Close every stream and forget every session.
    pub fn close_all(&self) {
        for entry in &self.sessions {
            entry.value().close_stream();
        }
        self.sessions.clear();
    }

    /// Number of tracked sessions, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if no sessions are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
