//! Connection registry.
//!
//! Tracks open live reload connections. Each connection is represented by
//! the bounded outbound queue of its socket task, so a broadcast only ever
//! enqueues and never waits on a slow socket.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

/// Outbound queue depth per connection.
const OUTBOUND_CAPACITY: usize = 16;

/// Opaque identity of one live reload connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ConnectionId(Uuid);

impl ConnectionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The one message ever sent to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ReloadSignal;

impl ReloadSignal {
    /// Wire payload.
    pub(crate) const PAYLOAD: &'static str = "reload";

    pub(crate) fn as_str(self) -> &'static str {
        Self::PAYLOAD
    }
}

/// Result of one broadcast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct BroadcastOutcome {
    /// Connections the signal was queued for.
    pub(crate) delivered: usize,
    /// Open connections skipped because their queue was full.
    pub(crate) lagging: usize,
    /// Closed connections skipped and removed.
    pub(crate) pruned: usize,
}

/// Set of open live reload connections.
#[derive(Default)]
pub(crate) struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, mpsc::Sender<ReloadSignal>>>,
}

impl ConnectionRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Create an outbound queue for a new connection and register it.
    ///
    /// The socket task drains the returned receiver.
    pub(crate) fn connect(&self) -> (ConnectionId, mpsc::Receiver<ReloadSignal>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);
        (self.register(tx), rx)
    }

    /// Add a connection's outbound queue to the broadcast set.
    pub(crate) fn register(&self, outbound: mpsc::Sender<ReloadSignal>) -> ConnectionId {
        let id = ConnectionId::new();
        self.lock().insert(id, outbound);
        id
    }

    /// Remove a connection. Returns `false` if it was already gone.
    pub(crate) fn unregister(&self, id: ConnectionId) -> bool {
        self.lock().remove(&id).is_some()
    }

    /// Number of registered connections.
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Queue [`ReloadSignal`] for every open connection.
    ///
    /// Closed connections are skipped and dropped from the set. Connections
    /// with a full queue are skipped for this signal only.
    pub(crate) fn broadcast_reload(&self) -> BroadcastOutcome {
        let mut outcome = BroadcastOutcome::default();

        self.lock()
            .retain(|_, outbound| match outbound.try_send(ReloadSignal) {
                Ok(()) => {
                    outcome.delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    outcome.lagging += 1;
                    true
                }
                Err(TrySendError::Closed(_)) => {
                    outcome.pruned += 1;
                    false
                }
            });

        outcome
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ConnectionId, mpsc::Sender<ReloadSignal>>> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
