//! Concurrent set of live change-event subscribers.

use dashmap::DashMap;
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::types::ChangeEvent;

/// Opaque identity of one subscriber connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Registry of currently connected subscribers, keyed by connection
/// identity.
///
/// Every operation is safe under arbitrary interleaving and none of them
/// blocks on subscriber I/O: delivery goes through unbounded per-subscriber
/// queues, so a slow consumer backs up its own queue only.
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: DashMap<SubscriberId, mpsc::UnboundedSender<ChangeEvent>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. Returns its identity and the receiving
    /// end of its delivery queue. Events published before this call are
    /// not replayed.
    pub fn connect(&self) -> (SubscriberId, mpsc::UnboundedReceiver<ChangeEvent>) {
        let id = SubscriberId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(id, tx);
        (id, rx)
    }

    /// Remove a subscriber. Idempotent: removing an unknown or
    /// already-removed id is a no-op.
    pub fn disconnect(&self, id: SubscriberId) {
        self.subscribers.remove(&id);
    }

    /// The set of subscribers connected right now. A subscriber
    /// disconnecting after the snapshot just makes its sender fail.
    pub fn snapshot(&self) -> Vec<(SubscriberId, mpsc::UnboundedSender<ChangeEvent>)> {
        self.subscribers
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
