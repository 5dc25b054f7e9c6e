//! Change notifications from the pipeline store to the view layer.
//!
//! The store publishes a [`StoreEvent`] after every mutation. Each subscriber
//! gets its own bounded crossbeam channel; a slow or dropped subscriber never
//! blocks the store.

use crate::pipeline::id::NodeId;
use crate::types::{LogEntry, NodeStatus};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::{Mutex, PoisonError};

/// Default channel capacity per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Messages sent from the store to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The node list changed (added, replaced, moved, or statuses reset).
    NodesChanged,

    /// The edge list was replaced.
    EdgesChanged,

    /// A single node changed status during execution.
    NodeStatusChanged { node_id: NodeId, status: NodeStatus },

    /// A log entry was appended.
    LogAppended(LogEntry),

    /// The log was cleared.
    LogsCleared,

    /// The `running` flag flipped.
    RunningChanged(bool),
}

/// Fan-out of store events to any number of subscribers.
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<StoreEvent>>>,
    capacity: usize,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    /// Register a new subscriber and return its receiving end.
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = bounded(self.capacity);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver an event to every subscriber. Disconnected subscribers are
    /// dropped; full ones miss the event.
    pub fn publish(&self, event: StoreEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Event subscriber is full, dropping {:?}", event);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

/// Drain all pending events from a receiver.
pub fn drain(rx: &Receiver<StoreEvent>) -> Vec<StoreEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
