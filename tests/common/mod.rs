//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use pipeline_editor::{PipelineStore, StoreEvent};
use std::time::Duration;

/// Per-node delay used by integration tests
pub fn test_step_delay() -> Duration {
    Duration::from_millis(50)
}

/// Store with the test step delay and a small event buffer
pub fn test_store() -> PipelineStore {
    PipelineStore::with_settings(test_step_delay(), 256)
}

/// Log messages without timestamps
pub fn log_messages(store: &PipelineStore) -> Vec<String> {
    store.logs().into_iter().map(|entry| entry.message).collect()
}

/// Only the status-change events, as `(node id, status name)` pairs
pub fn status_changes(events: &[StoreEvent]) -> Vec<(String, &'static str)> {
    events
        .iter()
        .filter_map(|event| match event {
            StoreEvent::NodeStatusChanged { node_id, status } => {
                Some((node_id.to_string(), status.as_str()))
            }
            _ => None,
        })
        .collect()
}
