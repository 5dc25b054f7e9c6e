//! Core data types shared between the pipeline store and the view layer
//!
//! This module defines the small value types that cross the boundary to the
//! excluded canvas, palette, and log viewer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 2-D canvas position. Display only; never validated against overlap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are usable numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Return this position, or the origin if it is malformed.
    pub fn or_origin(self) -> Self {
        if self.is_finite() {
            self
        } else {
            Self::default()
        }
    }
}

/// Simulated execution status of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Idle,
    Running,
    Done,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Idle => "idle",
            NodeStatus::Running => "running",
            NodeStatus::Done => "done",
        }
    }

    /// Style class the canvas applies to a node in this status.
    pub fn class_name(&self) -> &'static str {
        match self {
            NodeStatus::Idle => "node-idle",
            NodeStatus::Running => "node-running",
            NodeStatus::Done => "node-done",
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the user-visible execution log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl LogEntry {
    /// Create an entry stamped with the current time
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
        }
    }
}

/// A node type offered by the catalog: `id` becomes the node's `type_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTypeRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl NodeTypeRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Records need both an id and a display name to be usable.
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && !self.name.trim().is_empty()
    }
}
