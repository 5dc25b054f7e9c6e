//! Nodes and edges of the pipeline graph.
//!
//! These are plain data. All graph rules live in [`super::graph`] and
//! [`super::validate`]; the store owns the authoritative collections.

use crate::pipeline::id::{EdgeId, NodeId};
use crate::types::{NodeStatus, Position};
use serde::{Deserialize, Serialize};

/// Payload carried by every node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    pub type_id: String,
    #[serde(default)]
    pub status: NodeStatus,
}

/// A node placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineNode {
    pub id: NodeId,
    pub position: Position,
    pub data: NodeData,
}

impl PipelineNode {
    /// Build an idle node with an explicit id.
    pub fn new(
        id: impl Into<NodeId>,
        type_id: impl Into<String>,
        label: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            data: NodeData {
                label: label.into(),
                type_id: type_id.into(),
                status: NodeStatus::Idle,
            },
        }
    }

    #[inline]
    pub fn type_id(&self) -> &str {
        &self.data.type_id
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.data.label
    }

    #[inline]
    pub fn status(&self) -> NodeStatus {
        self.data.status
    }
}

/// A directed connection from one node's output to another node's input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: EdgeId::between(&source, &target),
            source,
            target,
        }
    }
}

/// A connection the user is trying to draw. Either end may be missing while
/// the drag is incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    pub source: Option<NodeId>,
    pub target: Option<NodeId>,
}

impl Connection {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
        }
    }

    /// Both endpoints, if both are present and non-empty.
    pub fn endpoints(&self) -> Option<(&NodeId, &NodeId)> {
        match (&self.source, &self.target) {
            (Some(s), Some(t)) if !s.is_empty() && !t.is_empty() => Some((s, t)),
            _ => None,
        }
    }

    /// Turn an accepted connection into an edge.
    pub fn to_edge(&self) -> Option<Edge> {
        self.endpoints()
            .map(|(s, t)| Edge::new(s.clone(), t.clone()))
    }
}

/// A node drag reported by the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdate {
    pub id: NodeId,
    pub position: Position,
}

impl PositionUpdate {
    pub fn new(id: impl Into<NodeId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            position: Position::new(x, y),
        }
    }
}
