//! Well-known node kinds and the flow-ordering policy.
//!
//! A node's `type_id` is free-form. Four values are recognized and ordered:
//! data sources feed transformers, transformers feed models, models feed
//! sinks. Any other `type_id` is accepted but has no position in the flow.

use serde::{Deserialize, Serialize};

/// Recognized node categories, in flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    DataSource,
    Transformer,
    Model,
    Sink,
}

impl NodeKind {
    /// Resolve a `type_id` to a known kind, if it is one.
    pub fn from_type_id(type_id: &str) -> Option<Self> {
        match type_id {
            "data-source" => Some(NodeKind::DataSource),
            "transformer" => Some(NodeKind::Transformer),
            "model" => Some(NodeKind::Model),
            "sink" => Some(NodeKind::Sink),
            _ => None,
        }
    }

    /// The canonical `type_id` string.
    pub fn type_id(&self) -> &'static str {
        match self {
            NodeKind::DataSource => "data-source",
            NodeKind::Transformer => "transformer",
            NodeKind::Model => "model",
            NodeKind::Sink => "sink",
        }
    }

    /// Get the display name for this node kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::DataSource => "Data Source",
            NodeKind::Transformer => "Transformer",
            NodeKind::Model => "Model",
            NodeKind::Sink => "Sink",
        }
    }

    /// Position in the flow order (0-based).
    pub fn order(&self) -> usize {
        match self {
            NodeKind::DataSource => 0,
            NodeKind::Transformer => 1,
            NodeKind::Model => 2,
            NodeKind::Sink => 3,
        }
    }

    /// Get all known node kinds in flow order.
    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::DataSource,
            NodeKind::Transformer,
            NodeKind::Model,
            NodeKind::Sink,
        ]
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Whether an edge from `source_type` to `target_type` respects flow order.
///
/// Unknown types on either side never block a connection.
pub fn flow_allows(source_type: &str, target_type: &str) -> bool {
    match (
        NodeKind::from_type_id(source_type),
        NodeKind::from_type_id(target_type),
    ) {
        (Some(source), Some(target)) => target.order() > source.order(),
        _ => true,
    }
}

/// Log line emitted when a node of `type_id` finishes its simulated step.
pub fn completion_message(type_id: &str, label: &str) -> String {
    match NodeKind::from_type_id(type_id) {
        Some(NodeKind::DataSource) => format!("Data Source \"{}\" processed 100 records", label),
        Some(NodeKind::Transformer) => format!("Transformer \"{}\" applied", label),
        Some(NodeKind::Model) => format!("Model \"{}\" generated predictions", label),
        Some(NodeKind::Sink) => format!("Sink \"{}\" saved results", label),
        None => format!("Node \"{}\" completed", label),
    }
}
