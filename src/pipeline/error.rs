//! Pipeline-specific error types.

use crate::pipeline::id::NodeId;
use thiserror::Error;

/// Errors that can occur within the pipeline graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Ordering was requested for a graph that contains a cycle.
    #[error("Cannot compute order for cyclic graph")]
    Cyclic,

    /// A node replacement contained the same id twice.
    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(NodeId),

    /// An operation referenced a node that is not in the pipeline.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Why a proposed connection was refused.
///
/// Variants are listed in the order the validator checks them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRejection {
    #[error("connection is missing a source or target")]
    MissingEndpoint,

    #[error("cannot connect a node to itself")]
    SelfLoop,

    #[error("connection would create a cycle")]
    WouldCreateCycle,

    #[error("source node already has an output")]
    SourceHasOutput,

    #[error("target node already has an input")]
    TargetHasInput,

    #[error("endpoint does not refer to a node")]
    UnknownNode,

    #[error("target type must come after source type")]
    FlowOrder,
}
