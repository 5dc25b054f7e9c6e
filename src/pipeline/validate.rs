//! Connection validation.
//!
//! A proposed edge is checked against the current graph before it is added.
//! Rejection is an expected outcome, reported as a value and never as an
//! error the caller has to unwind.

use crate::pipeline::error::ConnectionRejection;
use crate::pipeline::graph::{incoming_count, outgoing_count, reachable};
use crate::pipeline::node::{Connection, Edge, PipelineNode};
use crate::pipeline::node_type::flow_allows;

/// Check a proposed connection, returning the first rule it breaks.
///
/// Rules, in order:
/// 1. both endpoints present and non-empty
/// 2. no self-loop
/// 3. target must not already reach source
/// 4. source has no output yet, target has no input yet
/// 5. both endpoints are existing nodes
/// 6. known node types must respect flow order
pub fn check_connection(
    connection: &Connection,
    nodes: &[PipelineNode],
    edges: &[Edge],
) -> Result<(), ConnectionRejection> {
    let (source, target) = connection
        .endpoints()
        .ok_or(ConnectionRejection::MissingEndpoint)?;

    if source == target {
        return Err(ConnectionRejection::SelfLoop);
    }

    if reachable(target, source, edges) {
        return Err(ConnectionRejection::WouldCreateCycle);
    }

    if outgoing_count(source, edges) >= 1 {
        return Err(ConnectionRejection::SourceHasOutput);
    }
    if incoming_count(target, edges) >= 1 {
        return Err(ConnectionRejection::TargetHasInput);
    }

    let source_node = nodes.iter().find(|n| &n.id == source);
    let target_node = nodes.iter().find(|n| &n.id == target);
    let (Some(source_node), Some(target_node)) = (source_node, target_node) else {
        return Err(ConnectionRejection::UnknownNode);
    };

    if !flow_allows(source_node.type_id(), target_node.type_id()) {
        return Err(ConnectionRejection::FlowOrder);
    }

    Ok(())
}

/// Whether a proposed connection may be added.
pub fn validate_connection(
    connection: &Connection,
    nodes: &[PipelineNode],
    edges: &[Edge],
) -> bool {
    match check_connection(connection, nodes, edges) {
        Ok(()) => true,
        Err(reason) => {
            tracing::debug!(
                "Rejected connection {:?} -> {:?}: {}",
                connection.source,
                connection.target,
                reason
            );
            false
        }
    }
}
