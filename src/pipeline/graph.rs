//! Pure queries over a node list and an edge list.
//!
//! Every function takes its collections explicitly and never touches store
//! state. An edge may name an endpoint that is not in the node list: an
//! edge out of such a node leaves its target forever waiting on an input,
//! and an edge into one schedules a node that cannot run. Either way the
//! graph cannot be ordered and is reported as cyclic.

use crate::pipeline::error::{GraphError, GraphResult};
use crate::pipeline::id::NodeId;
use crate::pipeline::node::{Edge, PipelineNode};
use std::collections::{HashMap, HashSet, VecDeque};

/// Number of edges whose target is `node_id`.
pub fn incoming_count(node_id: &NodeId, edges: &[Edge]) -> usize {
    edges.iter().filter(|e| &e.target == node_id).count()
}

/// Number of edges whose source is `node_id`.
pub fn outgoing_count(node_id: &NodeId, edges: &[Edge]) -> usize {
    edges.iter().filter(|e| &e.source == node_id).count()
}

/// Targets of the edges leaving `node_id`, in edge order.
pub fn neighbors<'a>(node_id: &NodeId, edges: &'a [Edge]) -> Vec<&'a NodeId> {
    edges
        .iter()
        .filter(|e| &e.source == node_id)
        .map(|e| &e.target)
        .collect()
}

/// Breadth-first search from `src` along outgoing edges.
///
/// `src` is compared against `dst` before it is expanded, so a node always
/// reaches itself.
pub fn reachable(src: &NodeId, dst: &NodeId, edges: &[Edge]) -> bool {
    let mut queue: VecDeque<&NodeId> = VecDeque::new();
    let mut visited: HashSet<&NodeId> = HashSet::new();
    queue.push_back(src);
    visited.insert(src);

    while let Some(current) = queue.pop_front() {
        if current == dst {
            return true;
        }
        for next in neighbors(current, edges) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    false
}

/// Whether any node has more than one input or more than one output.
pub fn exceeds_single_fan(nodes: &[PipelineNode], edges: &[Edge]) -> bool {
    nodes
        .iter()
        .any(|n| incoming_count(&n.id, edges) > 1 || outgoing_count(&n.id, edges) > 1)
}

/// Whether the graph contains a cycle (Kahn's algorithm).
pub fn has_cycle(nodes: &[PipelineNode], edges: &[Edge]) -> bool {
    kahn_order(nodes, edges).is_none()
}

/// Nodes in topological order, ties broken by node-list order.
///
/// Fails with [`GraphError::Cyclic`] when some nodes can never be scheduled.
/// Callers on the execution path check [`has_cycle`] first, but this check
/// does not rely on that.
pub fn topological_order<'a>(
    nodes: &'a [PipelineNode],
    edges: &[Edge],
) -> GraphResult<Vec<&'a PipelineNode>> {
    match kahn_order(nodes, edges) {
        Some(order) => Ok(order.into_iter().map(|idx| &nodes[idx]).collect()),
        None => {
            tracing::warn!(
                "Cannot order cyclic graph ({} nodes, {} edges)",
                nodes.len(),
                edges.len()
            );
            Err(GraphError::Cyclic)
        }
    }
}

/// Kahn's algorithm over node indices. The frontier is a FIFO queue seeded
/// with zero in-degree nodes in node-list order.
///
/// Endpoints missing from `nodes` get indices past the end. They are never
/// seeded, and reaching one through an edge makes the graph unorderable.
/// Returns `None` unless every node is scheduled.
fn kahn_order(nodes: &[PipelineNode], edges: &[Edge]) -> Option<Vec<usize>> {
    let n = nodes.len();
    let mut index: HashMap<&NodeId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (&node.id, i))
        .collect();

    let mut total = n;
    for edge in edges {
        for id in [&edge.source, &edge.target] {
            if !index.contains_key(id) {
                index.insert(id, total);
                total += 1;
            }
        }
    }

    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); total];
    let mut in_degree = vec![0usize; total];

    for edge in edges {
        let (from, to) = (index[&edge.source], index[&edge.target]);
        adj[from].push(to);
        in_degree[to] += 1;
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(node) = queue.pop_front() {
        if node >= n {
            return None;
        }
        order.push(node);
        for &next in &adj[node] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    (order.len() == n).then_some(order)
}
