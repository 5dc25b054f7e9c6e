//! The authoritative pipeline state.
//!
//! `PipelineStore` owns the node list, edge list, execution log, and the
//! `running` flag. The application constructs one and shares it (usually as
//! `Arc<PipelineStore>`) with the view layer, which reads snapshots and
//! subscribes to [`StoreEvent`]s.
//!
//! Every mutation happens inside a single write-lock critical section, so a
//! reader never observes a half-updated node list.

use crate::config::EditorConfig;
use crate::pipeline::error::{ConnectionRejection, GraphError, GraphResult};
use crate::pipeline::events::{EventBus, StoreEvent, DEFAULT_EVENT_CAPACITY};
use crate::pipeline::id::{EdgeId, NodeId};
use crate::pipeline::node::{Connection, Edge, PipelineNode, PositionUpdate};
use crate::pipeline::simulator::{ExecutionOutcome, ExecutionSimulator, DEFAULT_STEP_DELAY};
use crate::pipeline::validate::check_connection;
use crate::types::{LogEntry, NodeStatus, Position};
use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

#[derive(Debug, Default)]
struct PipelineState {
    nodes: Vec<PipelineNode>,
    edges: Vec<Edge>,
    logs: Vec<LogEntry>,
}

/// Owned copy of the whole pipeline, for the view layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    pub nodes: Vec<PipelineNode>,
    pub edges: Vec<Edge>,
    pub logs: Vec<LogEntry>,
    pub running: bool,
}

impl PipelineSnapshot {
    /// Render as pretty-printed JSON for a view or a debug dump.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct PipelineStore {
    state: RwLock<PipelineState>,
    running: AtomicBool,
    events: EventBus,
    step_delay: Duration,
}

impl PipelineStore {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_STEP_DELAY, DEFAULT_EVENT_CAPACITY)
    }

    /// Create a store with an explicit per-node delay and event capacity.
    pub fn with_settings(step_delay: Duration, event_capacity: usize) -> Self {
        Self {
            state: RwLock::new(PipelineState::default()),
            running: AtomicBool::new(false),
            events: EventBus::new(event_capacity),
            step_delay,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::with_settings(
            config.execution.step_delay(),
            config.events.channel_capacity,
        )
    }

    fn read(&self) -> RwLockReadGuard<'_, PipelineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PipelineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Observation ──

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn nodes(&self) -> Vec<PipelineNode> {
        self.read().nodes.clone()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.read().edges.clone()
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.read().logs.clone()
    }

    pub fn node(&self, id: &NodeId) -> Option<PipelineNode> {
        self.read().nodes.iter().find(|n| &n.id == id).cloned()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        let state = self.read();
        PipelineSnapshot {
            nodes: state.nodes.clone(),
            edges: state.edges.clone(),
            logs: state.logs.clone(),
            running: self.is_running(),
        }
    }

    /// Nodes and edges copied under one lock.
    pub(crate) fn graph(&self) -> (Vec<PipelineNode>, Vec<Edge>) {
        let state = self.read();
        (state.nodes.clone(), state.edges.clone())
    }

    // ── Graph mutation ──

    /// Place a new idle node on the canvas. Non-finite positions fall back
    /// to the origin.
    pub fn add_node(
        &self,
        type_id: impl Into<String>,
        label: impl Into<String>,
        position: Position,
    ) -> NodeId {
        let id = NodeId::generate();
        let node = PipelineNode::new(id.clone(), type_id, label, position.or_origin());
        tracing::info!("Added node {} of type {:?}", id, node.type_id());
        self.write().nodes.push(node);
        self.events.publish(StoreEvent::NodesChanged);
        id
    }

    /// Overwrite the node list. Input with duplicate ids is rejected and the
    /// current list is kept.
    pub fn replace_nodes(&self, nodes: Vec<PipelineNode>) -> GraphResult<()> {
        let mut seen = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !seen.insert(&node.id) {
                tracing::warn!("Rejected node update with duplicate id {}", node.id);
                return Err(GraphError::DuplicateNodeId(node.id.clone()));
            }
        }
        self.write().nodes = nodes;
        self.events.publish(StoreEvent::NodesChanged);
        Ok(())
    }

    /// Merge canvas drag updates by node id. Updates with non-finite
    /// coordinates or unknown ids are skipped. Returns the number applied.
    pub fn apply_position_updates(&self, updates: &[PositionUpdate]) -> usize {
        let applied = {
            let mut state = self.write();
            let mut applied = 0;
            for update in updates {
                if !update.position.is_finite() {
                    tracing::warn!("Invalid position data for {}: {:?}", update.id, update.position);
                    continue;
                }
                match state.nodes.iter_mut().find(|n| n.id == update.id) {
                    Some(node) => {
                        node.position = update.position;
                        applied += 1;
                    }
                    None => tracing::warn!("Position update for unknown node {}", update.id),
                }
            }
            applied
        };
        if applied > 0 {
            self.events.publish(StoreEvent::NodesChanged);
        }
        applied
    }

    /// Overwrite the edge list without validation. Callers validate each new
    /// connection first (see [`PipelineStore::connect`]).
    pub fn replace_edges(&self, edges: Vec<Edge>) {
        tracing::debug!("Replacing edges ({} total)", edges.len());
        self.write().edges = edges;
        self.events.publish(StoreEvent::EdgesChanged);
    }

    /// Check a proposed connection against the current graph.
    pub fn validate(&self, connection: &Connection) -> Result<(), ConnectionRejection> {
        let state = self.read();
        check_connection(connection, &state.nodes, &state.edges)
    }

    /// Validate and, if accepted, add an edge from `source` to `target`.
    pub fn connect(
        &self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Result<EdgeId, ConnectionRejection> {
        let connection = Connection::new(source, target);
        let edge = {
            let mut state = self.write();
            if let Err(reason) = check_connection(&connection, &state.nodes, &state.edges) {
                tracing::debug!(
                    "Invalid connection attempt {:?} -> {:?}: {}",
                    connection.source,
                    connection.target,
                    reason
                );
                return Err(reason);
            }
            let edge = connection
                .to_edge()
                .ok_or(ConnectionRejection::MissingEndpoint)?;
            state.edges.push(edge.clone());
            edge
        };
        tracing::info!("Added edge {}", edge.id);
        self.events.publish(StoreEvent::EdgesChanged);
        Ok(edge.id)
    }

    // ── Execution ──

    /// Set every node back to idle and clear the log. Does not look at the
    /// `running` flag.
    pub fn reset_execution(&self) {
        {
            let mut state = self.write();
            for node in &mut state.nodes {
                node.data.status = NodeStatus::Idle;
            }
            state.logs.clear();
        }
        self.events.publish(StoreEvent::NodesChanged);
        self.events.publish(StoreEvent::LogsCleared);
    }

    /// Run the simulated execution with this store's step delay.
    pub async fn execute(&self) -> ExecutionOutcome {
        ExecutionSimulator::new(self.step_delay).run(self).await
    }

    /// Claim the `running` flag. Fails if a run is already in progress.
    pub(crate) fn try_begin_run(&self) -> bool {
        let claimed = self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if claimed {
            self.events.publish(StoreEvent::RunningChanged(true));
        }
        claimed
    }

    pub(crate) fn finish_run(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            self.events.publish(StoreEvent::RunningChanged(false));
        }
    }

    pub(crate) fn set_node_status(&self, id: &NodeId, status: NodeStatus) -> GraphResult<()> {
        {
            let mut state = self.write();
            let node = state
                .nodes
                .iter_mut()
                .find(|n| &n.id == id)
                .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
            node.data.status = status;
        }
        self.events.publish(StoreEvent::NodeStatusChanged {
            node_id: id.clone(),
            status,
        });
        Ok(())
    }

    pub(crate) fn append_log(&self, message: impl Into<String>) {
        let entry = LogEntry::now(message);
        self.write().logs.push(entry.clone());
        self.events.publish(StoreEvent::LogAppended(entry));
    }

    /// Replace the whole log with a single entry.
    pub(crate) fn set_log(&self, message: impl Into<String>) {
        let entry = LogEntry::now(message);
        self.write().logs = vec![entry.clone()];
        self.events.publish(StoreEvent::LogsCleared);
        self.events.publish(StoreEvent::LogAppended(entry));
    }
}

impl Default for PipelineStore {
    fn default() -> Self {
        Self::new()
    }
}
