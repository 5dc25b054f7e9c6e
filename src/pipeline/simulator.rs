//! Simulated pipeline execution.
//!
//! A run walks the nodes in topological order, one at a time. Each node is
//! marked running, the task sleeps for the step delay, then the node is
//! marked done and a line is logged. The sleep is the only suspension point.
//!
//! ```text
//! Idle ──► Validating ──► Running ──► Completed
//!              │              └─────► Failed
//!              └──► Rejected
//! ```
//!
//! Rejected runs never touch the `running` flag. Once a run has claimed the
//! flag it is released on every exit path, including the future being
//! dropped.

use crate::pipeline::error::GraphResult;
use crate::pipeline::graph::{exceeds_single_fan, has_cycle, topological_order};
use crate::pipeline::node::{Edge, PipelineNode};
use crate::pipeline::node_type::completion_message;
use crate::pipeline::store::PipelineStore;
use crate::types::NodeStatus;
use std::fmt;
use std::time::Duration;

/// Default simulated work per node.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(600);

pub const EMPTY_CANVAS_MESSAGE: &str = "Nothing to execute: canvas is empty.";
pub const INVALID_FAN_MESSAGE: &str =
    "Invalid pipeline: Each node must have at most one input and one output.";
pub const CYCLE_MESSAGE: &str = "Invalid pipeline: Graph contains a cycle.";
pub const COMPLETED_MESSAGE: &str = "Execution completed.";
pub const ERROR_PREFIX: &str = "Execution error: ";

/// Why a pipeline was refused before running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineRejection {
    EmptyCanvas,
    InvalidFan,
    Cycle,
}

impl PipelineRejection {
    /// The log line recorded for this rejection.
    pub fn message(&self) -> &'static str {
        match self {
            PipelineRejection::EmptyCanvas => EMPTY_CANVAS_MESSAGE,
            PipelineRejection::InvalidFan => INVALID_FAN_MESSAGE,
            PipelineRejection::Cycle => CYCLE_MESSAGE,
        }
    }
}

impl fmt::Display for PipelineRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of an `execute` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Every node ran.
    Completed { nodes_run: usize },
    /// The pipeline failed a pre-run check.
    Rejected(PipelineRejection),
    /// Something went wrong mid-run.
    Failed(String),
    /// Another run holds the `running` flag.
    AlreadyRunning,
}

impl ExecutionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ExecutionOutcome::Completed { .. })
    }
}

/// Releases the store's `running` flag when dropped.
struct RunGuard<'a> {
    store: &'a PipelineStore,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.store.finish_run();
    }
}

/// Drives one simulated run over a [`PipelineStore`].
#[derive(Debug, Clone, Copy)]
pub struct ExecutionSimulator {
    step_delay: Duration,
}

impl ExecutionSimulator {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    /// Pre-run checks, in order: non-empty, single fan-in/out, acyclic.
    pub fn preflight(nodes: &[PipelineNode], edges: &[Edge]) -> Result<(), PipelineRejection> {
        if nodes.is_empty() {
            return Err(PipelineRejection::EmptyCanvas);
        }
        if exceeds_single_fan(nodes, edges) {
            return Err(PipelineRejection::InvalidFan);
        }
        if has_cycle(nodes, edges) {
            return Err(PipelineRejection::Cycle);
        }
        Ok(())
    }

    /// Validate and run the pipeline currently held by `store`.
    pub async fn run(&self, store: &PipelineStore) -> ExecutionOutcome {
        if store.is_running() {
            tracing::warn!("Execute requested while a run is in progress");
            return ExecutionOutcome::AlreadyRunning;
        }

        let (nodes, edges) = store.graph();
        if let Err(rejection) = Self::preflight(&nodes, &edges) {
            tracing::info!("Pipeline rejected: {}", rejection);
            match rejection {
                PipelineRejection::EmptyCanvas => store.set_log(rejection.message()),
                _ => store.append_log(rejection.message()),
            }
            return ExecutionOutcome::Rejected(rejection);
        }

        if !store.try_begin_run() {
            tracing::warn!("Execute requested while a run is in progress");
            return ExecutionOutcome::AlreadyRunning;
        }
        let _guard = RunGuard { store };

        tracing::info!(
            "Executing pipeline: {} nodes, {} edges",
            nodes.len(),
            edges.len()
        );
        match self.walk(store, &nodes, &edges).await {
            Ok(nodes_run) => {
                store.append_log(COMPLETED_MESSAGE);
                tracing::info!("Execution completed ({} nodes)", nodes_run);
                ExecutionOutcome::Completed { nodes_run }
            }
            Err(e) => {
                let message = e.to_string();
                store.append_log(format!("{}{}", ERROR_PREFIX, message));
                tracing::warn!("Execution failed: {}", message);
                ExecutionOutcome::Failed(message)
            }
        }
    }

    async fn walk(
        &self,
        store: &PipelineStore,
        nodes: &[PipelineNode],
        edges: &[Edge],
    ) -> GraphResult<usize> {
        let order = topological_order(nodes, edges)?;
        for node in &order {
            store.set_node_status(&node.id, NodeStatus::Running)?;
            tracing::trace!("Node {} running", node.id);

            tokio::time::sleep(self.step_delay).await;

            store.set_node_status(&node.id, NodeStatus::Done)?;
            store.append_log(completion_message(node.type_id(), node.label()));
        }
        Ok(order.len())
    }
}

impl Default for ExecutionSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::events::{drain, StoreEvent};
    use crate::pipeline::id::NodeId;
    use crate::types::Position;
    use std::sync::Arc;

    fn messages(store: &PipelineStore) -> Vec<String> {
        store.logs().into_iter().map(|l| l.message).collect()
    }

    fn chain(store: &PipelineStore) -> Vec<NodeId> {
        let src = store.add_node("data-source", "CSV", Position::default());
        let xf = store.add_node("transformer", "Normalize", Position::default());
        let sink = store.add_node("sink", "S3", Position::default());
        store.connect(src.clone(), xf.clone()).unwrap();
        store.connect(xf.clone(), sink.clone()).unwrap();
        vec![src, xf, sink]
    }

    #[test]
    fn test_preflight_order() {
        let n = |id: &str| PipelineNode::new(id, "", id, Position::default());
        let nodes = vec![n("a"), n("b"), n("c")];

        assert_eq!(
            ExecutionSimulator::preflight(&[], &[]),
            Err(PipelineRejection::EmptyCanvas)
        );
        // Fan-out and a cycle: fan check comes first
        let edges = vec![Edge::new("a", "b"), Edge::new("a", "c"), Edge::new("b", "a")];
        assert_eq!(
            ExecutionSimulator::preflight(&nodes, &edges),
            Err(PipelineRejection::InvalidFan)
        );
        let edges = vec![Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("c", "a")];
        assert_eq!(
            ExecutionSimulator::preflight(&nodes, &edges),
            Err(PipelineRejection::Cycle)
        );
        assert_eq!(ExecutionSimulator::preflight(&nodes, &[]), Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_canvas() {
        let store = PipelineStore::new();
        store.append_log("stale entry");
        let rx = store.subscribe();

        let outcome = store.execute().await;

        assert_eq!(
            outcome,
            ExecutionOutcome::Rejected(PipelineRejection::EmptyCanvas)
        );
        assert_eq!(messages(&store), vec![EMPTY_CANVAS_MESSAGE]);
        assert!(!store.is_running());
        assert!(!drain(&rx)
            .iter()
            .any(|e| matches!(e, StoreEvent::RunningChanged(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejections_never_flip_running() {
        let store = PipelineStore::new();
        let a = store.add_node("model", "A", Position::default());
        let b = store.add_node("model", "B", Position::default());
        store.replace_edges(vec![Edge::new(a.clone(), b.clone()), Edge::new(b, a)]);
        let rx = store.subscribe();

        let outcome = store.execute().await;

        assert_eq!(outcome, ExecutionOutcome::Rejected(PipelineRejection::Cycle));
        assert_eq!(messages(&store), vec![CYCLE_MESSAGE]);
        assert!(!drain(&rx)
            .iter()
            .any(|e| matches!(e, StoreEvent::RunningChanged(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fan_rejection_appends() {
        let store = PipelineStore::new();
        let a = store.add_node("data-source", "A", Position::default());
        let b = store.add_node("sink", "B", Position::default());
        let c = store.add_node("sink", "C", Position::default());
        store.append_log("earlier");
        store.replace_edges(vec![Edge::new(a.clone(), b), Edge::new(a, c)]);
        let rx = store.subscribe();

        let outcome = store.execute().await;

        assert_eq!(
            outcome,
            ExecutionOutcome::Rejected(PipelineRejection::InvalidFan)
        );
        assert_eq!(messages(&store), vec!["earlier", INVALID_FAN_MESSAGE]);
        assert!(!store.is_running());
        assert!(!drain(&rx)
            .iter()
            .any(|e| matches!(e, StoreEvent::RunningChanged(_))));
        assert!(store.nodes().iter().all(|n| n.status() == NodeStatus::Idle));
    }

    #[tokio::test(start_paused = true)]
    async fn test_chain_runs_in_order() {
        let store = PipelineStore::new();
        let ids = chain(&store);
        let rx = store.subscribe();

        let outcome = store.execute().await;

        assert_eq!(outcome, ExecutionOutcome::Completed { nodes_run: 3 });
        assert_eq!(
            messages(&store),
            vec![
                "Data Source \"CSV\" processed 100 records",
                "Transformer \"Normalize\" applied",
                "Sink \"S3\" saved results",
                COMPLETED_MESSAGE,
            ]
        );
        assert!(!store.is_running());
        assert!(store.nodes().iter().all(|n| n.status() == NodeStatus::Done));

        // running → (running, done) per node in chain order → not running
        let events = drain(&rx);
        assert_eq!(events.first(), Some(&StoreEvent::RunningChanged(true)));
        assert_eq!(events.last(), Some(&StoreEvent::RunningChanged(false)));
        let statuses: Vec<(NodeId, NodeStatus)> = events
            .iter()
            .filter_map(|e| match e {
                StoreEvent::NodeStatusChanged { node_id, status } => {
                    Some((node_id.clone(), *status))
                }
                _ => None,
            })
            .collect();
        let expected: Vec<(NodeId, NodeStatus)> = ids
            .iter()
            .flat_map(|id| {
                [
                    (id.clone(), NodeStatus::Running),
                    (id.clone(), NodeStatus::Done),
                ]
            })
            .collect();
        assert_eq!(statuses, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_node_running_at_a_time() {
        let store = Arc::new(PipelineStore::new());
        let ids = chain(&store);

        let runner = {
            let store = store.clone();
            tokio::spawn(async move { store.execute().await })
        };

        // Let the run start, then observe mid-delay of the first node.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(store.is_running());
        let running: Vec<NodeId> = store
            .nodes()
            .into_iter()
            .filter(|n| n.status() == NodeStatus::Running)
            .map(|n| n.id)
            .collect();
        assert_eq!(running, vec![ids[0].clone()]);

        // Mid-delay of the second node.
        tokio::time::sleep(Duration::from_millis(600)).await;
        let nodes = store.nodes();
        let status = |id: &NodeId| nodes.iter().find(|n| &n.id == id).unwrap().status();
        assert_eq!(status(&ids[0]), NodeStatus::Done);
        assert_eq!(status(&ids[1]), NodeStatus::Running);
        assert_eq!(status(&ids[2]), NodeStatus::Idle);

        // A second execute while running is refused without logging.
        let logs_before = store.logs().len();
        assert_eq!(store.execute().await, ExecutionOutcome::AlreadyRunning);
        assert_eq!(store.logs().len(), logs_before);

        let outcome = runner.await.unwrap();
        assert!(outcome.is_completed());
        assert!(!store.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fault_mid_run_is_logged_and_releases_running() {
        let store = Arc::new(PipelineStore::new());
        let ids = chain(&store);

        let runner = {
            let store = store.clone();
            tokio::spawn(async move { store.execute().await })
        };

        tokio::time::sleep(Duration::from_millis(300)).await;
        // Drop the last node out from under the run.
        let remaining: Vec<PipelineNode> = store
            .nodes()
            .into_iter()
            .filter(|n| n.id != ids[2])
            .collect();
        store.replace_nodes(remaining).unwrap();

        let outcome = runner.await.unwrap();
        let expected = format!("Unknown node: {}", ids[2]);
        assert_eq!(outcome, ExecutionOutcome::Failed(expected.clone()));

        let log = messages(&store);
        assert_eq!(log.last().unwrap(), &format!("{}{}", ERROR_PREFIX, expected));
        assert!(!log.iter().any(|m| m == COMPLETED_MESSAGE));
        assert!(!store.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_run_releases_running() {
        let store = PipelineStore::new();
        chain(&store);

        {
            let run = store.execute();
            tokio::pin!(run);
            // Poll once so the run claims the flag, then drop it mid-delay.
            let _ = tokio::time::timeout(Duration::from_millis(10), &mut run).await;
            assert!(store.is_running());
        }
        assert!(!store.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_step_delay() {
        let store = PipelineStore::with_settings(Duration::from_millis(5), 16);
        chain(&store);

        let started = tokio::time::Instant::now();
        assert!(store.execute().await.is_completed());
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(15));
        assert!(elapsed < DEFAULT_STEP_DELAY);
    }
}
