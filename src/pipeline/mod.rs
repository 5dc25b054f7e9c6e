//! Graph validity and scheduling engine.
//!
//! Users build a pipeline of typed nodes connected by directed edges:
//! Data Source → Transformer → Model → Sink. The engine decides which edges
//! are legal, whether the whole graph can run, and the order it runs in.
//!
//! # Architecture
//!
//! ```text
//! [graph]  pure queries: degrees, reachability, cycles, topological order
//!    ▲
//! [validate]  per-edge rules + flow-order policy
//!    ▲
//! [store]  authoritative nodes / edges / log / running ──► [events] ──► view
//!    ▲
//! [simulator]  sequential, delayed walk over the topological order
//! ```
//!
//! # Design
//!
//! - **Chains only**: every node has at most one input and one output.
//! - **Deterministic order**: Kahn's algorithm with a FIFO frontier seeded
//!   in node-list order.
//! - **Rejections are values**: only ordering a cyclic graph is an error.
//! - **Explicit context**: the store is constructed by the application and
//!   shared, never a global.

pub mod error;
pub mod events;
pub mod graph;
pub mod id;
pub mod node;
pub mod node_type;
pub mod simulator;
pub mod store;
pub mod validate;

pub use error::{ConnectionRejection, GraphError, GraphResult};
pub use events::{EventBus, StoreEvent};
pub use graph::{
    has_cycle, incoming_count, neighbors, outgoing_count, reachable, topological_order,
};
pub use id::{EdgeId, NodeId};
pub use node::{Connection, Edge, NodeData, PipelineNode, PositionUpdate};
pub use node_type::{completion_message, flow_allows, NodeKind};
pub use simulator::{ExecutionOutcome, ExecutionSimulator, PipelineRejection};
pub use store::{PipelineSnapshot, PipelineStore};
pub use validate::{check_connection, validate_connection};
