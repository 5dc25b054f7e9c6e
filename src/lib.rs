//! # pipeline-editor: Visual Pipeline Engine
//!
//! The core of a visual pipeline editor. Users drag typed nodes (data source,
//! transformer, model, sink) onto a canvas, wire them into chains, and run a
//! simulated execution that logs one line per node in topological order.
//!
//! ## Architecture
//!
//! - **Pipeline**: graph queries, connection validation, the shared store,
//!   and the execution simulator
//! - **Catalog**: the node types offered by the palette
//! - **Config**: timing, event, logging, and catalog settings from TOML
//!
//! The canvas, palette, and log viewer are external. They talk to a
//! [`PipelineStore`] through its methods and its event subscription.
//!
//! ## Example
//!
//! ```ignore
//! use pipeline_editor::{PipelineStore, Position};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = PipelineStore::new();
//!     let src = store.add_node("data-source", "CSV", Position::new(0.0, 0.0));
//!     let sink = store.add_node("sink", "S3", Position::new(200.0, 0.0));
//!     store.connect(src, sink).expect("valid connection");
//!
//!     store.execute().await;
//!     for entry in store.logs() {
//!         println!("{}", entry.message);
//!     }
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use catalog::{NodeCatalog, StaticCatalog};
pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use pipeline::{
    Connection, Edge, ExecutionOutcome, NodeId, PipelineNode, PipelineStore, StoreEvent,
};
pub use types::{LogEntry, NodeStatus, NodeTypeRecord, Position};
