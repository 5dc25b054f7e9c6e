//! Pipeline Editor - Demo Entry Point
//!
//! Builds a chain from the catalog's node types, runs the simulated
//! execution, and prints the resulting log.

use anyhow::Context;
use pipeline_editor::{
    catalog::{load_node_types, StaticCatalog},
    pipeline::events,
    EditorConfig, PipelineStore, Position, StoreEvent,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const NODE_SPACING: f64 = 220.0;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = EditorConfig::load_default_location();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting pipeline editor demo");

    let catalog = StaticCatalog::from_config(&config.catalog);
    let node_types = load_node_types(&catalog).context("Failed to read node catalog")?;

    let store = PipelineStore::from_config(&config);
    let rx = store.subscribe();

    // Drop each node type onto the canvas left to right, wiring each to the last
    let mut previous = None;
    for (i, node_type) in node_types.iter().enumerate() {
        let position = Position::new(i as f64 * NODE_SPACING, 0.0);
        let id = store.add_node(node_type.id.as_str(), node_type.name.as_str(), position);
        if let Some(prev) = previous.replace(id.clone()) {
            if let Err(reason) = store.connect(prev, id) {
                tracing::warn!("Skipped connection to {}: {}", node_type.name, reason);
            }
        }
    }

    let outcome = store.execute().await;
    tracing::info!("Execution finished: {:?}", outcome);

    for entry in store.logs() {
        println!("[{}] {}", entry.timestamp.format("%H:%M:%S%.3f"), entry.message);
    }

    let status_changes = events::drain(&rx)
        .iter()
        .filter(|e| matches!(e, StoreEvent::NodeStatusChanged { .. }))
        .count();
    tracing::debug!("Observed {} node status changes", status_changes);

    let snapshot = store.snapshot().to_json()?;
    tracing::trace!("Final pipeline state:\n{}", snapshot);

    tracing::info!("Shutting down...");
    Ok(())
}
