//! Node-type catalog
//!
//! The palette lists the node types a user can drag onto the canvas. Where
//! those come from (a remote service, a config file) is the catalog's
//! business; the core only needs `{id, name}` records and treats `id` as the
//! node's `type_id`.

use crate::config::CatalogConfig;
use crate::error::{EditorError, Result, ResultExt};
use crate::types::NodeTypeRecord;

/// Source of node types for the palette.
#[cfg_attr(test, mockall::automock)]
pub trait NodeCatalog: Send + Sync {
    /// Fetch the raw list of node types.
    fn node_types(&self) -> Result<Vec<NodeTypeRecord>>;
}

/// Catalog backed by a fixed list, usually from [`CatalogConfig`].
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    types: Vec<NodeTypeRecord>,
}

impl StaticCatalog {
    pub fn new(types: Vec<NodeTypeRecord>) -> Self {
        Self { types }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.node_types.clone())
    }
}

impl NodeCatalog for StaticCatalog {
    fn node_types(&self) -> Result<Vec<NodeTypeRecord>> {
        Ok(self.types.clone())
    }
}

/// Drop records without an id or name.
///
/// Fails if the catalog returned records but none of them were usable. An
/// empty response is not an error.
pub fn sanitize_node_types(records: Vec<NodeTypeRecord>) -> Result<Vec<NodeTypeRecord>> {
    let total = records.len();
    let valid: Vec<NodeTypeRecord> = records.into_iter().filter(|r| r.is_valid()).collect();

    if valid.is_empty() && total > 0 {
        return Err(EditorError::Catalog(
            "No valid node types received".to_string(),
        ));
    }
    if valid.len() < total {
        tracing::warn!("Dropped {} malformed node types", total - valid.len());
    }
    Ok(valid)
}

/// Fetch and sanitize the node types offered by `catalog`.
pub fn load_node_types(catalog: &dyn NodeCatalog) -> Result<Vec<NodeTypeRecord>> {
    let records = catalog.node_types().context("Failed to load node types")?;
    sanitize_node_types(records)
}
