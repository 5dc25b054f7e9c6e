//! Error handling for the pipeline editor
//!
//! This module defines the crate-level error type and a Result alias for use
//! throughout the application. Graph-specific failures live in
//! [`crate::pipeline::error`] and convert into [`EditorError`].

use crate::pipeline::error::GraphError;
use thiserror::Error;

/// Main error type for pipeline editor operations
#[derive(Error, Debug)]
pub enum EditorError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors reported by the node-type catalog
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Structural graph errors (e.g. ordering a cyclic graph)
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EditorError>,
    },
}

impl EditorError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EditorError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<toml::de::Error> for EditorError {
    fn from(err: toml::de::Error) -> Self {
        EditorError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for EditorError {
    fn from(err: toml::ser::Error) -> Self {
        EditorError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::Serialization(err.to_string())
    }
}

/// Result type alias for pipeline editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EditorError::Catalog("No valid node types received".to_string());
        assert_eq!(err.to_string(), "Catalog error: No valid node types received");
    }

    #[test]
    fn test_error_with_context() {
        let err = EditorError::Config("missing section".to_string());
        let with_ctx = err.with_context("Failed to load editor.toml");
        assert!(with_ctx.to_string().contains("Failed to load editor.toml"));
        assert!(with_ctx.to_string().contains("missing section"));
    }

    #[test]
    fn test_result_context() {
        let res: Result<()> = Err(EditorError::from(GraphError::Cyclic));
        let err = res.context("Ordering pipeline").unwrap_err();
        assert!(err.to_string().starts_with("Ordering pipeline"));
        assert!(matches!(
            err,
            EditorError::WithContext { ref source, .. } if matches!(**source, EditorError::Graph(GraphError::Cyclic))
        ));

        let lazy: Result<()> = Err(EditorError::Config("bad".to_string()));
        let err = lazy.with_context(|| format!("Reading {}", "editor.toml")).unwrap_err();
        assert_eq!(err.to_string(), "Reading editor.toml: Configuration error: bad");
    }
}
