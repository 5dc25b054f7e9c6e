//! Configuration module for the pipeline editor
//!
//! This module handles editor configuration including:
//! - Simulated execution timing
//! - Event channel sizing for the view layer
//! - Diagnostic log filtering
//! - The built-in node-type catalog
//!
//! # Config Location
//!
//! The config file is read from the platform-appropriate location:
//! - **Linux**: `~/.config/pipeline-editor/editor.toml`
//! - **macOS**: `~/Library/Application Support/pipeline-editor/editor.toml`
//! - **Windows**: `%APPDATA%\pipeline-editor\editor.toml`
//!
//! # Example
//!
//! ```toml
//! [execution]
//! step_delay_ms = 600
//!
//! [logging]
//! filter = "info,pipeline_editor=debug"
//!
//! [[catalog.node_types]]
//! id = "data-source"
//! name = "Data Source"
//! ```

use crate::error::{EditorError, Result, ResultExt};
use crate::pipeline::events::DEFAULT_EVENT_CAPACITY;
use crate::pipeline::node_type::NodeKind;
use crate::types::NodeTypeRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier for config directories
pub const APP_ID: &str = "pipeline-editor";

/// Config filename
pub const CONFIG_FILE: &str = "editor.toml";

/// Default simulated work per node in milliseconds
pub const DEFAULT_STEP_DELAY_MS: u64 = 600;

/// Default diagnostic log filter
pub const DEFAULT_LOG_FILTER: &str = "info,pipeline_editor=debug";

/// Environment variable overriding the step delay
pub const STEP_DELAY_ENV: &str = "PIPELINE_EDITOR_STEP_DELAY_MS";

// ==================== Config Directory ====================

/// Get the editor config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the editor config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Editor Config ====================

/// Top-level editor configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Simulated execution settings
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Store event delivery settings
    #[serde(default)]
    pub events: EventsConfig,

    /// Diagnostic logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Node types offered by the built-in catalog
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl EditorConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file from disk. A missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            EditorError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load a config file, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load editor config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Load from the default location, then apply environment overrides
    pub fn load_default_location() -> Self {
        let mut config = match config_path() {
            Some(path) => Self::load_or_default(path),
            None => Self::default(),
        };
        config.apply_env_overrides();
        config
    }

    /// Save the config as TOML, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    EditorError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| EditorError::Config(format!("Failed to write config: {}", e)))
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        if let Ok(raw) = std::env::var(STEP_DELAY_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => {
                    tracing::debug!("Step delay overridden to {}ms by {}", ms, STEP_DELAY_ENV);
                    self.execution.step_delay_ms = ms;
                }
                Err(_) => tracing::warn!("Ignoring invalid {}={:?}", STEP_DELAY_ENV, raw),
            }
        }
    }
}

// ==================== Execution Config ====================

/// Simulated execution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Delay each node spends in the running state, in milliseconds
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
}

fn default_step_delay_ms() -> u64 {
    DEFAULT_STEP_DELAY_MS
}

impl ExecutionConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
        }
    }
}

// ==================== Events Config ====================

/// Store event delivery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Per-subscriber channel capacity
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

// ==================== Logging Config ====================

/// Diagnostic logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

// ==================== Catalog Config ====================

/// Node types offered by the built-in catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_node_types")]
    pub node_types: Vec<NodeTypeRecord>,
}

fn default_node_types() -> Vec<NodeTypeRecord> {
    NodeKind::all()
        .iter()
        .map(|kind| NodeTypeRecord::new(kind.type_id(), kind.display_name()))
        .collect()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            node_types: default_node_types(),
        }
    }
}

// ==================== Tests ====================
