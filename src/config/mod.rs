//! Viewer configuration: compiled-in defaults, optionally overridden by a
//! TOML file, then by command-line flags.
//!
//! All tuning knobs are fixed at construction; nothing reads configuration
//! after the engine is built.

use crate::loader::LoaderConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not read the config file.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// File content is not valid TOML for this schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// All engine and loader tuning knobs.
///
/// Every field has a default; a config file may set any subset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Height of one line in abstract units (terminal rows for the TUI).
    pub item_height: f64,
    /// Lookahead above and below the viewport, in the same units.
    pub lookahead_margin: f64,
    /// Lines per pager page.
    pub page_capacity: usize,
    /// Lines sequenced synchronously at startup.
    pub initial_batch: usize,
    /// Lines sequenced per cooperative batch.
    pub batch_size: usize,
    /// Minimum gap between cooperative batches, in milliseconds.
    pub batch_delay_ms: u64,
    /// Maximum container nesting before traversal fails.
    pub depth_limit: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            item_height: 1.0,
            lookahead_margin: 5.0,
            page_capacity: 5000,
            initial_batch: 512,
            batch_size: 8192,
            batch_delay_ms: 8,
            depth_limit: 512,
        }
    }
}

impl ViewerConfig {
    /// Loader knobs as a [`LoaderConfig`].
    pub fn loader(&self) -> LoaderConfig {
        LoaderConfig {
            initial_batch: self.initial_batch,
            batch_size: self.batch_size,
            batch_delay: Duration::from_millis(self.batch_delay_ms),
        }
    }

    /// Load from the default location (`<config dir>/jtv/config.toml`).
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No config file found; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("jtv").join("config.toml"))
    }
}
