//! Runtime configuration.

use crate::persistence::SnapshotFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Invalid runtime configuration: {0}")]
pub struct ConfigError(#[from] serde_json::Error);

/// Knobs shared by the coordinator, the page-state store and the
/// persistence layer. Every field has a default, so an empty JSON object
/// is a valid configuration.
///
/// # Example
///
/// ```rust
/// use pageflow::config::RuntimeConfig;
///
/// let config = RuntimeConfig::from_json(r#"{ "purge_stale_layouts": false }"#).unwrap();
/// assert!(!config.purge_stale_layouts);
/// assert!(config.rebuild_retired_pages);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Drop layouts of keys that left the visible list.
    pub purge_stale_layouts: bool,

    /// Rebuild the state of a retired page if it is requested again,
    /// instead of handing back the instance whose scope was cancelled.
    pub rebuild_retired_pages: bool,

    /// Encoding used by snapshot-backed repositories.
    pub snapshot_format: SnapshotFormat,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            purge_stale_layouts: true,
            rebuild_retired_pages: true,
            snapshot_format: SnapshotFormat::Json,
        }
    }
}

impl RuntimeConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
