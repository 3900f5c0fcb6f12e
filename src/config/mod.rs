//! Ledger configuration.

use crate::error::AccessLedgerResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for an [`AccessLedger`](crate::AccessLedger) host.
///
/// The grant window is deliberately not configurable here; every
/// permission carries the fixed
/// [`GRANT_DURATION_DAYS`](crate::ledger::types::GRANT_DURATION_DAYS)
/// window in this version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Path where the ledger stores its data when persistence is enabled.
    pub storage_path: PathBuf,
    /// Whether mutations are written through to the sled store.
    #[serde(default = "default_persistence_enabled")]
    pub persistence_enabled: bool,
}

fn default_persistence_enabled() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("data"),
            persistence_enabled: true,
        }
    }
}

impl LedgerConfig {
    /// Create a configuration with the specified storage path.
    pub fn new(storage_path: PathBuf) -> Self {
        Self {
            storage_path,
            ..Default::default()
        }
    }

    /// Create an in-memory configuration with persistence disabled.
    pub fn in_memory() -> Self {
        Self {
            persistence_enabled: false,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: &Path) -> AccessLedgerResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}
