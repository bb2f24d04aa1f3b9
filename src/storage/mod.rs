//! Persisted UI state
//!
//! The UI keeps an opaque key-value snapshot (theme and friends) under a
//! fixed key. This module reads and writes that snapshot as a single JSON
//! record; the core interprets nothing in it beyond the theme string.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::error;

/// Light UI theme setting.
pub const LIGHT_THEME: &str = "light";

/// Dark UI theme setting.
pub const DARK_THEME: &str = "dark";

/// File-backed store for the UI state snapshot.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store the snapshot under `key` inside `dir`.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        }
    }

    /// Snapshot location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state snapshot; a missing or corrupt snapshot yields `None`.
    pub fn load_state(&self) -> Option<Value> {
        let serialized = match std::fs::read_to_string(&self.path) {
            Ok(serialized) => serialized,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                error!(path = %self.path.display(), %err, "error during state load");
                return None;
            }
        };

        match serde_json::from_str(&serialized) {
            Ok(state) => Some(state),
            Err(err) => {
                error!(path = %self.path.display(), %err, "error during state load");
                None
            }
        }
    }

    /// Serialize and save the state snapshot. Failures are logged, never
    /// propagated.
    pub fn save_state(&self, state: &Value) {
        let serialized = match serde_json::to_string(state) {
            Ok(serialized) => serialized,
            Err(err) => {
                error!(%err, "error during state save");
                return;
            }
        };

        if let Err(err) = std::fs::write(&self.path, serialized) {
            error!(path = %self.path.display(), %err, "error during state save");
        }
    }
}

/// Theme string from an opaque state snapshot.
pub fn theme(state: &Value) -> Option<&str> {
    state.get("theme").and_then(Value::as_str)
}
