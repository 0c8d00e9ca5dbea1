//! State file persistence
//!
//! Reads prior state from disk and writes snapshots with atomic writes.

use super::types::SyncState;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A JSON state file on disk
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// Create a handle for the given path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load prior state; a missing file yields an empty state
    pub async fn load(&self) -> Result<SyncState> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "State file {} does not exist, starting from scratch",
                    self.path.display()
                );
                return Ok(SyncState::new());
            }
            Err(e) => {
                return Err(Error::State {
                    message: format!("Failed to read state file: {e}"),
                })
            }
        };
        let state = SyncState::from_json(&contents)?;
        info!(
            "Loaded state for {} entities from {}",
            state.len(),
            self.path.display()
        );
        Ok(state)
    }

    /// Write a snapshot
    ///
    /// Written to a temp file first, then renamed over the target.
    pub async fn save(&self, state: &SyncState) -> Result<()> {
        let contents = serde_json::to_string_pretty(state).map_err(|e| Error::State {
            message: format!("Failed to serialize state: {e}"),
        })?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::State {
                message: format!("Failed to write state file: {e}"),
            })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::State {
                message: format!("Failed to rename state file: {e}"),
            })?;

        Ok(())
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
