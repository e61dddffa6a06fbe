/*!
 * Run Snapshots
 * Durable record of task-index membership at loop exit
 */

use crate::core::types::TaskIndex;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Snapshot operation result
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Snapshot errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Index membership across all tracking sets at a point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub running_indices: Vec<TaskIndex>,
    pub terminated_indices: Vec<TaskIndex>,
    pub completed_indices: Vec<TaskIndex>,
    pub suspended_indices: Vec<TaskIndex>,
    pub failed_indices: Vec<TaskIndex>,
}

/// Writes the final snapshot, keyed by the run's start timestamp
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    /// Fix the output path from the loop-start timestamp
    pub fn new(dir: &Path, started_at: DateTime<Local>) -> Self {
        let stamp = started_at.format("%Y-%m-%dT%H-%M-%S%.6f");
        Self {
            path: dir.join(format!("run_{stamp}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the snapshot; failures are returned for reporting, never
    /// retried
    pub fn write(&self, snapshot: &Snapshot) -> SnapshotResult<()> {
        let body = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, body).map_err(|source| SnapshotError::Write {
            path: self.path.display().to_string(),
            source,
        })?;
        info!("Snapshot written to {}", self.path.display());
        Ok(())
    }
}
