/*!
 * Core Types
 * Shared aliases and the task lifecycle state
 */

use serde::{Deserialize, Serialize};

/// Zero-based position of a task in the input job list
pub type TaskIndex = usize;

/// OS process ID type
pub type Pid = u32;

/// Task lifecycle state
///
/// A task holds exactly one state at any instant. `Terminated` is recorded
/// separately from the active sets and may overlap a task's earlier history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Loaded but not yet spawned
    Pending,
    /// Backed by a live OS process
    Running,
    /// Backing process is stopped and can be resumed
    Suspended,
    /// Process exited with code zero
    Completed,
    /// Process was explicitly killed
    Terminated,
    /// Spawn failed or the process exited non-zero
    Failed,
}
