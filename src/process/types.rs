/*!
 * Process Types
 * Errors for spawning and signalling child processes
 */

use crate::core::types::{Pid, TaskIndex};
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("spawn failed: {0}")]
    SpawnFailed(String),

    #[error("no OS pid for spawned process")]
    PidUnavailable,

    #[error("{signal} to pid {pid} failed: {source}")]
    SignalFailed {
        signal: &'static str,
        pid: Pid,
        source: nix::Error,
    },

    #[error("process suspend/resume is not supported on this platform")]
    ControlUnavailable,

    #[error("wait failed for task {index}: {source}")]
    WaitFailed {
        index: TaskIndex,
        source: std::io::Error,
    },
}
