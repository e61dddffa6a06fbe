/*!
 * Process Handle
 * Pairs one spawned OS process with the task index it executes
 */

use super::types::{ProcessError, ProcessResult};
use crate::core::types::{Pid, TaskIndex};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::debug;

/// A live child process executing one task
///
/// The handle only owns spawning and the exit wait; all registry mutation
/// happens in the monitor task, and control signals are delivered by pid
/// through the platform capability.
#[derive(Debug)]
pub struct ProcessHandle {
    index: TaskIndex,
    pid: Pid,
    child: Child,
}

impl ProcessHandle {
    /// Spawn `command_line` through the shell, stdout and stderr captured
    ///
    /// Non-blocking to the caller; the returned handle is handed to a
    /// monitor task which owns the exit wait.
    pub fn spawn(command_line: &str, index: TaskIndex) -> ProcessResult<Self> {
        let child = Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ProcessError::SpawnFailed(format!("{command_line}: {e}")))?;

        let pid = child.id().ok_or(ProcessError::PidUnavailable)?;
        debug!("Spawned process for task {} (pid {})", index, pid);

        Ok(Self { index, pid, child })
    }

    pub fn index(&self) -> TaskIndex {
        self.index
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Block the calling task (never the scheduler) until the process exits
    ///
    /// Returns the exit code, or `None` when the process was ended by a
    /// signal.
    pub async fn wait(mut self) -> ProcessResult<Option<i32>> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|source| ProcessError::WaitFailed {
                index: self.index,
                source,
            })?;
        Ok(status.code())
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_and_wait_success() {
        let handle = ProcessHandle::spawn("exit 0", 0).unwrap();
        assert!(handle.pid() > 0);
        assert_eq!(handle.wait().await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_nonzero_exit_code() {
        let handle = ProcessHandle::spawn("exit 3", 1).unwrap();
        assert_eq!(handle.wait().await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_output_is_captured() {
        let handle = ProcessHandle::spawn("echo hello && echo err >&2", 2).unwrap();
        assert_eq!(handle.wait().await.unwrap(), Some(0));
    }
}
