/*!
 * Process Control
 * Platform capability for suspending, resuming, and terminating children
 */

use super::types::{ProcessError, ProcessResult};
use crate::core::types::Pid;
use std::sync::Arc;

#[cfg(unix)]
use nix::sys::signal::{kill, Signal};
#[cfg(unix)]
use nix::unistd::Pid as NixPid;

/// Signal-level control over a child process, keyed by OS pid
///
/// Exit-wait ownership stays with the monitor task; this capability only
/// delivers control signals.
pub trait ProcessControl: Send + Sync {
    /// Stop the process without terminating it
    fn suspend(&self, pid: Pid) -> ProcessResult<()>;
    /// Reactivate a suspended process
    fn resume(&self, pid: Pid) -> ProcessResult<()>;
    /// Request graceful termination
    fn terminate(&self, pid: Pid) -> ProcessResult<()>;
}

/// Select the control implementation for this platform, once at startup
///
/// Unix hosts get signal-based control; anywhere else every call fails
/// loudly instead of silently dropping the request.
pub fn platform_control() -> Arc<dyn ProcessControl> {
    #[cfg(unix)]
    {
        Arc::new(SignalControl)
    }
    #[cfg(not(unix))]
    {
        Arc::new(UnsupportedControl)
    }
}

/// POSIX signal implementation: SIGSTOP / SIGCONT / SIGTERM
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalControl;

#[cfg(unix)]
impl SignalControl {
    fn send(&self, pid: Pid, signal: Signal, name: &'static str) -> ProcessResult<()> {
        kill(NixPid::from_raw(pid as i32), signal).map_err(|source| {
            ProcessError::SignalFailed {
                signal: name,
                pid,
                source,
            }
        })
    }
}

#[cfg(unix)]
impl ProcessControl for SignalControl {
    fn suspend(&self, pid: Pid) -> ProcessResult<()> {
        self.send(pid, Signal::SIGSTOP, "SIGSTOP")
    }

    fn resume(&self, pid: Pid) -> ProcessResult<()> {
        self.send(pid, Signal::SIGCONT, "SIGCONT")
    }

    fn terminate(&self, pid: Pid) -> ProcessResult<()> {
        self.send(pid, Signal::SIGTERM, "SIGTERM")
    }
}

/// Stub for platforms with no suspend API
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedControl;

impl ProcessControl for UnsupportedControl {
    fn suspend(&self, _pid: Pid) -> ProcessResult<()> {
        Err(ProcessError::ControlUnavailable)
    }

    fn resume(&self, _pid: Pid) -> ProcessResult<()> {
        Err(ProcessError::ControlUnavailable)
    }

    fn terminate(&self, _pid: Pid) -> ProcessResult<()> {
        Err(ProcessError::ControlUnavailable)
    }
}
