/*!
 * Runtime Configuration
 * Tunables for admission control and throttling
 */

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

/// How the controller sheds load when utilization runs over target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThrottleMode {
    /// Stop the newest running task; progress is preserved and resume is cheap
    #[default]
    Suspend,
    /// Terminate the newest running task; resources are freed immediately
    Kill,
}

/// Orchestrator tunables
#[derive(Debug, Clone)]
pub struct Settings {
    /// Aggregate CPU utilization the controller steers toward, in percent
    pub target_cpu_percent: f32,
    /// Ceiling on concurrently running tasks
    pub max_processes: usize,
    /// Throttle action under CPU pressure
    pub throttle: ThrottleMode,
    /// CPU sampling window; doubles as the idle tick pacing
    pub sample_window: Duration,
    /// Pause after a state-changing action so the next sample sees its effect
    pub settle_delay: Duration,
    /// Directory the run snapshot is written to
    pub snapshot_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_cpu_percent: 80.0,
            max_processes: default_max_processes(),
            throttle: ThrottleMode::Suspend,
            sample_window: Duration::from_millis(250),
            settle_delay: Duration::from_secs(2),
            snapshot_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    pub fn with_target_cpu(mut self, percent: f32) -> Self {
        self.target_cpu_percent = percent;
        self
    }

    pub fn with_max_processes(mut self, max: usize) -> Self {
        self.max_processes = max.max(1);
        self
    }

    pub fn with_throttle(mut self, mode: ThrottleMode) -> Self {
        self.throttle = mode;
        self
    }

    pub fn with_sample_window(mut self, window: Duration) -> Self {
        self.sample_window = window;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_snapshot_dir(mut self, dir: PathBuf) -> Self {
        self.snapshot_dir = dir;
        self
    }
}

/// Logical cores minus two, leaving headroom for the orchestrator itself
pub fn default_max_processes() -> usize {
    let cores = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    cores.saturating_sub(2).max(1)
}
