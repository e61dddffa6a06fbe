/*!
 * loadgate
 * CPU admission-control orchestrator for batch process workloads
 *
 * Fans a job list out into shell processes, throttling concurrency so
 * aggregate CPU utilization stays near a configured target, and persists
 * task-state progress across interruption.
 */

pub mod core;
pub mod jobs;
pub mod observability;
pub mod process;
pub mod registry;
pub mod sched;

// Re-exports
pub use crate::core::config::{default_max_processes, Settings, ThrottleMode};
pub use crate::core::types::{Pid, TaskIndex, TaskState};
pub use jobs::{load_jobs, CommandTemplate, JobError, JobSpec};
pub use registry::{Snapshot, SnapshotWriter, TaskRegistry};
pub use sched::{ctrl_c_watcher, Orchestrator, OrchestratorError, RunOutcome};
