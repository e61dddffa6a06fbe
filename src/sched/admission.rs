/*!
 * Admission Control
 * Per-tick decisions gating how much concurrent work the host runs
 */

use crate::core::config::{Settings, ThrottleMode};
use crate::jobs::{CommandTemplate, JobSpec};
use crate::process::{spawn_monitor, ProcessControl, ProcessHandle};
use crate::registry::{Counts, Snapshot, TaskRegistry};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// One scheduling-tick decision, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Every task has settled; the loop can stop
    Finished,
    /// CPU headroom exists and suspended work is waiting
    Resume,
    /// CPU headroom and parallelism allow a new task
    Spawn,
    /// Over target with running work: shed load
    Throttle,
    /// Between thresholds; no action this tick
    Hold,
}

impl Decision {
    /// Whether acting on this decision changed process state
    pub fn changes_state(self) -> bool {
        matches!(self, Decision::Resume | Decision::Spawn | Decision::Throttle)
    }
}

/// Decision ladder over one CPU sample and a consistent registry view
///
/// `available` requires one logical core of headroom below target so the
/// next admission cannot overshoot it. Resuming is preferred over spawning:
/// it reclaims partially done work without paying process startup again.
pub fn decide(cpu: f32, cores: usize, counts: &Counts, total: usize, settings: &Settings) -> Decision {
    let target = settings.target_cpu_percent;
    let per_core = 100.0 / cores.max(1) as f32;
    let available = cpu <= target && cpu + per_core < target;
    let over_utilized = cpu > target;

    if counts.completed + counts.failed == total {
        Decision::Finished
    } else if available && counts.suspended > 0 {
        Decision::Resume
    } else if available && counts.running < settings.max_processes && counts.pending > 0 {
        Decision::Spawn
    } else if over_utilized && counts.running > 0 {
        Decision::Throttle
    } else {
        Decision::Hold
    }
}

/// Applies per-tick decisions: spawning, resuming, and throttling tasks
///
/// The controller is the only unit that starts processes, so the
/// pick-then-register sequence cannot race another spawner; monitors only
/// shrink the pending space.
pub struct AdmissionController {
    settings: Settings,
    jobs: Vec<JobSpec>,
    template: CommandTemplate,
    registry: Arc<TaskRegistry>,
    control: Arc<dyn ProcessControl>,
    monitors: JoinSet<()>,
    cores: usize,
}

impl AdmissionController {
    pub fn new(
        settings: Settings,
        jobs: Vec<JobSpec>,
        template: CommandTemplate,
        registry: Arc<TaskRegistry>,
        control: Arc<dyn ProcessControl>,
        cores: usize,
    ) -> Self {
        Self {
            settings,
            jobs,
            template,
            registry,
            control,
            monitors: JoinSet::new(),
            cores,
        }
    }

    /// Evaluate one tick against a fresh CPU sample and act on it
    ///
    /// When the decision changes state, the caller pauses for the settle
    /// delay so the next sample reflects the change before reacting again.
    pub fn tick(&mut self, cpu: f32) -> Decision {
        let counts = self.registry.counts();
        let decision = decide(cpu, self.cores, &counts, self.registry.total(), &self.settings);

        match decision {
            Decision::Finished | Decision::Hold => {}
            Decision::Resume => self.resume_suspended(),
            Decision::Spawn => self.spawn_next(),
            Decision::Throttle => self.throttle_running(),
        }

        let counts = self.registry.counts();
        info!(
            "Running tasks: {}, CPU util: {:.1}%, completed tasks: {}",
            counts.running, cpu, counts.completed
        );

        decision
    }

    fn resume_suspended(&mut self) {
        let Some(entry) = self.registry.resume_oldest() else {
            return;
        };
        match self.control.resume(entry.pid) {
            Ok(()) => info!("Resumed task {} (pid {})", entry.index, entry.pid),
            Err(e) => warn!("Failed to resume task {}: {}", entry.index, e),
        }
    }

    fn spawn_next(&mut self) {
        let Some(index) = self.registry.next_pending() else {
            return;
        };
        let command = self.template.render(&self.jobs[index]);
        debug!("Prepared command for task {}: {}", index, command);

        match ProcessHandle::spawn(&command, index) {
            Ok(handle) => {
                self.registry.mark_running(index, handle.pid());
                spawn_monitor(&mut self.monitors, handle, Arc::clone(&self.registry));
                info!("Spawned task {}", index);
            }
            Err(e) => {
                error!("Failed to spawn task {}: {}", index, e);
                self.registry.mark_spawn_failed(index);
            }
        }
    }

    fn throttle_running(&mut self) {
        match self.settings.throttle {
            ThrottleMode::Kill => {
                let Some(entry) = self.registry.kill_newest() else {
                    return;
                };
                match self.control.terminate(entry.pid) {
                    Ok(()) => info!("Killed task {} (pid {})", entry.index, entry.pid),
                    Err(e) => warn!("Failed to kill task {}: {}", entry.index, e),
                }
            }
            ThrottleMode::Suspend => {
                let Some(entry) = self.registry.suspend_newest() else {
                    return;
                };
                match self.control.suspend(entry.pid) {
                    Ok(()) => info!("Suspended task {} (pid {})", entry.index, entry.pid),
                    Err(e) => warn!("Failed to suspend task {}: {}", entry.index, e),
                }
            }
        }
    }

    /// Terminate every tracked process once and return the exit snapshot
    pub fn cancel(&mut self) -> Snapshot {
        let (snapshot, doomed) = self.registry.cancel_all();
        info!("Killing {} tracked processes", doomed.len());

        for entry in &doomed {
            // a stopped child cannot act on SIGTERM until it runs again
            let _ = self.control.resume(entry.pid);
            if let Err(e) = self.control.terminate(entry.pid) {
                warn!("Failed to terminate task {}: {}", entry.index, e);
            }
        }

        snapshot
    }
}
