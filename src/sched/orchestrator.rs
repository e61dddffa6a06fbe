/*!
 * Scheduling Loop
 * Drives admission ticks until the job list drains or cancellation lands
 */

use super::admission::{AdmissionController, Decision};
use super::cpu::CpuSampler;
use crate::core::config::Settings;
use crate::jobs::{CommandTemplate, JobSpec};
use crate::process::platform_control;
use crate::registry::{SnapshotWriter, TaskRegistry};
use chrono::Local;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info};

/// Orchestrator startup result
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// Startup errors; anything after startup is per-task and isolated
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("job list is empty; nothing to schedule")]
    EmptyJobList,
}

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every task settled; `failed` counts tasks that did not complete
    Completed { failed: usize },
    /// Cancelled before completion
    Cancelled,
}

/// Forward Ctrl-C into a shutdown watch channel
///
/// The forwarder keeps listening after the first interrupt, so repeated
/// Ctrl-C during cleanup is absorbed and shutdown stays idempotent.
pub fn ctrl_c_watcher() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                break;
            }
            if tx.send(true).is_err() {
                break;
            }
        }
    });
    rx
}

/// The coordinating unit: one scheduling loop around the admission
/// controller, with snapshot persistence on both exit paths
pub struct Orchestrator {
    settings: Settings,
    controller: AdmissionController,
    sampler: CpuSampler,
    registry: Arc<TaskRegistry>,
    shutdown: watch::Receiver<bool>,
}

impl Orchestrator {
    /// Validate inputs and assemble the scheduling state
    ///
    /// Fails before any process is spawned when there is nothing to run.
    pub fn new(
        settings: Settings,
        jobs: Vec<JobSpec>,
        template: CommandTemplate,
        shutdown: watch::Receiver<bool>,
    ) -> OrchestratorResult<Self> {
        if jobs.is_empty() {
            return Err(OrchestratorError::EmptyJobList);
        }

        let registry = Arc::new(TaskRegistry::new(jobs.len()));
        let sampler = CpuSampler::new(settings.sample_window);
        let cores = sampler.logical_cores();
        let controller = AdmissionController::new(
            settings.clone(),
            jobs,
            template,
            Arc::clone(&registry),
            platform_control(),
            cores,
        );

        Ok(Self {
            settings,
            controller,
            sampler,
            registry,
            shutdown,
        })
    }

    /// Registry shared with the monitor tasks
    pub fn registry(&self) -> Arc<TaskRegistry> {
        Arc::clone(&self.registry)
    }

    /// Run to completion or cancellation
    ///
    /// Exactly one snapshot is written on either path, keyed by the
    /// timestamp taken here at loop start.
    pub async fn run(mut self) -> RunOutcome {
        let writer = SnapshotWriter::new(&self.settings.snapshot_dir, Local::now());
        info!(
            "Scheduling {} tasks (max {} parallel, target {:.0}% CPU)",
            self.registry.total(),
            self.settings.max_processes,
            self.settings.target_cpu_percent
        );

        let mut shutdown = self.shutdown.clone();
        let outcome = loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("Cancellation requested");
                    break RunOutcome::Cancelled;
                }
                decision = self.tick_cycle() => {
                    if decision == Decision::Finished {
                        info!("All tasks settled, exiting main loop");
                        break RunOutcome::Completed {
                            failed: self.registry.counts().failed,
                        };
                    }
                }
            }
        };

        let snapshot = match outcome {
            RunOutcome::Cancelled => self.controller.cancel(),
            RunOutcome::Completed { .. } => self.registry.snapshot(),
        };

        if let Err(e) = writer.write(&snapshot) {
            error!("Snapshot write failed: {}", e);
        }

        outcome
    }

    /// One full tick: sample, decide, act, settle
    ///
    /// All registry mutation happens before the settle sleep, so the run
    /// loop may drop this future at a cancellation point without losing
    /// state.
    async fn tick_cycle(&mut self) -> Decision {
        let cpu = self.sampler.sample().await;
        let decision = self.controller.tick(cpu);
        if decision.changes_state() {
            tokio::time::sleep(self.settings.settle_delay).await;
        }
        decision
    }
}
