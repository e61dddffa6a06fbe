/*!
 * Task Registry
 * Shared bookkeeping of running, suspended, completed, terminated, and
 * failed task indices
 */

mod snapshot;

pub use snapshot::{Snapshot, SnapshotError, SnapshotResult, SnapshotWriter};

use crate::core::types::{Pid, TaskIndex, TaskState};
use parking_lot::Mutex;
use std::collections::{BTreeSet, VecDeque};

/// A task currently backed by a live (running or stopped) OS process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningEntry {
    pub index: TaskIndex,
    pub pid: Pid,
}

#[derive(Debug, Default)]
struct RegistryState {
    /// Insertion-ordered; newest popped for throttling, arbitrary removal on exit
    running: Vec<RunningEntry>,
    /// FIFO; the oldest suspended task is resumed first
    suspended: VecDeque<RunningEntry>,
    /// Append-only; may contain duplicates, readers deduplicate
    completed: Vec<TaskIndex>,
    /// Append-only; populated on explicit kill and on cancellation
    terminated: Vec<TaskIndex>,
    /// Append-only; spawn failures and non-zero exits
    failed: Vec<TaskIndex>,
    cancelled: bool,
}

/// Counts consumed by the admission decision, read as one consistent view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub running: usize,
    pub suspended: usize,
    /// Distinct completed indices
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
}

/// Thread-safe task bookkeeping shared by the scheduling loop and monitors
///
/// Every compound check-then-act transition runs under one mutex, so
/// concurrent monitor tasks and the admission controller always observe a
/// consistent state and no index can land in two active sets.
#[derive(Debug)]
pub struct TaskRegistry {
    total: usize,
    state: Mutex<RegistryState>,
}

impl TaskRegistry {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            state: Mutex::new(RegistryState::default()),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Register a freshly spawned process as running
    pub fn mark_running(&self, index: TaskIndex, pid: Pid) {
        self.state.lock().running.push(RunningEntry { index, pid });
    }

    /// Record a task whose process could not be spawned
    pub fn mark_spawn_failed(&self, index: TaskIndex) {
        self.state.lock().failed.push(index);
    }

    /// Move the most recently spawned running task to the suspended queue
    pub fn suspend_newest(&self) -> Option<RunningEntry> {
        let mut state = self.state.lock();
        let entry = state.running.pop()?;
        state.suspended.push_back(entry);
        Some(entry)
    }

    /// Move the oldest suspended task back to running
    pub fn resume_oldest(&self) -> Option<RunningEntry> {
        let mut state = self.state.lock();
        let entry = state.suspended.pop_front()?;
        state.running.push(entry);
        Some(entry)
    }

    /// Remove the most recently spawned running task and record the kill
    pub fn kill_newest(&self) -> Option<RunningEntry> {
        let mut state = self.state.lock();
        let entry = state.running.pop()?;
        state.terminated.push(entry.index);
        Some(entry)
    }

    /// Settle a process exit reported by its monitor task
    ///
    /// Removes the index from whichever active set holds it, then classifies
    /// the exit in the same critical section: code zero completes the task,
    /// an explicitly killed task is already accounted for in `terminated`,
    /// anything else is failed. Running one compound operation here closes
    /// the window between a throttle decision and a concurrent exit.
    pub fn settle_exit(&self, index: TaskIndex, exit_code: Option<i32>) {
        let mut state = self.state.lock();
        if let Some(pos) = state.running.iter().position(|e| e.index == index) {
            state.running.remove(pos);
        } else if let Some(pos) = state.suspended.iter().position(|e| e.index == index) {
            state.suspended.remove(pos);
        }

        match exit_code {
            Some(0) => state.completed.push(index),
            _ if state.terminated.contains(&index) => {}
            _ => state.failed.push(index),
        }
    }

    /// Lowest pending index, or `None` when nothing is left to start
    ///
    /// Pending is the full index space minus running, suspended, completed,
    /// and failed; lowest-first keeps the spawn sequence reproducible for
    /// identical inputs and CPU samples.
    pub fn next_pending(&self) -> Option<TaskIndex> {
        let state = self.state.lock();
        (0..self.total).find(|&index| !Self::is_active(&state, index))
    }

    fn is_active(state: &RegistryState, index: TaskIndex) -> bool {
        state.running.iter().any(|e| e.index == index)
            || state.suspended.iter().any(|e| e.index == index)
            || state.completed.contains(&index)
            || state.failed.contains(&index)
    }

    /// Lifecycle state of one task index
    pub fn state_of(&self, index: TaskIndex) -> TaskState {
        let state = self.state.lock();
        if state.running.iter().any(|e| e.index == index) {
            TaskState::Running
        } else if state.suspended.iter().any(|e| e.index == index) {
            TaskState::Suspended
        } else if state.completed.contains(&index) {
            TaskState::Completed
        } else if state.terminated.contains(&index) {
            TaskState::Terminated
        } else if state.failed.contains(&index) {
            TaskState::Failed
        } else {
            TaskState::Pending
        }
    }

    /// Consistent snapshot of the counts driving admission decisions
    pub fn counts(&self) -> Counts {
        let state = self.state.lock();
        let completed: BTreeSet<TaskIndex> = state.completed.iter().copied().collect();
        let active = state.running.len() + state.suspended.len();
        Counts {
            running: state.running.len(),
            suspended: state.suspended.len(),
            completed: completed.len(),
            failed: state.failed.len(),
            pending: self.total - completed.len() - state.failed.len() - active,
        }
    }

    /// Whether every task has settled as completed or failed
    pub fn is_drained(&self) -> bool {
        let counts = self.counts();
        counts.completed + counts.failed == self.total
    }

    /// Atomically record cancellation for every tracked process
    ///
    /// Appends each running and suspended index to `terminated` while
    /// leaving its running/suspended membership in place, so the snapshot
    /// shows both where the task was and that it was killed. Returns the
    /// snapshot captured at that instant together with the entries to
    /// signal. A second call finds the registry already cancelled and
    /// returns no entries, keeping shutdown idempotent.
    pub fn cancel_all(&self) -> (Snapshot, Vec<RunningEntry>) {
        let mut state = self.state.lock();
        let mut doomed = Vec::new();

        if !state.cancelled {
            state.cancelled = true;
            doomed.extend(state.running.iter().copied());
            doomed.extend(state.suspended.iter().copied());
            let mut indices = doomed.iter().map(|e| e.index).collect();
            state.terminated.append(&mut indices);
        }

        (Self::snapshot_locked(&state), doomed)
    }

    /// Consistent point-in-time copy of all index lists
    pub fn snapshot(&self) -> Snapshot {
        Self::snapshot_locked(&self.state.lock())
    }

    fn snapshot_locked(state: &RegistryState) -> Snapshot {
        Snapshot {
            running_indices: state.running.iter().map(|e| e.index).collect(),
            terminated_indices: state.terminated.clone(),
            completed_indices: state.completed.clone(),
            suspended_indices: state.suspended.iter().map(|e| e.index).collect(),
            failed_indices: state.failed.clone(),
        }
    }
}
