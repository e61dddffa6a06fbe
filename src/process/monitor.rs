/*!
 * Monitor Tasks
 * One concurrent exit-wait per spawned process
 */

use super::handle::ProcessHandle;
use crate::registry::TaskRegistry;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Hand a spawned process to its monitor task
///
/// The monitor blocks on the child's exit (the scheduling loop never does)
/// and settles the result in the registry; it is the only unit that observes
/// the exit code. Suspending the task stops the child, not this monitor,
/// which keeps waiting until the process actually exits.
pub fn spawn_monitor(
    monitors: &mut JoinSet<()>,
    handle: ProcessHandle,
    registry: Arc<TaskRegistry>,
) {
    monitors.spawn(async move {
        let index = handle.index();
        match handle.wait().await {
            Ok(code) => {
                debug!("Task {} exited with code {:?}", index, code);
                registry.settle_exit(index, code);
            }
            Err(e) => {
                warn!("Wait failed for task {}: {}", index, e);
                registry.settle_exit(index, None);
            }
        }
    });
}
