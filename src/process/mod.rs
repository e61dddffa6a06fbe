/*!
 * Process Management
 * Spawning, signalling, and monitoring child processes
 */

mod control;
mod handle;
mod monitor;
mod types;

#[cfg(unix)]
pub use control::SignalControl;
pub use control::{platform_control, ProcessControl, UnsupportedControl};
pub use handle::ProcessHandle;
pub use monitor::spawn_monitor;
pub use types::{ProcessError, ProcessResult};
