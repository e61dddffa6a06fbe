/*!
 * Jobs
 * Input job list loading and command templating
 */

mod loader;
mod template;
mod types;

pub use loader::load_jobs;
pub use template::{CommandTemplate, ARGS_TOKEN, KWARGS_TOKEN};
pub use types::{JobError, JobResult, JobSpec, Scalar};
