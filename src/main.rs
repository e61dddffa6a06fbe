/*!
 * loadgate - Main Entry Point
 *
 * Admission-control orchestrator for batch shell workloads:
 * - throttles process concurrency against a CPU utilization target
 * - suspends or kills children under pressure, resumes them when it lifts
 * - persists a task-state snapshot on exit
 *
 * Exit status: 0 when every task completed, 1 when the loop drained but
 * some tasks failed, 2 on a startup error, 130 when cancelled.
 */

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use loadgate::observability::init_tracing;
use loadgate::{
    ctrl_c_watcher, load_jobs, CommandTemplate, Orchestrator, RunOutcome, Settings, ThrottleMode,
};

/// Schedule a list of shell jobs under a CPU utilization target
#[derive(Debug, Parser)]
#[command(name = "loadgate", version, about)]
struct Cli {
    /// Path to the JSON job list (array of {args, kwargs} objects)
    #[arg(long = "input-json")]
    input_json: PathBuf,

    /// Command template; `{args}` and `{kwargs}` are substituted per job
    #[arg(long = "run-script")]
    run_script: String,

    /// Aggregate CPU utilization to steer toward, in percent
    #[arg(long = "target-cpu-utilization", default_value_t = 80)]
    target_cpu_utilization: u8,

    /// Maximum number of concurrently running tasks (default: cores - 2)
    #[arg(long = "max-processes")]
    max_processes: Option<usize>,

    /// Kill tasks under CPU pressure instead of suspending them
    #[arg(long = "kill-tasks")]
    kill_tasks: bool,

    /// Directory the run snapshot is written to
    #[arg(long = "snapshot-dir", default_value = ".")]
    snapshot_dir: PathBuf,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let jobs = match load_jobs(&cli.input_json) {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };

    let template = CommandTemplate::new(cli.run_script);
    if !template.has_placeholders() {
        warn!("Run script has no {{args}} or {{kwargs}} placeholder; every task runs the same command");
    }

    let mut settings = Settings::default()
        .with_target_cpu(f32::from(cli.target_cpu_utilization))
        .with_snapshot_dir(cli.snapshot_dir);
    if let Some(max) = cli.max_processes {
        settings = settings.with_max_processes(max);
    }
    if cli.kill_tasks {
        settings = settings.with_throttle(ThrottleMode::Kill);
    }

    let orchestrator = match Orchestrator::new(settings, jobs, template, ctrl_c_watcher()) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
    };

    match orchestrator.run().await {
        RunOutcome::Completed { failed: 0 } => {
            info!("All inputs processed. Exiting..");
            ExitCode::SUCCESS
        }
        RunOutcome::Completed { failed } => {
            error!("{} tasks did not complete", failed);
            ExitCode::from(1)
        }
        RunOutcome::Cancelled => ExitCode::from(130),
    }
}
