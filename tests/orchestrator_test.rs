/*!
 * Orchestrator Tests
 * End-to-end scheduling scenarios over real child processes
 */

#![cfg(unix)]

use loadgate::{
    CommandTemplate, JobSpec, Orchestrator, OrchestratorError, RunOutcome, Settings, Snapshot,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;

fn fast_settings(dir: &Path, max_processes: usize) -> Settings {
    Settings::default()
        // Far above any real sample, so admission is always available
        .with_target_cpu(400.0)
        .with_max_processes(max_processes)
        .with_sample_window(Duration::ZERO)
        .with_settle_delay(Duration::from_millis(10))
        .with_snapshot_dir(dir.to_path_buf())
}

fn jobs(n: usize) -> Vec<JobSpec> {
    vec![JobSpec::default(); n]
}

fn read_snapshot(dir: &Path) -> Snapshot {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected exactly one snapshot file");
    let body = std::fs::read_to_string(entries.pop().unwrap()).unwrap();
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn test_five_tasks_run_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let (_tx, rx) = watch::channel(false);

    let orchestrator = Orchestrator::new(
        fast_settings(dir.path(), 2),
        jobs(5),
        CommandTemplate::new("true"),
        rx,
    )
    .unwrap();

    let outcome = timeout(Duration::from_secs(30), orchestrator.run())
        .await
        .unwrap();
    assert_eq!(outcome, RunOutcome::Completed { failed: 0 });

    let snapshot = read_snapshot(dir.path());
    let mut completed = snapshot.completed_indices.clone();
    completed.sort_unstable();
    completed.dedup();

    assert_eq!(completed, vec![0, 1, 2, 3, 4]);
    assert!(snapshot.running_indices.is_empty());
    assert!(snapshot.suspended_indices.is_empty());
    assert!(snapshot.failed_indices.is_empty());
}

#[tokio::test]
async fn test_arguments_reach_the_command() {
    let dir = tempfile::tempdir().unwrap();
    let (_tx, rx) = watch::channel(false);

    let marker_a = dir.path().join("a.out");
    let marker_b = dir.path().join("b.out");
    let jobs: Vec<JobSpec> = vec![
        serde_json::from_str(&format!(r#"{{"args": ["{}"]}}"#, marker_a.display())).unwrap(),
        serde_json::from_str(&format!(r#"{{"args": ["{}"]}}"#, marker_b.display())).unwrap(),
    ];

    let snapshot_dir = tempfile::tempdir().unwrap();
    let orchestrator = Orchestrator::new(
        fast_settings(snapshot_dir.path(), 2),
        jobs,
        CommandTemplate::new("echo done > {args}"),
        rx,
    )
    .unwrap();

    let outcome = timeout(Duration::from_secs(30), orchestrator.run())
        .await
        .unwrap();
    assert_eq!(outcome, RunOutcome::Completed { failed: 0 });

    assert_eq!(std::fs::read_to_string(marker_a).unwrap().trim(), "done");
    assert_eq!(std::fs::read_to_string(marker_b).unwrap().trim(), "done");
}

#[tokio::test]
async fn test_nonzero_exits_settle_as_failed() {
    let dir = tempfile::tempdir().unwrap();
    let (_tx, rx) = watch::channel(false);

    let orchestrator = Orchestrator::new(
        fast_settings(dir.path(), 2),
        jobs(2),
        CommandTemplate::new("exit 1"),
        rx,
    )
    .unwrap();

    let outcome = timeout(Duration::from_secs(30), orchestrator.run())
        .await
        .unwrap();
    assert_eq!(outcome, RunOutcome::Completed { failed: 2 });

    let snapshot = read_snapshot(dir.path());
    let mut failed = snapshot.failed_indices.clone();
    failed.sort_unstable();

    assert_eq!(failed, vec![0, 1]);
    assert!(snapshot.completed_indices.is_empty());
}

#[tokio::test]
async fn test_cancellation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, rx) = watch::channel(false);

    let orchestrator = Orchestrator::new(
        fast_settings(dir.path(), 2),
        jobs(3),
        CommandTemplate::new("sleep 30"),
        rx,
    )
    .unwrap();
    let registry = orchestrator.registry();

    let run = tokio::spawn(orchestrator.run());

    // Wait for the parallelism ceiling to fill
    timeout(Duration::from_secs(30), async {
        while registry.counts().running < 2 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .unwrap();

    // A second interrupt during cleanup must change nothing
    tx.send(true).unwrap();
    let _ = tx.send(true);

    let outcome = timeout(Duration::from_secs(30), run).await.unwrap().unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled);

    // Exactly one snapshot write, with both tracked tasks recorded as
    // terminated while still listed where they were running
    let snapshot = read_snapshot(dir.path());
    assert_eq!(snapshot.running_indices, vec![0, 1]);
    assert_eq!(snapshot.terminated_indices, vec![0, 1]);
    assert!(snapshot.suspended_indices.is_empty());
    assert!(snapshot.completed_indices.is_empty());
}

#[tokio::test]
async fn test_empty_job_list_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (_tx, rx) = watch::channel(false);

    let result = Orchestrator::new(
        fast_settings(dir.path(), 2),
        Vec::new(),
        CommandTemplate::new("true"),
        rx,
    );

    assert!(matches!(result, Err(OrchestratorError::EmptyJobList)));
}
