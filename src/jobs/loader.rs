/*!
 * Job Loading
 * Reads and shape-validates the input job list before scheduling begins
 */

use super::types::{JobError, JobResult, JobSpec};
use std::path::Path;
use tracing::debug;

/// Load the job list, failing fast on any malformed entry
///
/// The input must be a JSON array; each entry may carry an `args` array and
/// a `kwargs` object of scalar values. Unknown keys are ignored.
pub fn load_jobs(path: &Path) -> JobResult<Vec<JobSpec>> {
    let raw = std::fs::read_to_string(path).map_err(|source| JobError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let value: serde_json::Value = serde_json::from_str(&raw)?;
    let entries = value.as_array().ok_or(JobError::NotAnArray)?;

    let mut jobs = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let job = serde_json::from_value(entry.clone()).map_err(|e| JobError::BadShape {
            index,
            reason: e.to_string(),
        })?;
        jobs.push(job);
    }

    debug!("Loaded {} jobs from {}", jobs.len(), path.display());
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn job_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_jobs() {
        let file = job_file(r#"[{"args": [1, 2]}, {"kwargs": {"n": 5}}, {}]"#);
        let jobs = load_jobs(file.path()).unwrap();

        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].args_fragment(), "1 2");
        assert_eq!(jobs[1].kwargs_fragment(), "--n 5");
        assert!(jobs[2].args.is_empty());
    }

    #[test]
    fn test_extra_keys_ignored() {
        let file = job_file(r#"[{"args": [], "note": "ignored"}]"#);
        assert_eq!(load_jobs(file.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_top_level_must_be_array() {
        let file = job_file(r#"{"args": []}"#);
        assert!(matches!(
            load_jobs(file.path()),
            Err(JobError::NotAnArray)
        ));
    }

    #[test]
    fn test_bad_args_shape() {
        let file = job_file(r#"[{"args": "not-a-list"}]"#);
        assert!(matches!(
            load_jobs(file.path()),
            Err(JobError::BadShape { index: 0, .. })
        ));
    }

    #[test]
    fn test_bad_kwargs_value() {
        let file = job_file(r#"[{}, {"kwargs": {"k": [1]}}]"#);
        assert!(matches!(
            load_jobs(file.path()),
            Err(JobError::BadShape { index: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_jobs(Path::new("/nonexistent/jobs.json")),
            Err(JobError::Read { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        let file = job_file("[{");
        assert!(matches!(load_jobs(file.path()), Err(JobError::Parse(_))));
    }
}
