/*!
 * Job Types
 * Task descriptors parsed from the input job list
 */

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Job list operation result
pub type JobResult<T> = Result<T, JobError>;

/// Job list errors
#[derive(Error, Debug)]
pub enum JobError {
    #[error("failed to read job list {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("job list is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("job list must be a JSON array of job objects")]
    NotAnArray,

    #[error("job {index}: {reason}")]
    BadShape { index: usize, reason: String },
}

/// A scalar argument value, the only value shape a job entry may carry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Str(v) => f.write_str(v),
        }
    }
}

/// One unit of work from the input list
///
/// Immutable once loaded; a task is addressed everywhere else by its index
/// into the loaded list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSpec {
    /// Positional arguments, joined space-separated into the command line
    #[serde(default)]
    pub args: Vec<Scalar>,
    /// Keyword arguments, rendered as `--name value` pairs
    #[serde(default)]
    pub kwargs: BTreeMap<String, Scalar>,
}

impl JobSpec {
    /// Space-joined positional arguments
    pub fn args_fragment(&self) -> String {
        self.args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `--name value` pairs in sorted key order, so rendered command lines
    /// are reproducible
    pub fn kwargs_fragment(&self) -> String {
        self.kwargs
            .iter()
            .map(|(name, value)| format!("--{name} {value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
