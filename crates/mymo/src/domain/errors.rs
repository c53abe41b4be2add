//! Domain-specific errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a generation run.
///
/// Per-file read and write failures are not represented here; they are
/// collected into the generation report and the batch continues.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to fetch template from '{url}': {message}")]
    Fetch { url: String, message: String },
    #[error("failed to rewrite package manifest {}: {message}", .path.display())]
    Manifest { path: PathBuf, message: String },
    #[error("failed to enumerate template files under {}: {message}", .root.display())]
    Enumerate { root: PathBuf, message: String },
    #[error("failed to remove previous output {}", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project name '{0}'")]
    InvalidName(String),
}
