use std::path::PathBuf;

use thiserror::Error;

use crate::parser::traits::ParseError;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("I/O failure on {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// A rewritten descriptor still carries a version the release forbids.
    /// The file has already been written when this is raised.
    #[error(
        "Forbidden version pattern '{pattern}' in {}:{line_number}: {line}",
        .path.display()
    )]
    VersionInvariantViolation {
        path: PathBuf,
        /// 1-based
        line_number: usize,
        line: String,
        pattern: String,
    },
}

impl RewriteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RewriteError::IoFailure {
            path: path.into(),
            source,
        }
    }
}
