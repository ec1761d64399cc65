use std::path::PathBuf;

use thiserror::Error;

use crate::parser::traits::ParseError;
use crate::version::error::VersionError;

#[derive(Debug, Error)]
pub enum BomError {
    #[error("Unknown project '{name}'. Known projects: [{}]", .known.join(", "))]
    UnknownProject { name: String, known: Vec<String> },

    #[error(transparent)]
    InvalidVersion(#[from] VersionError),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
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

    #[error("No BOM source can resolve {}", .root.display())]
    NoApplicableSource { root: PathBuf },

    #[error("BOM at {} does not declare a train version", .root.display())]
    MissingTrainVersion { root: PathBuf },
}
