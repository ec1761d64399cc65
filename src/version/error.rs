use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion {
        version: String,
        reason: &'static str,
    },
}

impl VersionError {
    pub(crate) fn invalid(version: &str, reason: &'static str) -> Self {
        VersionError::InvalidVersion {
            version: version.to_string(),
            reason,
        }
    }
}
