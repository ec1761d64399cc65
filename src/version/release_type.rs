//! Release maturity classification

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::parse::Version;

static MILESTONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^M[0-9]+$").expect("valid milestone regex"));
static RELEASE_CANDIDATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^RC[0-9]+$").expect("valid release candidate regex"));
static SERVICE_RELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^SR[0-9]+$").expect("valid service release regex"));

const SNAPSHOT_MARKER: &str = "SNAPSHOT";
const RELEASE_MARKER: &str = "RELEASE";

/// Maturity of a version, ordered from least to most mature
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReleaseType {
    Snapshot,
    Milestone,
    ReleaseCandidate,
    Release,
    ServiceRelease,
}

impl ReleaseType {
    /// RELEASE and SR are general availability
    pub fn is_ga(&self) -> bool {
        matches!(self, ReleaseType::Release | ReleaseType::ServiceRelease)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Snapshot => "SNAPSHOT",
            ReleaseType::Milestone => "M",
            ReleaseType::ReleaseCandidate => "RC",
            ReleaseType::Release => "RELEASE",
            ReleaseType::ServiceRelease => "SR",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Version {
    /// Classify the version by its suffix.
    ///
    /// An empty suffix falls back to the patch number: `x.y.0` is a RELEASE,
    /// any other patch is a service release. Suffixes outside the known
    /// markers (e.g. `Final`) are treated as RELEASE.
    pub fn release_type(&self) -> ReleaseType {
        let suffix = self.suffix();
        if suffix.contains(SNAPSHOT_MARKER) {
            ReleaseType::Snapshot
        } else if MILESTONE_RE.is_match(suffix) {
            ReleaseType::Milestone
        } else if RELEASE_CANDIDATE_RE.is_match(suffix) {
            ReleaseType::ReleaseCandidate
        } else if SERVICE_RELEASE_RE.is_match(suffix) {
            ReleaseType::ServiceRelease
        } else if suffix.is_empty() {
            match self.numeric_patch() {
                Some(patch) if patch != 0 => ReleaseType::ServiceRelease,
                _ => ReleaseType::Release,
            }
        } else {
            ReleaseType::Release
        }
    }

    pub fn is_snapshot(&self) -> bool {
        self.release_type() == ReleaseType::Snapshot
    }

    pub fn is_ga(&self) -> bool {
        self.release_type().is_ga()
    }

    /// True when the suffix follows the pre-calver naming (`RELEASE`, `SR1`,
    /// `BUILD-SNAPSHOT`, or any dot-delimited suffix).
    pub fn uses_legacy_suffix(&self) -> bool {
        let suffix = self.suffix();
        if suffix.is_empty() {
            return false;
        }
        self.delimiter().as_char() == '.'
            || suffix == RELEASE_MARKER
            || suffix.starts_with("BUILD-")
            || SERVICE_RELEASE_RE.is_match(suffix)
    }
}
