//! Version markers a release must not leave behind
//!
//! | target maturity | forbidden                    |
//! |-----------------|------------------------------|
//! | SNAPSHOT        | nothing                      |
//! | M / RC          | `SNAPSHOT`                   |
//! | RELEASE / SR    | `SNAPSHOT`, `.M<n>`, `.RC<n>`|

use std::sync::LazyLock;

use regex::Regex;

use crate::version::{ReleaseType, Version};

static SNAPSHOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"SNAPSHOT").expect("valid snapshot regex"));
static MILESTONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.\-]M[0-9]+\b").expect("valid milestone regex"));
static RELEASE_CANDIDATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.\-]RC[0-9]+\b").expect("valid release candidate regex"));

#[derive(Debug, Clone, Default)]
pub struct ForbiddenPatternSet {
    patterns: Vec<&'static Regex>,
}

impl ForbiddenPatternSet {
    pub fn for_release_type(release_type: ReleaseType) -> Self {
        let patterns = match release_type {
            ReleaseType::Snapshot => vec![],
            ReleaseType::Milestone | ReleaseType::ReleaseCandidate => vec![&*SNAPSHOT_RE],
            ReleaseType::Release | ReleaseType::ServiceRelease => {
                vec![&*SNAPSHOT_RE, &*MILESTONE_RE, &*RELEASE_CANDIDATE_RE]
            }
        };
        Self { patterns }
    }

    pub fn for_version(version: &Version) -> Self {
        Self::for_release_type(version.release_type())
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Source of the first pattern the line matches
    pub fn first_match(&self, line: &str) -> Option<&'static str> {
        self.patterns
            .iter()
            .find(|pattern| pattern.is_match(line))
            .map(|pattern| pattern.as_str())
    }
}
