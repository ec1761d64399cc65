//! Version string decomposition
//!
//! Two shapes are recognised:
//! - Named train: `Hoxton.SR1`, `Dysprosium-BUILD-SNAPSHOT` (major is a word, minor/patch empty)
//! - Semantic: `1.0.0`, `1.0.0.RELEASE`, `2020.0.0-M1` (numeric major.minor.patch)
//!
//! Hyphen decomposition is tried first so that `Dysprosium-BUILD-SNAPSHOT` and
//! `1.0.0-RELEASE` are not mistaken for dotted versions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::version::error::VersionError;

/// Separator between the numeric part (or train name) and the suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Dot,
    Hyphen,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Dot => '.',
            Delimiter::Hyphen => '-',
        }
    }
}

/// Structured form of a version string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SplitVersion {
    pub major: String,
    pub minor: String,
    pub patch: String,
    pub delimiter: Delimiter,
    pub suffix: String,
}

impl SplitVersion {
    fn train(name: &str, delimiter: Delimiter, suffix: &str) -> Self {
        Self {
            major: name.to_string(),
            minor: String::new(),
            patch: String::new(),
            delimiter,
            suffix: suffix.to_string(),
        }
    }

    fn semantic(major: &str, minor: &str, patch: &str, delimiter: Delimiter, suffix: &str) -> Self {
        Self {
            major: major.to_string(),
            minor: minor.to_string(),
            patch: patch.to_string(),
            delimiter,
            suffix: suffix.to_string(),
        }
    }

    /// True when major is a train name rather than a number
    pub fn is_train(&self) -> bool {
        !is_numeric(&self.major)
    }
}

impl fmt::Display for SplitVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_train() {
            write!(f, "{}", self.major)?;
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        }
        if !self.suffix.is_empty() {
            write!(f, "{}{}", self.delimiter.as_char(), self.suffix)?;
        }
        Ok(())
    }
}

/// A parsed version: the raw string plus its unique decomposition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    raw: String,
    split: SplitVersion,
}

impl Version {
    /// Parse a version string, failing on anything that is neither a named
    /// train nor a semantic version.
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        if raw.trim().is_empty() {
            return Err(VersionError::invalid(raw, "version must not be empty"));
        }
        if raw.ends_with('.') || raw.ends_with('-') {
            return Err(VersionError::invalid(raw, "version must not end with a delimiter"));
        }

        let split = split_hyphenated(raw)
            .or_else(|| split_dotted(raw))
            .ok_or_else(|| {
                VersionError::invalid(
                    raw,
                    "expected <train>.<suffix> or <major>.<minor>.<patch>[.|-<suffix>]",
                )
            })?;

        Ok(Self {
            raw: raw.to_string(),
            split,
        })
    }

    /// Build a version from an already decomposed form
    pub(crate) fn from_split(split: SplitVersion) -> Self {
        Self {
            raw: split.to_string(),
            split,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn split(&self) -> &SplitVersion {
        &self.split
    }

    pub fn major(&self) -> &str {
        &self.split.major
    }

    pub fn minor(&self) -> &str {
        &self.split.minor
    }

    pub fn patch(&self) -> &str {
        &self.split.patch
    }

    pub fn suffix(&self) -> &str {
        &self.split.suffix
    }

    pub fn delimiter(&self) -> Delimiter {
        self.split.delimiter
    }

    pub fn is_train(&self) -> bool {
        self.split.is_train()
    }

    pub fn is_semantic(&self) -> bool {
        !self.split.is_train()
    }

    pub(crate) fn numeric_major(&self) -> Option<u64> {
        self.split.major.parse().ok()
    }

    pub(crate) fn numeric_minor(&self) -> Option<u64> {
        self.split.minor.parse().ok()
    }

    pub(crate) fn numeric_patch(&self) -> Option<u64> {
        self.split.patch.parse().ok()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Version::parse(&value)
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.raw
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// A train name is a single alphanumeric word that starts with a letter
fn is_train_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// `Finchley-RELEASE`, `Dysprosium-BUILD-SNAPSHOT`, `1.0.0-SNAPSHOT`, `2020.0.0-M1`
fn split_hyphenated(raw: &str) -> Option<SplitVersion> {
    let (head, suffix) = raw.split_once('-')?;
    if head.is_empty() || suffix.is_empty() {
        return None;
    }

    if is_train_name(head) {
        return Some(SplitVersion::train(head, Delimiter::Hyphen, suffix));
    }

    match head.split('.').collect::<Vec<_>>().as_slice() {
        [major, minor, patch] if is_numeric(major) && is_numeric(minor) && is_numeric(patch) => {
            Some(SplitVersion::semantic(
                major,
                minor,
                patch,
                Delimiter::Hyphen,
                suffix,
            ))
        }
        _ => None,
    }
}

/// `Hoxton.SR1`, `Hoxton.BUILD-SNAPSHOT`, `1.0.0`, `1.0.0.RELEASE`
fn split_dotted(raw: &str) -> Option<SplitVersion> {
    let (head, rest) = raw.split_once('.')?;
    if is_train_name(head) {
        return Some(SplitVersion::train(head, Delimiter::Dot, rest));
    }

    match raw.splitn(4, '.').collect::<Vec<_>>().as_slice() {
        [major, minor, patch] if is_numeric(major) && is_numeric(minor) && is_numeric(patch) => {
            Some(SplitVersion::semantic(major, minor, patch, Delimiter::Dot, ""))
        }
        [major, minor, patch, suffix]
            if is_numeric(major) && is_numeric(minor) && is_numeric(patch) =>
        {
            Some(SplitVersion::semantic(
                major,
                minor,
                patch,
                Delimiter::Dot,
                suffix,
            ))
        }
        _ => None,
    }
}
