//! Derived versions: bumps, post-release snapshots and previous tag lookups

use crate::version::parse::{Delimiter, SplitVersion, Version};

const LEGACY_SNAPSHOT: &str = "BUILD-SNAPSHOT";
const SNAPSHOT: &str = "SNAPSHOT";

impl Version {
    /// Increment the patch of a semantic version, keeping the suffix.
    /// Named trains are returned unchanged.
    pub fn bump(&self) -> Version {
        let Some(patch) = self.numeric_patch() else {
            return self.clone();
        };
        Version::from_split(SplitVersion {
            patch: (patch + 1).to_string(),
            ..self.split().clone()
        })
    }

    /// The development version that follows this one.
    ///
    /// GA versions are bumped first. The snapshot marker keeps the legacy
    /// long form (`1.0.1.BUILD-SNAPSHOT`) when the version used it and
    /// becomes `-SNAPSHOT` otherwise.
    pub fn post_release_snapshot(&self) -> Version {
        let base = if self.is_ga() { self.bump() } else { self.clone() };
        let (delimiter, marker) = if self.uses_legacy_suffix() {
            (self.delimiter(), LEGACY_SNAPSHOT)
        } else {
            (Delimiter::Hyphen, SNAPSHOT)
        };
        Version::from_split(SplitVersion {
            delimiter,
            suffix: marker.to_string(),
            ..base.split().clone()
        })
    }

    /// Tag of the previous patch release, e.g. `v1.0.2` for `1.0.3`.
    ///
    /// Returns `None` for patch 0 and for named trains.
    pub fn previous_patch_tag(&self, prefix: &str, suffix_override: Option<&str>) -> Option<String> {
        let (major, minor, patch) = self.numeric_triple()?;
        if patch == 0 {
            return None;
        }
        let suffix = suffix_override.unwrap_or(self.suffix());
        Some(self.tag(prefix, &format!("{major}.{minor}.{}", patch - 1), suffix))
    }

    /// Glob matching every patch of the previous minor, e.g. `v1.1.*` for `1.2.3`.
    ///
    /// Returns `None` for minor 0 and for named trains.
    pub fn previous_minor_tag_pattern(&self, prefix: &str) -> Option<String> {
        let (major, minor, _) = self.numeric_triple()?;
        if minor == 0 {
            return None;
        }
        Some(format!("{prefix}{major}.{}.*", minor - 1))
    }

    /// Glob matching every release of the previous major, e.g. `v1.*` for `2.0.0`.
    ///
    /// Returns `None` for major 0 and for named trains.
    pub fn previous_major_tag_pattern(&self, prefix: &str) -> Option<String> {
        let (major, _, _) = self.numeric_triple()?;
        if major == 0 {
            return None;
        }
        Some(format!("{prefix}{}.*", major - 1))
    }

    fn numeric_triple(&self) -> Option<(u64, u64, u64)> {
        Some((
            self.numeric_major()?,
            self.numeric_minor()?,
            self.numeric_patch()?,
        ))
    }

    fn tag(&self, prefix: &str, numbers: &str, suffix: &str) -> String {
        if suffix.is_empty() {
            format!("{prefix}{numbers}")
        } else {
            format!("{prefix}{numbers}{}{suffix}", self.delimiter().as_char())
        }
    }
}
