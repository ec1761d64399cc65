use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::bom::contribution::CustomContribution;
use crate::bom::hook::VersionHook;
use crate::bom::train::TrainIdentity;
use crate::host::DEFAULT_BASE_URL;
use crate::parser::types::BuildSystem;
use crate::rewrite::rules::IgnoreRules;
use crate::version::Version;

// =============================================================================
// Defaults
// =============================================================================

/// Default timeout for external processes in seconds (10 minutes)
pub const DEFAULT_PROCESS_TIMEOUT_SECS: u64 = 600;

/// Default branch of the BOM repository
pub const DEFAULT_BOM_BRANCH: &str = "main";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Releaser configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaserConfig {
    pub train: TrainConfig,
    pub build_systems: BuildSystemsConfig,
    /// Versions that always win over what the BOM declares
    pub fixed_versions: IndexMap<String, Version>,
    /// Merged after the BOM source, in order
    pub contributions: Vec<CustomContribution>,
    pub process: ProcessConfig,
    pub host: HostConfig,
}

/// Release train identity and BOM location
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainConfig {
    pub canonical: String,
    pub aliases: Vec<String>,
    pub bom_artifact_id: Option<String>,
    pub bom_url: Option<String>,
    pub bom_branch: String,
    pub propagations: Vec<VersionHook>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            canonical: String::new(),
            aliases: Vec::new(),
            bom_artifact_id: None,
            bom_url: None,
            bom_branch: DEFAULT_BOM_BRANCH.to_string(),
            propagations: Vec::new(),
        }
    }
}

/// Build-system specific configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BuildSystemsConfig {
    pub maven: IgnoreConfig,
    pub gradle: IgnoreConfig,
}

/// Regexes excluding descriptors from rewriting and lines from the version check
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct IgnoreConfig {
    /// Matched against the descriptor path relative to the project root
    pub ignore_paths: Vec<String>,
    pub ignored_lines: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessConfig {
    pub timeout_secs: u64,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_PROCESS_TIMEOUT_SECS,
        }
    }
}

/// Code hosting API configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HostConfig {
    pub base_url: String,
    pub organization: String,
    pub token: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            organization: String::new(),
            token: None,
        }
    }
}

impl ReleaserConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn train_identity(&self) -> TrainIdentity {
        let identity =
            TrainIdentity::new(self.train.canonical.clone()).with_aliases(self.train.aliases.clone());
        match &self.train.bom_artifact_id {
            Some(artifact_id) => identity.with_bom_artifact_id(artifact_id.clone()),
            None => identity,
        }
    }

    /// Compile the ignore patterns of every build system
    pub fn ignore_rules(&self) -> Result<HashMap<BuildSystem, IgnoreRules>, ConfigError> {
        Ok(HashMap::from([
            (BuildSystem::Maven, self.build_systems.maven.compile()?),
            (BuildSystem::Gradle, self.build_systems.gradle.compile()?),
        ]))
    }

    pub fn process_timeout(&self) -> Duration {
        Duration::from_secs(self.process.timeout_secs)
    }
}

impl IgnoreConfig {
    fn compile(&self) -> Result<IgnoreRules, ConfigError> {
        Ok(IgnoreRules::new(
            compile_patterns(&self.ignore_paths)?,
            compile_patterns(&self.ignored_lines)?,
        ))
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Returns the path to the data directory for release-train.
/// Uses $XDG_DATA_HOME/release-train if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/release-train,
/// or ./release-train if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the directory BOM repositories are cloned into.
pub fn clones_dir() -> PathBuf {
    data_dir().join("clones")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("release-train.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("release-train")
}
