//! Custom version contributions merged after primary BOM resolution

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::bom::error::BomError;
use crate::parser::properties::parse_properties;
use crate::version::Version;

/// A partial set of versions contributed on top of the resolved BOM.
///
/// Contributions are applied in configuration order; later ones win.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CustomContribution {
    /// Contributes nothing
    #[default]
    NoOp,
    /// Keys ending with `suffix` in a properties file under the BOM root
    /// (e.g., `spring-cloud-build.version=2.2.1.RELEASE`)
    PropertiesFile {
        path: PathBuf,
        #[serde(default = "default_suffix")]
        suffix: String,
    },
    /// Versions listed inline
    Fixed { versions: IndexMap<String, Version> },
}

fn default_suffix() -> String {
    ".version".to_string()
}

impl CustomContribution {
    pub fn contribute(&self, bom_root: &Path) -> Result<IndexMap<String, Version>, BomError> {
        match self {
            CustomContribution::NoOp => Ok(IndexMap::new()),
            CustomContribution::Fixed { versions } => Ok(versions.clone()),
            CustomContribution::PropertiesFile { path, suffix } => {
                let full_path = bom_root.join(path);
                let content = std::fs::read_to_string(&full_path).map_err(|source| BomError::Io {
                    path: full_path.clone(),
                    source,
                })?;

                let mut versions = IndexMap::new();
                for property in parse_properties(&content) {
                    let Some(name) = property.key.strip_suffix(suffix.as_str()) else {
                        continue;
                    };
                    if name.is_empty() {
                        continue;
                    }
                    versions.insert(name.to_string(), Version::parse(&property.value)?);
                }
                debug!(
                    "Contributed {} versions from {:?}",
                    versions.len(),
                    full_path
                );
                Ok(versions)
            }
        }
    }
}
