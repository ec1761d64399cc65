//! Gradle BOM source
//!
//! Reads `gradle.properties` at the BOM root: `version=` carries the train
//! version, `fooVersion=` / `foo.version=` carry project versions.

use std::path::Path;

use tracing::debug;

use crate::bom::error::BomError;
use crate::bom::hook::VersionHook;
use crate::bom::set::ResolvedVersionSet;
use crate::bom::source::BomSource;
use crate::bom::train::TrainIdentity;
use crate::parser::gradle::GradlePropertiesParser;
use crate::parser::properties::parse_properties;
use crate::version::Version;

const GRADLE_PROPERTIES: &str = "gradle.properties";

/// BOM source for Gradle release trains
#[derive(Default)]
pub struct GradleBomSource {
    hooks: Vec<VersionHook>,
}

impl GradleBomSource {
    pub fn new(hooks: Vec<VersionHook>) -> Self {
        Self { hooks }
    }
}

impl BomSource for GradleBomSource {
    fn name(&self) -> &'static str {
        "gradle"
    }

    fn is_applicable(&self, bom_root: &Path) -> bool {
        bom_root.join(GRADLE_PROPERTIES).is_file()
    }

    fn resolve(
        &self,
        bom_root: &Path,
        train: &TrainIdentity,
    ) -> Result<ResolvedVersionSet, BomError> {
        let path = bom_root.join(GRADLE_PROPERTIES);
        let content = std::fs::read_to_string(&path).map_err(|source| BomError::Io {
            path: path.clone(),
            source,
        })?;
        let properties = parse_properties(&content);

        let train_version = properties
            .iter()
            .find(|property| property.key == "version")
            .ok_or_else(|| BomError::MissingTrainVersion {
                root: bom_root.to_path_buf(),
            })?;

        let mut set =
            ResolvedVersionSet::new(train.clone(), self.name()).with_hooks(self.hooks.clone());
        set.set_version(&train.canonical, Version::parse(&train_version.value)?);

        for property in properties.iter().filter(|p| p.key != "version") {
            let Some(name) = GradlePropertiesParser::project_name(&property.key, bom_root) else {
                continue;
            };
            match Version::parse(&property.value) {
                Ok(version) => set.set_version(&name, version),
                Err(e) => debug!("Skipping non-version property {}: {}", property.key, e),
            }
        }

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn v(raw: &str) -> Version {
        Version::parse(raw).unwrap()
    }

    #[test]
    fn resolve_reads_train_and_project_versions() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(GRADLE_PROPERTIES),
            "version=2020.0.0-SNAPSHOT\nreactorVersion=2020.0.1\nkotlin.version=1.4\norg.gradle.caching=true\n",
        )
        .unwrap();
        let train = TrainIdentity::new("sc-release").with_aliases(["sc-dependencies"]);

        let set = GradleBomSource::default()
            .resolve(temp_dir.path(), &train)
            .unwrap();

        assert_eq!(set.source(), "gradle");
        assert_eq!(set.train_version(), Some(&v("2020.0.0-SNAPSHOT")));
        assert_eq!(set.lookup("sc-dependencies"), Some(&v("2020.0.0-SNAPSHOT")));
        assert_eq!(set.lookup("reactor"), Some(&v("2020.0.1")));
        assert!(!set.contains("kotlin"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn resolve_requires_train_version() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(GRADLE_PROPERTIES), "reactorVersion=1.0.0\n").unwrap();

        let err = GradleBomSource::default()
            .resolve(temp_dir.path(), &TrainIdentity::new("train"))
            .unwrap_err();

        assert!(matches!(err, BomError::MissingTrainVersion { .. }));
    }
}
