//! Maven BOM source
//!
//! Reads the root `pom.xml` for the train version and every `pom.xml` one
//! level below it (e.g., `spring-cloud-dependencies/pom.xml`) for
//! `<project.version>` properties.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::bom::error::BomError;
use crate::bom::hook::VersionHook;
use crate::bom::set::ResolvedVersionSet;
use crate::bom::source::BomSource;
use crate::bom::train::TrainIdentity;
use crate::parser::maven::PomParser;
use crate::parser::traits::Parser;
use crate::parser::types::VersionEntry;
use crate::version::Version;

const POM: &str = "pom.xml";

/// BOM source for Maven release trains
pub struct MavenBomSource {
    parser: PomParser,
    hooks: Vec<VersionHook>,
}

impl MavenBomSource {
    pub fn new(hooks: Vec<VersionHook>) -> Self {
        Self {
            parser: PomParser::new(),
            hooks,
        }
    }

    fn parse(&self, path: &Path, content: &str) -> Result<Vec<VersionEntry>, BomError> {
        let dir = path.parent().unwrap_or(Path::new("."));
        self.parser
            .parse(content, dir)
            .map_err(|source| BomError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// `pom.xml` files of direct sub-directories, sorted for a stable merge order
    fn module_poms(bom_root: &Path) -> Result<Vec<PathBuf>, BomError> {
        let entries = std::fs::read_dir(bom_root).map_err(|source| BomError::Io {
            path: bom_root.to_path_buf(),
            source,
        })?;

        let mut poms = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| BomError::Io {
                path: bom_root.to_path_buf(),
                source,
            })?;
            let pom = entry.path().join(POM);
            if pom.is_file() {
                poms.push(pom);
            }
        }
        poms.sort();
        Ok(poms)
    }
}

impl Default for MavenBomSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn read(path: &Path) -> Result<String, BomError> {
    std::fs::read_to_string(path).map_err(|source| BomError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl BomSource for MavenBomSource {
    fn name(&self) -> &'static str {
        "maven"
    }

    fn is_applicable(&self, bom_root: &Path) -> bool {
        bom_root.join(POM).is_file()
    }

    fn resolve(
        &self,
        bom_root: &Path,
        train: &TrainIdentity,
    ) -> Result<ResolvedVersionSet, BomError> {
        let root_pom = bom_root.join(POM);
        let content = read(&root_pom)?;

        let project = self
            .parser
            .project_entry(&content)
            .ok_or_else(|| BomError::MissingTrainVersion {
                root: bom_root.to_path_buf(),
            })?;
        let train_version = Version::parse(&project.version)?;
        debug!(
            "BOM project {} declares train version {}",
            project.name, train_version
        );

        let mut set =
            ResolvedVersionSet::new(train.clone(), self.name()).with_hooks(self.hooks.clone());
        set.set_version(&train.canonical, train_version);

        let mut entries: Vec<VersionEntry> = self
            .parse(&root_pom, &content)?
            .into_iter()
            .filter(|entry| entry.start_offset != project.start_offset)
            .collect();
        for pom in Self::module_poms(bom_root)? {
            let module_content = read(&pom)?;
            entries.extend(self.parse(&pom, &module_content)?);
        }

        for entry in entries {
            match Version::parse(&entry.version) {
                Ok(version) => set.set_version(&entry.name, version),
                Err(e) => debug!("Skipping non-version entry {}: {}", entry.name, e),
            }
        }

        Ok(set)
    }
}
