//! Project tree and version set builders

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use release_train::bom::{ResolvedVersionSet, TrainIdentity};
use release_train::version::Version;

pub fn version(raw: &str) -> Version {
    Version::parse(raw).unwrap()
}

/// Version set for `train` holding the given pairs, in order
pub fn version_set(train: TrainIdentity, pairs: &[(&str, &str)]) -> Arc<ResolvedVersionSet> {
    let mut set = ResolvedVersionSet::new(train, "test");
    for (name, raw) in pairs {
        set.set_version(name, version(raw));
    }
    Arc::new(set)
}

/// Temporary project tree; removed on drop
pub struct ProjectTree {
    dir: TempDir,
}

impl ProjectTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.dir.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        self
    }

    pub fn file(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.file(relative)).unwrap()
    }
}
