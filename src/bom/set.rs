//! Resolved project versions of one release train

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::bom::error::BomError;
use crate::bom::hook::VersionHook;
use crate::bom::train::TrainIdentity;
use crate::version::Version;

const PARENT_SUFFIX: &str = "-parent";
const DEPENDENCIES_SUFFIX: &str = "-dependencies";

/// Project name to version mapping for one release train.
///
/// Setting the version of the train project or any of its aliases always
/// moves the whole alias group together.
#[derive(Debug, Clone)]
pub struct ResolvedVersionSet {
    train: TrainIdentity,
    versions: IndexMap<String, Version>,
    /// Name of the BOM source that produced this set
    source: String,
    hooks: Vec<VersionHook>,
}

impl ResolvedVersionSet {
    pub fn new(train: TrainIdentity, source: impl Into<String>) -> Self {
        Self {
            train,
            versions: IndexMap::new(),
            source: source.into(),
            hooks: Vec::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: Vec<VersionHook>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn train(&self) -> &TrainIdentity {
        &self.train
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn versions(&self) -> &IndexMap<String, Version> {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Version of the canonical train project, if resolved
    pub fn train_version(&self) -> Option<&Version> {
        self.versions.get(&self.train.canonical)
    }

    /// Find the version for a project name.
    ///
    /// Precedence:
    /// 1. exact name
    /// 2. `<bom>-parent` resolves to `<bom>`; for these two names the generic
    ///    suffix rules below are not applied
    /// 3. `<name>-parent` resolves to `<name>`
    /// 4. `<name>-dependencies` resolves to `<name>`
    pub fn lookup(&self, name: &str) -> Option<&Version> {
        if let Some(version) = self.versions.get(name) {
            return Some(version);
        }

        if let Some(bom) = self.train.bom_artifact_id.as_deref() {
            if name.strip_suffix(PARENT_SUFFIX) == Some(bom) {
                return self.versions.get(bom);
            }
            if name == bom {
                return None;
            }
        }

        [PARENT_SUFFIX, DEPENDENCIES_SUFFIX]
            .iter()
            .filter_map(|suffix| name.strip_suffix(suffix))
            .find_map(|stripped| self.versions.get(stripped))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Like [`lookup`](Self::lookup) but fails with the list of known projects
    pub fn get(&self, name: &str) -> Result<&Version, BomError> {
        self.lookup(name).ok_or_else(|| BomError::UnknownProject {
            name: name.to_string(),
            known: self.versions.keys().cloned().collect(),
        })
    }

    /// Set the version of a project.
    ///
    /// Hooks run first. A train name (canonical or alias) replaces the
    /// version of every train name at once; any other name is added or
    /// replaced on its own.
    pub fn set_version(&mut self, name: &str, version: Version) {
        let linked: Vec<String> = self
            .hooks
            .iter()
            .flat_map(|hook| hook.linked_names(name))
            .cloned()
            .collect();
        for linked_name in linked {
            debug!("Hook links {} to {} ({})", name, linked_name, version);
            self.apply(&linked_name, version.clone());
        }

        self.apply(name, version);
    }

    fn apply(&mut self, name: &str, version: Version) {
        if !self.train.is_train_name(name) {
            self.versions.insert(name.to_string(), version);
            return;
        }

        let names = self.train.all_names();
        info!(
            "Setting train version {} for {} via {}",
            version,
            names.join(", "),
            name
        );
        for train_name in &names {
            self.versions.shift_remove(train_name);
        }
        for train_name in names {
            self.versions.insert(train_name, version.clone());
        }
    }

    /// Merge a partial set; later entries override earlier ones
    pub fn merge(&mut self, contribution: IndexMap<String, Version>) {
        for (name, version) in contribution {
            self.set_version(&name, version);
        }
    }

    /// Apply fixed-version overrides through [`set_version`](Self::set_version)
    pub fn apply_overrides(&mut self, overrides: &IndexMap<String, Version>) {
        for (name, version) in overrides {
            info!("Overriding {} with fixed version {}", name, version);
            self.set_version(name, version.clone());
        }
    }
}
