//! Release train identity

/// Names under which a release train itself is published
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrainIdentity {
    /// Canonical train project (e.g., "spring-cloud-release")
    pub canonical: String,
    /// Projects that always carry the train's version (e.g., "spring-cloud-dependencies")
    pub aliases: Vec<String>,
    /// Artifact id of the BOM itself, paired with `<id>-parent` during lookups
    pub bom_artifact_id: Option<String>,
}

impl TrainIdentity {
    pub fn new(canonical: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            aliases: Vec::new(),
            bom_artifact_id: None,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bom_artifact_id(mut self, artifact_id: impl Into<String>) -> Self {
        self.bom_artifact_id = Some(artifact_id.into());
        self
    }

    /// Whether the name is the canonical train project or one of its aliases
    pub fn is_train_name(&self, name: &str) -> bool {
        self.canonical == name || self.aliases.iter().any(|alias| alias == name)
    }

    /// Canonical name followed by every distinct alias
    pub fn all_names(&self) -> Vec<String> {
        let mut names = vec![self.canonical.clone()];
        for alias in &self.aliases {
            if !names.contains(alias) {
                names.push(alias.clone());
            }
        }
        names
    }
}
