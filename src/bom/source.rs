//! BOM source trait and the ordered source registry

use std::path::Path;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;
use tracing::{debug, info};

use crate::bom::contribution::CustomContribution;
use crate::bom::error::BomError;
use crate::bom::set::ResolvedVersionSet;
use crate::bom::train::TrainIdentity;

/// Trait for reading project versions out of a checked-out BOM
#[cfg_attr(test, automock)]
pub trait BomSource: Send + Sync {
    /// Name recorded on the sets this source produces
    fn name(&self) -> &'static str;

    /// Whether this source understands the BOM checked out at `bom_root`
    fn is_applicable(&self, bom_root: &Path) -> bool;

    /// Resolve every project version declared by the BOM
    fn resolve(
        &self,
        bom_root: &Path,
        train: &TrainIdentity,
    ) -> Result<ResolvedVersionSet, BomError>;
}

/// Ordered list of BOM sources plus the custom contributions merged on top.
///
/// The first applicable source resolves the BOM; every contribution is
/// merged afterwards in registration order.
#[derive(Clone, Default)]
pub struct BomSources {
    sources: Vec<Arc<dyn BomSource>>,
    contributions: Vec<CustomContribution>,
}

impl BomSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn BomSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_contribution(mut self, contribution: CustomContribution) -> Self {
        self.contributions.push(contribution);
        self
    }

    pub fn with_contributions(mut self, contributions: Vec<CustomContribution>) -> Self {
        self.contributions.extend(contributions);
        self
    }

    pub fn resolve(
        &self,
        bom_root: &Path,
        train: &TrainIdentity,
    ) -> Result<ResolvedVersionSet, BomError> {
        let source = self
            .sources
            .iter()
            .find(|source| source.is_applicable(bom_root))
            .ok_or_else(|| BomError::NoApplicableSource {
                root: bom_root.to_path_buf(),
            })?;

        info!("Resolving BOM at {:?} with {} source", bom_root, source.name());
        let mut set = source.resolve(bom_root, train)?;

        for contribution in &self.contributions {
            let partial = contribution.contribute(bom_root)?;
            debug!("Merging {} contributed versions", partial.len());
            set.merge(partial);
        }

        info!(
            "Resolved {} project versions for train {}",
            set.len(),
            train.canonical
        );
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;
    use indexmap::IndexMap;
    use std::path::PathBuf;

    fn v(raw: &str) -> Version {
        Version::parse(raw).unwrap()
    }

    fn mock_source(name: &'static str, applicable: bool, version: &'static str) -> MockBomSource {
        let mut source = MockBomSource::new();
        source.expect_name().return_const(name);
        source.expect_is_applicable().return_const(applicable);
        source.expect_resolve().returning(move |_, train| {
            let mut set = ResolvedVersionSet::new(train.clone(), name);
            set.set_version(&train.canonical, v(version));
            Ok(set)
        });
        source
    }

    #[test]
    fn resolve_uses_first_applicable_source() {
        let sources = BomSources::new()
            .with_source(Arc::new(mock_source("skipped", false, "1.0.0")))
            .with_source(Arc::new(mock_source("first", true, "Hoxton.SR1")))
            .with_source(Arc::new(mock_source("second", true, "Hoxton.SR2")));

        let set = sources
            .resolve(Path::new("/bom"), &TrainIdentity::new("train"))
            .unwrap();

        assert_eq!(set.source(), "first");
        assert_eq!(set.train_version(), Some(&v("Hoxton.SR1")));
    }

    #[test]
    fn resolve_merges_contributions_in_order() {
        let sources = BomSources::new()
            .with_source(Arc::new(mock_source("first", true, "Hoxton.SR1")))
            .with_contribution(CustomContribution::NoOp)
            .with_contribution(CustomContribution::Fixed {
                versions: IndexMap::from([("a".to_string(), v("1.0.0"))]),
            })
            .with_contribution(CustomContribution::Fixed {
                versions: IndexMap::from([("a".to_string(), v("1.0.1"))]),
            });

        let set = sources
            .resolve(Path::new("/bom"), &TrainIdentity::new("train"))
            .unwrap();

        assert_eq!(set.lookup("a"), Some(&v("1.0.1")));
    }

    #[test]
    fn resolve_fails_without_applicable_source() {
        let sources =
            BomSources::new().with_source(Arc::new(mock_source("skipped", false, "1.0.0")));

        let err = sources
            .resolve(Path::new("/bom"), &TrainIdentity::new("train"))
            .unwrap_err();

        assert!(matches!(
            err,
            BomError::NoApplicableSource { root } if root == PathBuf::from("/bom")
        ));
    }
}
