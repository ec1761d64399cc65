//! Concrete BOM sources

mod gradle;
mod maven;

pub use gradle::GradleBomSource;
pub use maven::MavenBomSource;

use std::sync::Arc;

use crate::bom::contribution::CustomContribution;
use crate::bom::hook::VersionHook;
use crate::bom::source::BomSources;

/// Maven first, then Gradle, followed by the given contributions
pub fn create_default_sources(
    hooks: Vec<VersionHook>,
    contributions: Vec<CustomContribution>,
) -> BomSources {
    BomSources::new()
        .with_source(Arc::new(MavenBomSource::new(hooks.clone())))
        .with_source(Arc::new(GradleBomSource::new(hooks)))
        .with_contributions(contributions)
}
