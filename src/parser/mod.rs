//! Descriptor parser layer
//! - traits.rs: Parser trait definition
//! - types.rs: Common types (VersionEntry, BuildSystem)
//! - properties.rs: `key=value` properties parsing
//! - maven.rs: pom.xml parser
//! - gradle.rs: gradle.properties parser

pub mod gradle;
pub mod maven;
pub mod properties;
pub mod traits;
pub mod types;

use std::collections::HashMap;
use std::sync::Arc;

pub use gradle::GradlePropertiesParser;
pub use maven::PomParser;
pub use traits::{ParseError, Parser};
pub use types::{BuildSystem, VersionEntry, detect_build_system};

/// Create the default parser for every supported build system
pub fn create_default_parsers() -> HashMap<BuildSystem, Arc<dyn Parser>> {
    let mut parsers: HashMap<BuildSystem, Arc<dyn Parser>> = HashMap::new();
    parsers.insert(BuildSystem::Maven, Arc::new(PomParser::new()));
    parsers.insert(BuildSystem::Gradle, Arc::new(GradlePropertiesParser::new()));
    parsers
}
