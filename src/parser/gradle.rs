//! gradle.properties parser
//!
//! Version entries:
//! - `version=...` belongs to the project named after the descriptor's folder
//! - `fooBarVersion=...` belongs to `foo-bar`
//! - `foo-bar.version=...` belongs to `foo-bar`

use std::collections::HashSet;
use std::path::Path;

use crate::parser::properties::{self, parse_properties};
use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{BuildSystem, VersionEntry};

/// Parser for gradle.properties files
pub struct GradlePropertiesParser;

impl GradlePropertiesParser {
    pub fn new() -> Self {
        Self
    }

    /// Project identity a property key carries a version for
    pub(crate) fn project_name(key: &str, project_dir: &Path) -> Option<String> {
        if key == "version" {
            return project_dir
                .file_name()
                .and_then(|name| name.to_str())
                .map(String::from);
        }
        if let Some(name) = key.strip_suffix(".version") {
            return (!name.is_empty()).then(|| name.to_string());
        }
        key.strip_suffix("Version")
            .filter(|name| !name.is_empty())
            .map(camel_to_kebab)
    }
}

impl Default for GradlePropertiesParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for GradlePropertiesParser {
    fn build_system(&self) -> BuildSystem {
        BuildSystem::Gradle
    }

    fn parse(&self, content: &str, project_dir: &Path) -> Result<Vec<VersionEntry>, ParseError> {
        let entries = parse_properties(content)
            .into_iter()
            .filter_map(|property| {
                let name = Self::project_name(&property.key, project_dir)?;
                Some(VersionEntry {
                    name,
                    version: property.value,
                    start_offset: property.value_start,
                    end_offset: property.value_end,
                    line: property.line,
                })
            })
            .collect();

        Ok(entries)
    }

    fn comment_lines(&self, content: &str) -> HashSet<usize> {
        properties::comment_lines(content)
    }
}

/// `springCloudBuild` -> `spring-cloud-build`
fn camel_to_kebab(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                result.push('-');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
