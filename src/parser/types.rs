//! Common types for descriptor parsers

use std::path::Path;

/// Build system owning a descriptor file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildSystem {
    /// Maven (pom.xml)
    Maven,
    /// Gradle (gradle.properties)
    Gradle,
}

impl BuildSystem {
    /// Returns the string representation of the build system
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildSystem::Maven => "maven",
            BuildSystem::Gradle => "gradle",
        }
    }

    /// Descriptor file names this build system owns
    pub fn descriptor_names(&self) -> &'static [&'static str] {
        match self {
            BuildSystem::Maven => &["pom.xml"],
            BuildSystem::Gradle => &["gradle.properties"],
        }
    }
}

impl std::str::FromStr for BuildSystem {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "maven" => Ok(BuildSystem::Maven),
            "gradle" => Ok(BuildSystem::Gradle),
            _ => Err(()),
        }
    }
}

/// Detect the build system owning a descriptor from its file name
pub fn detect_build_system(path: &Path) -> Option<BuildSystem> {
    let file_name = path.file_name()?.to_str()?;
    [BuildSystem::Maven, BuildSystem::Gradle]
        .into_iter()
        .find(|system| system.descriptor_names().contains(&file_name))
}

/// A version-carrying entry found in a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    /// Project identity the version belongs to (e.g., "spring-cloud-build")
    pub name: String,
    /// Version currently written in the file
    pub version: String,
    /// Byte offset of the version string in the source (start)
    pub start_offset: usize,
    /// Byte offset of the version string in the source (end)
    pub end_offset: usize,
    /// Line number (0-indexed)
    pub line: usize,
}

/// 0-indexed line number of a byte offset
pub fn line_of_offset(content: &str, offset: usize) -> usize {
    content.as_bytes()[..offset.min(content.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/path/to/pom.xml", Some(BuildSystem::Maven))]
    #[case("pom.xml", Some(BuildSystem::Maven))]
    #[case("/project/gradle.properties", Some(BuildSystem::Gradle))]
    #[case("/project/build.gradle", None)]
    #[case("/project/pom.xml.bak", None)]
    #[case("/project/my-pom.xml", None)]
    fn detect_build_system_returns_expected(
        #[case] path: &str,
        #[case] expected: Option<BuildSystem>,
    ) {
        assert_eq!(detect_build_system(Path::new(path)), expected);
    }

    #[test]
    fn line_of_offset_counts_preceding_newlines() {
        let content = "a=1\nb=2\nc=3\n";

        assert_eq!(line_of_offset(content, 0), 0);
        assert_eq!(line_of_offset(content, 6), 1);
        assert_eq!(line_of_offset(content, 10), 2);
    }
}
