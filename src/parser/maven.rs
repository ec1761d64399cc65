//! pom.xml parser
//!
//! Extracts three kinds of version entries without a full XML parse:
//! - `<parent>` version, keyed by the parent's artifactId
//! - the project's own `<version>`, keyed by its artifactId
//! - `<properties>` entries named `<foo.version>`, keyed by `foo`

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{BuildSystem, VersionEntry, line_of_offset};

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Parser for pom.xml files
pub struct PomParser {
    /// Regex for the parent block: `<parent>...</parent>`
    parent_re: Regex,
    /// Regex for `<artifactId>name</artifactId>`
    artifact_id_re: Regex,
    /// Regex for `<version>1.0.0</version>`
    version_re: Regex,
    /// Regex for a properties block: `<properties>...</properties>`
    properties_re: Regex,
    /// Regex for `<foo.version>1.0.0</foo.version>`
    property_re: Regex,
    /// Regex for the first section that ends the project header
    section_re: Regex,
}

impl PomParser {
    pub fn new() -> Self {
        Self {
            parent_re: Regex::new(r"(?s)<parent>(.*?)</parent>").expect("valid parent regex"),
            artifact_id_re: Regex::new(r"<artifactId>\s*([^<\s]+)\s*</artifactId>")
                .expect("valid artifactId regex"),
            version_re: Regex::new(r"<version>\s*([^<\s]+)\s*</version>")
                .expect("valid version regex"),
            properties_re: Regex::new(r"(?s)<properties>(.*?)</properties>")
                .expect("valid properties regex"),
            property_re: Regex::new(
                r"<([A-Za-z0-9_.\-]+)\.version>\s*([^<\s]*)\s*</([A-Za-z0-9_.\-]+)\.version>",
            )
            .expect("valid property regex"),
            section_re: Regex::new(
                r"<(dependencies|dependencyManagement|properties|build|profiles|modules|reporting)>",
            )
            .expect("valid section regex"),
        }
    }

    fn entry(content: &str, name: &str, version: &str, start: usize) -> VersionEntry {
        VersionEntry {
            name: name.to_string(),
            version: version.to_string(),
            start_offset: start,
            end_offset: start + version.len(),
            line: line_of_offset(content, start),
        }
    }

    /// Parent artifactId/version; returns the offset where the parent block ends
    fn extract_parent(&self, content: &str, results: &mut Vec<VersionEntry>) -> usize {
        let Some(caps) = self.parent_re.captures(content) else {
            return 0;
        };
        let (Some(block), Some(body)) = (caps.get(0), caps.get(1)) else {
            return 0;
        };

        let artifact = self
            .artifact_id_re
            .captures(body.as_str())
            .and_then(|c| c.get(1));
        let version = self.version_re.captures(body.as_str()).and_then(|c| c.get(1));
        if let (Some(artifact), Some(version)) = (artifact, version) {
            results.push(Self::entry(
                content,
                artifact.as_str(),
                version.as_str(),
                body.start() + version.start(),
            ));
        }

        block.end()
    }

    /// The project's own artifactId followed by its version, before any section
    fn extract_project(&self, content: &str, header_start: usize, results: &mut Vec<VersionEntry>) {
        let rest = &content[header_start..];
        let header_end = self
            .section_re
            .find(rest)
            .map(|m| m.start())
            .unwrap_or(rest.len());
        let header = &rest[..header_end];

        let Some(artifact) = self.artifact_id_re.captures(header) else {
            return;
        };
        let (Some(whole), Some(name)) = (artifact.get(0), artifact.get(1)) else {
            return;
        };

        let after_artifact = &header[whole.end()..];
        if let Some(version) = self.version_re.captures(after_artifact).and_then(|c| c.get(1)) {
            results.push(Self::entry(
                content,
                name.as_str(),
                version.as_str(),
                header_start + whole.end() + version.start(),
            ));
        }
    }

    /// The project's own artifactId and version, skipping the parent block
    pub fn project_entry(&self, content: &str) -> Option<VersionEntry> {
        let mut parent = Vec::new();
        let header_start = self.extract_parent(content, &mut parent);
        let mut results = Vec::new();
        self.extract_project(content, header_start, &mut results);
        results.pop()
    }

    fn extract_properties(&self, content: &str, results: &mut Vec<VersionEntry>) {
        for block in self.properties_re.captures_iter(content) {
            let Some(body) = block.get(1) else {
                continue;
            };
            for caps in self.property_re.captures_iter(body.as_str()) {
                let (Some(open), Some(value), Some(close)) = (caps.get(1), caps.get(2), caps.get(3))
                else {
                    continue;
                };
                if open.as_str() != close.as_str()
                    || value.as_str().is_empty()
                    || value.as_str().starts_with("${")
                {
                    continue;
                }
                results.push(Self::entry(
                    content,
                    open.as_str(),
                    value.as_str(),
                    body.start() + value.start(),
                ));
            }
        }
    }
}

impl Default for PomParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PomParser {
    fn build_system(&self) -> BuildSystem {
        BuildSystem::Maven
    }

    fn parse(&self, content: &str, _project_dir: &Path) -> Result<Vec<VersionEntry>, ParseError> {
        if !content.contains("<project") {
            return Err(ParseError::InvalidSyntax(
                "missing <project> root element".to_string(),
            ));
        }

        let mut results = Vec::new();
        let header_start = self.extract_parent(content, &mut results);
        self.extract_project(content, header_start, &mut results);
        self.extract_properties(content, &mut results);

        Ok(results)
    }

    fn comment_lines(&self, content: &str) -> HashSet<usize> {
        let mut comments = HashSet::new();
        let mut in_comment = false;

        for (index, line) in content.lines().enumerate() {
            let mut rest = line;
            let mut has_markup = false;
            loop {
                if in_comment {
                    let Some(end) = rest.find(COMMENT_CLOSE) else {
                        break;
                    };
                    in_comment = false;
                    rest = &rest[end + COMMENT_CLOSE.len()..];
                } else {
                    let Some(start) = rest.find(COMMENT_OPEN) else {
                        has_markup |= !rest.trim().is_empty();
                        break;
                    };
                    has_markup |= !rest[..start].trim().is_empty();
                    in_comment = true;
                    rest = &rest[start + COMMENT_OPEN.len()..];
                }
            }

            if !has_markup && !line.trim().is_empty() {
                comments.insert(index);
            }
        }

        comments
    }
}
