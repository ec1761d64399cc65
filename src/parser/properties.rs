//! `key=value` properties parsing
//!
//! Format examples:
//! - `version=1.0.0.RELEASE`
//! - `springBootVersion = 2.2.5.RELEASE`
//! - `spring-cloud-build.version: 2.2.2.RELEASE`
//! - `# comment` / `! comment`

use std::collections::HashSet;

/// One `key=value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub value: String,
    /// Line number (0-indexed)
    pub line: usize,
    /// Byte offset of the value in the source (start)
    pub value_start: usize,
    /// Byte offset of the value in the source (end)
    pub value_end: usize,
}

/// Whether a line is a properties comment
pub fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with('!')
}

/// 0-based indices of the comment lines of the content
pub fn comment_lines(content: &str) -> HashSet<usize> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| is_comment(line))
        .map(|(index, _)| index)
        .collect()
}

/// Parse every property line of the content.
///
/// Blank lines, comments and lines without a separator are skipped.
/// Surrounding whitespace is excluded from both key and value spans.
pub fn parse_properties(content: &str) -> Vec<Property> {
    let mut results = Vec::new();
    let mut line_start = 0;

    for (line_num, raw_line) in content.split_inclusive('\n').enumerate() {
        let line = raw_line.trim_end_matches(['\n', '\r']);
        if let Some(property) = parse_line(line, line_num, line_start) {
            results.push(property);
        }
        line_start += raw_line.len();
    }

    results
}

fn parse_line(line: &str, line_num: usize, line_start: usize) -> Option<Property> {
    if line.trim().is_empty() || is_comment(line) {
        return None;
    }

    let separator = line.find(['=', ':'])?;
    let key = line[..separator].trim();
    if key.is_empty() {
        return None;
    }

    let after = &line[separator + 1..];
    let value = after.trim();
    let leading = after.len() - after.trim_start().len();
    let value_start = line_start + separator + 1 + leading;

    Some(Property {
        key: key.to_string(),
        value: value.to_string(),
        line: line_num,
        value_start,
        value_end: value_start + value.len(),
    })
}
