//! Per build-system ignore rules

use std::path::Path;

use regex::Regex;

/// Paths the rewriter must not touch and lines the invariant scan skips
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    paths: Vec<Regex>,
    lines: Vec<Regex>,
}

impl IgnoreRules {
    pub fn new(paths: Vec<Regex>, lines: Vec<Regex>) -> Self {
        Self { paths, lines }
    }

    /// `relative` is the descriptor path below the walked root, `/`-separated
    pub fn ignores_path(&self, relative: &Path) -> bool {
        let relative = relative.to_string_lossy().replace('\\', "/");
        self.paths.iter().any(|re| re.is_match(&relative))
    }

    pub fn ignores_line(&self, line: &str) -> bool {
        self.lines.iter().any(|re| re.is_match(line))
    }
}
