//! Parser trait definition

use std::collections::HashSet;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

use crate::parser::types::{BuildSystem, VersionEntry};

/// Trait for build-system specific descriptor syntax.
///
/// The rewriter only asks a parser where versions live and which lines are
/// comments; substitution and invariant checks are build-system agnostic.
#[cfg_attr(test, automock)]
pub trait Parser: Send + Sync {
    /// Returns the build system this parser handles
    fn build_system(&self) -> BuildSystem;

    /// Extract every version entry of a descriptor.
    ///
    /// `project_dir` is the folder holding the descriptor; parsers that
    /// derive the project identity from its folder use its name.
    fn parse(&self, content: &str, project_dir: &Path) -> Result<Vec<VersionEntry>, ParseError>;

    /// 0-based indices of the lines of `content` that hold only comments.
    ///
    /// Takes the whole content so multi-line comment blocks are covered.
    fn comment_lines(&self, content: &str) -> HashSet<usize>;
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Invalid syntax in the file
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),
}
