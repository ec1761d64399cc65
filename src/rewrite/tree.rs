//! Project tree walk and descriptor substitution

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::bom::set::ResolvedVersionSet;
use crate::parser::traits::Parser;
use crate::parser::types::{BuildSystem, VersionEntry, detect_build_system};
use crate::parser::create_default_parsers;
use crate::rewrite::error::RewriteError;
use crate::rewrite::forbidden::ForbiddenPatternSet;
use crate::rewrite::rules::IgnoreRules;
use crate::version::Version;

/// Directories never descended into
const SKIPPED_DIRS: &[&str] = &[".git", ".gradle", ".idea", "build", "node_modules", "target"];

#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Version being released; decides which markers are forbidden
    pub release_version: Version,
    /// Scan rewritten descriptors for forbidden markers
    pub assert_versions: bool,
}

/// Outcome of visiting one descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Matched an ignore rule; never read or written
    Ignored,
    /// Nothing to change
    Skipped,
    /// Written with this many substitutions
    Rewritten(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub visits: Vec<(PathBuf, Visit)>,
}

impl RewriteReport {
    fn count(&self, predicate: impl Fn(&Visit) -> bool) -> usize {
        self.visits.iter().filter(|(_, visit)| predicate(visit)).count()
    }

    pub fn rewritten(&self) -> usize {
        self.count(|visit| matches!(visit, Visit::Rewritten(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|visit| *visit == Visit::Skipped)
    }

    pub fn ignored(&self) -> usize {
        self.count(|visit| *visit == Visit::Ignored)
    }
}

/// Rewrites every descriptor below a root to the versions of a resolved set.
///
/// After a write, and only when `assert_versions` is set, the rewritten file
/// is scanned line by line; the first non-comment, non-ignored line that
/// still matches a forbidden marker fails the walk. The file stays written.
#[derive(Clone)]
pub struct TreeRewriter {
    versions: Arc<ResolvedVersionSet>,
    parsers: HashMap<BuildSystem, Arc<dyn Parser>>,
    rules: HashMap<BuildSystem, IgnoreRules>,
    forbidden: ForbiddenPatternSet,
    assert_versions: bool,
}

impl TreeRewriter {
    pub fn new(versions: Arc<ResolvedVersionSet>, options: RewriteOptions) -> Self {
        Self {
            versions,
            parsers: create_default_parsers(),
            rules: HashMap::new(),
            forbidden: ForbiddenPatternSet::for_version(&options.release_version),
            assert_versions: options.assert_versions,
        }
    }

    /// Replace the parser registered for the parser's build system
    pub fn with_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        self.parsers.insert(parser.build_system(), parser);
        self
    }

    pub fn with_rules(mut self, rules: HashMap<BuildSystem, IgnoreRules>) -> Self {
        self.rules = rules;
        self
    }

    /// Visit every descriptor below `root` in path order
    pub fn rewrite_tree(&self, root: &Path) -> Result<RewriteReport, RewriteError> {
        let mut descriptors = Vec::new();
        collect_descriptors(root, &mut descriptors)?;
        descriptors.sort();
        info!("Found {} descriptors under {}", descriptors.len(), root.display());

        let mut report = RewriteReport::default();
        for path in descriptors {
            let visit = self.visit(root, &path)?;
            report.visits.push((path, visit));
        }

        info!(
            "{}: {} rewritten, {} unchanged, {} ignored",
            root.display(),
            report.rewritten(),
            report.skipped(),
            report.ignored()
        );
        Ok(report)
    }

    /// Visit a single descriptor found below `root`
    pub fn visit(&self, root: &Path, path: &Path) -> Result<Visit, RewriteError> {
        let Some(build_system) = detect_build_system(path) else {
            return Ok(Visit::Skipped);
        };
        let Some(parser) = self.parsers.get(&build_system) else {
            debug!("No parser for {}, skipping {}", build_system.as_str(), path.display());
            return Ok(Visit::Skipped);
        };
        let rules = self.rules.get(&build_system).cloned().unwrap_or_default();

        let relative = path.strip_prefix(root).unwrap_or(path);
        if rules.ignores_path(relative) {
            debug!("Ignoring {}", relative.display());
            return Ok(Visit::Ignored);
        }

        let content = std::fs::read_to_string(path).map_err(|e| RewriteError::io(path, e))?;
        let project_dir = project_dir(root, path)?;
        let entries = parser
            .parse(&content, &project_dir)
            .map_err(|source| RewriteError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let comments = parser.comment_lines(&content);
        let (rewritten, substitutions) = self.substitute(&comments, &content, entries);
        if substitutions == 0 {
            debug!("{} is up to date", relative.display());
            return Ok(Visit::Skipped);
        }

        std::fs::write(path, &rewritten).map_err(|e| RewriteError::io(path, e))?;
        info!("Rewrote {} ({} versions)", relative.display(), substitutions);

        if self.assert_versions {
            let comments = parser.comment_lines(&rewritten);
            self.check_invariant(&comments, &rules, path, &rewritten)?;
        }

        Ok(Visit::Rewritten(substitutions))
    }

    /// Splice resolved versions into the content, last entry first so earlier
    /// offsets stay valid
    fn substitute(
        &self,
        comments: &HashSet<usize>,
        content: &str,
        mut entries: Vec<VersionEntry>,
    ) -> (String, usize) {
        entries.sort_by(|a, b| b.start_offset.cmp(&a.start_offset));

        let mut result = content.to_string();
        let mut substitutions = 0;
        for entry in entries {
            if comments.contains(&entry.line) {
                continue;
            }
            let Some(version) = self.versions.lookup(&entry.name) else {
                continue;
            };
            if version.as_str() == entry.version {
                continue;
            }

            debug!("{}: {} -> {}", entry.name, entry.version, version);
            result.replace_range(entry.start_offset..entry.end_offset, version.as_str());
            substitutions += 1;
        }

        (result, substitutions)
    }

    fn check_invariant(
        &self,
        comments: &HashSet<usize>,
        rules: &IgnoreRules,
        path: &Path,
        content: &str,
    ) -> Result<(), RewriteError> {
        if self.forbidden.is_empty() {
            return Ok(());
        }

        for (index, line) in content.lines().enumerate() {
            if comments.contains(&index) || rules.ignores_line(line) {
                continue;
            }
            if let Some(pattern) = self.forbidden.first_match(line) {
                error!(
                    "{}:{} still matches forbidden pattern {}",
                    path.display(),
                    index + 1,
                    pattern
                );
                return Err(RewriteError::VersionInvariantViolation {
                    path: path.to_path_buf(),
                    line_number: index + 1,
                    line: line.trim().to_string(),
                    pattern: pattern.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Folder holding a descriptor, resolved on disk when the walked path has no
/// folder name of its own (a root of `.` or ending in `..`)
fn project_dir(root: &Path, path: &Path) -> Result<PathBuf, RewriteError> {
    let dir = path.parent().unwrap_or(root);
    if dir.file_name().is_some() {
        return Ok(dir.to_path_buf());
    }
    let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
    dir.canonicalize().map_err(|e| RewriteError::io(dir, e))
}

fn collect_descriptors(dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), RewriteError> {
    let entries = std::fs::read_dir(dir).map_err(|e| RewriteError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| RewriteError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| RewriteError::io(entry.path(), e))?;
        let path = entry.path();

        if file_type.is_dir() {
            let skipped = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| SKIPPED_DIRS.contains(&name));
            if !skipped {
                collect_descriptors(&path, found)?;
            }
        } else if file_type.is_file() && detect_build_system(&path).is_some() {
            found.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::train::TrainIdentity;
    use crate::parser::traits::{MockParser, ParseError};
    use regex::Regex;
    use tempfile::TempDir;

    const POM: &str = r#"<project>
	<parent>
		<artifactId>spring-cloud-build</artifactId>
		<version>2.2.1.BUILD-SNAPSHOT</version>
	</parent>
	<artifactId>spring-cloud-sleuth</artifactId>
	<version>2.2.1.BUILD-SNAPSHOT</version>
	<properties>
		<!-- <spring-cloud-commons.version>2.2.0.BUILD-SNAPSHOT</spring-cloud-commons.version> -->
		<spring-cloud-commons.version>2.2.1.BUILD-SNAPSHOT</spring-cloud-commons.version>
	</properties>
</project>
"#;

    fn v(raw: &str) -> Version {
        Version::parse(raw).unwrap()
    }

    fn versions(pairs: &[(&str, &str)]) -> Arc<ResolvedVersionSet> {
        let mut set = ResolvedVersionSet::new(TrainIdentity::new("spring-cloud-release"), "test");
        for (name, version) in pairs {
            set.set_version(name, v(version));
        }
        Arc::new(set)
    }

    fn ga_versions() -> Arc<ResolvedVersionSet> {
        versions(&[
            ("spring-cloud-release", "Hoxton.SR2"),
            ("spring-cloud-build", "2.2.2.RELEASE"),
            ("spring-cloud-sleuth", "2.2.2.RELEASE"),
            ("spring-cloud-commons", "2.2.2.RELEASE"),
        ])
    }

    fn options(release: &str, assert_versions: bool) -> RewriteOptions {
        RewriteOptions {
            release_version: v(release),
            assert_versions,
        }
    }

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn rewrite_tree_substitutes_resolved_versions() {
        let temp_dir = TempDir::new().unwrap();
        let pom = write(temp_dir.path(), "pom.xml", POM);
        let rewriter = TreeRewriter::new(ga_versions(), options("Hoxton.SR2", true));

        let report = rewriter.rewrite_tree(temp_dir.path()).unwrap();

        assert_eq!(report.visits, vec![(pom.clone(), Visit::Rewritten(3))]);
        let content = std::fs::read_to_string(pom).unwrap();
        assert!(content.contains("<version>2.2.2.RELEASE</version>\n\t</parent>"));
        assert!(content.contains("<spring-cloud-commons.version>2.2.2.RELEASE<"));
        assert!(content.contains("<!-- <spring-cloud-commons.version>2.2.0.BUILD-SNAPSHOT"));
    }

    #[test]
    fn rewrite_tree_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let pom = write(temp_dir.path(), "pom.xml", POM);
        let rewriter = TreeRewriter::new(ga_versions(), options("Hoxton.SR2", true));

        rewriter.rewrite_tree(temp_dir.path()).unwrap();
        let first = std::fs::read_to_string(&pom).unwrap();
        let report = rewriter.rewrite_tree(temp_dir.path()).unwrap();

        assert_eq!(report.visits, vec![(pom.clone(), Visit::Skipped)]);
        assert_eq!(std::fs::read_to_string(pom).unwrap(), first);
    }

    #[test]
    fn ignored_paths_are_never_touched() {
        let temp_dir = TempDir::new().unwrap();
        let docs = write(temp_dir.path(), "docs/pom.xml", POM);
        let rules = HashMap::from([(
            BuildSystem::Maven,
            IgnoreRules::new(vec![Regex::new("^docs/").unwrap()], vec![]),
        )]);
        let rewriter =
            TreeRewriter::new(ga_versions(), options("Hoxton.SR2", true)).with_rules(rules);

        let report = rewriter.rewrite_tree(temp_dir.path()).unwrap();

        assert_eq!(report.ignored(), 1);
        assert_eq!(std::fs::read_to_string(docs).unwrap(), POM);
    }

    #[test]
    fn build_output_directories_are_not_walked() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "target/classes/pom.xml", POM);
        write(temp_dir.path(), ".git/pom.xml", POM);
        let rewriter = TreeRewriter::new(ga_versions(), options("Hoxton.SR2", true));

        let report = rewriter.rewrite_tree(temp_dir.path()).unwrap();

        assert!(report.visits.is_empty());
    }

    #[test]
    fn ga_assertion_reports_remaining_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let pom = write(temp_dir.path(), "pom.xml", POM);
        let partial = versions(&[("spring-cloud-build", "2.2.2.RELEASE")]);
        let rewriter = TreeRewriter::new(partial, options("Hoxton.SR2", true));

        let err = rewriter.rewrite_tree(temp_dir.path()).unwrap_err();

        match err {
            RewriteError::VersionInvariantViolation {
                path,
                line_number,
                line,
                pattern,
            } => {
                assert_eq!(path, pom);
                assert_eq!(line_number, 7);
                assert_eq!(line, "<version>2.2.1.BUILD-SNAPSHOT</version>");
                assert_eq!(pattern, "SNAPSHOT");
            }
            other => panic!("unexpected error: {other}"),
        }
        let content = std::fs::read_to_string(pom).unwrap();
        assert!(content.contains("<version>2.2.2.RELEASE</version>\n\t</parent>"));
    }

    #[test]
    fn ignored_lines_are_excluded_from_assertion() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "pom.xml", POM);
        let partial = versions(&[("spring-cloud-build", "2.2.2.RELEASE")]);
        let rules = HashMap::from([(
            BuildSystem::Maven,
            IgnoreRules::new(vec![], vec![Regex::new("BUILD-SNAPSHOT").unwrap()]),
        )]);
        let rewriter =
            TreeRewriter::new(partial, options("Hoxton.SR2", true)).with_rules(rules);

        let report = rewriter.rewrite_tree(temp_dir.path()).unwrap();

        assert_eq!(report.rewritten(), 1);
    }

    #[test]
    fn assertion_is_off_unless_requested() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "pom.xml", POM);
        let partial = versions(&[("spring-cloud-build", "2.2.2.RELEASE")]);
        let rewriter = TreeRewriter::new(partial, options("Hoxton.SR2", false));

        assert!(rewriter.rewrite_tree(temp_dir.path()).is_ok());
    }

    #[test]
    fn snapshot_release_forbids_nothing() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "pom.xml", POM);
        let snapshots = versions(&[("spring-cloud-build", "2.2.3.BUILD-SNAPSHOT")]);
        let rewriter = TreeRewriter::new(snapshots, options("Hoxton.BUILD-SNAPSHOT", true));

        let report = rewriter.rewrite_tree(temp_dir.path()).unwrap();

        assert_eq!(report.rewritten(), 1);
    }

    #[test]
    fn root_without_folder_name_still_resolves_project_version() {
        let temp_dir = TempDir::new().unwrap();
        let properties = write(
            temp_dir.path(),
            "spring-cloud-sleuth/gradle.properties",
            "version=2.2.1.RELEASE\n",
        );
        write(temp_dir.path(), "spring-cloud-sleuth/docs/README.md", "");
        let root = temp_dir.path().join("spring-cloud-sleuth/docs/..");
        let rewriter = TreeRewriter::new(ga_versions(), options("Hoxton.SR2", true));

        let report = rewriter.rewrite_tree(&root).unwrap();

        assert_eq!(
            report.visits,
            vec![(root.join("gradle.properties"), Visit::Rewritten(1))]
        );
        assert_eq!(
            std::fs::read_to_string(properties).unwrap(),
            "version=2.2.2.RELEASE\n"
        );
    }

    #[test]
    fn block_commented_entries_are_neither_rewritten_nor_checked() {
        let temp_dir = TempDir::new().unwrap();
        let pom = write(
            temp_dir.path(),
            "pom.xml",
            r#"<project>
	<artifactId>spring-cloud-sleuth</artifactId>
	<version>2.2.1.BUILD-SNAPSHOT</version>
	<properties>
		<!--
		<spring-cloud-commons.version>1.0.0.BUILD-SNAPSHOT</spring-cloud-commons.version>
		-->
	</properties>
</project>
"#,
        );
        let rewriter = TreeRewriter::new(ga_versions(), options("Hoxton.SR2", true));

        let report = rewriter.rewrite_tree(temp_dir.path()).unwrap();

        assert_eq!(report.visits, vec![(pom.clone(), Visit::Rewritten(1))]);
        let content = std::fs::read_to_string(pom).unwrap();
        assert!(content.contains("<version>2.2.2.RELEASE</version>"));
        assert!(content.contains("<spring-cloud-commons.version>1.0.0.BUILD-SNAPSHOT<"));
    }

    #[test]
    fn parser_failure_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "gradle.properties", "version=1.0.0\n");
        let mut parser = MockParser::new();
        parser.expect_build_system().return_const(BuildSystem::Gradle);
        parser
            .expect_parse()
            .returning(|_, _| Err(ParseError::InvalidSyntax("broken".to_string())));
        let rewriter = TreeRewriter::new(ga_versions(), options("Hoxton.SR2", true))
            .with_parser(Arc::new(parser));

        let err = rewriter.rewrite_tree(temp_dir.path()).unwrap_err();

        assert!(matches!(err, RewriteError::Parse { .. }));
    }
}
