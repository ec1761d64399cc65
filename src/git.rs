//! Source repository operations
//!
//! [`SystemGit`] drives the `git` binary through a [`ProcessRunner`], so every
//! call is time bounded and can be substituted in tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tracing::{debug, info};

use crate::process::{ProcessError, ProcessOutput, ProcessRunner};

#[derive(Debug, Error)]
pub enum GitError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Failed to prepare {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected git output: {0}")]
    UnexpectedOutput(String),
}

/// One line of `git log`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub id: String,
    pub subject: String,
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait SourceRepository: Send + Sync {
    /// Clone `url` into `destination`, creating its parent folders
    async fn clone_repository(&self, url: &str, destination: &Path) -> Result<(), GitError>;

    async fn checkout(&self, repo: &Path, branch: &str) -> Result<(), GitError>;

    /// Whether a local or remote-tracking branch exists
    async fn has_branch(&self, repo: &Path, branch: &str) -> Result<bool, GitError>;

    /// Stage every change and commit it
    async fn commit(&self, repo: &Path, message: &str) -> Result<(), GitError>;

    async fn tag(&self, repo: &Path, tag: &str) -> Result<(), GitError>;

    async fn push_tag(&self, repo: &Path, tag: &str) -> Result<(), GitError>;

    async fn push_branch(&self, repo: &Path, branch: &str) -> Result<(), GitError>;

    /// Commits reachable from `to` but not from `from`, newest first
    async fn log_between(
        &self,
        repo: &Path,
        from: &str,
        to: &str,
    ) -> Result<Vec<CommitSummary>, GitError>;
}

const REMOTE: &str = "origin";

/// [`SourceRepository`] backed by the system `git` binary
pub struct SystemGit {
    runner: Arc<dyn ProcessRunner>,
    timeout: Duration,
}

impl SystemGit {
    pub fn new(runner: Arc<dyn ProcessRunner>, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    async fn git(&self, repo: &Path, args: &[&str]) -> Result<ProcessOutput, GitError> {
        let command: Vec<String> = std::iter::once("git")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        debug!("git {} ({})", args.join(" "), repo.display());
        Ok(self.runner.run(&command, repo, self.timeout).await?)
    }
}

#[async_trait::async_trait]
impl SourceRepository for SystemGit {
    async fn clone_repository(&self, url: &str, destination: &Path) -> Result<(), GitError> {
        let parent = destination.parent().unwrap_or(Path::new("."));
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| GitError::Io {
                path: parent.to_path_buf(),
                source,
            })?;

        info!("Cloning {} into {}", url, destination.display());
        let destination = destination.to_string_lossy();
        self.git(parent, &["clone", url, &destination]).await?;
        Ok(())
    }

    async fn checkout(&self, repo: &Path, branch: &str) -> Result<(), GitError> {
        info!("Checking out {} in {}", branch, repo.display());
        self.git(repo, &["checkout", branch]).await?;
        Ok(())
    }

    async fn has_branch(&self, repo: &Path, branch: &str) -> Result<bool, GitError> {
        let output = self
            .git(repo, &["branch", "--all", "--format=%(refname:short)"])
            .await?;
        let remote_branch = format!("{}/{}", REMOTE, branch);
        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .any(|name| name == branch || name == remote_branch))
    }

    async fn commit(&self, repo: &Path, message: &str) -> Result<(), GitError> {
        self.git(repo, &["add", "--all"]).await?;
        self.git(repo, &["commit", "--message", message]).await?;
        info!("Committed '{}' in {}", message, repo.display());
        Ok(())
    }

    async fn tag(&self, repo: &Path, tag: &str) -> Result<(), GitError> {
        self.git(repo, &["tag", tag]).await?;
        info!("Tagged {} in {}", tag, repo.display());
        Ok(())
    }

    async fn push_tag(&self, repo: &Path, tag: &str) -> Result<(), GitError> {
        let refspec = format!("refs/tags/{}", tag);
        self.git(repo, &["push", REMOTE, &refspec]).await?;
        Ok(())
    }

    async fn push_branch(&self, repo: &Path, branch: &str) -> Result<(), GitError> {
        self.git(repo, &["push", REMOTE, branch]).await?;
        Ok(())
    }

    async fn log_between(
        &self,
        repo: &Path,
        from: &str,
        to: &str,
    ) -> Result<Vec<CommitSummary>, GitError> {
        let range = format!("{}..{}", from, to);
        let output = self.git(repo, &["log", "--format=%H%x09%s", &range]).await?;
        output
            .stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_log_line)
            .collect()
    }
}

fn parse_log_line(line: &str) -> Result<CommitSummary, GitError> {
    let (id, subject) = line
        .split_once('\t')
        .ok_or_else(|| GitError::UnexpectedOutput(line.to_string()))?;
    Ok(CommitSummary {
        id: id.to_string(),
        subject: subject.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MockProcessRunner;

    fn output(stdout: &str) -> ProcessOutput {
        ProcessOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn git_with(runner: MockProcessRunner) -> SystemGit {
        SystemGit::new(Arc::new(runner), Duration::from_secs(30))
    }

    #[tokio::test]
    async fn checkout_runs_git_in_repo() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|command, dir, timeout| {
                command == ["git", "checkout", "Hoxton"]
                    && dir == Path::new("/work/release")
                    && *timeout == Duration::from_secs(30)
            })
            .times(1)
            .returning(|_, _, _| Ok(ProcessOutput::default()));

        git_with(runner)
            .checkout(Path::new("/work/release"), "Hoxton")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn has_branch_matches_local_and_remote_names() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .returning(|_, _, _| Ok(output("main\norigin/HEAD\norigin/Hoxton\n")));
        let git = git_with(runner);

        assert!(git.has_branch(Path::new("."), "main").await.unwrap());
        assert!(git.has_branch(Path::new("."), "Hoxton").await.unwrap());
        assert!(!git.has_branch(Path::new("."), "Greenwich").await.unwrap());
    }

    #[tokio::test]
    async fn commit_stages_then_commits() {
        let mut seq = mockall::Sequence::new();
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|command, _, _| command == ["git", "add", "--all"])
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(ProcessOutput::default()));
        runner
            .expect_run()
            .withf(|command, _, _| {
                command == ["git", "commit", "--message", "Bumping versions"]
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(ProcessOutput::default()));

        git_with(runner)
            .commit(Path::new("."), "Bumping versions")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn push_tag_uses_full_refspec() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|command, _, _| command == ["git", "push", "origin", "refs/tags/v1.0.0"])
            .times(1)
            .returning(|_, _, _| Ok(ProcessOutput::default()));

        git_with(runner)
            .push_tag(Path::new("."), "v1.0.0")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn log_between_parses_commits() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|command, _, _| command.last().map(String::as_str) == Some("v1.0.0..main"))
            .returning(|_, _, _| Ok(output("abc123\tBump versions\ndef456\tFix typo\n")));

        let commits = git_with(runner)
            .log_between(Path::new("."), "v1.0.0", "main")
            .await
            .unwrap();

        assert_eq!(
            commits,
            vec![
                CommitSummary {
                    id: "abc123".to_string(),
                    subject: "Bump versions".to_string(),
                },
                CommitSummary {
                    id: "def456".to_string(),
                    subject: "Fix typo".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn log_between_rejects_malformed_output() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .returning(|_, _, _| Ok(output("not a log line\n")));

        let err = git_with(runner)
            .log_between(Path::new("."), "a", "b")
            .await
            .unwrap_err();

        assert!(matches!(err, GitError::UnexpectedOutput(_)));
    }

    #[tokio::test]
    async fn process_failures_propagate() {
        let mut runner = MockProcessRunner::new();
        runner.expect_run().returning(|command, _, timeout| {
            Err(ProcessError::Timeout {
                command: command.join(" "),
                timeout,
            })
        });

        let err = git_with(runner)
            .tag(Path::new("."), "v1.0.0")
            .await
            .unwrap_err();

        assert!(matches!(err, GitError::Process(ProcessError::Timeout { .. })));
    }
}
