//! Time-bounded external process execution

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tracing::{debug, warn};

/// Captured output of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' timed out after {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error("'{command}' exited with status {code:?}: {stderr}")]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Runs an external command to completion or until the timeout expires
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ProcessRunner: Send + Sync {
    /// `command[0]` is the program, the rest its arguments
    async fn run(
        &self,
        command: &[String],
        working_dir: &Path,
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError>;
}

/// [`ProcessRunner`] backed by `tokio::process`; the child is killed when the
/// timeout expires
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait::async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        command: &[String],
        working_dir: &Path,
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError> {
        let command_line = command.join(" ");
        let Some((program, args)) = command.split_first() else {
            return Err(ProcessError::Spawn {
                command: command_line,
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            });
        };

        debug!("Running '{}' in {}", command_line, working_dir.display());
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(result) => result.map_err(|source| ProcessError::Spawn {
                command: command_line.clone(),
                source,
            })?,
            Err(_) => {
                warn!("'{}' timed out after {:?}", command_line, timeout);
                return Err(ProcessError::Timeout {
                    command: command_line,
                    timeout,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            warn!("'{}' failed with {}", command_line, output.status);
            return Err(ProcessError::NonZeroExit {
                command: command_line,
                code: output.status.code(),
                stderr,
            });
        }

        Ok(ProcessOutput { stdout, stderr })
    }
}
