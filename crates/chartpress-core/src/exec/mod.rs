//! External command execution
//!
//! Every tool chartpress drives (`helm`, `helm-docs`, `git`) goes through the
//! [`CommandRunner`] trait:
//! - **SystemRunner**: spawns real processes with `tokio::process`
//! - **MockRunner**: records invocations in memory, for tests
//!
//! Runners wait for the process to exit before returning, and turn a non-zero
//! exit status into [`ChartError::ToolFailed`].

mod mock;

pub use mock::{Invocation, MockResponse, MockRunner};

use async_trait::async_trait;
use std::path::Path;

use crate::error::{ChartError, Result};

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status (0 on success)
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Command runner trait
///
/// Implementations must be Send + Sync so runners can be shared between the
/// preparer, the publisher and the git integration.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` to completion, from `cwd` when given
    async fn run_in(
        &self,
        cwd: Option<&Path>,
        program: &str,
        args: &[String],
    ) -> Result<CommandOutput>;

    /// Run `program` with `args` from the current directory
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        self.run_in(None, program, args).await
    }
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run_in(
        &self,
        cwd: Option<&Path>,
        program: &str,
        args: &[String],
    ) -> Result<CommandOutput> {
        tracing::debug!("Running {}", display_command(program, args));

        let mut command = tokio::process::Command::new(program);
        command.args(args).stdin(std::process::Stdio::null());
        if let Some(dir) = cwd {
            tracing::debug!("Working directory: {}", dir.display());
            command.current_dir(dir);
        }

        let output = command
            .output()
            .await
            .map_err(|e| ChartError::Spawn {
                program: program.to_string(),
                source: e,
            })?;

        let result = CommandOutput {
            // Killed by a signal: no code available
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        check_status(program, args, result)
    }
}

/// Convert a non-zero exit status into an error
pub fn check_status(program: &str, args: &[String], output: CommandOutput) -> Result<CommandOutput> {
    if output.status == 0 {
        return Ok(output);
    }

    Err(ChartError::ToolFailed {
        command: display_command(program, args),
        status: output.status,
        stderr: output.stderr.trim().to_string(),
    })
}

/// Render a command line for logs and error messages
pub fn display_command(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
