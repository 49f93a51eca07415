//! Mock command runner for testing
//!
//! This runner never spawns processes. It records every invocation so tests
//! can assert on exact argument vectors, and answers with scripted responses.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use super::{CommandOutput, CommandRunner, check_status};
use crate::error::Result;

/// A recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory, when one was requested
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    /// Whether this call was `program` with arguments starting with `prefix`
    pub fn matches(&self, program: &str, prefix: &[&str]) -> bool {
        self.program == program
            && self.args.len() >= prefix.len()
            && self.args.iter().zip(prefix).all(|(a, p)| a == p)
    }
}

/// Scripted answer for matching invocations
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Exit 0 with this stdout
    Stdout(String),
    /// Exit with a non-zero status and this stderr
    Fail { status: i32, stderr: String },
}

#[derive(Debug, Clone)]
struct Rule {
    program: String,
    prefix: Vec<String>,
    response: MockResponse,
}

/// In-memory command runner for testing
#[derive(Clone, Default)]
pub struct MockRunner {
    calls: Arc<RwLock<Vec<Invocation>>>,
    rules: Arc<RwLock<Vec<Rule>>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds with empty output
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `program <prefix...>` with the given stdout
    pub fn respond(&self, program: &str, prefix: &[&str], stdout: impl Into<String>) -> &Self {
        self.push_rule(program, prefix, MockResponse::Stdout(stdout.into()));
        self
    }

    /// Make `program <prefix...>` exit with status 1
    pub fn fail(&self, program: &str, prefix: &[&str], stderr: impl Into<String>) -> &Self {
        self.push_rule(
            program,
            prefix,
            MockResponse::Fail {
                status: 1,
                stderr: stderr.into(),
            },
        );
        self
    }

    /// All invocations so far, in call order
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Invocations of `program` whose arguments start with `prefix`
    pub fn calls_matching(&self, program: &str, prefix: &[&str]) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.matches(program, prefix))
            .collect()
    }

    /// Forget recorded invocations (rules are kept)
    pub fn reset_calls(&self) {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push_rule(&self, program: &str, prefix: &[&str], response: MockResponse) {
        self.rules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Rule {
                program: program.to_string(),
                prefix: prefix.iter().map(|s| s.to_string()).collect(),
                response,
            });
    }

    fn lookup(&self, invocation: &Invocation) -> Option<MockResponse> {
        let rules = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        // Later rules win
        rules
            .iter()
            .rev()
            .find(|r| {
                let prefix: Vec<&str> = r.prefix.iter().map(String::as_str).collect();
                invocation.matches(&r.program, &prefix)
            })
            .map(|r| r.response.clone())
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run_in(
        &self,
        cwd: Option<&Path>,
        program: &str,
        args: &[String],
    ) -> Result<CommandOutput> {
        let invocation = Invocation {
            program: program.to_string(),
            args: args.to_vec(),
            cwd: cwd.map(Path::to_path_buf),
        };

        let output = match self.lookup(&invocation) {
            Some(MockResponse::Stdout(stdout)) => CommandOutput::success(stdout),
            Some(MockResponse::Fail { status, stderr }) => CommandOutput {
                status,
                stdout: String::new(),
                stderr,
            },
            None => CommandOutput::success(""),
        };

        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation);

        check_status(program, args, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let runner = MockRunner::new();
        runner.run("helm", &args(&["version"])).await.unwrap();
        runner.run("helm-docs", &args(&["--version"])).await.unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].matches("helm", &["version"]));
        assert!(calls[1].matches("helm-docs", &[]));
    }

    #[tokio::test]
    async fn test_scripted_failure_is_recorded() {
        let runner = MockRunner::new();
        runner.fail("helm", &["dep", "up"], "no Chart.yaml");

        let err = runner.run("helm", &args(&["dep", "up", "x"])).await.unwrap_err();
        assert!(err.to_string().contains("no Chart.yaml"));
        assert_eq!(runner.calls_matching("helm", &["dep"]).len(), 1);
    }

    #[tokio::test]
    async fn test_records_working_directory() {
        let runner = MockRunner::new();
        runner.run("helm", &args(&["version"])).await.unwrap();
        runner
            .run_in(Some(Path::new("/charts")), "helm-docs", &[])
            .await
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls[0].cwd, None);
        assert_eq!(calls[1].cwd.as_deref(), Some(Path::new("/charts")));
    }

    #[tokio::test]
    async fn test_latest_rule_wins() {
        let runner = MockRunner::new();
        runner.respond("git", &["describe"], "v1.0.0");
        runner.respond("git", &["describe"], "v2.0.0");

        let out = runner.run("git", &args(&["describe", "--tags"])).await.unwrap();
        assert_eq!(out.stdout, "v2.0.0");
    }

    #[test]
    fn test_prefix_longer_than_args_does_not_match() {
        let call = Invocation {
            program: "helm".to_string(),
            args: args(&["dep"]),
            cwd: None,
        };
        assert!(!call.matches("helm", &["dep", "up"]));
        assert!(call.matches("helm", &["dep"]));
        assert!(!call.matches("git", &["dep"]));
    }
}
