//! CLI commands

pub mod lifecycle;
pub mod prepare;
pub mod push;
pub mod validate;

use std::path::PathBuf;
use std::sync::Arc;

use chartpress_core::{CommandRunner, SystemRunner};
use chartpress_release::{
    ChartPlugin, GitCli, PluginOptions, ReleaseHost, ResolvedConfig, process_env,
};

use crate::error::Result;

/// Settings shared by every command, taken from the global flags
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Option<PathBuf>,
    pub no_git: bool,
    pub no_version_prefix: bool,
    pub prerelease_branches: Vec<String>,
    pub base_branch: String,
}

impl Context {
    /// Options from the `--config` file, or none when no file was given
    pub fn options(&self) -> Result<PluginOptions> {
        match &self.config {
            Some(path) => {
                tracing::debug!("Loading options from {}", path.display());
                Ok(PluginOptions::load_from(path)?)
            }
            None => Ok(PluginOptions::default()),
        }
    }

    /// Options resolved against the process environment
    pub fn resolved_config(&self) -> Result<ResolvedConfig> {
        Ok(ResolvedConfig::resolve(&process_env(), &self.options()?))
    }

    pub fn runner(&self) -> Arc<dyn CommandRunner> {
        Arc::new(SystemRunner::new())
    }

    /// Build the plugin, attaching git unless disabled or unavailable
    pub async fn plugin(&self) -> Result<ChartPlugin> {
        let config = self.resolved_config()?;
        let runner = self.runner();

        let mut host = ReleaseHost {
            no_version_prefix: self.no_version_prefix,
            ..ReleaseHost::default()
        };
        if !self.prerelease_branches.is_empty() {
            host.prerelease_branches = self.prerelease_branches.clone();
        }

        if !self.no_git {
            match GitCli::detect(runner.clone(), self.base_branch.clone()).await {
                Some(git) => host = host.with_git(Arc::new(git)),
                None => tracing::debug!("Not inside a git repository"),
            }
        }

        Ok(ChartPlugin::new(config, host, runner))
    }
}
