//! Chart release plugin
//!
//! [`ChartPlugin`] answers the lifecycle events by computing the release
//! version from git tags, then preparing and (optionally) pushing charts.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use chartpress_core::{ChartPreparer, ChartPublisher, CommandRunner};

use crate::config::ResolvedConfig;
use crate::error::{ReleaseError, Result};
use crate::git::VersionControl;
use crate::hooks::{CanaryArgs, LifecycleHooks, VersionArgs};
use crate::schema::{OptionsValidator, PLUGIN_NAME, matches_plugin_name};
use crate::version::{determine_next_version, inc_named, prefix_release};

/// Branches prereleases are cut from when none are configured
pub const DEFAULT_PRERELEASE_BRANCHES: &[&str] = &["next"];

/// What the release host provides to the plugin
#[derive(Clone)]
pub struct ReleaseHost {
    /// Version control, absent outside a git repository
    pub git: Option<Arc<dyn VersionControl>>,
    /// Do not prefix release tags with `v`
    pub no_version_prefix: bool,
    pub prerelease_branches: Vec<String>,
}

impl Default for ReleaseHost {
    fn default() -> Self {
        Self {
            git: None,
            no_version_prefix: false,
            prerelease_branches: DEFAULT_PRERELEASE_BRANCHES
                .iter()
                .map(|b| b.to_string())
                .collect(),
        }
    }
}

impl ReleaseHost {
    pub fn with_git(mut self, git: Arc<dyn VersionControl>) -> Self {
        self.git = Some(git);
        self
    }

    fn prefix_release(&self, version: &str) -> String {
        prefix_release(version, self.no_version_prefix)
    }

    /// Prerelease branch for `current`: itself if configured, else the first one
    fn prerelease_branch(&self, current: Option<String>) -> String {
        current
            .filter(|branch| self.prerelease_branches.contains(branch))
            .or_else(|| self.prerelease_branches.first().cloned())
            .unwrap_or_else(|| DEFAULT_PRERELEASE_BRANCHES[0].to_string())
    }
}

/// Helm chart release plugin
pub struct ChartPlugin {
    config: ResolvedConfig,
    host: ReleaseHost,
    preparer: ChartPreparer,
    publisher: ChartPublisher,
}

impl ChartPlugin {
    pub fn new(config: ResolvedConfig, host: ReleaseHost, runner: Arc<dyn CommandRunner>) -> Self {
        let preparer = ChartPreparer::new(runner.clone(), config.preparer_settings());
        let publisher = ChartPublisher::new(runner);

        Self {
            config,
            host,
            preparer,
            publisher,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn host(&self) -> &ReleaseHost {
        &self.host
    }

    /// Latest tag in the branch, or the prefixed `0.0.0` when there is none
    async fn previous_tag(&self, git: &dyn VersionControl) -> String {
        match git.latest_tag_in_branch().await {
            Ok(tag) => tag,
            Err(e) => {
                tracing::debug!("No previous tag found: {}", e);
                self.host.prefix_release("0.0.0")
            }
        }
    }

    /// Prepare charts for `version` into the publish path, then push them if enabled
    async fn build(&self, version: &str) -> Result<()> {
        self.preparer
            .prepare(
                version,
                &self.config.path,
                &self.config.publish_path,
                &self.config.prep_options(),
            )
            .await?;

        if self.config.push {
            self.publisher
                .publish(
                    &self.config.publish_path,
                    &self.config.publish_repository,
                    self.config.force_push,
                )
                .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl LifecycleHooks for ChartPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn before_run(&self) -> Result<()> {
        self.preparer.validate_dependencies().await?;
        Ok(())
    }

    async fn get_previous_version(&self) -> Result<String> {
        let git = self.host.git.as_ref().ok_or(ReleaseError::MissingVersionControl)?;
        Ok(self.previous_tag(git.as_ref()).await)
    }

    async fn version(&self, args: &VersionArgs) -> Result<()> {
        let Some(git) = &self.host.git else {
            return Ok(());
        };

        let last_tag = self.previous_tag(git.as_ref()).await;
        let Some(new_tag) = inc_named(&last_tag, &args.bump, None) else {
            tracing::info!("No release found, doing nothing");
            return Ok(());
        };

        tracing::warn!("DOING VERSION: {}", self.host.prefix_release(&new_tag));
        Ok(())
    }

    async fn publish(&self, args: &VersionArgs) -> Result<()> {
        let Some(git) = &self.host.git else {
            return Ok(());
        };

        let last_tag = self.previous_tag(git.as_ref()).await;
        let Some(new_tag) = inc_named(&last_tag, &args.bump, None) else {
            tracing::info!("No release found, doing nothing");
            return Ok(());
        };

        self.build(&self.host.prefix_release(&new_tag)).await
    }

    async fn canary(&self, args: &CanaryArgs) -> Result<Option<String>> {
        let Some(git) = &self.host.git else {
            return Ok(None);
        };

        if !self.config.enable_canary {
            tracing::info!("Canary releases are not enabled. Skipping.");
            return Ok(None);
        }

        let current = git.latest_release().await?;
        let Some(next_version) = inc_named(&current, &args.bump, None) else {
            tracing::info!("Cannot determine version");
            return Ok(None);
        };

        let canary_version = format!("{}-{}", next_version, args.canary_identifier);

        if args.dry_run {
            tracing::info!("[DRY RUN] Would have created canary version: {}", canary_version);
            return Ok(None);
        }

        tracing::info!("Creating canary version: {}", canary_version);
        self.build(&canary_version).await?;

        Ok(Some(canary_version))
    }

    async fn next(
        &self,
        mut prerelease_versions: Vec<String>,
        args: &VersionArgs,
    ) -> Result<Vec<String>> {
        let Some(git) = &self.host.git else {
            return Ok(prerelease_versions);
        };

        if !self.config.enable_prereleases {
            return Ok(prerelease_versions);
        }

        let branch = self.host.prerelease_branch(git.current_branch().await);
        let last_release = git.latest_release().await?;
        let current = match git.last_tag_not_in_base_branch(&branch).await {
            Ok(Some(tag)) => tag,
            Ok(None) => last_release.clone(),
            Err(e) => {
                tracing::debug!("No prerelease tag found on {}: {}", branch, e);
                last_release.clone()
            }
        };

        let Some(next_version) = determine_next_version(&last_release, &current, &args.bump, &branch)
        else {
            tracing::info!("Cannot determine prerelease version");
            return Ok(prerelease_versions);
        };

        let prerelease = self.host.prefix_release(&next_version);
        prerelease_versions.push(prerelease.clone());

        self.build(&prerelease).await?;

        Ok(prerelease_versions)
    }

    fn validate_config(&self, name: &str, options: &JsonValue) -> Option<Vec<String>> {
        if !matches_plugin_name(name) {
            return None;
        }

        match OptionsValidator::new() {
            Ok(validator) => Some(validator.validate(options)),
            Err(e) => Some(vec![e.to_string()]),
        }
    }
}
