//! Chartpress Release - Release lifecycle integration
//!
//! This crate connects the chart pipeline to a release host:
//!
//! - **Configuration**: options file, `HELM_PLUGIN_*` overrides and defaults
//! - **Version arithmetic**: semver bumps, prerelease series and tag prefixes
//! - **Version control**: tag lookups behind the `VersionControl` trait
//! - **Lifecycle hooks**: `ChartPlugin` answers each release event
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chartpress_core::SystemRunner;
//! use chartpress_release::{
//!     ChartPlugin, GitCli, LifecycleHooks, PluginOptions, ReleaseHost, ResolvedConfig,
//!     VersionArgs, process_env,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ResolvedConfig::resolve(&process_env(), &PluginOptions::default());
//! let runner = Arc::new(SystemRunner::new());
//!
//! let mut host = ReleaseHost::default();
//! if let Some(git) = GitCli::detect(runner.clone(), "main").await {
//!     host = host.with_git(Arc::new(git));
//! }
//!
//! let plugin = ChartPlugin::new(config, host, runner);
//! plugin.publish(&VersionArgs::new("minor")).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod git;
pub mod hooks;
pub mod plugin;
pub mod schema;
pub mod version;

// Re-exports for convenience
pub use config::{EnvSnapshot, PluginOptions, ResolvedConfig, parse_bool, process_env};
pub use error::{ReleaseError, Result};
pub use git::{GitCli, MockVersionControl, VersionControl};
pub use hooks::{CanaryArgs, LifecycleHooks, VersionArgs};
pub use plugin::{ChartPlugin, DEFAULT_PRERELEASE_BRANCHES, ReleaseHost};
pub use schema::{OptionsValidator, PLUGIN_NAME, matches_plugin_name, options_schema};
pub use version::{
    BumpKind, determine_next_version, inc, inc_named, is_lower, parse_version, prefix_release,
};
