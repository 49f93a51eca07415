//! Plugin configuration
//!
//! Options come from three layers, highest priority first:
//! 1. `HELM_PLUGIN_*` environment variables
//! 2. the options file (YAML or JSON, camelCase keys)
//! 3. built-in defaults
//!
//! Resolution happens once, through [`ResolvedConfig::resolve`], which takes an
//! environment snapshot rather than reading the process environment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chartpress_core::{DEFAULT_VERSION_TOKEN, PrepOptions, PreparerSettings};

use crate::error::{ReleaseError, Result};

/// Environment variable names, one per option
pub mod vars {
    pub const PATH: &str = "HELM_PLUGIN_PATH";
    pub const RECURSIVE: &str = "HELM_PLUGIN_RECURSIVE";
    pub const FORCE_PUSH: &str = "HELM_PLUGIN_FORCE_PUSH";
    pub const PUSH: &str = "HELM_PLUGIN_PUSH";
    pub const ENABLE_CANARY: &str = "HELM_PLUGIN_ENABLE_CANARY";
    pub const ENABLE_PRERELEASES: &str = "HELM_PLUGIN_ENABLE_PRERELEASE";
    pub const REPLACE_VERSION_STRING: &str = "HELM_PLUGIN_REPLACE_VERSION_STRING";
    pub const REPLACE_FILE_WITH_REPOSITORY: &str = "HELM_PLUGIN_REPLACE_FILE_WITH_REPOSITORY";
    pub const REPOSITORY: &str = "HELM_PLUGIN_REPOSITORY";
    pub const VERSION_STRING: &str = "HELM_PLUGIN_VERSION_STRING";
    pub const USE_HELM_DOCS: &str = "HELM_PLUGIN_USE_HELM_DOCS";
    pub const PUBLISH_PATH: &str = "HELM_PLUGIN_PUBLISH_PATH";
    pub const PUBLISH_REPOSITORY: &str = "HELM_PLUGIN_PUBLISH_REPOSITORY";
}

/// Snapshot of environment variables used for resolution
pub type EnvSnapshot = HashMap<String, String>;

/// Capture the current process environment
pub fn process_env() -> EnvSnapshot {
    std::env::vars().collect()
}

/// Options as written in the configuration file (all optional)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
    /// Path to use for charts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Look for all charts in path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,

    /// Push packaged charts after preparing them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<bool>,

    /// Force push versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_push: Option<bool>,

    /// Enable canary deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_canary: Option<bool>,

    /// Enable prerelease deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_preleases: Option<bool>,

    /// Replace version string
    #[serde(default, alias = "replaceVersionToken", skip_serializing_if = "Option::is_none")]
    pub replace_version_string: Option<bool>,

    /// Replace file references with repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_file_with_repository: Option<bool>,

    /// Repository to use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Version string to use
    #[serde(default, alias = "versionToken", skip_serializing_if = "Option::is_none")]
    pub version_string: Option<String>,

    /// Use helm docs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_helm_docs: Option<bool>,

    /// Publish path to use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_path: Option<String>,

    /// Repository to publish to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_repository: Option<String>,
}

impl PluginOptions {
    /// Load options from a YAML or JSON file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ReleaseError::ConfigLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ReleaseError::ConfigLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Convert an already parsed options object
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|e| ReleaseError::ConfigLoad {
            path: "(inline)".to_string(),
            message: e.to_string(),
        })
    }
}

/// Fully resolved, immutable plugin configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub path: PathBuf,
    pub recursive: bool,
    pub push: bool,
    pub force_push: bool,
    pub enable_canary: bool,
    pub enable_prereleases: bool,
    pub replace_version_string: bool,
    pub replace_file_with_repository: bool,
    pub repository: String,
    pub version_string: String,
    pub use_helm_docs: bool,
    pub publish_path: PathBuf,
    pub publish_repository: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self::resolve(&EnvSnapshot::new(), &PluginOptions::default())
    }
}

impl ResolvedConfig {
    /// Resolve options against an environment snapshot and the defaults
    pub fn resolve(env: &EnvSnapshot, options: &PluginOptions) -> Self {
        Self {
            path: PathBuf::from(string_option(env, vars::PATH, &options.path, ".")),
            recursive: bool_option(env, vars::RECURSIVE, options.recursive, false),
            push: bool_option(env, vars::PUSH, options.push, false),
            force_push: bool_option(env, vars::FORCE_PUSH, options.force_push, false),
            enable_canary: bool_option(env, vars::ENABLE_CANARY, options.enable_canary, false),
            enable_prereleases: bool_option(
                env,
                vars::ENABLE_PRERELEASES,
                options.enable_preleases,
                false,
            ),
            replace_version_string: bool_option(
                env,
                vars::REPLACE_VERSION_STRING,
                options.replace_version_string,
                true,
            ),
            replace_file_with_repository: bool_option(
                env,
                vars::REPLACE_FILE_WITH_REPOSITORY,
                options.replace_file_with_repository,
                false,
            ),
            repository: string_option(env, vars::REPOSITORY, &options.repository, ""),
            version_string: string_option(
                env,
                vars::VERSION_STRING,
                &options.version_string,
                DEFAULT_VERSION_TOKEN,
            ),
            use_helm_docs: bool_option(env, vars::USE_HELM_DOCS, options.use_helm_docs, false),
            publish_path: PathBuf::from(string_option(
                env,
                vars::PUBLISH_PATH,
                &options.publish_path,
                "publish",
            )),
            publish_repository: string_option(
                env,
                vars::PUBLISH_REPOSITORY,
                &options.publish_repository,
                "",
            ),
        }
    }

    /// Options bundle for [`chartpress_core::ChartPreparer::prepare`]
    pub fn prep_options(&self) -> PrepOptions {
        PrepOptions {
            repository: Some(self.repository.clone()).filter(|r| !r.is_empty()),
            recursive: self.recursive,
            replace_version_token: self.replace_version_string,
            replace_file_with_repository: self.replace_file_with_repository,
        }
    }

    /// Settings for constructing a [`chartpress_core::ChartPreparer`]
    pub fn preparer_settings(&self) -> PreparerSettings {
        PreparerSettings {
            version_token: self.version_string.clone(),
            use_helm_docs: self.use_helm_docs,
        }
    }
}

/// Parse a boolean environment value: `true` (any case) or `1`
pub fn parse_bool(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}

fn env_value<'a>(env: &'a EnvSnapshot, var: &str) -> Option<&'a str> {
    env.get(var).map(String::as_str).filter(|v| !v.is_empty())
}

fn string_option(env: &EnvSnapshot, var: &str, option: &Option<String>, default: &str) -> String {
    env_value(env, var)
        .or_else(|| option.as_deref().filter(|v| !v.is_empty()))
        .unwrap_or(default)
        .to_string()
}

fn bool_option(env: &EnvSnapshot, var: &str, option: Option<bool>, default: bool) -> bool {
    match env_value(env, var) {
        Some(value) => parse_bool(value),
        None => option.unwrap_or(default),
    }
}
