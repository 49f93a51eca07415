//! Release lifecycle hooks
//!
//! A release host drives a plugin through these events, in order:
//! `before_run`, `get_previous_version`, then one of `version`/`publish`,
//! `canary` or `next`. `validate_config` may be called at any time.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Result;

/// Payload of the `version` and `publish` events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionArgs {
    /// Requested bump (`major`, `minor`, `patch`, ...)
    pub bump: String,
}

impl VersionArgs {
    pub fn new(bump: impl Into<String>) -> Self {
        Self { bump: bump.into() }
    }
}

/// Payload of the `canary` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanaryArgs {
    pub bump: String,
    /// Suffix appended to the canary version, e.g. `canary.42.1`
    pub canary_identifier: String,
    #[serde(default)]
    pub dry_run: bool,
}

/// Handlers for each release lifecycle event
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    /// Name the plugin registers under
    fn name(&self) -> &str;

    /// Check that required tooling is available
    async fn before_run(&self) -> Result<()>;

    /// Last released version
    async fn get_previous_version(&self) -> Result<String>;

    /// Announce the version a release would produce
    async fn version(&self, args: &VersionArgs) -> Result<()>;

    /// Build (and optionally push) a release
    async fn publish(&self, args: &VersionArgs) -> Result<()>;

    /// Build a canary release, returning the version that was built
    async fn canary(&self, args: &CanaryArgs) -> Result<Option<String>>;

    /// Build a prerelease and append its version to `prerelease_versions`
    async fn next(&self, prerelease_versions: Vec<String>, args: &VersionArgs)
    -> Result<Vec<String>>;

    /// Validate the options object addressed to `name`
    ///
    /// Returns `None` when the options belong to another plugin.
    fn validate_config(&self, name: &str, options: &JsonValue) -> Option<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canary_args_from_camel_case() {
        let args: CanaryArgs = serde_json::from_value(json!({
            "bump": "minor",
            "canaryIdentifier": "canary.42.1",
        }))
        .unwrap();

        assert_eq!(args.bump, "minor");
        assert_eq!(args.canary_identifier, "canary.42.1");
        assert!(!args.dry_run);
    }
}
