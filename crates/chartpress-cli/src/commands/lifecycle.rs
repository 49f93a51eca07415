//! Lifecycle commands - one per release event

use chartpress_release::{CanaryArgs, LifecycleHooks, VersionArgs};
use console::style;

use super::Context;
use crate::error::Result;

/// Check that helm (and helm-docs when enabled) are available
pub async fn before_run(ctx: &Context) -> Result<()> {
    let plugin = ctx.plugin().await?;
    plugin.before_run().await?;

    println!("{} Dependencies available", style("✓").green());
    Ok(())
}

/// Print the last released version
pub async fn previous_version(ctx: &Context) -> Result<()> {
    let plugin = ctx.plugin().await?;
    println!("{}", plugin.get_previous_version().await?);
    Ok(())
}

pub async fn version(ctx: &Context, bump: &str) -> Result<()> {
    let plugin = ctx.plugin().await?;
    plugin.version(&VersionArgs::new(bump)).await?;
    Ok(())
}

pub async fn publish(ctx: &Context, bump: &str) -> Result<()> {
    let plugin = ctx.plugin().await?;
    plugin.publish(&VersionArgs::new(bump)).await?;
    Ok(())
}

/// Build a canary release and print its version
pub async fn canary(ctx: &Context, bump: &str, canary_identifier: &str, dry_run: bool) -> Result<()> {
    let plugin = ctx.plugin().await?;
    let args = CanaryArgs {
        bump: bump.to_string(),
        canary_identifier: canary_identifier.to_string(),
        dry_run,
    };

    if let Some(version) = plugin.canary(&args).await? {
        println!("{}", version);
    }
    Ok(())
}

/// Build a prerelease and print the prerelease versions, one per line
pub async fn next(ctx: &Context, bump: &str) -> Result<()> {
    let plugin = ctx.plugin().await?;
    let versions = plugin.next(Vec::new(), &VersionArgs::new(bump)).await?;

    for version in versions {
        println!("{}", version);
    }
    Ok(())
}
