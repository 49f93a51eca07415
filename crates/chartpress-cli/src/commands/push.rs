//! Push command - push packaged charts to the chart repository

use chartpress_core::{ChartPublisher, find_archives};
use console::style;

use super::Context;
use crate::error::{CliError, Result};

pub async fn run(ctx: &Context) -> Result<()> {
    let config = ctx.resolved_config()?;

    if config.publish_repository.is_empty() {
        return Err(CliError::config_with_help(
            "No publish repository configured",
            "Set publishRepository in the options file or HELM_PLUGIN_PUBLISH_REPOSITORY",
        ));
    }

    let archives = find_archives(&config.publish_path)?;
    if archives.is_empty() {
        println!(
            "{} No chart archives in {}",
            style("⚠").yellow(),
            config.publish_path.display()
        );
        return Ok(());
    }

    println!(
        "{} Pushing {} archive(s) to {}...",
        style("→").blue(),
        archives.len(),
        config.publish_repository
    );

    let publisher = ChartPublisher::new(ctx.runner());
    let pushed = publisher
        .publish(&config.publish_path, &config.publish_repository, config.force_push)
        .await?;

    println!("{} Pushed {} chart(s)", style("✓").green().bold(), pushed);
    Ok(())
}
