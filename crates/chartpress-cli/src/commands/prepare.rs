//! Prepare command - stamp and package charts for a given version

use chartpress_core::ChartPreparer;
use console::style;

use super::Context;
use crate::error::{CliError, Result};

pub async fn run(ctx: &Context, version: &str) -> Result<()> {
    if version.trim().is_empty() {
        return Err(CliError::input("Version must not be empty"));
    }

    let config = ctx.resolved_config()?;
    let preparer = ChartPreparer::new(ctx.runner(), config.preparer_settings());

    println!(
        "{} Preparing charts from {} into {}",
        style("→").blue(),
        config.path.display(),
        config.publish_path.display()
    );

    let charts = preparer
        .prepare(version, &config.path, &config.publish_path, &config.prep_options())
        .await?;

    if charts.is_empty() {
        println!("{} No charts found in {}", style("⚠").yellow(), config.path.display());
        return Ok(());
    }

    for chart in &charts {
        println!("  {} {}", style("✓").green(), chart.display());
    }
    println!(
        "{} Packaged {} chart(s) at version {}",
        style("✓").green().bold(),
        charts.len(),
        version
    );

    Ok(())
}
