//! Validate-config command - check plugin options against their schema

use console::style;
use serde_json::Value as JsonValue;
use std::path::Path;

use chartpress_release::{ChartPlugin, LifecycleHooks, ReleaseHost, ResolvedConfig};

use super::Context;
use crate::error::{CliError, Result};

pub fn run(ctx: &Context, name: &str, json_output: bool) -> Result<()> {
    let path = ctx.config.as_deref().ok_or_else(|| {
        CliError::input("No options file given; pass --config or set CHARTPRESS_CONFIG")
    })?;
    let options = read_options(path)?;

    // Validation only needs the schema, not the resolved options
    let plugin = ChartPlugin::new(ResolvedConfig::default(), ReleaseHost::default(), ctx.runner());
    let Some(errors) = plugin.validate_config(name, &options) else {
        if json_output {
            print_json(&serde_json::json!({ "plugin": name, "handled": false }))?;
        } else {
            println!(
                "{} Options for '{}' are not handled by this plugin",
                style("→").blue(),
                name
            );
        }
        return Ok(());
    };

    if json_output {
        print_json(&serde_json::json!({
            "plugin": name,
            "handled": true,
            "valid": errors.is_empty(),
            "errors": errors,
        }))?;
    } else if errors.is_empty() {
        println!("{} Configuration is valid", style("✓").green().bold());
    } else {
        println!("{} {}", style("✗").red().bold(), path.display());
        for error in &errors {
            println!("  {} {}", style("•").red(), error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CliError::validation_with_help(
            format!("{} error(s) in {}", errors.len(), path.display()),
            "Options use camelCase keys, e.g. path, push, publishPath, publishRepository",
        ))
    }
}

/// Read the raw options object; an empty file is `null`
fn read_options(path: &Path) -> Result<JsonValue> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CliError::config_with_help(
            format!("Cannot read {}: {}", path.display(), e),
            "Check the --config path",
        )
    })?;

    if content.trim().is_empty() {
        return Ok(JsonValue::Null);
    }

    serde_yaml::from_str(&content).map_err(|e| {
        CliError::config_with_help(
            format!("Cannot parse {}: {}", path.display(), e),
            "Options files are YAML or JSON",
        )
    })
}

fn print_json(value: &JsonValue) -> Result<()> {
    let output = serde_json::to_string_pretty(value).map_err(|e| CliError::Other {
        message: e.to_string(),
        help: None,
    })?;
    println!("{}", output);
    Ok(())
}
