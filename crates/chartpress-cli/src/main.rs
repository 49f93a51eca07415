//! Chartpress CLI - Stamp, package and publish Helm charts from a release pipeline

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;

use commands::Context;
use error::{CliError, Result};

#[derive(Parser)]
#[command(name = "chartpress")]
#[command(author = "Chartpress Contributors")]
#[command(version)]
#[command(about = "Stamp, package and publish Helm charts from a release pipeline", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Plugin options file (YAML or JSON)
    #[arg(short, long, global = true, env = "CHARTPRESS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Run without git (version lookups are skipped)
    #[arg(long, global = true)]
    no_git: bool,

    /// Do not prefix release tags with `v`
    #[arg(long, global = true)]
    no_version_prefix: bool,

    /// Branch prereleases are cut from (repeatable, default: next)
    #[arg(long = "prerelease-branch", global = true)]
    prerelease_branches: Vec<String>,

    /// Branch stable releases are made from
    #[arg(long, global = true, default_value = "main")]
    base_branch: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that helm (and helm-docs when enabled) are installed
    BeforeRun,

    /// Print the last released version
    PreviousVersion,

    /// Show the version a release would produce
    Version {
        /// Version bump (major, minor, patch, ...)
        #[arg(long)]
        bump: String,
    },

    /// Prepare and optionally push charts for a release
    Publish {
        /// Version bump (major, minor, patch, ...)
        #[arg(long)]
        bump: String,
    },

    /// Prepare and optionally push charts for a canary release
    Canary {
        /// Version bump (major, minor, patch, ...)
        #[arg(long)]
        bump: String,

        /// Suffix appended to the canary version
        #[arg(long)]
        canary_identifier: String,

        /// Only report the version that would be built
        #[arg(long)]
        dry_run: bool,
    },

    /// Prepare and optionally push charts for a prerelease
    Next {
        /// Version bump (major, minor, patch, ...)
        #[arg(long)]
        bump: String,
    },

    /// Validate the options file
    ValidateConfig {
        /// Plugin name the options are registered under
        #[arg(long, default_value = "helm")]
        name: String,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Stamp and package charts with an explicit version
    Prepare {
        /// Version written into the charts
        #[arg(id = "chart_version", value_name = "VERSION")]
        version: String,
    },

    /// Push packaged charts from the publish path
    Push,
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = Context {
        config: cli.config,
        no_git: cli.no_git,
        no_version_prefix: cli.no_version_prefix,
        prerelease_branches: cli.prerelease_branches,
        base_branch: cli.base_branch,
    };

    match cli.command {
        Commands::BeforeRun => commands::lifecycle::before_run(&ctx).await,

        Commands::PreviousVersion => commands::lifecycle::previous_version(&ctx).await,

        Commands::Version { bump } => commands::lifecycle::version(&ctx, &bump).await,

        Commands::Publish { bump } => commands::lifecycle::publish(&ctx, &bump).await,

        Commands::Canary {
            bump,
            canary_identifier,
            dry_run,
        } => commands::lifecycle::canary(&ctx, &bump, &canary_identifier, dry_run).await,

        Commands::Next { bump } => commands::lifecycle::next(&ctx, &bump).await,

        Commands::ValidateConfig { name, json } => commands::validate::run(&ctx, &name, json),

        Commands::Prepare { version } => commands::prepare::run(&ctx, &version).await,

        Commands::Push => commands::push::run(&ctx).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli).await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => report(err),
    }
}

fn report(err: CliError) -> ExitCode {
    let code = err.exit_code();
    eprintln!("{:?}", miette::Report::new(err));
    ExitCode::from(code as u8)
}
