//! Chart preparation: stamp, resolve, rewrite and package
//!
//! For one release version, [`ChartPreparer::prepare`]:
//! 1. stages the chart source into the output directory
//! 2. replaces the version token in each chart's metadata files
//! 3. regenerates documentation once for the whole batch (optional)
//! 4. resolves dependencies and packages each chart, one at a time
//! 5. removes the staged chart directories, leaving the archives
//!
//! The first failing external command aborts the batch. Chart directories are
//! only removed once every chart has been packaged.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ChartError, Result};
use crate::exec::CommandRunner;
use crate::rewrite::{
    find_matching_chart_files, inline_replace, replace_file_references, replace_version_token,
    version_token_pattern,
};
use crate::staging::StagingArea;
use crate::tools::{self, HELM, HELM_DOCS};

/// Default placeholder replaced with the release version
pub const DEFAULT_VERSION_TOKEN: &str = "0.0.0-local";

/// Per-call options for [`ChartPreparer::prepare`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepOptions {
    /// Repository that replaces `file://` references
    pub repository: Option<String>,
    /// Discover chart directories at any depth
    pub recursive: bool,
    /// Replace the version token in metadata files
    pub replace_version_token: bool,
    /// Replace `file://` references with `repository`
    pub replace_file_with_repository: bool,
}

impl Default for PrepOptions {
    fn default() -> Self {
        Self {
            repository: None,
            recursive: true,
            replace_version_token: true,
            replace_file_with_repository: true,
        }
    }
}

impl PrepOptions {
    /// The repository to rewrite references to, if rewriting applies
    fn rewrite_repository(&self) -> Option<&str> {
        if !self.replace_file_with_repository {
            return None;
        }
        self.repository.as_deref().filter(|r| !r.is_empty())
    }
}

/// Settings fixed for the lifetime of a preparer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparerSettings {
    /// Placeholder replaced with the release version (empty disables it)
    pub version_token: String,
    /// Run helm-docs before packaging
    pub use_helm_docs: bool,
}

impl Default for PreparerSettings {
    fn default() -> Self {
        Self {
            version_token: DEFAULT_VERSION_TOKEN.to_string(),
            use_helm_docs: true,
        }
    }
}

/// Prepares and packages charts through the Helm CLI
#[derive(Clone)]
pub struct ChartPreparer {
    runner: Arc<dyn CommandRunner>,
    settings: PreparerSettings,
}

impl ChartPreparer {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: PreparerSettings) -> Self {
        Self { runner, settings }
    }

    pub fn settings(&self) -> &PreparerSettings {
        &self.settings
    }

    /// Check that the required tools are installed
    pub async fn validate_dependencies(&self) -> Result<()> {
        tracing::info!("Checking for helm...");
        self.runner.run(HELM, &tools::helm_version_args()).await?;

        if self.settings.use_helm_docs {
            tracing::info!("Checking for helm-docs...");
            self.runner.run(HELM_DOCS, &tools::docs_version_args()).await?;
        } else {
            tracing::info!("Skipping check for helm-docs");
        }

        Ok(())
    }

    /// Prepare and package every chart found in `src` into `dest`
    ///
    /// Returns the chart directories (relative to `dest`) that were packaged.
    pub async fn prepare(
        &self,
        version: &str,
        src: &Path,
        dest: &Path,
        opts: &PrepOptions,
    ) -> Result<Vec<PathBuf>> {
        let staging = StagingArea::stage(src, dest)?;
        let chart_dirs = staging.discover(opts.recursive)?;

        tracing::debug!(
            "Found {} chart director{} in {}",
            chart_dirs.len(),
            if chart_dirs.len() == 1 { "y" } else { "ies" },
            dest.display()
        );

        if opts.replace_version_token && !self.settings.version_token.is_empty() {
            let token = version_token_pattern(&self.settings.version_token)?;
            for chart_dir in &chart_dirs {
                for file in find_matching_chart_files(&staging.chart_path(chart_dir))? {
                    inline_replace(&file, |contents| {
                        replace_version_token(contents, &token, version)
                    })?;
                }
            }
        }

        if self.settings.use_helm_docs {
            tracing::info!("Updating documentation");
            self.runner
                .run_in(Some(dest), HELM_DOCS, &tools::docs_generate_args())
                .await?;
        } else {
            tracing::info!("Skipping documentation generation");
        }

        for chart_dir in &chart_dirs {
            self.prep_chart(&staging.chart_path(chart_dir), dest, version, opts)
                .await?;
        }

        staging.teardown(&chart_dirs);

        Ok(chart_dirs)
    }

    /// Resolve dependencies, rewrite references and package one chart
    pub async fn prep_chart(
        &self,
        chart_src: &Path,
        dest_dir: &Path,
        version: &str,
        opts: &PrepOptions,
    ) -> Result<()> {
        tracing::info!("Creating chart: {} version {}", chart_src.display(), version);

        remove_vendored_archives(chart_src)?;

        self.runner
            .run(HELM, &tools::dependency_update_args(chart_src))
            .await?;

        if let Some(repository) = opts.rewrite_repository() {
            for file in find_matching_chart_files(chart_src)? {
                inline_replace(&file, |contents| replace_file_references(contents, repository))?;
            }
        }

        self.runner
            .run(HELM, &tools::package_args(chart_src, dest_dir))
            .await?;

        Ok(())
    }
}

/// Delete `charts/*.tgz` so dependencies are fetched fresh
fn remove_vendored_archives(chart_src: &Path) -> Result<()> {
    let charts_dir = chart_src.join("charts");
    let pattern = format!(
        "{}/*{}",
        glob::Pattern::escape(&charts_dir.to_string_lossy()),
        tools::ARCHIVE_EXTENSION
    );

    let paths = glob::glob(&pattern).map_err(|e| ChartError::GlobPattern {
        message: format!("invalid glob pattern '{}': {}", pattern, e),
    })?;

    for path in paths.filter_map(|p| p.ok()) {
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Could not remove {}: {}", path.display(), e);
            }
        }
    }

    Ok(())
}
