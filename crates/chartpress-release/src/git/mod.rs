//! Version control integration
//!
//! Tag lookups go through the [`VersionControl`] trait:
//! - **GitCli**: shells out to `git` through a `CommandRunner`
//! - **MockVersionControl**: fixed answers, for tests

mod mock;

pub use mock::MockVersionControl;

use async_trait::async_trait;
use std::sync::Arc;

use chartpress_core::CommandRunner;

use crate::error::{ReleaseError, Result};
use crate::version::parse_version;

const GIT: &str = "git";

/// Tag and branch queries needed to compute release versions
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Most recent tag reachable from the current branch
    async fn latest_tag_in_branch(&self) -> Result<String>;

    /// Latest released version (highest version tag, else the first commit)
    async fn latest_release(&self) -> Result<String>;

    /// Newest tag on `branch` that the base branch does not contain
    async fn last_tag_not_in_base_branch(&self, branch: &str) -> Result<Option<String>>;

    /// Name of the checked out branch, if any
    async fn current_branch(&self) -> Option<String>;
}

/// `git` command line implementation
#[derive(Clone)]
pub struct GitCli {
    runner: Arc<dyn CommandRunner>,
    base_branch: String,
}

impl GitCli {
    pub fn new(runner: Arc<dyn CommandRunner>, base_branch: impl Into<String>) -> Self {
        Self {
            runner,
            base_branch: base_branch.into(),
        }
    }

    /// Create a client if the working directory is inside a git work tree
    pub async fn detect(runner: Arc<dyn CommandRunner>, base_branch: impl Into<String>) -> Option<Self> {
        let git = Self::new(runner, base_branch);
        match git.git(&["rev-parse", "--is-inside-work-tree"]).await {
            Ok(out) if out == "true" => Some(git),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Git is not available: {}", e);
                None
            }
        }
    }

    pub fn base_branch(&self) -> &str {
        &self.base_branch
    }

    async fn git(&self, args: &[&str]) -> Result<String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let output = self
            .runner
            .run(GIT, &args)
            .await
            .map_err(|e| ReleaseError::Git {
                message: e.to_string(),
            })?;
        Ok(output.stdout.trim().to_string())
    }

    async fn tags_merged_into(&self, reference: &str) -> Result<Vec<String>> {
        let out = self.git(&["tag", "--merged", reference]).await?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Highest semver tag in `tags`, ignoring tags that are not versions
fn highest_version_tag(tags: &[String]) -> Option<String> {
    tags.iter()
        .filter_map(|t| parse_version(t).map(|v| (v, t)))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, t)| t.clone())
}

#[async_trait]
impl VersionControl for GitCli {
    async fn latest_tag_in_branch(&self) -> Result<String> {
        let tag = self.git(&["describe", "--tags", "--abbrev=0"]).await?;
        if tag.is_empty() {
            return Err(ReleaseError::Git {
                message: "no tag found in branch".to_string(),
            });
        }
        Ok(tag)
    }

    async fn latest_release(&self) -> Result<String> {
        let tags = self.tags_merged_into("HEAD").await?;
        if let Some(tag) = highest_version_tag(&tags) {
            return Ok(tag);
        }

        let first_commit = self.git(&["rev-list", "--max-parents=0", "HEAD"]).await?;
        first_commit
            .lines()
            .next()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::Git {
                message: "repository has no commits".to_string(),
            })
    }

    async fn last_tag_not_in_base_branch(&self, branch: &str) -> Result<Option<String>> {
        let base_tags = self.tags_merged_into(&self.base_branch).await?;
        let branch_tags: Vec<String> = self
            .tags_merged_into(branch)
            .await?
            .into_iter()
            .filter(|t| !base_tags.contains(t))
            .collect();

        Ok(highest_version_tag(&branch_tags))
    }

    async fn current_branch(&self) -> Option<String> {
        match self.git(&["rev-parse", "--abbrev-ref", "HEAD"]).await {
            Ok(branch) if !branch.is_empty() && branch != "HEAD" => Some(branch),
            _ => None,
        }
    }
}
