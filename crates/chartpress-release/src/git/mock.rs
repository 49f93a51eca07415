//! In-memory version control for testing

use async_trait::async_trait;
use std::collections::HashMap;

use super::VersionControl;
use crate::error::{ReleaseError, Result};

/// Version control with fixed answers
///
/// Unset values behave like an empty repository: tag lookups fail and
/// branch lookups return `None`.
#[derive(Debug, Clone, Default)]
pub struct MockVersionControl {
    pub latest_tag: Option<String>,
    pub latest_release: Option<String>,
    pub branch_tags: HashMap<String, String>,
    pub current_branch: Option<String>,
}

impl MockVersionControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latest_tag(mut self, tag: impl Into<String>) -> Self {
        self.latest_tag = Some(tag.into());
        self
    }

    pub fn with_latest_release(mut self, release: impl Into<String>) -> Self {
        self.latest_release = Some(release.into());
        self
    }

    pub fn with_branch_tag(mut self, branch: impl Into<String>, tag: impl Into<String>) -> Self {
        self.branch_tags.insert(branch.into(), tag.into());
        self
    }

    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.current_branch = Some(branch.into());
        self
    }
}

#[async_trait]
impl VersionControl for MockVersionControl {
    async fn latest_tag_in_branch(&self) -> Result<String> {
        self.latest_tag.clone().ok_or_else(|| ReleaseError::Git {
            message: "no tag found in branch".to_string(),
        })
    }

    async fn latest_release(&self) -> Result<String> {
        self.latest_release.clone().ok_or_else(|| ReleaseError::Git {
            message: "repository has no commits".to_string(),
        })
    }

    async fn last_tag_not_in_base_branch(&self, branch: &str) -> Result<Option<String>> {
        Ok(self.branch_tags.get(branch).cloned())
    }

    async fn current_branch(&self) -> Option<String> {
        self.current_branch.clone()
    }
}
