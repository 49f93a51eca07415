//! Publishing packaged charts to a chart registry

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::exec::CommandRunner;
use crate::tools::{self, ARCHIVE_EXTENSION, HELM};

/// Pushes chart archives with `helm cm-push`
#[derive(Clone)]
pub struct ChartPublisher {
    runner: Arc<dyn CommandRunner>,
}

impl ChartPublisher {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Push every archive directly inside `path` to `repository`
    ///
    /// Archives are pushed one at a time; the first failure stops the rest.
    /// Returns how many archives were pushed.
    pub async fn publish(&self, path: &Path, repository: &str, force_push: bool) -> Result<usize> {
        let archives = find_archives(path)?;

        for archive in &archives {
            tracing::info!("Publishing {}", archive.display());
            self.runner
                .run(HELM, &tools::push_args(force_push, archive, repository))
                .await?;
        }

        Ok(archives.len())
    }
}

/// Regular files in `path` (not its subdirectories) ending in `.tgz`
pub fn find_archives(path: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();

    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(ARCHIVE_EXTENSION) {
            archives.push(path.join(entry.file_name()));
        }
    }

    Ok(archives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::MockRunner;
    use tempfile::TempDir;

    fn publisher(runner: &MockRunner) -> ChartPublisher {
        ChartPublisher::new(Arc::new(runner.clone()))
    }

    #[tokio::test]
    async fn test_publish_force() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("someChart.tgz"), "x").unwrap();
        let runner = MockRunner::new();

        let pushed = publisher(&runner).publish(dir.path(), "repo", true).await.unwrap();

        assert_eq!(pushed, 1);
        let archive = dir.path().join("someChart.tgz");
        assert_eq!(
            runner.calls()[0].args,
            vec![
                "cm-push".to_string(),
                "-f".to_string(),
                archive.to_string_lossy().into_owned(),
                "repo".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_publish_without_force() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("someChart.tgz"), "x").unwrap();
        let runner = MockRunner::new();

        publisher(&runner).publish(dir.path(), "repo", false).await.unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].args.contains(&"-f".to_string()));
    }

    #[tokio::test]
    async fn test_publish_skips_non_tgz_files_and_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("someFile"), "x").unwrap();
        std::fs::write(dir.path().join("notes.tgz.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("someDir.tgz")).unwrap();
        std::fs::write(dir.path().join("a-1.0.0.tgz"), "x").unwrap();
        std::fs::write(dir.path().join("b-1.0.0.tgz"), "x").unwrap();
        let runner = MockRunner::new();

        let pushed = publisher(&runner).publish(dir.path(), "repo", true).await.unwrap();

        assert_eq!(pushed, 2);
        let mut pushed_files: Vec<String> = runner
            .calls()
            .iter()
            .map(|c| c.args[2].clone())
            .collect();
        pushed_files.sort();
        assert_eq!(
            pushed_files,
            vec![
                dir.path().join("a-1.0.0.tgz").to_string_lossy().into_owned(),
                dir.path().join("b-1.0.0.tgz").to_string_lossy().into_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn test_publish_nothing_when_no_archives() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();

        let pushed = publisher(&runner).publish(dir.path(), "repo", true).await.unwrap();

        assert_eq!(pushed, 0);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_publish_stops_on_first_failure() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a-1.0.0.tgz"), "x").unwrap();
        std::fs::write(dir.path().join("b-1.0.0.tgz"), "x").unwrap();
        let runner = MockRunner::new();
        runner.fail("helm", &["cm-push"], "409 Conflict");

        let result = publisher(&runner).publish(dir.path(), "repo", false).await;

        assert!(result.is_err());
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_publish_missing_directory() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();

        let result = publisher(&runner)
            .publish(&dir.path().join("missing"), "repo", false)
            .await;

        assert!(result.is_err());
    }
}
