//! Staging area for chart preparation
//!
//! The chart source tree is copied into the output directory before anything
//! is rewritten, so the source is never mutated and chart discovery reads the
//! copied layout. After packaging, the copied chart directories are removed
//! and only the archives (plus any non-chart content) remain.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ChartError, Result};

/// A populated working copy of a chart source tree
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Copy `source` recursively into `dest`
    ///
    /// `dest` is created if missing and is not cleared first: existing files
    /// are overwritten, everything else is left in place. When `dest` lives
    /// inside `source`, its subtree is not copied into itself. A `dest` equal
    /// to `source` or one of its ancestors is rejected, since teardown would
    /// remove the source charts.
    pub fn stage(source: &Path, dest: &Path) -> Result<Self> {
        let source_canonical = source.canonicalize()?;
        std::fs::create_dir_all(dest)?;
        let dest_canonical = dest.canonicalize()?;

        if source_canonical.starts_with(&dest_canonical) {
            return Err(ChartError::StagingOverlapsSource {
                source_dir: source.display().to_string(),
                dest: dest.display().to_string(),
            });
        }

        let walker = WalkDir::new(source)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| !(e.file_type().is_dir() && is_same_dir(e.path(), &dest_canonical)));

        for entry in walker {
            let entry = entry?;
            let rel_path = match entry.path().strip_prefix(source) {
                Ok(p) => p,
                Err(_) => continue,
            };
            let target = dest.join(rel_path);

            copy_entry(&entry, &target)?;
        }

        Ok(Self {
            root: dest.to_path_buf(),
        })
    }

    /// Root of the staging area
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a discovered chart directory
    pub fn chart_path(&self, chart_dir: &Path) -> PathBuf {
        self.root.join(chart_dir)
    }

    /// Discover chart directories inside the staging area
    pub fn discover(&self, recursive: bool) -> Result<Vec<PathBuf>> {
        discover_chart_dirs(&self.root, recursive)
    }

    /// Remove the given chart directories from the staging area
    ///
    /// Missing directories are ignored, other failures are logged and skipped.
    pub fn teardown(&self, chart_dirs: &[PathBuf]) {
        for dir in chart_dirs {
            let path = self.chart_path(dir);
            match std::fs::remove_dir_all(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!("Could not remove {}: {}", path.display(), e);
                }
            }
        }
    }
}

/// List chart directories under `path`, relative to it
///
/// Shallow mode returns immediate subdirectories only. Recursive mode returns
/// every nested directory at any depth, including directories a chart tool
/// manages inside a chart (such as `charts/` or `templates/`).
pub fn discover_chart_dirs(path: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    if recursive {
        for entry in WalkDir::new(path).min_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }
            if let Ok(rel) = entry.path().strip_prefix(path) {
                dirs.push(rel.to_path_buf());
            }
        }
    } else {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                dirs.push(PathBuf::from(entry.file_name()));
            }
        }
    }

    Ok(dirs)
}

fn is_same_dir(path: &Path, canonical: &Path) -> bool {
    path.canonicalize().map(|p| p == canonical).unwrap_or(false)
}

fn copy_entry(entry: &walkdir::DirEntry, target: &Path) -> Result<()> {
    let file_type = entry.file_type();
    let copy_err = |e: std::io::Error| ChartError::Copy {
        from: entry.path().display().to_string(),
        to: target.display().to_string(),
        source: e,
    };

    if file_type.is_dir() {
        std::fs::create_dir_all(target).map_err(copy_err)?;
    } else if file_type.is_symlink() {
        copy_symlink(entry.path(), target).map_err(copy_err)?;
    } else {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(copy_err)?;
        }
        std::fs::copy(entry.path(), target).map_err(copy_err)?;
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> std::io::Result<()> {
    let pointee = std::fs::read_link(link)?;
    if target.symlink_metadata().is_ok() {
        remove_any(target)?;
    }
    std::os::unix::fs::symlink(pointee, target)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> std::io::Result<()> {
    if link.is_dir() {
        std::fs::create_dir_all(target)
    } else {
        std::fs::copy(link, target).map(|_| ())
    }
}

#[cfg(unix)]
fn remove_any(path: &Path) -> std::io::Result<()> {
    let meta = path.symlink_metadata()?;
    if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}
