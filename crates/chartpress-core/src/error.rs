//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rewrite {path}: {source}")]
    Rewrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {status}: {stderr}")]
    ToolFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    #[error("Staging directory {dest} contains the chart source {source_dir}")]
    StagingOverlapsSource { source_dir: String, dest: String },

    #[error("Invalid glob pattern: {message}")]
    GlobPattern { message: String },

    #[error("Invalid version token: {0}")]
    InvalidToken(#[from] regex::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChartError {
    /// Whether this error came from an external tool rather than the filesystem
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, ChartError::ToolFailed { .. } | ChartError::Spawn { .. })
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
