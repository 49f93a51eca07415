//! Error types for release lifecycle operations

use chartpress_core::ChartError;
use thiserror::Error;

/// Release lifecycle errors
#[derive(Debug, Error)]
pub enum ReleaseError {
    // ============ Collaborator Errors ============
    #[error("Can't calculate previous version without Git initialized!")]
    MissingVersionControl,

    #[error("Git error: {message}")]
    Git { message: String },

    // ============ Configuration Errors ============
    #[error("Failed to load configuration from {path}: {message}")]
    ConfigLoad { path: String, message: String },

    #[error("Invalid option schema: {message}")]
    InvalidSchema { message: String },

    // ============ Chart Pipeline Errors ============
    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// Result type for release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Whether the failure came from an external tool (helm, helm-docs)
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, ReleaseError::Chart(e) if e.is_tool_failure())
    }
}
