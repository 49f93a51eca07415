//! CLI error types with exit code handling
//!
//! Library errors are folded into [`CliError`], which carries the exit code
//! and optional help text shown by miette.

use miette::Diagnostic;
use thiserror::Error;

use chartpress_core::ChartError;
use chartpress_release::ReleaseError;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Plugin options failed schema validation
    #[error("Validation failed: {message}")]
    #[diagnostic(code(chartpress::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// External tool failed or could not be started
    #[error("{message}")]
    #[diagnostic(code(chartpress::cli::tool))]
    Tool {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Options file could not be loaded
    #[error("Configuration error: {message}")]
    #[diagnostic(code(chartpress::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(chartpress::cli::io))]
    Io { message: String },

    /// Invalid command line input
    #[error("{message}")]
    #[diagnostic(code(chartpress::cli::usage))]
    Usage { message: String },

    /// Wrapped error for passthrough (stores the formatted message)
    #[error("{message}")]
    #[diagnostic(code(chartpress::cli::error))]
    Other {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Tool { .. } => exit_codes::TOOL_ERROR,
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    /// Create a validation error with help text
    pub fn validation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an input error (user provided invalid input)
    pub fn input(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::io(err)
    }
}

impl From<ChartError> for CliError {
    fn from(err: ChartError) -> Self {
        match &err {
            ChartError::Spawn { program, .. } => CliError::Tool {
                message: err.to_string(),
                help: Some(format!("Make sure `{}` is installed and on your PATH", program)),
            },
            ChartError::ToolFailed { .. } => CliError::Tool {
                message: err.to_string(),
                help: None,
            },
            ChartError::Copy { .. }
            | ChartError::Rewrite { .. }
            | ChartError::Walk(_)
            | ChartError::Io(_) => CliError::Io {
                message: err.to_string(),
            },
            ChartError::StagingOverlapsSource { .. } => CliError::Config {
                message: err.to_string(),
                help: Some("Point publishPath outside the chart source path".to_string()),
            },
            ChartError::GlobPattern { .. } | ChartError::InvalidToken(_) => CliError::Other {
                message: err.to_string(),
                help: None,
            },
        }
    }
}

impl From<ReleaseError> for CliError {
    fn from(err: ReleaseError) -> Self {
        match err {
            ReleaseError::Chart(e) => CliError::from(e),
            ReleaseError::MissingVersionControl => CliError::Other {
                message: err.to_string(),
                help: Some("Run inside a git repository, without --no-git".to_string()),
            },
            ReleaseError::Git { .. } => CliError::Tool {
                message: err.to_string(),
                help: None,
            },
            ReleaseError::ConfigLoad { .. } => CliError::Config {
                message: err.to_string(),
                help: Some("Options files are YAML or JSON objects with camelCase keys".to_string()),
            },
            ReleaseError::InvalidSchema { .. } => CliError::Other {
                message: err.to_string(),
                help: None,
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
