//! Error types for engine exports.
//!
//! Every failure of a run surfaces as an [`ExportError`]. Nothing is retried
//! and nothing is reported as a partial success: the first error aborts the
//! remaining steps.

use std::path::PathBuf;
use thiserror::Error;

use crate::export::ExportStep;

/// Main error type for the export library.
#[derive(Debug, Error)]
pub enum ExportError {
    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // Lookup errors
    #[error("Unknown dtype code {code:?}, expected one of fp, bf, f8, w4, w8, a8")]
    UnknownDtype { code: String },

    // External command errors
    #[error("Error when {step}: command exited with status {code}")]
    CommandFailed { step: ExportStep, code: i32 },

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine the TensorRT-LLM version: {message}")]
    ToolchainVersion { message: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // JSON is only used to echo the parsed config
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl ExportError {
    /// Create an IO error with a description of what was being done and the path involved.
    pub fn io(context: &str, path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        ExportError::Io {
            message: format!("{context}: {err}"),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Whether this error was raised while reading or validating the config.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ExportError::Config { .. }
                | ExportError::Yaml { .. }
                | ExportError::Validation { .. }
                | ExportError::UnknownDtype { .. }
        )
    }

    /// Map the error to a process exit code.
    ///
    /// - 2: configuration or dtype lookup error
    /// - 3: an external command failed or could not be started
    /// - 4: filesystem error
    /// - 1: anything else
    pub fn exit_code(&self) -> i32 {
        match self {
            e if e.is_config_error() => 2,
            ExportError::CommandFailed { .. } | ExportError::Spawn { .. } => 3,
            ExportError::Io { .. } => 4,
            _ => 1,
        }
    }
}
