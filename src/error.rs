//! Error types for the fallible edges of the crate
//!
//! The search and filter algorithms themselves are total; only ingestion,
//! configuration, the worker channel and stdio transport can fail.

use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Parse failed: {0}")]
    ParseFailed(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Search worker unavailable: {0}")]
    WorkerUnavailable(String),
}

impl AppError {
    /// Get the error code used in protocol error lines
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::ParseFailed(_) => "parse_failed",
            AppError::Io(_) => "io_error",
            AppError::Config(_) => "config_error",
            AppError::WorkerUnavailable(_) => "worker_unavailable",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseFailed(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}
