//! Error types for the ADP compiler

use std::path::PathBuf;
use thiserror::Error;

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompilerError>;

/// Errors from fetching, caching or configuring a compile run.
///
/// Per-dataset failures are logged and skipped by the compiler; only
/// configuration and output errors abort a run.
#[derive(Error, Debug)]
pub enum CompilerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("I/O error on {path:?}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Matrix error: {0}")]
    Matrix(#[from] player_matrix::MatrixError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CompilerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CompilerError::Io { path: path.into(), source }
    }
}
