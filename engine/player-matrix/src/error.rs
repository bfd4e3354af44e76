//! Error types for the player matrix

use thiserror::Error;

/// Result type for player matrix operations
pub type Result<T> = std::result::Result<T, MatrixError>;

/// Errors raised while reading source configuration or payloads.
///
/// Merging and ranking never fail; only the parsing helpers do.
#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("Source '{name}' has an invalid base URL '{url}': {reason}")]
    InvalidSourceUrl { name: String, url: String, reason: String },

    #[error("Source '{name}' base URL '{url}' has no host")]
    MissingHost { name: String, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
