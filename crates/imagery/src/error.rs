//! Error types for source image handling.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("image filename '{0}' is not a <YYYY-MM-DD_HH:MM:SS>.png timestamp")]
    BadTimestamp(String),

    #[error("failed to list images under {path}: {reason}")]
    List { path: PathBuf, reason: String },
}

/// Result type for imagery operations.
pub type ImageryResult<T> = Result<T, ImageryError>;
