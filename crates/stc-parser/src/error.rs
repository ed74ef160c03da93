//! Error types for source estimate decoding.

use thiserror::Error;

/// Result type alias using StcError.
pub type StcResult<T> = Result<T, StcError>;

#[derive(Debug, Error)]
pub enum StcError {
    #[error("Unsupported source estimate extension: {0}")]
    UnsupportedExtension(String),

    #[error("Truncated file: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Invalid source estimate: {0}")]
    InvalidFormat(String),
}
