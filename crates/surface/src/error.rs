//! Error types for surface loading and smoothing.

use thiserror::Error;

/// Result type alias using SurfaceError.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Invalid surface data: {0}")]
    InvalidFormat(String),

    #[error("Unsupported surface format: {0}")]
    UnsupportedFormat(String),

    #[error("Truncated file: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Vertex index {index} out of range for surface with {vertex_count} vertices")]
    VertexOutOfRange { index: usize, vertex_count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
