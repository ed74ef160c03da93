//! Error types for the brain-animator services.

use thiserror::Error;

/// Result type alias using BrainError.
pub type BrainResult<T> = Result<T, BrainError>;

/// Primary error type for animation requests.
#[derive(Debug, Error)]
pub enum BrainError {
    // === Request Errors ===
    #[error("Please upload a file first.")]
    MissingUpload,

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Unsupported source estimate format: {0}")]
    UnsupportedFormat(String),

    // === Data Errors ===
    #[error("Failed to parse source estimate: {0}")]
    ParseError(String),

    #[error("Source estimate references vertex {index} but the surface has {vertex_count} vertices")]
    SurfaceMismatch { index: usize, vertex_count: usize },

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Failed to encode animation: {0}")]
    EncodeError(String),

    // === Infrastructure Errors ===
    #[error("Surface data unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl BrainError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            BrainError::MissingUpload
            | BrainError::InvalidParameter { .. }
            | BrainError::UnsupportedFormat(_)
            | BrainError::ParseError(_)
            | BrainError::SurfaceMismatch { .. } => 400,

            BrainError::SurfaceUnavailable(_) => 503,

            _ => 500,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for BrainError {
    fn from(err: std::io::Error) -> Self {
        BrainError::InternalError(err.to_string())
    }
}
