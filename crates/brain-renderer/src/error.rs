//! Error types for frame rendering and artifact encoding.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render input: {0}")]
    InvalidInput(String),

    #[error("activity has {activity} values but the surface has {vertices} vertices")]
    ActivityMismatch { activity: usize, vertices: usize },

    #[error("PNG encoding failed: {0}")]
    PngEncoding(String),

    #[error("GIF encoding failed: {0}")]
    GifEncoding(String),
}

impl From<gif::EncodingError> for RenderError {
    fn from(err: gif::EncodingError) -> Self {
        RenderError::GifEncoding(err.to_string())
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
