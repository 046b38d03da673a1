//! Error types for the renderer

use thiserror::Error;

/// Result type alias using the render error type
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors raised before a frame starts; nothing inside a frame can fail
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Width or height is zero
    #[error("Invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Cube map faces are missing, empty or mismatched
    #[error("Invalid cube map: {0}")]
    InvalidCubeMap(String),

    /// A pixel buffer does not match its declared size
    #[error("Pixel buffer holds {got} values, expected {expected}")]
    BufferSize { expected: usize, got: usize },
}
