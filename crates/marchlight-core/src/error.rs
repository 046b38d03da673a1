//! Error types for Marchlight core

use thiserror::Error;

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building scene functions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A shape id that does not map to any primitive
    #[error("Unknown shape id {0}")]
    UnknownShape(u32),

    /// Wrong number of parameters for a shape picked by id
    #[error("Shape `{shape}` expects {expected} parameters, got {got}")]
    ShapeArity {
        shape: &'static str,
        expected: usize,
        got: usize,
    },
}
