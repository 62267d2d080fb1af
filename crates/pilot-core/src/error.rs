//! Error types for Pilot Core

use thiserror::Error;

/// Result type alias using Pilot Error
pub type Result<T> = std::result::Result<T, Error>;

/// Pilot error types
///
/// Lookup misses (unknown session ids) are not errors; the store reports them
/// as `None` / `false`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create a backend error from anything displayable
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
