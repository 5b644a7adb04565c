//! Common error types for the metadata enhancer

use thiserror::Error;

/// Common result type for enhancer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the enhancer crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metadata source could not be loaded or parsed
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
