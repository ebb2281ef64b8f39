//! Common error types for the web remote

use thiserror::Error;

/// Common result type for web remote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the web remote crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Control-channel message could not be decoded or encoded
    #[error("Protocol error: {0}")]
    Protocol(#[from] serde_json::Error),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
