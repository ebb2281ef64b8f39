//! Error types for webremote-client
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for the remote client
#[derive(Error, Debug)]
pub enum Error {
    /// Errors from the shared library (config, protocol)
    #[error(transparent)]
    Common(#[from] webremote_common::Error),

    /// WebSocket transport errors
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Control channel unavailable or closed unexpectedly
    #[error("Connection error: {0}")]
    Connection(String),

    /// Unrecognized user command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

/// Convenience Result type using the client Error
pub type Result<T> = std::result::Result<T, Error>;
