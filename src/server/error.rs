//! Error types for the HTTP server.

use std::net::SocketAddr;

use thiserror::Error;

use crate::parser::Error as ParserError;

/// Errors that can occur during HTTP server operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The listening socket could not be bound.
    #[error("Port number: {port} cannot be used ({source})", port = .addr.port())]
    BindError {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The server configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON configuration could not be decoded.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
