//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur while reading and parsing an HTTP request.
#[derive(Debug, Error)]
pub enum Error {
    /// The stream ended before a request line was read.
    #[error("Server accepts only HTTP requests.")]
    EmptyRequest,

    /// The request line does not have a method, a target and a protocol.
    #[error("Cannot parse request line from \"{0}\"")]
    MalformedRequestLine(String),

    /// The protocol token does not start with `HTTP/`.
    #[error("Server accepts only HTTP requests, got protocol \"{0}\"")]
    UnsupportedProtocol(String),

    /// A header line could not be split into a name and a value on `": "`.
    #[error("Cannot parse header from \"{0}\"")]
    MalformedHeader(String),

    /// Reading the request head from the connection failed.
    #[error("I/O error while reading request: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the input violated the request grammar, as opposed to the
    /// connection failing underneath the parser.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::EmptyRequest | Error::MalformedRequestLine(_) | Error::MalformedHeader(_)
        )
    }
}
