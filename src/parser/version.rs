//! HTTP protocol versions.

use std::fmt;
use std::str::FromStr;

use crate::parser::error::Error;

/// Prefix every accepted protocol token must carry.
pub(crate) const HTTP_PREFIX: &str = "HTTP/";

/// Protocol token of a request line.
///
/// Any token starting with `HTTP/` is accepted; unknown versions are kept
/// verbatim so the request renders back exactly as it was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpVersion {
    Http10,
    Http11,
    Other(String),
}

impl FromStr for HttpVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HTTP/1.0" => Ok(HttpVersion::Http10),
            "HTTP/1.1" => Ok(HttpVersion::Http11),
            _ if s.starts_with(HTTP_PREFIX) => Ok(HttpVersion::Other(s.to_string())),
            _ => Err(Error::UnsupportedProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpVersion::Http10 => write!(f, "HTTP/1.0"),
            HttpVersion::Http11 => write!(f, "HTTP/1.1"),
            HttpVersion::Other(token) => f.write_str(token),
        }
    }
}
