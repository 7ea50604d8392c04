//! Server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::server::error::Error;

/// Time in-flight connections get to finish once shutdown starts.
pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 5_000;

/// HTTP server configuration.
///
/// Fixed for the lifetime of a server and shared read-only with every
/// connection handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,
    /// The port to listen on. Port 0 binds an ephemeral port.
    pub port: u16,
    /// The directory request targets are resolved against.
    pub document_root: PathBuf,
    /// The maximum number of connections handled at the same time.
    pub max_workers: usize,
    /// How long shutdown waits for in-flight connections, in milliseconds.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_shutdown_grace_ms() -> u64 {
    DEFAULT_SHUTDOWN_GRACE_MS
}

impl ServerConfig {
    /// Create a configuration listening on all interfaces.
    pub fn new(port: u16, document_root: impl Into<PathBuf>, max_workers: usize) -> Self {
        Self {
            host: default_host(),
            port,
            document_root: document_root.into(),
            max_workers,
            shutdown_grace_ms: DEFAULT_SHUTDOWN_GRACE_MS,
        }
    }

    /// Load a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the values a server cannot run without.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_workers == 0 {
            return Err(Error::InvalidConfig(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if self.document_root.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "document_root must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}
