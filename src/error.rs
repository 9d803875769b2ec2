//! Error types for portscout.
//!
//! Uses `thiserror` for ergonomic error definitions. Port-token errors live
//! next to the port types in [`crate::types::PortError`].

use crate::types::PortError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while setting up a single probe.
///
/// These never abort a scan; they become the `error` result for one port.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error(transparent)]
    InvalidPort(#[from] PortError),

    #[error("failed to resolve '{target}': {source}")]
    Resolve {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no IPv4 address found for '{0}'")]
    NoIpv4Address(String),

    #[error("socket setup failed: {0}")]
    Socket(#[source] std::io::Error),
}

/// Failure of the GeoIP lookup.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

/// Errors that abort a scan while results are written.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to write results: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
