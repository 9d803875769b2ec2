//! Prober trait abstraction.
//!
//! Defines a common interface for the TCP and UDP probers, so the probe pool
//! can drive either one and tests can substitute their own.

use crate::error::ProbeError;
use crate::services::{describe_service, UNKNOWN_SERVICE};
use crate::types::Port;
use async_trait::async_trait;
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Transport protocol used for every probe of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Protocol {
    /// Stream socket connect
    #[default]
    #[value(name = "TCP")]
    Tcp,
    /// Datagram socket connect
    #[value(name = "UDP")]
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
        }
    }
}

/// Classification of a probed port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// Connect succeeded.
    Open,
    /// Connect was actively rejected (RST, ICMP unreachable, ...).
    Closed,
    /// No answer before the timeout.
    Filtered,
    /// The probe could not be attempted.
    Error,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Result of probing a single port.
///
/// `Display` renders the line printed for the port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// The port number as requested (may be outside 1-65535 for errors).
    pub port: u32,
    pub status: ProbeStatus,
    /// Service name, or "Unknown service".
    pub service: String,
    /// Description of what went wrong, for `ProbeStatus::Error`.
    pub error: Option<String>,
}

impl ProbeResult {
    /// Create a result for a completed connect attempt.
    pub fn new(port: u32, status: ProbeStatus, service: impl Into<String>) -> Self {
        Self {
            port,
            status,
            service: service.into(),
            error: None,
        }
    }

    /// Create a result for a probe that could not be attempted.
    pub fn error(port: u32, message: impl Into<String>) -> Self {
        Self {
            port,
            status: ProbeStatus::Error,
            service: UNKNOWN_SERVICE.to_string(),
            error: Some(message.into()),
        }
    }

    /// Check if the port is open.
    pub fn is_open(&self) -> bool {
        self.status == ProbeStatus::Open
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            ProbeStatus::Error => write!(
                f,
                "Error checking port {}: {}",
                self.port,
                self.error.as_deref().unwrap_or("unknown error")
            ),
            status => write!(
                f,
                "Port {} is {} (Service: {})",
                self.port, status, self.service
            ),
        }
    }
}

/// Map a failed connect to a port status.
///
/// A timed-out or would-block connect (EAGAIN surfaces as `WouldBlock`) means
/// nothing answered, so the port is filtered. Every other failure means
/// something answered with a rejection.
pub fn classify_connect_error(err: &io::Error) -> ProbeStatus {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ProbeStatus::Filtered,
        _ => ProbeStatus::Closed,
    }
}

/// Resolve `target` to the first IPv4 socket address for `port`.
pub async fn resolve_ipv4(target: &str, port: Port) -> Result<SocketAddr, ProbeError> {
    let mut addrs = tokio::net::lookup_host((target, port.as_u16()))
        .await
        .map_err(|source| ProbeError::Resolve {
            target: target.to_string(),
            source,
        })?;

    addrs
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| ProbeError::NoIpv4Address(target.to_string()))
}

/// Trait for per-protocol probe implementations.
///
/// Implementors only provide the connect step; validation, resolution,
/// timeout handling and service naming are shared by [`Prober::probe`].
#[async_trait]
pub trait Prober: Send + Sync {
    /// Protocol this prober speaks.
    fn protocol(&self) -> Protocol;

    /// Host name or address being probed.
    fn target(&self) -> &str;

    /// Connect timeout applied to each probe.
    fn timeout(&self) -> Duration;

    /// Open a socket and connect it to `addr`.
    ///
    /// The outer `Err` is a local setup failure; the inner `io::Result` is
    /// the outcome of the connect itself. The socket must be released before
    /// returning.
    async fn connect(&self, addr: SocketAddr) -> Result<io::Result<()>, ProbeError>;

    /// Probe a single port and classify it.
    async fn probe(&self, port: u32) -> ProbeResult {
        let valid = match Port::try_from(port) {
            Ok(valid) => valid,
            Err(e) => return ProbeResult::error(port, ProbeError::from(e).to_string()),
        };

        let addr = match resolve_ipv4(self.target(), valid).await {
            Ok(addr) => addr,
            Err(e) => return ProbeResult::error(port, e.to_string()),
        };

        let status = match timeout(self.timeout(), self.connect(addr)).await {
            Ok(Ok(Ok(()))) => ProbeStatus::Open,
            Ok(Ok(Err(e))) => {
                debug!(%addr, error = %e, "connect failed");
                classify_connect_error(&e)
            }
            Ok(Err(e)) => return ProbeResult::error(port, e.to_string()),
            Err(_) => ProbeStatus::Filtered,
        };

        debug!(%addr, protocol = %self.protocol(), %status, "probe finished");
        ProbeResult::new(port, status, describe_service(valid.as_u16(), self.protocol()))
    }
}

/// A shared prober for dynamic dispatch across spawned tasks.
pub type SharedProber = std::sync::Arc<dyn Prober>;
