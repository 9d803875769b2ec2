//! TCP connect prober.
//!
//! Performs a standard TCP connect using the operating system's socket API
//! and closes the connection immediately. No data is exchanged.

use crate::error::ProbeError;
use crate::scanner::traits::{Prober, Protocol};
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;

/// TCP connect prober.
///
/// Does not require elevated privileges.
pub struct TcpProber {
    target: String,
    timeout: Duration,
}

impl TcpProber {
    /// Create a new TCP prober.
    ///
    /// # Arguments
    /// * `target` - Host name or IPv4 address to probe
    /// * `timeout` - Connect timeout per port
    pub fn new(target: impl Into<String>, timeout: Duration) -> Self {
        Self {
            target: target.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    fn protocol(&self) -> Protocol {
        Protocol::Tcp
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn connect(&self, addr: SocketAddr) -> Result<io::Result<()>, ProbeError> {
        // The stream is dropped here, closing the connection.
        Ok(TcpStream::connect(addr).await.map(drop))
    }
}
