//! UDP prober.
//!
//! Binds an ephemeral datagram socket and connects it to the target. A UDP
//! connect sends nothing on the wire, so the result only reflects what the
//! local stack knows: an unreachable route shows up as closed, anything else
//! as open. Ports with no listener are therefore reported as open.

use crate::error::ProbeError;
use crate::scanner::traits::{Prober, Protocol};
use async_trait::async_trait;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;

/// UDP prober.
pub struct UdpProber {
    target: String,
    timeout: Duration,
}

impl UdpProber {
    /// Create a new UDP prober.
    pub fn new(target: impl Into<String>, timeout: Duration) -> Self {
        Self {
            target: target.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Prober for UdpProber {
    fn protocol(&self) -> Protocol {
        Protocol::Udp
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn connect(&self, addr: SocketAddr) -> Result<io::Result<()>, ProbeError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .map_err(ProbeError::Socket)?;

        Ok(socket.connect(addr).await)
    }
}
