//! # portscout - concurrent TCP/UDP port prober
//!
//! Probes a host's ports with a one-shot connect, classifies each port as
//! open, closed, filtered or error, names its well-known service, and looks
//! up the target's location once before scanning.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portscout::scanner::{run_scan, Protocol, ScanConfig};
//! use portscout::types::PortList;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ScanConfig::new("192.168.1.1", Protocol::Tcp);
//!     let ports = PortList::parse(&["22", "80-90"]).unwrap();
//!     let mut stdout = std::io::stdout();
//!
//!     run_scan(&config, ports, &mut stdout).await.unwrap();
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - port newtype and port-token expansion
//! - [`scanner`] - TCP/UDP probers and the ordered probe pool
//! - [`services`] - port to service-name lookup
//! - [`geoip`] - GeoIP lookup of the target
//! - [`config`] - settings file loading
//! - [`cli`] - command-line arguments and the top-level scan flow
//! - [`error`] - error types

pub mod cli;
pub mod config;
pub mod error;
pub mod geoip;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{ConfigError, LookupError, ProbeError, ScanError};
pub use scanner::{ProbeResult, ProbeStatus, Prober, Protocol};
pub use types::{expand_ports, Port, PortError, PortList, PortToken};
