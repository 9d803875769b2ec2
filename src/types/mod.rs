//! Core type definitions.
//!
//! `Port` is the validated newtype used by probes; the token, range and list
//! types model the command-line port specification before it is expanded.

mod port;

pub use port::{
    expand_ports, generate_ports_from_range, Port, PortError, PortList, PortRangeSpec, PortToken,
    Ports,
};
