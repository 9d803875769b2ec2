//! Port types and port-token expansion.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortToken` and `PortRangeSpec` describe what the user typed on the command
//! line. A parsed `PortList` yields raw numbers lazily, and they are only
//! validated when probed.

use std::fmt;
use std::iter::FlatMap;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::vec;

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Port {
    type Error = PortError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(PortError::OutOfRange(value))
    }
}

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u32),
    #[error("invalid port number: '{0}'")]
    InvalidFormat(String),
    #[error("invalid port range '{token}': {reason}")]
    InvalidRange { token: String, reason: String },
}

/// An inclusive `start-end` range as typed by the user.
///
/// No ordering is enforced: a reversed range is legal and simply expands to
/// nothing, and neither bound is checked against the valid port range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRangeSpec {
    pub start: u32,
    pub end: u32,
}

impl PortRangeSpec {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of ports the range denotes.
    pub fn count(&self) -> u64 {
        if self.start > self.end {
            0
        } else {
            u64::from(self.end - self.start) + 1
        }
    }
}

impl FromStr for PortRangeSpec {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.split_once('-').ok_or_else(|| PortError::InvalidRange {
            token: s.to_string(),
            reason: "expected 'start-end'".to_string(),
        })?;

        let bound = |half: &str| {
            half.trim().parse::<u32>().map_err(|e| PortError::InvalidRange {
                token: s.to_string(),
                reason: format!("'{}' is not a port number ({})", half.trim(), e),
            })
        };

        Ok(Self::new(bound(start)?, bound(end)?))
    }
}

/// Iterate over every number a range denotes, ascending.
///
/// Nothing is allocated, so even `0-4294967295` is cheap to hold. The
/// iterator is empty when `start > end`.
pub fn generate_ports_from_range(range: PortRangeSpec) -> RangeInclusive<u32> {
    range.start..=range.end
}

/// One token of a port specification: a literal port or a `start-end` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortToken {
    Single(u32),
    Range(PortRangeSpec),
}

impl PortToken {
    /// The ports this token denotes, in order.
    pub fn ports(self) -> RangeInclusive<u32> {
        match self {
            Self::Single(port) => port..=port,
            Self::Range(range) => generate_ports_from_range(range),
        }
    }

    /// Number of ports this token denotes.
    pub fn count(&self) -> u64 {
        match self {
            Self::Single(_) => 1,
            Self::Range(range) => range.count(),
        }
    }
}

impl FromStr for PortToken {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains('-') {
            return s.parse().map(Self::Range);
        }
        s.parse()
            .map(Self::Single)
            .map_err(|_| PortError::InvalidFormat(s.to_string()))
    }
}

/// Owning iterator over the ports of a [`PortList`].
pub type Ports =
    FlatMap<vec::IntoIter<PortToken>, RangeInclusive<u32>, fn(PortToken) -> RangeInclusive<u32>>;

/// A fully parsed port specification.
///
/// Every token is checked up front, but ports are only produced as the list
/// is iterated. Duplicates are kept and token order is preserved; a range
/// contributes its ports in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortList {
    tokens: Vec<PortToken>,
}

impl PortList {
    /// Parse every token. The first malformed token aborts the parse.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, PortError> {
        let tokens = tokens
            .iter()
            .map(|token| token.as_ref().parse())
            .collect::<Result<Vec<PortToken>, _>>()?;
        Ok(Self { tokens })
    }

    /// True when no tokens were given at all.
    ///
    /// A list holding only reversed ranges is not empty, it just yields
    /// no ports.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Total number of ports the list yields.
    pub fn port_count(&self) -> u64 {
        self.tokens.iter().map(PortToken::count).sum()
    }

    /// Iterate over the ports without consuming the list.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.tokens.iter().flat_map(|token| token.ports())
    }
}

impl IntoIterator for PortList {
    type Item = u32;
    type IntoIter = Ports;

    fn into_iter(self) -> Ports {
        self.tokens
            .into_iter()
            .flat_map(PortToken::ports as fn(PortToken) -> RangeInclusive<u32>)
    }
}

impl FromIterator<u32> for PortList {
    fn from_iter<I: IntoIterator<Item = u32>>(ports: I) -> Self {
        Self {
            tokens: ports.into_iter().map(PortToken::Single).collect(),
        }
    }
}

/// Expand a list of port tokens into a flat, ordered list of port numbers.
///
/// This collects everything; scans iterate a [`PortList`] instead.
pub fn expand_ports<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<u32>, PortError> {
    PortList::parse(tokens).map(|list| list.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(65535).is_some());

        assert_eq!(Port::try_from(80u32).unwrap().as_u16(), 80);
        assert_eq!(Port::try_from(0u32), Err(PortError::OutOfRange(0)));
        assert_eq!(Port::try_from(70000u32), Err(PortError::OutOfRange(70000)));
    }

    #[test]
    fn test_literal_tokens() {
        assert_eq!(expand_ports(&["80", "443", " 22 "]).unwrap(), vec![80, 443, 22]);
    }

    #[test]
    fn test_range_expansion() {
        assert_eq!(expand_ports(&["20-25"]).unwrap(), vec![20, 21, 22, 23, 24, 25]);
        assert_eq!(expand_ports(&["7-7"]).unwrap(), vec![7]);
    }

    #[test]
    fn test_reversed_range_is_empty() {
        assert!(expand_ports(&["80-20"]).unwrap().is_empty());
        assert!(generate_ports_from_range(PortRangeSpec::new(5, 4)).is_empty());
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let ports = expand_ports(&["22", "20-22"]).unwrap();
        assert_eq!(ports, vec![22, 20, 21, 22]);
    }

    #[test]
    fn test_out_of_range_numbers_survive_expansion() {
        assert_eq!(expand_ports(&["0", "65535-65536"]).unwrap(), vec![0, 65535, 65536]);
    }

    #[test]
    fn test_invalid_tokens() {
        assert_eq!(
            expand_ports(&["http"]),
            Err(PortError::InvalidFormat("http".to_string()))
        );
        assert!(matches!(
            expand_ports(&["20-"]),
            Err(PortError::InvalidRange { .. })
        ));
        assert!(matches!(
            expand_ports(&["-5"]),
            Err(PortError::InvalidRange { .. })
        ));
        assert!(matches!(
            expand_ports(&["1-2-3"]),
            Err(PortError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_bad_token_aborts_whole_expansion() {
        assert!(expand_ports(&["22", "80", "x"]).is_err());
    }

    #[test]
    fn test_token_parsing() {
        let token: PortToken = "20-80".parse().unwrap();
        assert_eq!(token, PortToken::Range(PortRangeSpec::new(20, 80)));
        assert_eq!(token.count(), 61);
        assert_eq!("443".parse::<PortToken>().unwrap(), PortToken::Single(443));
    }

    #[test]
    fn test_full_u32_range_is_not_materialized() {
        let list = PortList::parse(&["0-4294967295", "22"]).unwrap();
        assert_eq!(list.port_count(), 4_294_967_297);
        assert_eq!(list.iter().take(3).collect::<Vec<_>>(), vec![0, 1, 2]);

        let mut range = generate_ports_from_range(PortRangeSpec::new(0, u32::MAX));
        assert_eq!(range.next(), Some(0));
        assert_eq!(range.next_back(), Some(u32::MAX));
    }

    #[test]
    fn test_port_list_empty_vs_reversed() {
        assert!(PortList::default().is_empty());

        let reversed = PortList::parse(&["9-1"]).unwrap();
        assert!(!reversed.is_empty());
        assert_eq!(reversed.port_count(), 0);
        assert_eq!(reversed.iter().count(), 0);
    }

    #[test]
    fn test_port_list_from_numbers() {
        let list: PortList = [22, 80].into_iter().collect();
        assert_eq!(list.port_count(), 2);
        assert_eq!(list.into_iter().collect::<Vec<_>>(), vec![22, 80]);
    }
}
