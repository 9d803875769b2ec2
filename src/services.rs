//! Service name lookup for well-known port numbers.
//!
//! Names come from the system service registry (`/etc/services`) when it is
//! available, falling back to a built-in table of IANA service names.

use crate::scanner::Protocol;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Name reported when no service is registered for a port.
pub const UNKNOWN_SERVICE: &str = "Unknown service";

/// Location of the system service registry.
const SERVICES_FILE: &str = "/etc/services";

/// Service registry parsed from the system file, loaded on first use.
static SYSTEM_SERVICES: LazyLock<ServiceTable> =
    LazyLock::new(|| ServiceTable::load(Path::new(SERVICES_FILE)));

/// Static map of well-known ports to IANA service names.
static BUILTIN_SERVICES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert(7, "echo");
    m.insert(20, "ftp-data");
    m.insert(21, "ftp");
    m.insert(22, "ssh");
    m.insert(23, "telnet");
    m.insert(25, "smtp");
    m.insert(37, "time");
    m.insert(43, "whois");
    m.insert(53, "domain");
    m.insert(67, "bootps");
    m.insert(68, "bootpc");
    m.insert(69, "tftp");
    m.insert(70, "gopher");
    m.insert(79, "finger");
    m.insert(80, "http");
    m.insert(88, "kerberos");
    m.insert(110, "pop3");
    m.insert(111, "sunrpc");
    m.insert(113, "auth");
    m.insert(119, "nntp");
    m.insert(123, "ntp");
    m.insert(135, "epmap");
    m.insert(137, "netbios-ns");
    m.insert(138, "netbios-dgm");
    m.insert(139, "netbios-ssn");
    m.insert(143, "imap");
    m.insert(161, "snmp");
    m.insert(162, "snmptrap");
    m.insert(179, "bgp");
    m.insert(194, "irc");
    m.insert(389, "ldap");
    m.insert(443, "https");
    m.insert(445, "microsoft-ds");
    m.insert(464, "kpasswd");
    m.insert(465, "submissions");
    m.insert(500, "isakmp");
    m.insert(513, "login");
    m.insert(514, "shell");
    m.insert(515, "printer");
    m.insert(520, "efs");
    m.insert(554, "rtsp");
    m.insert(587, "submission");
    m.insert(631, "ipp");
    m.insert(636, "ldaps");
    m.insert(873, "rsync");
    m.insert(989, "ftps-data");
    m.insert(990, "ftps");
    m.insert(993, "imaps");
    m.insert(995, "pop3s");
    m.insert(1080, "socks");
    m.insert(1194, "openvpn");
    m.insert(1433, "ms-sql-s");
    m.insert(1434, "ms-sql-m");
    m.insert(1701, "l2tp");
    m.insert(1723, "pptp");
    m.insert(1812, "radius");
    m.insert(1813, "radius-acct");
    m.insert(1883, "mqtt");
    m.insert(2049, "nfs");
    m.insert(2181, "zookeeper");
    m.insert(3306, "mysql");
    m.insert(3389, "ms-wbt-server");
    m.insert(3690, "svn");
    m.insert(4369, "epmd");
    m.insert(5060, "sip");
    m.insert(5061, "sips");
    m.insert(5222, "xmpp-client");
    m.insert(5269, "xmpp-server");
    m.insert(5432, "postgresql");
    m.insert(5672, "amqp");
    m.insert(5900, "rfb");
    m.insert(6379, "redis");
    m.insert(6667, "ircd");
    m.insert(8080, "http-alt");
    m.insert(8443, "https-alt");
    m.insert(9418, "git");
    m.insert(11211, "memcache");
    m.insert(27017, "mongodb");

    m
});

/// Port-to-name mappings for each protocol, as found in a services file.
#[derive(Debug, Default)]
pub struct ServiceTable {
    tcp: HashMap<u16, String>,
    udp: HashMap<u16, String>,
}

impl ServiceTable {
    /// Parse the `name port/proto [aliases...]` format of a services file.
    ///
    /// Comments and malformed lines are skipped. When a port is listed more
    /// than once the first name wins.
    pub fn parse(content: &str) -> Self {
        let mut table = Self::default();

        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("");
            let mut fields = line.split_whitespace();
            let (Some(name), Some(entry)) = (fields.next(), fields.next()) else {
                continue;
            };
            let Some((port, proto)) = entry.split_once('/') else {
                continue;
            };
            let Ok(port) = port.parse::<u16>() else {
                continue;
            };

            let map = match proto {
                "tcp" => &mut table.tcp,
                "udp" => &mut table.udp,
                _ => continue,
            };
            map.entry(port).or_insert_with(|| name.to_string());
        }

        table
    }

    /// Load a services file, yielding an empty table if it cannot be read.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => {
                let table = Self::parse(&content);
                debug!(
                    path = %path.display(),
                    tcp = table.tcp.len(),
                    udp = table.udp.len(),
                    "loaded service registry"
                );
                table
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "service registry unavailable");
                Self::default()
            }
        }
    }

    /// Look up the registered name for a port.
    pub fn lookup(&self, port: u16, protocol: Protocol) -> Option<&str> {
        let map = match protocol {
            Protocol::Tcp => &self.tcp,
            Protocol::Udp => &self.udp,
        };
        map.get(&port).map(String::as_str)
    }
}

/// Look up the probable service name for a given port.
///
/// Returns `None` if neither the system registry nor the built-in table
/// knows the port.
pub fn get_service_name(port: u16, protocol: Protocol) -> Option<String> {
    SYSTEM_SERVICES
        .lookup(port, protocol)
        .or_else(|| BUILTIN_SERVICES.get(&port).copied())
        .map(str::to_string)
}

/// Get a descriptive string for the service on a port.
///
/// Returns "Unknown service" if the port is not recognized.
pub fn describe_service(port: u16, protocol: Protocol) -> String {
    get_service_name(port, protocol).unwrap_or_else(|| UNKNOWN_SERVICE.to_string())
}
