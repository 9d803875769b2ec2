//! Command-line interface definitions for portscout.
//!
//! Uses `clap` derive macros for declarative argument parsing.

use crate::config::Settings;
use crate::geoip;
use crate::output;
use crate::scanner::{run_scan, Protocol, ScanSummary};
use crate::types::PortList;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  portscout 192.168.1.1
  portscout 192.168.1.1 -p 21 22 80 443 3306
  portscout 192.168.1.1 -p 22 80 443 --protocol TCP
  portscout 192.168.1.1 -p 20-80 --protocol UDP
  portscout example.com --protocol TCP";

/// Port prober with service detection and GeoIP lookup.
#[derive(Parser, Debug)]
#[command(name = "portscout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Port prober with service detection and GeoIP lookup", long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Args {
    /// Target IP address or hostname
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Ports to scan (can include ranges like 20-80)
    #[arg(short = 'p', value_name = "PORT", num_args = 0..)]
    pub ports: Option<Vec<String>>,

    /// Protocol to probe with
    #[arg(long, value_enum, ignore_case = true, default_value = "TCP")]
    pub protocol: Protocol,

    /// Show debug logs, a progress bar and a summary on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a JSON settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Port tokens to scan.
    ///
    /// Omitting `-p`, or passing it with no values, selects the configured
    /// default ports.
    pub fn port_tokens(&self, settings: &Settings) -> Vec<String> {
        match &self.ports {
            Some(tokens) if !tokens.is_empty() => tokens.clone(),
            _ => settings.default_ports.iter().map(u32::to_string).collect(),
        }
    }

    /// Run the scan described by these arguments, writing results to `out`.
    ///
    /// A malformed port token fails the run before anything is written.
    pub async fn execute<W: Write>(
        &self,
        settings: &Settings,
        out: &mut W,
    ) -> anyhow::Result<ScanSummary> {
        let ports = PortList::parse(&self.port_tokens(settings))?;

        output::write_scan_header(out, &self.target)?;

        let location = geoip::lookup_line(
            &settings.geoip_endpoint,
            settings.geoip_timeout(),
            &self.target,
        )
        .await;
        writeln!(out, "{}", location)?;

        if self.protocol == Protocol::Udp {
            output::print_warning(
                "UDP probes cannot tell open from filtered; ports without a listener usually show as open.",
            );
        }

        let mut config = settings.scan_config(&self.target, self.protocol);
        if self.verbose {
            config = config.with_progress();
        }

        let summary = run_scan(&config, ports, out).await?;
        if self.verbose {
            output::print_summary(&summary);
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("portscout").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["192.168.1.1"]);
        assert_eq!(args.target, "192.168.1.1");
        assert_eq!(args.ports, None);
        assert_eq!(args.protocol, Protocol::Tcp);
        assert!(!args.verbose);
    }

    #[test]
    fn test_omitted_ports_use_default_list() {
        let args = parse(&["192.168.1.1"]);
        let tokens = args.port_tokens(&Settings::default());
        assert_eq!(tokens, vec!["21", "22", "53", "80", "443", "445", "8080"]);
    }

    #[test]
    fn test_empty_ports_flag_uses_default_list() {
        let args = parse(&["192.168.1.1", "-p"]);
        assert_eq!(args.ports, Some(Vec::new()));
        assert_eq!(
            args.port_tokens(&Settings::default()),
            vec!["21", "22", "53", "80", "443", "445", "8080"]
        );
    }

    #[tokio::test]
    async fn test_bad_token_fails_before_any_output() {
        let args = parse(&["127.0.0.1", "-p", "22", "http"]);
        let mut out = Vec::new();

        let err = args
            .execute(&Settings::default(), &mut out)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "invalid port number: 'http'");
        assert!(out.is_empty());
    }

    #[test]
    fn test_port_tokens_and_ranges() {
        let args = parse(&["example.com", "-p", "22", "20-80", "443"]);
        assert_eq!(
            args.port_tokens(&Settings::default()),
            vec!["22", "20-80", "443"]
        );
    }

    #[test]
    fn test_protocol_parsing() {
        assert_eq!(parse(&["h", "--protocol", "UDP"]).protocol, Protocol::Udp);
        assert_eq!(parse(&["h", "--protocol", "tcp"]).protocol, Protocol::Tcp);
        assert!(Args::try_parse_from(["portscout", "h", "--protocol", "SCTP"]).is_err());
    }

    #[test]
    fn test_target_is_required() {
        assert!(Args::try_parse_from(["portscout"]).is_err());
    }
}
