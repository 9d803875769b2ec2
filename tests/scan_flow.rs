use clap::Parser;
use portscout::cli::Args;
use portscout::config::Settings;
use portscout::scanner::{run_scan, Protocol, ScanConfig};
use portscout::types::PortList;
use std::time::Duration;
use tokio::net::TcpListener;

/// A local TCP port that nothing listens on.
async fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Settings whose GeoIP endpoint cannot be reached.
async fn offline_settings() -> Settings {
    Settings {
        geoip_endpoint: format!("http://127.0.0.1:{}", free_port().await),
        geoip_timeout_ms: 2_000,
        ..Settings::default()
    }
}

fn lines(out: Vec<u8>) -> Vec<String> {
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn duplicate_ports_are_reported_in_submission_order() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open = listener.local_addr().unwrap().port();
    let low = open - 2;

    let config = ScanConfig::new("127.0.0.1", Protocol::Tcp);
    let tokens = vec![open.to_string(), format!("{}-{}", low, open)];
    let ports = PortList::parse(&tokens).unwrap();
    let mut out = Vec::new();

    let summary = run_scan(&config, ports, &mut out).await.unwrap();
    let lines = lines(out);

    assert_eq!(summary.ports_scanned, 4);
    assert_eq!(lines.len(), 4);
    for (line, port) in lines.iter().zip([open, low, low + 1, open]) {
        assert!(
            line.starts_with(&format!("Port {} is ", port)),
            "unexpected line {}",
            line
        );
    }
    assert!(lines[0].starts_with(&format!("Port {} is open", open)));
    assert_eq!(lines[0], lines[3]);
}

#[tokio::test]
async fn empty_token_list_uses_fallback_ports() {
    let config =
        ScanConfig::new("127.0.0.1", Protocol::Tcp).with_timeout(Duration::from_millis(500));
    let mut out = Vec::new();

    run_scan(&config, PortList::default(), &mut out)
        .await
        .unwrap();
    let lines = lines(out);

    assert_eq!(
        lines[0],
        "No ports specified. Defaulting to common ports (22, 80, 443, 8080)."
    );
    assert_eq!(lines.len(), 5);
    for (line, port) in lines[1..].iter().zip([22, 80, 443, 8080]) {
        assert!(line.starts_with(&format!("Port {} is ", port)), "got {}", line);
    }
}

#[tokio::test]
async fn out_of_range_ports_become_error_lines() {
    let config = ScanConfig::new("127.0.0.1", Protocol::Tcp);
    let ports = PortList::parse(&["0", "65536"]).unwrap();
    let mut out = Vec::new();

    let summary = run_scan(&config, ports, &mut out).await.unwrap();

    assert_eq!(summary.errors, 2);
    assert_eq!(
        lines(out),
        vec![
            "Error checking port 0: port 0 is out of valid range (1-65535)",
            "Error checking port 65536: port 65536 is out of valid range (1-65535)",
        ]
    );
}

/// Run the CLI flow against 127.0.0.1 and check it scanned the default list.
async fn assert_scans_default_list(argv: &[&str]) {
    let settings = Settings {
        connect_timeout_ms: 500,
        ..offline_settings().await
    };
    let args = Args::try_parse_from(argv.iter().copied()).unwrap();
    let mut out = Vec::new();

    let summary = args.execute(&settings, &mut out).await.unwrap();
    let lines = lines(out);

    assert_eq!(summary.ports_scanned, 7);
    assert_eq!(lines[0], "");
    assert_eq!(lines[1], "Scanning target: 127.0.0.1");
    assert!(lines[2].starts_with("GeoIP lookup failed: "), "got {}", lines[2]);

    let results = &lines[3..];
    assert_eq!(results.len(), 7);
    for (line, port) in results.iter().zip([21, 22, 53, 80, 443, 445, 8080]) {
        assert!(line.starts_with(&format!("Port {} is ", port)), "got {}", line);
    }
}

#[tokio::test]
async fn omitted_ports_flag_scans_default_list() {
    assert_scans_default_list(&["portscout", "127.0.0.1"]).await;
}

#[tokio::test]
async fn bare_ports_flag_scans_default_list() {
    assert_scans_default_list(&["portscout", "127.0.0.1", "-p"]).await;
}

#[tokio::test]
async fn unresolvable_target_reports_every_port() {
    let settings = offline_settings().await;
    let args =
        Args::try_parse_from(["portscout", "no-such-host.invalid", "-p", "22", "80"]).unwrap();
    let mut out = Vec::new();

    let summary = args.execute(&settings, &mut out).await.unwrap();
    let lines = lines(out);

    assert_eq!(summary.errors, 2);
    assert!(lines[2].starts_with("GeoIP lookup failed: "));
    for (line, port) in lines[3..].iter().zip([22, 80]) {
        let expected = format!(
            "Error checking port {}: failed to resolve 'no-such-host.invalid'",
            port
        );
        assert!(line.starts_with(&expected), "got {}", line);
    }
    assert_eq!(lines.len(), 5);
}

#[tokio::test]
async fn malformed_port_token_aborts_the_run() {
    let settings = offline_settings().await;
    let args = Args::try_parse_from(["portscout", "127.0.0.1", "-p", "22", "http"]).unwrap();
    let mut out = Vec::new();

    let err = args.execute(&settings, &mut out).await.unwrap_err();
    assert!(err.to_string().contains("invalid port number: 'http'"));

    // Nothing at all: no header, no GeoIP line, no port lines.
    assert!(out.is_empty(), "got {:?}", lines(out));
}

#[test]
fn udp_scan_reports_ports_without_listener() {
    let out = tokio_test::block_on(async {
        let port = free_port().await;
        let config = ScanConfig::new("127.0.0.1", Protocol::Udp);
        let mut out = Vec::new();
        let ports = PortList::parse(&[port.to_string()]).unwrap();
        run_scan(&config, ports, &mut out).await.unwrap();
        out
    });

    let lines = lines(out);
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0].contains(" is open ") || lines[0].contains(" is filtered "),
        "got {}",
        lines[0]
    );
}
