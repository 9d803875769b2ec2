//! Scanner module - the probe pool.
//!
//! Probes every requested port through a bounded pool of spawned tasks and
//! reports results in submission order no matter which probe finishes first.
//! Each line is written as soon as every earlier port has been reported.

pub mod tcp;
pub mod traits;
pub mod udp;

use crate::error::ScanError;
use crate::types::PortList;
use futures::stream::{self, Stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::pin::pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

pub use tcp::TcpProber;
pub use traits::{
    classify_connect_error, resolve_ipv4, ProbeResult, ProbeStatus, Prober, Protocol,
    SharedProber,
};
pub use udp::UdpProber;

/// Number of probes allowed in flight at once.
pub const DEFAULT_WORKERS: usize = 5;

/// Connect timeout for a single probe.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Ports used when a scan is started with an empty token list.
pub const FALLBACK_PORTS: &[u32] = &[22, 80, 443, 8080];

/// Ports admitted past the oldest unreported one. The semaphore bounds the
/// actual connects; this only bounds buffered results.
const LOOKAHEAD: usize = 1000;

/// Configuration for a scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Host name or address as given by the user.
    pub target: String,
    pub protocol: Protocol,
    /// Maximum number of concurrent probes.
    pub workers: usize,
    /// Connect timeout per probe.
    pub timeout: Duration,
    /// Ports probed when no tokens are supplied.
    pub fallback_ports: Vec<u32>,
    /// Draw a progress bar on stderr.
    pub show_progress: bool,
}

impl ScanConfig {
    /// Create a new scan configuration with default pool settings.
    pub fn new(target: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            target: target.into(),
            protocol,
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            fallback_ports: FALLBACK_PORTS.to_vec(),
            show_progress: false,
        }
    }

    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the ports used for an empty token list.
    pub fn with_fallback_ports(mut self, ports: Vec<u32>) -> Self {
        self.fallback_ports = ports;
        self
    }

    /// Enable the progress bar.
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }
}

/// Per-status counts for a finished scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub ports_scanned: usize,
    pub open: usize,
    pub closed: usize,
    pub filtered: usize,
    pub errors: usize,
    pub duration: Duration,
}

impl ScanSummary {
    /// Count one more result.
    pub fn record(&mut self, result: &ProbeResult) {
        self.ports_scanned += 1;
        match result.status {
            ProbeStatus::Open => self.open += 1,
            ProbeStatus::Closed => self.closed += 1,
            ProbeStatus::Filtered => self.filtered += 1,
            ProbeStatus::Error => self.errors += 1,
        }
    }
}

/// Create the prober for a scan's protocol.
pub fn create_prober(config: &ScanConfig) -> SharedProber {
    match config.protocol {
        Protocol::Tcp => Arc::new(TcpProber::new(&config.target, config.timeout)),
        Protocol::Udp => Arc::new(UdpProber::new(&config.target, config.timeout)),
    }
}

/// Check ports with at most `workers` connects in flight, yielding results
/// in the order the ports were given.
///
/// Every port is spawned as its own task and waits for a permit from a shared
/// semaphore, so a slow port never keeps a free worker idle. Ports are pulled
/// from the iterator as the stream is polled. A panicking task yields an
/// error result for its port only.
pub fn result_stream<I>(
    prober: SharedProber,
    ports: I,
    workers: usize,
) -> impl Stream<Item = ProbeResult>
where
    I: IntoIterator<Item = u32>,
{
    let workers = workers.max(1);
    let semaphore = Arc::new(Semaphore::new(workers));

    stream::iter(ports)
        .map(move |port| {
            let sem = Arc::clone(&semaphore);
            let prober = Arc::clone(&prober);

            let handle = tokio::spawn(async move {
                let Ok(_permit) = sem.acquire_owned().await else {
                    return ProbeResult::error(port, "worker pool closed");
                };
                prober.probe(port).await
            });

            async move {
                match handle.await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(port, error = %e, "probe task failed");
                        ProbeResult::error(port, format!("probe task failed: {}", e))
                    }
                }
            }
        })
        .buffered(LOOKAHEAD.max(workers))
}

/// Probe every port and collect the results in submission order.
pub async fn probe_ports<I>(prober: SharedProber, ports: I, workers: usize) -> Vec<ProbeResult>
where
    I: IntoIterator<Item = u32>,
{
    result_stream(prober, ports, workers).collect().await
}

/// Execute a complete scan, writing one line per port to `out`.
///
/// A list without tokens falls back to `config.fallback_ports` and prints a
/// notice saying so.
pub async fn run_scan<W: Write>(
    config: &ScanConfig,
    ports: PortList,
    out: &mut W,
) -> Result<ScanSummary, ScanError> {
    run_scan_with(create_prober(config), config, ports, out).await
}

/// Like [`run_scan`], with the protocol implementation supplied by the caller.
pub async fn run_scan_with<W: Write>(
    prober: SharedProber,
    config: &ScanConfig,
    ports: PortList,
    out: &mut W,
) -> Result<ScanSummary, ScanError> {
    let ports = if ports.is_empty() {
        let listed: Vec<String> = config.fallback_ports.iter().map(u32::to_string).collect();
        writeln!(
            out,
            "No ports specified. Defaulting to common ports ({}).",
            listed.join(", ")
        )?;
        config.fallback_ports.iter().copied().collect::<PortList>()
    } else {
        ports
    };
    let total = ports.port_count();

    debug!(
        target = %config.target,
        protocol = %config.protocol,
        ports = total,
        workers = config.workers,
        "starting scan"
    );

    let progress = config.show_progress.then(|| {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
        );
        pb
    });

    let start_time = Instant::now();
    let mut summary = ScanSummary::default();
    let mut results = pin!(result_stream(prober, ports, config.workers));

    while let Some(result) = results.next().await {
        if let Some(ref pb) = progress {
            pb.inc(1);
            if result.is_open() {
                pb.set_message(format!("Found open port: {}", result.port));
            }
        }

        summary.record(&result);
        match progress {
            Some(ref pb) => pb.suspend(|| writeln!(out, "{}", result))?,
            None => writeln!(out, "{}", result)?,
        }
        out.flush()?;
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    summary.duration = start_time.elapsed();
    info!(
        ports = summary.ports_scanned,
        open = summary.open,
        closed = summary.closed,
        filtered = summary.filtered,
        errors = summary.errors,
        elapsed_ms = summary.duration.as_millis() as u64,
        "scan complete"
    );

    Ok(summary)
}
