//! Terminal output helpers.
//!
//! Scan results go to stdout as plain lines; diagnostics go to stderr and
//! are styled when stderr is a terminal.

use crate::scanner::ScanSummary;
use console::style;
use std::io::{self, Write};

/// Write the banner line that opens a scan.
pub fn write_scan_header<W: Write>(out: &mut W, target: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Scanning target: {}", target)
}

/// Print a post-scan summary to stderr.
pub fn print_summary(summary: &ScanSummary) {
    eprintln!(
        "{} {} ports probed in {:.2}s: {} open, {} closed, {} filtered, {} errors",
        style("Summary:").bold(),
        summary.ports_scanned,
        summary.duration.as_secs_f64(),
        style(summary.open).green().bold(),
        style(summary.closed).red(),
        style(summary.filtered).yellow(),
        style(summary.errors).magenta()
    );
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}
