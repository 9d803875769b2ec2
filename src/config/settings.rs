//! Application settings and paths.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{Protocol, ScanConfig, DEFAULT_TIMEOUT, DEFAULT_WORKERS, FALLBACK_PORTS};
use crate::types::Port;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Ports probed when `-p` is not given at all.
pub const DEFAULT_PORTS: &[u32] = &[21, 22, 53, 80, 443, 445, 8080];

/// Public GeoIP service queried as `{endpoint}/{target}/json`.
pub const DEFAULT_GEOIP_ENDPOINT: &str = "https://ipinfo.io";

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portscout)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the XDG directories, if a home directory can be determined.
    ///
    /// Nothing is created on disk.
    pub fn discover() -> Option<Self> {
        let project = ProjectDirs::from("com", "portscout", "portscout")?;
        Some(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of probes in flight at once.
    pub workers: usize,
    /// Connect timeout per probe, in milliseconds.
    pub connect_timeout_ms: u64,
    /// Ports used when `-p` is omitted.
    pub default_ports: Vec<u32>,
    /// Ports used when `-p` is given without any value.
    pub fallback_ports: Vec<u32>,
    /// Base URL of the GeoIP service.
    pub geoip_endpoint: String,
    /// GeoIP request timeout, in milliseconds.
    pub geoip_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            connect_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            default_ports: DEFAULT_PORTS.to_vec(),
            fallback_ports: FALLBACK_PORTS.to_vec(),
            geoip_endpoint: DEFAULT_GEOIP_ENDPOINT.to_string(),
            geoip_timeout_ms: 10_000,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the XDG settings file if present.
    ///
    /// An explicit path must exist; the XDG file is optional.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let settings = match path {
            Some(path) => Self::load_from(path)?,
            None => match Paths::discover().map(|p| p.settings_file()) {
                Some(file) if file.exists() => Self::load_from(&file)?,
                _ => {
                    debug!("no settings file found, using defaults");
                    Self::default()
                }
            },
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), "loaded settings");
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Reject values the scanner cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "connect_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.geoip_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "geoip_timeout_ms must be greater than 0".to_string(),
            ));
        }
        for &port in self.default_ports.iter().chain(&self.fallback_ports) {
            Port::try_from(port).map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        }
        if self.fallback_ports.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "fallback_ports must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Connect timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// GeoIP request timeout as a `Duration`.
    pub fn geoip_timeout(&self) -> Duration {
        Duration::from_millis(self.geoip_timeout_ms)
    }

    /// Build the scan configuration for a target from these settings.
    pub fn scan_config(&self, target: &str, protocol: Protocol) -> ScanConfig {
        ScanConfig::new(target, protocol)
            .with_workers(self.workers)
            .with_timeout(self.connect_timeout())
            .with_fallback_ports(self.fallback_ports.clone())
    }
}
