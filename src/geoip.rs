//! GeoIP lookup for the scan target.
//!
//! A single GET to `{endpoint}/{target}/json` on an ipinfo-compatible
//! service. Failures are reported inline and never stop the scan.

use crate::error::LookupError;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Location fields returned by the GeoIP service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeoLocation {
    pub city: Option<String>,
    pub country: Option<String>,
}

impl GeoLocation {
    /// Render the `Location: city, country` line.
    pub fn summary(&self) -> String {
        format!(
            "Location: {}, {}",
            self.city.as_deref().unwrap_or("Unknown"),
            self.country.as_deref().unwrap_or("Unknown")
        )
    }
}

/// HTTP client for the GeoIP service.
pub struct GeoIpClient {
    client: Client,
    endpoint: String,
}

impl GeoIpClient {
    /// Create a client for `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(LookupError::Client)?;

        Ok(Self::from_client(client, endpoint))
    }

    /// Wrap an already configured HTTP client.
    pub fn from_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL queried for `target`; the target is passed through unmodified.
    pub fn url_for(&self, target: &str) -> String {
        format!("{}/{}/json", self.endpoint, target)
    }

    /// Look up the location of `target`.
    pub async fn lookup(&self, target: &str) -> Result<GeoLocation, LookupError> {
        let url = self.url_for(target);
        debug!(%url, "querying GeoIP service");

        let location = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<GeoLocation>()
            .await?;

        Ok(location)
    }

    /// Look up `target` and render the line printed before the scan.
    pub async fn describe(&self, target: &str) -> String {
        match self.lookup(target).await {
            Ok(location) => location.summary(),
            Err(e) => format!("GeoIP lookup failed: {}", e),
        }
    }
}

/// Look up `target` on `endpoint` and render the GeoIP line.
///
/// Never fails: any error, including building the client, is folded into a
/// `GeoIP lookup failed: ...` line.
pub async fn lookup_line(endpoint: &str, timeout: Duration, target: &str) -> String {
    match GeoIpClient::new(endpoint, timeout) {
        Ok(client) => client.describe(target).await,
        Err(e) => format!("GeoIP lookup failed: {}", e),
    }
}
