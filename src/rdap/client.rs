use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use thiserror::Error;

use super::types::RdapResponse;

/// Public RDAP aggregator that redirects to the registry responsible for
/// the queried domain
pub const DEFAULT_BASE_URL: &str = "https://rdap.org/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("certview/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum RdapError {
    #[error("RDAP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RDAP query failed with status {0}")]
    Status(reqwest::StatusCode),
}

/// Registration-data lookup client.
///
/// Failures never propagate past the orchestration layer: a diagnostic
/// degrades to the "Not Available" sentinel instead.
#[derive(Debug, Clone)]
pub struct RdapClient {
    http: Client,
    base_url: String,
}

impl RdapClient {
    /// Client against the public rdap.org aggregator.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, RdapError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against a specific RDAP base URL (a trailing slash is added
    /// when missing).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, RdapError> {
        // reqwest links its own rustls stack; a default crypto provider
        // must be installed before the connector is built
        crate::tls::ensure_crypto_provider();

        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: ensure_trailing_slash(base_url),
        })
    }

    /// Query registration data for `domain`.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status, or an
    /// undecodable payload.
    pub async fn lookup_domain(&self, domain: &str) -> Result<RdapResponse, RdapError> {
        let url = format!("{}domain/{domain}", self.base_url);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/rdap+json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RdapError::Status(response.status()));
        }

        Ok(response.json().await?)
    }

    /// The registry expiration date for `domain`, `None` when the registry
    /// publishes no expiration event.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::lookup_domain`].
    pub async fn domain_expiry(&self, domain: &str) -> Result<Option<DateTime<Utc>>, RdapError> {
        Ok(self.lookup_domain(domain).await?.expiration_date())
    }
}

fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}
