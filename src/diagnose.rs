//! Diagnostic orchestration
//!
//! Drives one TLS probe and one registry lookup per request, merges the
//! outcomes after both settle, and always produces a structured report or
//! a structured error.

use crate::{
    cert::{self, ExpiryParseError, ValidationTier},
    metrics::{HANDSHAKE_DURATION, RDAP_FAILURES},
    rdap::RdapClient,
    tls::{self, CertificateMetadata, ProbeError, ProbeSettings, SubjectAttributes},
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

/// Sentinel reported when the registry expiry could not be determined
pub const NOT_AVAILABLE: &str = "Not Available";

/// Aggregate result of one diagnostic request. Constructed fresh per
/// request and immutable once built.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    /// Whether the chain validated against trusted roots during the probe
    pub valid: bool,
    /// Issuer display name, falling back to "Unknown Issuer"
    pub issuer: String,
    /// Certificate "valid to" instant, RFC 3339
    pub expiry_date: String,
    /// Whole days until certificate expiry, never negative
    pub days_left: i64,
    #[serde(rename = "type")]
    pub tier: ValidationTier,
    /// Subject attributes as presented by the certificate
    #[serde(skip_serializing_if = "SubjectAttributes::is_empty")]
    pub raw_subject: SubjectAttributes,
    /// Registry expiration instant (RFC 3339) or the sentinel
    pub domain_expiry: String,
}

/// Failure conditions surfaced to the caller. Registry-lookup failures are
/// deliberately absent: they degrade to [`NOT_AVAILABLE`] instead.
#[derive(Debug, Error)]
pub enum DiagnoseError {
    #[error("Please include a valid domain (e.g. example.com).")]
    InvalidHost,

    #[error("No certificate found")]
    NoCertificate,

    #[error("Connection timed out")]
    Timeout,

    #[error("{0}")]
    Connection(String),

    #[error(transparent)]
    Expiry(#[from] ExpiryParseError),
}

impl DiagnoseError {
    /// Outcome label used for the diagnostics counter.
    #[must_use]
    pub const fn outcome_label(&self) -> &'static str {
        match self {
            Self::InvalidHost => "invalid_host",
            Self::NoCertificate => "no_certificate",
            Self::Timeout => "timeout",
            Self::Connection(_) => "connection_error",
            Self::Expiry(_) => "expiry",
        }
    }
}

impl From<ProbeError> for DiagnoseError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::Timeout => Self::Timeout,
            ProbeError::NoCertificate => Self::NoCertificate,
            other => Self::Connection(other.to_string()),
        }
    }
}

/// Run one full diagnostic: sanitize the hostname, probe the certificate
/// and query the registry concurrently, then merge both outcomes.
///
/// # Errors
///
/// Returns a [`DiagnoseError`] for an invalid hostname or any probe
/// failure. A failed registry lookup is absorbed into the sentinel.
pub async fn run(
    raw_host: &str,
    settings: &ProbeSettings,
    rdap: &RdapClient,
) -> Result<DiagnosticReport, DiagnoseError> {
    let host = sanitize_host(raw_host)?;

    let probe = async {
        let timer = HANDSHAKE_DURATION.start_timer();
        let outcome = tls::probe_certificate(&host, settings).await;
        timer.observe_duration();
        outcome
    };

    // Independent operations, awaited jointly; neither is ordered before
    // the other and the registry result is merged only after both settle
    let (handshake, registry) = tokio::join!(probe, rdap.domain_expiry(&host));

    let registry_expiry = match registry {
        Ok(expiry) => expiry,
        Err(e) => {
            RDAP_FAILURES.inc();
            eprintln!("registry lookup failed for {host}: {e}");
            None
        }
    };

    let metadata = handshake.map_err(DiagnoseError::from)?;
    build_report(&metadata, registry_expiry, Utc::now())
}

/// Assemble the diagnostic report from probe metadata and the optional
/// registry expiry, evaluated at `now`.
///
/// # Errors
///
/// Returns [`DiagnoseError::Expiry`] when the certificate's validity end
/// cannot be round-tripped through the expiry calculator.
pub fn build_report(
    metadata: &CertificateMetadata,
    registry_expiry: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<DiagnosticReport, DiagnoseError> {
    let expiry_date = metadata.not_after.to_rfc3339_opts(SecondsFormat::Secs, true);
    let days_left = cert::days_until(&expiry_date, now)?;

    Ok(DiagnosticReport {
        valid: metadata.authorized,
        issuer: metadata.issuer_display(),
        expiry_date,
        days_left,
        tier: cert::classify(Some(&metadata.subject)),
        raw_subject: metadata.subject.clone(),
        domain_expiry: registry_expiry.map_or_else(
            || NOT_AVAILABLE.to_string(),
            |d| d.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
    })
}

/// Reduce a user-supplied domain string to a bare hostname: trim,
/// lowercase, strip the scheme, and discard everything after the first
/// `/` or `?`.
///
/// # Errors
///
/// Returns [`DiagnoseError::InvalidHost`] when nothing hostname-shaped
/// remains (empty, no dot, or characters outside `[a-z0-9.-]`).
pub fn sanitize_host(raw: &str) -> Result<String, DiagnoseError> {
    let host = raw.trim().to_lowercase();
    let host = host
        .strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(&host);
    let host = host.split(['/', '?']).next().unwrap_or(host);

    if host.is_empty() || !host.contains('.') {
        return Err(DiagnoseError::InvalidHost);
    }
    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(DiagnoseError::InvalidHost);
    }

    Ok(host.to_string())
}

/// Translate well-known low-level error messages into plain-language
/// guidance; unrecognized messages pass through unchanged.
#[must_use]
pub fn friendly_error(message: &str) -> String {
    if message.contains("failed to lookup address")
        || message.contains("Name or service not known")
        || message.contains("nodename nor servname")
        || message.contains("No address associated")
    {
        "The domain name could not be resolved. Check the spelling and try again.".to_string()
    } else if message.contains("refused") {
        "The host refused the connection; nothing is listening for TLS on that port.".to_string()
    } else if message.contains("timed out") {
        "The connection timed out before the handshake completed.".to_string()
    } else {
        message.to_string()
    }
}
