use super::{CertificateMetadata, ProbeSettings, SubjectAttributes, TrustRecordingVerifier};
use chrono::{DateTime, Utc};
use rustls::{ClientConfig, pki_types::ServerName};
use std::{
    net::IpAddr,
    sync::{Arc, OnceLock},
};
use thiserror::Error;
use tokio::{net::TcpStream, time};
use tokio_rustls::{TlsConnector, client::TlsStream};
use x509_parser::prelude::{FromDer, X509Certificate};

static CRYPTO_PROVIDER_INIT: OnceLock<()> = OnceLock::new();

/// Ensure the rustls crypto provider is initialized
///
/// This should be called before any TLS operations. It's safe to call
/// multiple times as initialization only happens once.
///
/// # Panics
///
/// Panics if the crypto provider cannot be installed (should never happen in practice)
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER_INIT.get_or_init(|| {
        if let Err(err) = rustls::crypto::ring::default_provider().install_default() {
            eprintln!("failed to install ring crypto provider: {err:?}");
            std::process::exit(1);
        }
    });
}

/// Outcome states of a certificate probe that did not produce a certificate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Connect + handshake did not finish within the configured bound
    #[error("Connection timed out")]
    Timeout,
    /// TCP-level failure: name resolution, connection refused, reset
    #[error("{0}")]
    Connection(String),
    /// The TLS negotiation itself failed
    #[error("{0}")]
    Handshake(String),
    /// The handshake completed but the peer presented no certificate
    #[error("No certificate found")]
    NoCertificate,
    #[error("invalid server name: {0}")]
    InvalidServerName(String),
    /// The peer certificate could not be parsed
    #[error("failed to parse certificate: {0}")]
    Certificate(String),
}

/// Perform a TLS handshake against `host` and extract metadata from the
/// peer's end-entity certificate.
///
/// The handshake runs in a mode that never rejects the chain, so invalid
/// and self-signed certificates can still be inspected; whether the chain
/// *would* have validated against the webpki roots is reported in the
/// returned metadata's `authorized` flag. The whole connect + handshake is
/// bounded by `settings.timeout`, after which the socket is torn down.
///
/// # Errors
///
/// Returns a [`ProbeError`] describing the failing phase: timeout,
/// connection error, handshake failure, absent certificate, or an
/// unparsable certificate.
pub async fn probe_certificate(
    host: &str,
    settings: &ProbeSettings,
) -> Result<CertificateMetadata, ProbeError> {
    ensure_crypto_provider();

    let verifier = Arc::new(
        TrustRecordingVerifier::new()
            .map_err(|e| ProbeError::Handshake(format!("failed to build trust verifier: {e}")))?,
    );

    let config = ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(verifier.clone())
        .with_no_client_auth();
    let connector = TlsConnector::from(Arc::new(config));

    let server_name = server_name_from_host(host)?;

    let handshake = async {
        let stream = TcpStream::connect((host, settings.port))
            .await
            .map_err(|e| ProbeError::Connection(e.to_string()))?;
        connector
            .connect(server_name, stream)
            .await
            .map_err(|e| ProbeError::Handshake(e.to_string()))
    };

    // A single bound covers connect + handshake; expiry drops the future
    // and with it the socket
    let tls_stream = time::timeout(settings.timeout, handshake)
        .await
        .map_err(|_| ProbeError::Timeout)??;

    extract_peer_certificate(&tls_stream, verifier.authorized())
}

fn server_name_from_host(host: &str) -> Result<ServerName<'static>, ProbeError> {
    host.parse::<IpAddr>().map_or_else(
        |_| {
            ServerName::try_from(host.to_string())
                .map_err(|_| ProbeError::InvalidServerName(host.to_string()))
        },
        |ip| Ok(ServerName::from(ip).to_owned()),
    )
}

fn extract_peer_certificate(
    stream: &TlsStream<TcpStream>,
    authorized: bool,
) -> Result<CertificateMetadata, ProbeError> {
    let (_, connection) = stream.get_ref();
    let cert = connection
        .peer_certificates()
        .and_then(|certs| certs.first())
        .ok_or(ProbeError::NoCertificate)?;

    parse_certificate(cert.as_ref(), authorized)
}

/// Extract subject attributes, issuer names, and the validity end from a
/// DER-encoded certificate.
///
/// # Errors
///
/// Returns [`ProbeError::Certificate`] when the DER cannot be parsed or
/// carries an expiry outside the representable timestamp range.
pub fn parse_certificate(
    cert_der: &[u8],
    authorized: bool,
) -> Result<CertificateMetadata, ProbeError> {
    let (_, cert) =
        X509Certificate::from_der(cert_der).map_err(|e| ProbeError::Certificate(e.to_string()))?;

    let subject = SubjectAttributes::from_x509_name(cert.subject());
    let issuer = SubjectAttributes::from_x509_name(cert.issuer());

    let raw = cert.validity().not_after.to_datetime();
    let not_after = DateTime::<Utc>::from_timestamp(raw.unix_timestamp(), raw.nanosecond())
        .ok_or_else(|| ProbeError::Certificate("invalid certificate expiry timestamp".to_string()))?;

    Ok(CertificateMetadata {
        subject,
        issuer_organization: issuer.organization,
        issuer_common_name: issuer.common_name,
        not_after,
        authorized,
    })
}
