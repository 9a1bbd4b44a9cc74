use anyhow::{Result, anyhow};
use rustls::{
    DigitallySignedStruct, Error as TlsError, RootCertStore, SignatureScheme,
    client::{
        WebPkiServerVerifier,
        danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier},
    },
    pki_types::{CertificateDer, ServerName, UnixTime},
};
use std::{
    fmt,
    sync::{Arc, Mutex},
};

/// A certificate verifier that admits every chain so the handshake always
/// completes, while recording whether the standard `WebPKI` verifier would
/// have accepted it.
///
/// The probe deliberately never rejects a certificate: invalid and
/// self-signed chains must still be inspectable. The recorded verdict
/// becomes the report's "handshake authorized" flag.
pub struct TrustRecordingVerifier {
    /// Verdict of the inner verifier for the most recent handshake
    verdict: Arc<Mutex<Option<bool>>>,
    /// The real verifier whose outcome is recorded but never enforced
    inner: Arc<WebPkiServerVerifier>,
}

impl fmt::Debug for TrustRecordingVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustRecordingVerifier")
            .field("verdict", &self.verdict)
            .field("inner", &"WebPkiServerVerifier")
            .finish()
    }
}

impl TrustRecordingVerifier {
    /// Create a new trust-recording verifier backed by the webpki roots.
    ///
    /// # Errors
    ///
    /// Returns an error if the `WebPKI` verifier cannot be built.
    pub fn new() -> Result<Self> {
        let root_store: RootCertStore = webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
        let inner = WebPkiServerVerifier::builder(Arc::new(root_store))
            .build()
            .map_err(|e| anyhow!("failed to build WebPKI verifier: {e}"))?;

        Ok(Self {
            verdict: Arc::new(Mutex::new(None)),
            inner,
        })
    }

    /// Whether the chain presented in the most recent handshake validated
    /// against the trust roots. `false` before any handshake completed.
    #[must_use]
    pub fn authorized(&self) -> bool {
        self.verdict
            .lock()
            .ok()
            .and_then(|cell| *cell)
            .unwrap_or(false)
    }
}

impl ServerCertVerifier for TrustRecordingVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        let accepted = self
            .inner
            .verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now)
            .is_ok();
        if let Ok(mut cell) = self.verdict.lock() {
            *cell = Some(accepted);
        }

        // Admit the chain regardless of the recorded verdict
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
        ]
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::tls::ensure_crypto_provider;

    #[test]
    fn test_verifier_creation() {
        ensure_crypto_provider();
        assert!(TrustRecordingVerifier::new().is_ok());
    }

    #[test]
    fn test_verdict_initially_unauthorized() {
        ensure_crypto_provider();
        let verifier = TrustRecordingVerifier::new().unwrap();
        assert!(!verifier.authorized());
    }

    #[test]
    fn test_verifier_debug() {
        ensure_crypto_provider();
        let verifier = TrustRecordingVerifier::new().unwrap();
        let debug_str = format!("{verifier:?}");
        assert!(debug_str.contains("TrustRecordingVerifier"));
    }

    #[test]
    fn test_supported_schemes() {
        ensure_crypto_provider();
        let verifier = TrustRecordingVerifier::new().unwrap();
        let schemes = verifier.supported_verify_schemes();
        assert!(schemes.contains(&SignatureScheme::RSA_PKCS1_SHA256));
        assert!(schemes.contains(&SignatureScheme::ED25519));
    }
}
