//! TLS certificate probing
//!
//! One handshake per diagnostic, performed in a mode that never rejects
//! the presented chain so invalid and self-signed certificates can still
//! be inspected and reported.
//!
//! # Module Organization
//!
//! - `config` - probe settings (target port, handshake bound)
//! - `metadata` - subject attributes and certificate metadata records
//! - `probe` - handshake and certificate extraction
//! - `verifier` - trust-recording certificate verifier

pub mod config;
pub mod metadata;
pub mod probe;
pub mod verifier;

// Re-export commonly used types
pub use config::{DEFAULT_HANDSHAKE_TIMEOUT, DEFAULT_PROBE_PORT, ProbeSettings};
pub use metadata::{CertificateMetadata, SubjectAttributes};
pub use probe::{ProbeError, ensure_crypto_provider, parse_certificate, probe_certificate};
pub use verifier::TrustRecordingVerifier;
