//! CertView: domain security diagnostics over HTTP.
//!
//! Given a hostname, the service performs a TLS handshake against port 443,
//! classifies the presented certificate's validation tier, computes the
//! remaining certificate lifetime in whole days, and independently queries
//! RDAP for the domain-registry expiry.

pub mod cert;
pub mod cli;
pub mod diagnose;
pub mod metrics;
pub mod rdap;
pub mod server;
pub mod tls;
