//! Registration Data Access Protocol (RDAP) lookup
//!
//! Best-effort collaborator: reports the domain-registry expiry alongside
//! the certificate diagnostics. Every failure degrades to a sentinel and
//! never fails the overall request.

pub mod client;
pub mod types;

pub use client::{DEFAULT_BASE_URL, RdapClient, RdapError};
pub use types::{RdapEvent, RdapResponse};
