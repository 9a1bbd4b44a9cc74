//! Certificate classification and lifetime arithmetic
//!
//! - `classify` - map subject attributes to a validation tier
//! - `expiry` - whole-day lifetime remaining until a "valid to" timestamp

pub mod classify;
pub mod expiry;

pub use classify::{ValidationTier, classify};
pub use expiry::{ExpiryParseError, days_left_from, days_until, parse_expiry};
