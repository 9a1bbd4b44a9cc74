use chrono::{DateTime, Utc};
use thiserror::Error;

const SECS_PER_DAY: i64 = 86_400;

/// The "valid to" string could not be parsed as a timestamp.
///
/// The reference implementation let unparsable dates fall through a NaN
/// comparison and silently report zero days; here the failure is explicit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid expiry timestamp: {0}")]
pub struct ExpiryParseError(pub String);

/// Parse a certificate "valid to" timestamp.
///
/// Accepts RFC 3339 (the format this crate emits in reports) with an
/// RFC 2822 fallback.
///
/// # Errors
///
/// Returns [`ExpiryParseError`] when the input matches neither format.
pub fn parse_expiry(value: &str) -> Result<DateTime<Utc>, ExpiryParseError> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ExpiryParseError(value.to_string()))
}

/// Whole days remaining until `expiry`, evaluated at `now`.
///
/// Any positive fraction of a day counts as one full day (ceiling rule);
/// an expiry in the past clamps to zero, never negative.
#[must_use]
pub fn days_left_from(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (expiry - now).num_seconds();
    if secs <= 0 {
        0
    } else {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
        {
            (secs as u64).div_ceil(SECS_PER_DAY as u64) as i64
        }
    }
}

/// Whole days remaining until the timestamp string `value`, evaluated at
/// `now`. Combines [`parse_expiry`] and [`days_left_from`].
///
/// # Errors
///
/// Returns [`ExpiryParseError`] when `value` cannot be parsed.
pub fn days_until(value: &str, now: DateTime<Utc>) -> Result<i64, ExpiryParseError> {
    parse_expiry(value).map(|expiry| days_left_from(expiry, now))
}
