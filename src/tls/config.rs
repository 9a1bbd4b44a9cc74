use std::time::Duration;

/// Default TLS port probed for every diagnostic
pub const DEFAULT_PROBE_PORT: u16 = 443;

/// Default bound on the combined TCP connect + TLS handshake
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for the certificate probe
#[derive(Debug, Clone, Copy)]
pub struct ProbeSettings {
    /// TLS port on the target host
    pub port: u16,
    /// Bound on connect + handshake; on expiry the socket is torn down
    pub timeout: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PROBE_PORT,
            timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }
}

impl ProbeSettings {
    /// Settings with the default port and the given handshake bound.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            port: DEFAULT_PROBE_PORT,
            timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ProbeSettings::default();
        assert_eq!(settings.port, 443);
        assert_eq!(settings.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_with_timeout() {
        let settings = ProbeSettings::with_timeout(Duration::from_secs(3));
        assert_eq!(settings.port, 443);
        assert_eq!(settings.timeout, Duration::from_secs(3));
    }
}
