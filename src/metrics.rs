use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Registry, opts,
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, register_int_gauge_with_registry,
};
use std::sync::LazyLock;

pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

trait ResultExt<T> {
    fn or_exit(self, context: &str) -> T;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn or_exit(self, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                eprintln!("failed to initialize metric ({context}): {err}");
                std::process::exit(1);
            }
        }
    }
}

pub static DIAGNOSTICS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec_with_registry!(
        opts!(
            "certview_diagnostics_total",
            "Total diagnostic requests by outcome"
        ),
        &["outcome"],
        &REGISTRY
    )
    .or_exit("metric can be created")
});

pub static RUNTIME: LazyLock<Histogram> = LazyLock::new(|| {
    register_histogram_with_registry!(
        HistogramOpts::new("certview_runtime", "diagnostic latency in seconds"),
        &REGISTRY
    )
    .or_exit("metric can be created")
});

pub static HANDSHAKE_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    register_histogram_with_registry!(
        HistogramOpts::new(
            "certview_tls_handshake_duration_seconds",
            "TLS probe duration in seconds"
        ),
        &REGISTRY
    )
    .or_exit("metric can be created")
});

pub static RDAP_FAILURES: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter_with_registry!(
        opts!(
            "certview_rdap_failures_total",
            "Registry lookups that degraded to the unavailable sentinel"
        ),
        &REGISTRY
    )
    .or_exit("metric can be created")
});

pub static LAST_RUNTIME_MS: LazyLock<IntGauge> = LazyLock::new(|| {
    register_int_gauge_with_registry!(
        opts!(
            "certview_runtime_last_milliseconds",
            "Runtime of the most recent diagnostic request in milliseconds"
        ),
        &REGISTRY
    )
    .or_exit("metric can be created")
});

pub static PANICS_RECOVERED: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter_with_registry!(
        opts!(
            "certview_panics_recovered_total",
            "Total panics recovered from"
        ),
        &REGISTRY
    )
    .or_exit("metric can be created")
});

/// Encode and return metrics for HTTP export
///
/// # Errors
///
/// Returns an error if metrics encoding fails
pub fn encode_metrics() -> Result<Vec<u8>, String> {
    let mut buffer = Vec::new();
    let encoder = prometheus::TextEncoder::new();

    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|e| format!("could not encode custom metrics: {e}"))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_metrics_initialization() {
        LAST_RUNTIME_MS.set(12);
        assert_eq!(LAST_RUNTIME_MS.get(), 12);
    }

    #[test]
    fn test_outcome_labels() {
        for outcome in [
            "success",
            "invalid_host",
            "no_certificate",
            "timeout",
            "connection_error",
            "expiry",
            "panic",
        ] {
            DIAGNOSTICS_TOTAL.with_label_values(&[outcome]).inc();
        }
    }

    #[test]
    fn test_histogram_metrics() {
        RUNTIME.start_timer().observe_duration();
        HANDSHAKE_DURATION.observe(0.05);
    }

    #[test]
    fn test_counter_metrics() {
        RDAP_FAILURES.inc();
        PANICS_RECOVERED.inc();
    }

    #[test]
    fn test_encode_metrics() {
        // Initialize at least one metric to ensure non-empty output
        RDAP_FAILURES.inc();

        let result = encode_metrics();
        assert!(result.is_ok());

        let buffer = result.unwrap();
        assert!(!buffer.is_empty());

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("certview"));
    }

    #[test]
    fn test_registry() {
        // Force initialization of metrics by accessing them
        let _ = &*RUNTIME;
        let _ = &*LAST_RUNTIME_MS;
        DIAGNOSTICS_TOTAL.with_label_values(&["success"]).inc();

        let metrics = REGISTRY.gather();
        assert!(!metrics.is_empty());

        let metric_names: Vec<String> = metrics.iter().map(|m| m.name().to_string()).collect();
        assert!(metric_names.contains(&"certview_diagnostics_total".to_string()));
        assert!(metric_names.contains(&"certview_runtime".to_string()));
    }
}
