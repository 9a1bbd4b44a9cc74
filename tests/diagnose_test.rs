#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use axum::http::StatusCode;
use certview::{
    diagnose::{self, DiagnoseError, NOT_AVAILABLE},
    rdap::{RdapClient, RdapError},
    tls::{CertificateMetadata, ProbeSettings, SubjectAttributes},
};
use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;

fn ov_metadata() -> CertificateMetadata {
    CertificateMetadata {
        subject: SubjectAttributes {
            organization: Some("Example CA".to_string()),
            ..SubjectAttributes::default()
        },
        issuer_organization: Some("Example CA".to_string()),
        issuer_common_name: None,
        not_after: Utc::now() + ChronoDuration::days(200),
        authorized: true,
    }
}

#[tokio::test]
async fn test_registry_expiry_flows_into_report() {
    let addr = common::spawn_rdap_stub(StatusCode::OK, common::SAMPLE_RDAP).await;
    let client = RdapClient::with_base_url(&format!("http://{addr}")).unwrap();

    let expiry = client.domain_expiry("example.com").await.unwrap();
    let report = diagnose::build_report(&ov_metadata(), expiry, Utc::now()).unwrap();

    assert_eq!(report.domain_expiry, "2026-08-13T04:00:00Z");
    assert_eq!(report.issuer, "Example CA");
}

#[tokio::test]
async fn test_malformed_registry_payload_degrades_to_sentinel() {
    // The lookup fails, but the report still carries the certificate fields
    let addr = common::spawn_rdap_stub(StatusCode::OK, "{ this is not json").await;
    let client = RdapClient::with_base_url(&format!("http://{addr}")).unwrap();

    let lookup = client.domain_expiry("example.com").await;
    assert!(lookup.is_err());

    let report =
        diagnose::build_report(&ov_metadata(), lookup.ok().flatten(), Utc::now()).unwrap();

    assert_eq!(report.domain_expiry, NOT_AVAILABLE);
    assert!(report.valid);
    assert_eq!(report.days_left, 200);
}

#[tokio::test]
async fn test_registry_error_status_is_an_error() {
    let addr = common::spawn_rdap_stub(StatusCode::NOT_FOUND, "{}").await;
    let client = RdapClient::with_base_url(&format!("http://{addr}")).unwrap();

    let result = client.lookup_domain("example.com").await;
    assert!(matches!(result, Err(RdapError::Status(status)) if status.as_u16() == 404));
}

#[tokio::test]
async fn test_run_surfaces_probe_failure_despite_healthy_registry() {
    // Registry data never rescues a failed handshake
    let rdap_addr = common::spawn_rdap_stub(StatusCode::OK, common::SAMPLE_RDAP).await;
    let rdap = RdapClient::with_base_url(&format!("http://{rdap_addr}")).unwrap();

    let settings = ProbeSettings {
        port: common::closed_port().await,
        timeout: Duration::from_secs(2),
    };

    let result = diagnose::run("127.0.0.1", &settings, &rdap).await;
    assert!(matches!(result, Err(DiagnoseError::Connection(_))));
}

#[tokio::test]
async fn test_run_reports_timeout_distinctly() {
    let rdap_addr = common::spawn_rdap_stub(StatusCode::OK, common::SAMPLE_RDAP).await;
    let rdap = RdapClient::with_base_url(&format!("http://{rdap_addr}")).unwrap();

    let silent = common::spawn_holding_listener().await;
    let settings = ProbeSettings {
        port: silent.port(),
        timeout: Duration::from_millis(300),
    };

    let result = diagnose::run("127.0.0.1", &settings, &rdap).await;
    assert!(matches!(result, Err(DiagnoseError::Timeout)));
}

#[tokio::test]
async fn test_run_rejects_invalid_host_before_any_network_io() {
    let rdap = RdapClient::new().unwrap();
    let settings = ProbeSettings::default();

    let result = diagnose::run("localhost", &settings, &rdap).await;
    assert!(matches!(result, Err(DiagnoseError::InvalidHost)));

    let result = diagnose::run("", &settings, &rdap).await;
    assert!(matches!(result, Err(DiagnoseError::InvalidHost)));
}
