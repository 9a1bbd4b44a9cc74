#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use axum::{Router, http::StatusCode};
use std::{net::SocketAddr, time::Duration};
use tokio::net::TcpListener;

/// RDAP payload in the shape the public aggregator returns for a domain
pub const SAMPLE_RDAP: &str = r#"{
    "objectClassName": "domain",
    "ldhName": "example.com",
    "status": ["active"],
    "events": [
        {"eventAction": "registration", "eventDate": "1995-08-14T04:00:00Z"},
        {"eventAction": "expiration", "eventDate": "2026-08-13T04:00:00Z"}
    ]
}"#;

/// Serve `body` with `status` for every request on an ephemeral local port.
pub async fn spawn_rdap_stub(status: StatusCode, body: &'static str) -> SocketAddr {
    let app = Router::new().fallback(move || async move { (status, body) });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });

    addr
}

/// A listener that accepts TCP connections but never speaks, so TLS
/// handshakes against it hang until the probe's bound expires.
pub async fn spawn_holding_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            if let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let _held = stream;
                    tokio::time::sleep(Duration::from_secs(600)).await;
                });
            }
        }
    });

    addr
}

/// A local port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}
