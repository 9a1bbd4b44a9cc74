//! HTTP service: the diagnostic endpoint, the embedded web form, and the
//! metrics exporter.

use crate::{
    diagnose::{self, DiagnoseError},
    metrics::{DIAGNOSTICS_TOTAL, LAST_RUNTIME_MS, PANICS_RECOVERED, RUNTIME, encode_metrics},
    rdap::RdapClient,
    tls::ProbeSettings,
};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::{SecondsFormat, Utc};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::{net::IpAddr, sync::Arc};
use tokio::net::TcpListener;
use uuid::Uuid;

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Debug, Clone)]
struct AppState {
    settings: ProbeSettings,
    rdap: RdapClient,
}

#[derive(Debug, Deserialize)]
struct CheckRequest {
    domain: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

#[derive(Serialize)]
struct RequestLog<'a> {
    id: String,
    host: &'a str,
    outcome: &'a str,
    runtime_ms: i64,
    time: String,
}

/// Build the service router. Exposed separately from [`start`] so tests
/// can drive the full HTTP surface against local listeners.
#[must_use]
pub fn app(settings: ProbeSettings, rdap: RdapClient) -> Router {
    let state = Arc::new(AppState { settings, rdap });

    Router::new()
        .route("/", get(index_handler))
        .route("/api/check", post(check_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Start the diagnostics service.
///
/// # Errors
///
/// Returns an error if the RDAP client cannot be built or the listener
/// fails to bind.
pub async fn start(
    listen: Option<IpAddr>,
    port: u16,
    settings: ProbeSettings,
    rdap_url: &str,
) -> anyhow::Result<()> {
    let rdap = RdapClient::with_base_url(rdap_url)?;
    let router = app(settings, rdap);

    // Bind to socket with smart fallback
    let (listener, bind_addr) = match listen {
        Some(addr) => {
            // Explicit address specified - bind to it
            let socket_addr = format!("{addr}:{port}");
            let listener = TcpListener::bind(&socket_addr).await?;
            (listener, socket_addr)
        }
        None => {
            // Auto mode: try IPv6 first, fallback to IPv4
            if let Ok(l) = TcpListener::bind(format!("::0:{port}")).await {
                (l, format!("[::]:{port}"))
            } else {
                let socket_addr = format!("0.0.0.0:{port}");
                (TcpListener::bind(&socket_addr).await?, socket_addr)
            }
        }
    };

    println!(
        "{} - Listening on {}, handshake timeout: {}s, registry: {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        bind_addr,
        settings.timeout.as_secs(),
        rdap_url,
    );

    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn metrics_handler() -> impl IntoResponse {
    match encode_metrics() {
        Ok(buffer) => (StatusCode::OK, buffer),
        Err(e) => {
            eprintln!("{e}");
            (StatusCode::INTERNAL_SERVER_ERROR, Vec::new())
        }
    }
}

async fn check_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        DIAGNOSTICS_TOTAL.with_label_values(&["invalid_request"]).inc();
        return error_response(StatusCode::BAD_REQUEST, "Invalid request");
    };

    let request_id = Uuid::new_v4();
    let started = Utc::now();
    let timer = RUNTIME.start_timer();

    // Catch panics per request to keep the service alive
    let outcome = std::panic::AssertUnwindSafe(diagnose::run(
        &request.domain,
        &state.settings,
        &state.rdap,
    ))
    .catch_unwind()
    .await;

    timer.observe_duration();
    let runtime_ms = (Utc::now() - started).num_milliseconds();
    LAST_RUNTIME_MS.set(runtime_ms);

    match outcome {
        Ok(Ok(report)) => {
            DIAGNOSTICS_TOTAL.with_label_values(&["success"]).inc();
            log_request(request_id, &request.domain, "success", runtime_ms);
            (StatusCode::OK, Json(report)).into_response()
        }
        Ok(Err(err)) => {
            DIAGNOSTICS_TOTAL
                .with_label_values(&[err.outcome_label()])
                .inc();
            log_request(request_id, &request.domain, err.outcome_label(), runtime_ms);

            let message = match &err {
                DiagnoseError::Connection(msg) => diagnose::friendly_error(msg),
                other => other.to_string(),
            };
            error_response(status_for(&err), &message)
        }
        Err(panic_info) => {
            PANICS_RECOVERED.inc();
            DIAGNOSTICS_TOTAL.with_label_values(&["panic"]).inc();
            eprintln!("panic in diagnostic request: {panic_info:?}");
            log_request(request_id, &request.domain, "panic", runtime_ms);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Diagnostic failed.")
        }
    }
}

const fn status_for(err: &DiagnoseError) -> StatusCode {
    match err {
        DiagnoseError::InvalidHost => StatusCode::BAD_REQUEST,
        DiagnoseError::NoCertificate => StatusCode::NOT_FOUND,
        DiagnoseError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        DiagnoseError::Connection(_) | DiagnoseError::Expiry(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

fn log_request(id: Uuid, host: &str, outcome: &str, runtime_ms: i64) {
    let entry = RequestLog {
        id: id.to_string(),
        host,
        outcome,
        runtime_ms,
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    };

    if let Ok(serialized) = serde_json::to_string(&entry) {
        println!("{serialized}");
    }
}
