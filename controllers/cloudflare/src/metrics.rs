//! Prometheus metrics and the probe server.
//!
//! Metrics are prefixed `provider_cloudflare_`. The server exposes:
//! - `/metrics` in Prometheus text format
//! - `/healthz` always 200 while the process is up
//! - `/readyz` 200 once the controllers are running, 503 before

use crate::error::ControllerError;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

const METRICS_NAMESPACE: &str = "provider_cloudflare";

/// Reconciliation metrics
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    reconciliations: CounterVec,
    duration: HistogramVec,
    ready: Arc<AtomicBool>,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let reconciliations = CounterVec::new(
            Opts::new(
                format!("{METRICS_NAMESPACE}_reconciliations_total"),
                "Reconciliation passes by kind and outcome",
            ),
            &["kind", "outcome"],
        )?;
        registry.register(Box::new(reconciliations.clone()))?;

        let duration = HistogramVec::new(
            HistogramOpts::new(
                format!("{METRICS_NAMESPACE}_reconcile_duration_seconds"),
                "Duration of reconciliation passes by kind",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
            &["kind"],
        )?;
        registry.register(Box::new(duration.clone()))?;

        Ok(Self {
            registry,
            reconciliations,
            duration,
            ready: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Count a finished pass
    pub fn record_pass(&self, kind: &str, outcome: &str, elapsed: Duration) {
        self.reconciliations.with_label_values(&[kind, outcome]).inc();
        self.duration
            .with_label_values(&[kind])
            .observe(elapsed.as_secs_f64());
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Relaxed);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    /// Encode all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/healthz", get(|| async { "ok" }))
            .route("/readyz", get(ready_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(self.clone())
    }

    /// Serve the probe endpoints until the listener fails
    pub async fn serve(self, addr: SocketAddr) -> Result<(), ControllerError> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ControllerError::Metrics(format!("cannot bind {}: {}", addr, e)))?;
        info!("Serving metrics and probes on {}", addr);
        axum::serve(listener, self.router())
            .await
            .map_err(|e| ControllerError::Metrics(e.to_string()))
    }
}

async fn metrics_handler(State(metrics): State<Metrics>) -> (StatusCode, String) {
    match metrics.gather() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn ready_handler(State(metrics): State<Metrics>) -> StatusCode {
    if metrics.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
