//! # Request Metrics
//!
//! The middleware emits `metrics` counters and histograms per request,
//! labelled by method, matched route and status:
//!
//! | Metric | Kind |
//! |--------|------|
//! | `evd_http_requests_total` | counter |
//! | `evd_http_errors_total` | counter (4xx and 5xx) |
//! | `evd_http_request_duration_seconds` | histogram |
//!
//! A process-wide Prometheus recorder is installed on first use and
//! rendered at `/metrics`. In-process totals are kept alongside for the
//! startup banner and tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static RECORDER: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install the Prometheus recorder, or reuse the one already installed.
///
/// Returns `None` when another global recorder was installed first.
fn prometheus_handle() -> Option<PrometheusHandle> {
    RECORDER
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "prometheus recorder not installed");
                None
            }
        })
        .clone()
}

/// Shared metrics state.
#[derive(Clone)]
pub struct ApiMetrics {
    request_count: Arc<AtomicU64>,
    error_count: Arc<AtomicU64>,
    handle: Option<PrometheusHandle>,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("errors", &self.errors())
            .field("exporter", &self.handle.is_some())
            .finish()
    }
}

impl ApiMetrics {
    /// Metrics backed by the process-wide Prometheus recorder.
    pub fn new() -> Self {
        Self {
            request_count: Arc::new(AtomicU64::new(0)),
            error_count: Arc::new(AtomicU64::new(0)),
            handle: prometheus_handle(),
        }
    }

    /// Counters only; `/metrics` renders an empty exposition.
    pub fn disabled() -> Self {
        Self {
            request_count: Arc::new(AtomicU64::new(0)),
            error_count: Arc::new(AtomicU64::new(0)),
            handle: None,
        }
    }

    pub fn requests(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Prometheus text exposition.
    pub fn render(&self) -> String {
        self.handle
            .as_ref()
            .map(PrometheusHandle::render)
            .unwrap_or_default()
    }

    fn observe(&self, method: String, path: String, status: u16, elapsed_secs: f64) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let status_label = status.to_string();
        metrics::counter!(
            "evd_http_requests_total",
            "method" => method.clone(),
            "path" => path.clone(),
            "status" => status_label.clone()
        )
        .increment(1);
        if status >= 400 {
            self.error_count.fetch_add(1, Ordering::Relaxed);
            metrics::counter!(
                "evd_http_errors_total",
                "method" => method.clone(),
                "path" => path.clone(),
                "status" => status_label
            )
            .increment(1);
        }
        metrics::histogram!(
            "evd_http_request_duration_seconds",
            "method" => method,
            "path" => path
        )
        .record(elapsed_secs);
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Record count, errors and latency for every request.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().as_str().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let started = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.observe(
            method,
            path,
            response.status().as_u16(),
            started.elapsed().as_secs_f64(),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn app(metrics: ApiMetrics) -> Router {
        Router::new()
            .route("/ok", get(|| async { "ok" }))
            .route("/bad", get(|| async { StatusCode::UNPROCESSABLE_ENTITY }))
            .layer(from_fn(metrics_middleware))
            .layer(axum::Extension(metrics))
    }

    async fn hit(app: &Router, uri: &str) {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn counts_requests_and_errors() {
        let metrics = ApiMetrics::disabled();
        let app = app(metrics.clone());
        hit(&app, "/ok").await;
        hit(&app, "/bad").await;
        hit(&app, "/missing").await;
        assert_eq!(metrics.requests(), 3);
        assert_eq!(metrics.errors(), 2);
    }

    #[test]
    fn disabled_renders_empty() {
        assert_eq!(ApiMetrics::disabled().render(), "");
    }
}
