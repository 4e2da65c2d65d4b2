//! # evd-api: Axum API Service for the Evidence Stack
//!
//! Serves evidence records held in memory: intake and import, the review
//! queue, chain of custody, integrity checks, packages, exports, the audit
//! log and scope visibility.
//!
//! ## API Surface
//!
//! | Prefix | Module | Domain |
//! |--------|--------|--------|
//! | `/v1/evidence/*` | [`routes::evidence`] | Records, links, custody, content hashing |
//! | `/v1/review/*` | [`routes::review`] | Review queue and decisions |
//! | `/v1/packages/*` | [`routes::packages`] | Packages, verification, sealing |
//! | `/v1/exports` | [`routes::exports`] | CSV / Excel / JSON downloads |
//! | `/v1/audit` | [`routes::audit`] | Flattened custody log |
//! | `/v1/scope/*` | [`routes::scope`] | Visible/hidden partition |
//! | `/v1/options/*` | [`routes::options`] | Paged select options |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → RateLimitMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Generated via utoipa derive macros at `/openapi.json`.

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;

use crate::middleware::metrics::ApiMetrics;
use crate::middleware::rate_limit::RateLimiter;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and `/metrics` are mounted outside the auth
/// middleware so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = state.config.auth.clone();
    let metrics = if state.config.metrics_enabled {
        ApiMetrics::new()
    } else {
        ApiMetrics::disabled()
    };
    let limiter = RateLimiter::new(state.config.rate_limit.clone());

    let api = Router::new()
        .merge(routes::evidence::router())
        .merge(routes::review::router())
        .merge(routes::packages::router())
        .merge(routes::exports::router())
        .merge(routes::audit::router())
        .merge(routes::scope::router())
        .merge(routes::options::router())
        .merge(openapi::router())
        .fallback(routes::fallback)
        .layer(from_fn(middleware::rate_limit::rate_limit_middleware))
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(auth_config))
        .layer(axum::Extension(metrics.clone()))
        .layer(axum::Extension(limiter))
        .with_state(state);

    // Unauthenticated probes and the Prometheus scrape endpoint.
    let open = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(move || async move { metrics.render() }));

    Router::new().merge(open).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: stores are in memory, so ready as soon as serving.
async fn readiness() -> &'static str {
    "ready"
}
