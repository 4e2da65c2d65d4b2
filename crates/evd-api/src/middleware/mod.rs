//! # Middleware
//!
//! Tower layers applied to every `/v1` route: per-client rate limiting,
//! request metrics and request tracing.

pub mod metrics;
pub mod rate_limit;
pub mod tracing_layer;
