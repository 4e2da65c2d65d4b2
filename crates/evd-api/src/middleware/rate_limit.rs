//! # Per-Client Rate Limiting
//!
//! Fixed-window counter keyed by the `X-Forwarded-For` header, or
//! `"anonymous"` when it is absent. In-memory and per process.
//!
//! Expired windows are swept once per window, and whenever the client table
//! is full. Past `max_clients` tracked keys, new keys share one overflow
//! window, so the table never grows beyond that bound.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parking_lot::Mutex;
use serde::Deserialize;

use crate::error::ErrorBody;

pub const RATE_LIMIT_KEY_HEADER: &str = "x-forwarded-for";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u64,
    pub window_secs: u64,
    /// Distinct keys tracked at once.
    pub max_clients: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 1000,
            window_secs: 60,
            max_clients: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
struct Window {
    count: u64,
    started: Instant,
}

impl Window {
    fn new(now: Instant) -> Self {
        Self {
            count: 0,
            started: now,
        }
    }

    fn expired(&self, now: Instant, length: Duration) -> bool {
        now.duration_since(self.started) >= length
    }

    fn admit(&mut self, now: Instant, length: Duration, max_requests: u64) -> bool {
        if self.expired(now, length) {
            *self = Self::new(now);
        }
        if self.count >= max_requests {
            false
        } else {
            self.count += 1;
            true
        }
    }
}

#[derive(Debug)]
struct Windows {
    clients: HashMap<String, Window>,
    overflow: Window,
    last_sweep: Instant,
}

/// Shared rate limiter state.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Arc<Mutex<Windows>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let now = Instant::now();
        Self {
            config,
            windows: Arc::new(Mutex::new(Windows {
                clients: HashMap::new(),
                overflow: Window::new(now),
                last_sweep: now,
            })),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count a request from `key`; false once its window is exhausted.
    pub fn check(&self, key: &str) -> bool {
        let length = Duration::from_secs(self.config.window_secs);
        let now = Instant::now();
        let mut guard = self.windows.lock();
        let windows = &mut *guard;

        if now.duration_since(windows.last_sweep) >= length
            || windows.clients.len() >= self.config.max_clients
        {
            windows.clients.retain(|_, w| !w.expired(now, length));
            windows.last_sweep = now;
        }

        let window = if windows.clients.contains_key(key)
            || windows.clients.len() < self.config.max_clients
        {
            windows
                .clients
                .entry(key.to_string())
                .or_insert_with(|| Window::new(now))
        } else {
            &mut windows.overflow
        };
        window.admit(now, length, self.config.max_requests)
    }

    /// Keys currently holding their own window.
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().clients.len()
    }
}

pub async fn rate_limit_middleware(request: Request, next: Next) -> Response {
    let limiter = request.extensions().get::<RateLimiter>().cloned();

    if let Some(limiter) = limiter {
        let key = request
            .headers()
            .get(RATE_LIMIT_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("anonymous")
            .to_string();

        if !limiter.check(&key) {
            tracing::warn!(client = %key, "rate limit exceeded");
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorBody::new("RATE_LIMITED", "rate limit exceeded")),
            )
                .into_response();
        }
    }

    next.run(request).await
}
