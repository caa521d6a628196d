//! Application-layer rate limiting for unauthenticated routes
//!
//! The limiter sits behind a trait so deployments (and tests) can swap
//! the policy without touching the routes that consume it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use tokio::time::Instant;

use shared::error::{AppError, ErrorCode};

use crate::core::AppState;

/// Decides whether a request on a route may proceed
pub trait RateLimiter: Send + Sync {
    /// Returns `true` if the request is allowed
    fn check(&self, route: &'static str, key: &str) -> bool;

    /// Drop stale bookkeeping. Called periodically.
    fn cleanup(&self) {}
}

struct WindowEntry {
    count: u32,
    window_start: Instant,
}

/// Fixed-window in-memory limiter, keyed by route + client IP
pub struct MemoryRateLimiter {
    max_requests: u32,
    window_secs: u64,
    windows: DashMap<(&'static str, String), WindowEntry>,
}

impl MemoryRateLimiter {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            windows: DashMap::new(),
        }
    }
}

impl RateLimiter for MemoryRateLimiter {
    fn check(&self, route: &'static str, key: &str) -> bool {
        let now = Instant::now();
        let mut entry = self
            .windows
            .entry((route, key.to_owned()))
            .or_insert_with(|| WindowEntry {
                count: 0,
                window_start: now,
            });

        if now.duration_since(entry.window_start).as_secs() >= self.window_secs {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= self.max_requests
    }

    /// Remove windows that went quiet more than 5 minutes ago
    fn cleanup(&self) {
        let cutoff = std::time::Duration::from_secs(300);
        let now = Instant::now();
        self.windows
            .retain(|_, entry| now.duration_since(entry.window_start) < cutoff);
    }
}

/// Limiter that admits everything. Used by tests.
pub struct AllowAll;

impl RateLimiter for AllowAll {
    fn check(&self, _route: &'static str, _key: &str) -> bool {
        true
    }
}

/// Client IP: X-Forwarded-For first (reverse proxy), then peer address
pub fn extract_ip(request: &Request) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
    {
        // Comma-separated list; first entry is the original client
        if let Some(first) = val.split(',').next() {
            let ip = first.trim();
            if !ip.is_empty() {
                return ip.to_owned();
            }
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Per-route rate limit middleware. 429 when the window is exhausted.
pub fn rate_limit(
    route: &'static str,
) -> impl Fn(
    State<AppState>,
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |State(state): State<AppState>, request: Request, next: Next| {
        Box::pin(async move {
            let ip = extract_ip(&request);
            if !state.rate_limiter.check(route, &ip) {
                crate::security_log!(WARN, "rate_limited", route = route, ip = %ip);
                return Err(AppError::new(ErrorCode::TooManyRequests));
            }
            Ok(next.run(request).await)
        })
    }
}
