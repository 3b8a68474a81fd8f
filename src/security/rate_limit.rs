//! Fixed-window rate limiting middleware.
//!
//! # Responsibilities
//! - Bucket API-prefixed requests per client IP
//! - Admit up to `max_requests` per window, reject the rest with 429
//! - Replace (not decay) a bucket once its window has expired
//!
//! # Design Decisions
//! - Read-then-increment is atomic per identifier: the DashMap entry guard
//!   holds the shard write lock for the whole read-modify-write
//! - The counter keeps incrementing past the cap so sustained abuse stays
//!   rejected for the rest of the window
//! - 429 responses carry Retry-After with the remaining window time
//! - Expired entries are reaped by an optional periodic sweep; with the
//!   sweep disabled the map grows by one entry per distinct client ever seen

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::config::RateLimitConfig;
use crate::observability::metrics;

/// Identifier used when the client socket address is unavailable.
///
/// All such requests share one bucket. See DESIGN.md before changing this.
const FALLBACK_IDENTIFIER: &str = "127.0.0.1";

/// Per-identifier window state.
#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    /// Requests observed in the current window. At least 1 for a live entry.
    count: u32,

    /// When the current window began.
    window_start: Instant,
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Forward to the downstream handler.
    Admitted,

    /// Reject with 429; `retry_after` is the remaining window time.
    Limited { retry_after: Duration },
}

/// Fixed-window request admission limiter.
///
/// Owns the identifier → window map. Constructed per server instance and
/// shared via `Arc`, so tests get a fresh map each run.
pub struct RateLimiter {
    windows: DashMap<String, ClientWindow>,
    window: Duration,
    max_requests: u32,
    path_prefix: String,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            window: Duration::from_millis(config.window_ms),
            max_requests: config.max_requests,
            path_prefix: config.path_prefix.clone(),
        }
    }

    /// Whether a request path is subject to admission accounting.
    pub fn applies_to(&self, path: &str) -> bool {
        path.starts_with(&self.path_prefix)
    }

    /// Run the admission check for `identifier` at the current time.
    pub fn check(&self, identifier: &str) -> Decision {
        self.check_at(identifier, Instant::now())
    }

    /// Admission check at an explicit instant. Split out so window expiry is
    /// testable without sleeping through real windows.
    fn check_at(&self, identifier: &str, now: Instant) -> Decision {
        // The entry guard locks this key's shard until dropped, making the
        // read-modify-write atomic with respect to concurrent callers.
        let mut entry = self
            .windows
            .entry(identifier.to_string())
            .or_insert(ClientWindow {
                count: 0,
                window_start: now,
            });

        let elapsed = now.saturating_duration_since(entry.window_start);
        if elapsed > self.window {
            // Window expired: replace the entry outright.
            *entry = ClientWindow {
                count: 1,
                window_start: now,
            };
            return Decision::Admitted;
        }

        entry.count = entry.count.saturating_add(1);
        if entry.count > self.max_requests {
            Decision::Limited {
                retry_after: self.window - elapsed,
            }
        } else {
            Decision::Admitted
        }
    }

    /// Drop every entry whose window has expired.
    pub fn sweep(&self) {
        self.sweep_at(Instant::now());
    }

    fn sweep_at(&self, now: Instant) {
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.window_start) <= self.window);
    }

    /// Number of identifiers currently tracked.
    pub fn tracked_identifiers(&self) -> usize {
        self.windows.len()
    }
}

/// Axum middleware enforcing the admission check on API-prefixed paths.
///
/// Non-API paths pass through untouched and unaccounted. The client IP comes
/// from connect info; when absent the fallback identifier pools the traffic.
pub async fn admission_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.applies_to(request.uri().path()) {
        return next.run(request).await;
    }

    let identifier = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| FALLBACK_IDENTIFIER.to_string());

    match limiter.check(&identifier) {
        Decision::Admitted => next.run(request).await,
        Decision::Limited { retry_after } => {
            tracing::warn!(client = %identifier, "Rate limit exceeded");
            metrics::record_rate_limited();

            let mut response = Response::new(Body::from("Too Many Requests"));
            *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain"),
            );
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs(retry_after).to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
    }
}

/// Remaining window time in whole seconds, rounded up, never below 1.
fn retry_after_secs(remaining: Duration) -> u64 {
    let secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs.max(1)
    }
}

/// Spawn the periodic sweep of expired entries. Returns without spawning
/// when the interval is 0 (sweeping disabled).
pub fn spawn_sweeper(
    limiter: Arc<RateLimiter>,
    interval_secs: u64,
    mut shutdown: broadcast::Receiver<()>,
) {
    if interval_secs == 0 {
        return;
    }

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.tick().await; // first tick fires immediately
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let before = limiter.tracked_identifiers();
                    limiter.sweep();
                    let after = limiter.tracked_identifiers();
                    if before != after {
                        tracing::debug!(evicted = before - after, tracked = after, "Swept expired rate limit entries");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Rate limit sweeper stopping");
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window_ms: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            window_ms,
            max_requests,
            path_prefix: "/api/".into(),
            sweep_interval_secs: 0,
        })
    }

    #[test]
    fn admits_up_to_cap_then_rejects() {
        let rl = limiter(30, 15_000);
        let now = Instant::now();
        for i in 0..30 {
            assert_eq!(
                rl.check_at("1.2.3.4", now),
                Decision::Admitted,
                "request {} should be admitted",
                i + 1
            );
        }
        assert!(matches!(
            rl.check_at("1.2.3.4", now),
            Decision::Limited { .. }
        ));
    }

    #[test]
    fn window_expiry_replaces_entry_with_count_one() {
        let rl = limiter(30, 15_000);
        let start = Instant::now();
        for _ in 0..31 {
            rl.check_at("1.2.3.4", start);
        }
        // Just past the window: admitted again, fresh counter.
        let later = start + Duration::from_millis(15_001);
        assert_eq!(rl.check_at("1.2.3.4", later), Decision::Admitted);
        // A full cap's worth still fits in the new window.
        for _ in 0..29 {
            assert_eq!(rl.check_at("1.2.3.4", later), Decision::Admitted);
        }
        assert!(matches!(
            rl.check_at("1.2.3.4", later),
            Decision::Limited { .. }
        ));
    }

    #[test]
    fn expiry_is_strictly_greater_than_window() {
        let rl = limiter(1, 15_000);
        let start = Instant::now();
        assert_eq!(rl.check_at("a", start), Decision::Admitted);
        // Exactly at the boundary the window is still live.
        let boundary = start + Duration::from_millis(15_000);
        assert!(matches!(rl.check_at("a", boundary), Decision::Limited { .. }));
    }

    #[test]
    fn identifiers_are_isolated() {
        let rl = limiter(30, 15_000);
        let now = Instant::now();
        for _ in 0..30 {
            assert_eq!(rl.check_at("10.0.0.1", now), Decision::Admitted);
            assert_eq!(rl.check_at("10.0.0.2", now), Decision::Admitted);
        }
        assert!(matches!(rl.check_at("10.0.0.1", now), Decision::Limited { .. }));
        assert!(matches!(rl.check_at("10.0.0.2", now), Decision::Limited { .. }));
    }

    #[test]
    fn concurrent_checks_admit_exactly_the_cap() {
        let rl = Arc::new(limiter(30, 15_000));
        let now = Instant::now();
        let mut handles = Vec::new();
        for _ in 0..35 {
            let rl = rl.clone();
            handles.push(std::thread::spawn(move || rl.check_at("9.9.9.9", now)));
        }
        let decisions: Vec<Decision> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let admitted = decisions
            .iter()
            .filter(|d| **d == Decision::Admitted)
            .count();
        assert_eq!(admitted, 30);
        assert_eq!(decisions.len() - admitted, 5);
    }

    #[test]
    fn rejection_keeps_counting() {
        let rl = limiter(2, 15_000);
        let now = Instant::now();
        rl.check_at("a", now);
        rl.check_at("a", now);
        for _ in 0..10 {
            assert!(matches!(rl.check_at("a", now), Decision::Limited { .. }));
        }
    }

    #[test]
    fn retry_after_reports_remaining_window() {
        let rl = limiter(1, 15_000);
        let start = Instant::now();
        rl.check_at("a", start);
        let at = start + Duration::from_millis(5_000);
        match rl.check_at("a", at) {
            Decision::Limited { retry_after } => {
                assert_eq!(retry_after, Duration::from_millis(10_000));
            }
            Decision::Admitted => panic!("expected rejection"),
        }
    }

    #[test]
    fn retry_after_rounds_up_and_floors_at_one() {
        assert_eq!(retry_after_secs(Duration::from_millis(10_000)), 10);
        assert_eq!(retry_after_secs(Duration::from_millis(9_001)), 10);
        assert_eq!(retry_after_secs(Duration::from_millis(1)), 1);
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
    }

    #[test]
    fn sweep_drops_only_expired_entries() {
        let rl = limiter(30, 15_000);
        let start = Instant::now();
        rl.check_at("old", start);
        let later = start + Duration::from_millis(16_000);
        rl.check_at("fresh", later);
        assert_eq!(rl.tracked_identifiers(), 2);
        rl.sweep_at(later);
        assert_eq!(rl.tracked_identifiers(), 1);
    }

    #[test]
    fn path_scope_matches_prefix_only() {
        let rl = limiter(30, 15_000);
        assert!(rl.applies_to("/api/cars"));
        assert!(rl.applies_to("/api/bookings"));
        assert!(!rl.applies_to("/healthz"));
        assert!(!rl.applies_to("/apiary"));
    }
}
