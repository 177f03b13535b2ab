//! Request pacing for the INSPIRE API.
//!
//! INSPIRE allows 15 requests per 5 seconds per IP and answers 429 beyond that.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Default pace: 3 requests per second, i.e. the documented 15 per 5 s.
pub const DEFAULT_REQUESTS_PER_SECOND: f64 = 3.0;

/// Enforces a minimum interval between requests.
///
/// Also remembers a server-imposed pause (from a 429 `Retry-After`) and waits it
/// out before the next request.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

#[derive(Debug)]
struct RateLimiterInner {
    /// Maximum requests per second.
    max_per_second: f64,
    /// Time of the last request.
    last_request: Option<Instant>,
    /// No request may start before this instant.
    blocked_until: Option<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given maximum requests per second.
    pub fn new(max_per_second: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                max_per_second,
                last_request: None,
                blocked_until: None,
            })),
        }
    }

    /// Wait until a request is allowed, then mark it as sent.
    pub async fn acquire(&self) {
        let mut inner = self.inner.lock().await;

        if let Some(until) = inner.blocked_until.take() {
            let now = Instant::now();
            if now < until {
                drop(inner);
                tokio::time::sleep(until - now).await;
                inner = self.inner.lock().await;
            }
        }

        if let Some(last) = inner.last_request {
            let min_interval = Duration::from_secs_f64(1.0 / inner.max_per_second);
            let elapsed = last.elapsed();
            if elapsed < min_interval {
                let wait = min_interval - elapsed;
                drop(inner);
                tokio::time::sleep(wait).await;
                inner = self.inner.lock().await;
            }
        }

        inner.last_request = Some(Instant::now());
    }

    /// Hold back the next request for `wait` (server asked us to slow down).
    pub async fn pause_for(&self, wait: Duration) {
        let mut inner = self.inner.lock().await;
        let until = Instant::now() + wait;
        inner.blocked_until = Some(match inner.blocked_until {
            Some(existing) if existing > until => existing,
            _ => until,
        });
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTS_PER_SECOND)
    }
}
