use crate::core::ports::limiter::{Limit, RateLimiter};
use crate::error::Error;
use dashmap::DashMap;
use log::{debug, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Checks between two sweeps of idle keys.
const SWEEP_EVERY: usize = 1024;

#[derive(Default)]
struct Bucket {
    window: Duration,
    hits: Vec<Instant>,
}

impl Bucket {
    fn expire(&mut self, now: Instant) {
        let window = self.window;
        self.hits.retain(|t| now.duration_since(*t) < window);
    }
}

/// In-memory sliding window keyed by `action:identity`. Single-instance only.
#[derive(Default)]
pub struct SlidingWindow {
    requests: DashMap<String, Bucket>,
    checks: AtomicUsize,
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_at(&self, action: &str, identity: &str, limit: Limit, now: Instant) -> Result<(), Error> {
        let outcome = self.record(action, identity, limit, now);
        if (self.checks.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_EVERY == 0 {
            self.cleanup_old_entries(now);
        }
        outcome
    }

    fn record(&self, action: &str, identity: &str, limit: Limit, now: Instant) -> Result<(), Error> {
        let key = format!("{}:{}", action, identity);
        let mut bucket = self.requests.entry(key).or_default();
        bucket.window = limit.window;
        bucket.expire(now);
        if bucket.hits.len() >= limit.max_requests {
            let elapsed = bucket.hits.first().map_or(Duration::ZERO, |oldest| now.duration_since(*oldest));
            let retry_after = limit.window.saturating_sub(elapsed).as_secs() + 1;
            warn!("rate limit hit for {} by {}", action, identity);
            return Err(Error::RateLimited { retry_after });
        }
        bucket.hits.push(now);
        Ok(())
    }

    /// Drops keys with no request left inside their window.
    pub fn cleanup_old_entries(&self, now: Instant) {
        let before = self.requests.len();
        self.requests.retain(|_, bucket| {
            bucket.expire(now);
            !bucket.hits.is_empty()
        });
        debug!("rate limiter sweep kept {} of {} keys", self.requests.len(), before);
    }
}

impl RateLimiter for SlidingWindow {
    fn check(&self, action: &str, identity: &str, limit: Limit) -> Result<(), Error> {
        self.check_at(action, identity, limit, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn blocks_after_limit() {
        let limiter = SlidingWindow::new();
        let limit = Limit::per_minute(2);
        assert!(limiter.check("export", "1.1.1.1", limit).is_ok());
        assert!(limiter.check("export", "1.1.1.1", limit).is_ok());
        let err = limiter.check("export", "1.1.1.1", limit).unwrap_err();
        assert!(matches!(err, Error::RateLimited { retry_after } if retry_after > 0 && retry_after <= 61));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = SlidingWindow::new();
        let limit = Limit::per_minute(1);
        assert!(limiter.check("export", "1.1.1.1", limit).is_ok());
        assert!(limiter.check("export", "2.2.2.2", limit).is_ok());
        assert!(limiter.check("submit", "1.1.1.1", limit).is_ok());
    }

    #[test]
    fn window_slides() {
        let limiter = SlidingWindow::new();
        let limit = Limit {
            max_requests: 1,
            window: Duration::from_secs(10),
        };
        let start = Instant::now();
        assert!(limiter.check_at("submit", "a", limit, start).is_ok());
        assert!(limiter.check_at("submit", "a", limit, start + Duration::from_secs(5)).is_err());
        assert!(limiter.check_at("submit", "a", limit, start + Duration::from_secs(11)).is_ok());
    }

    #[test]
    fn zero_limit_blocks_without_panicking() {
        let limiter = SlidingWindow::new();
        let err = limiter.check("export", "1.1.1.1", Limit::per_minute(0)).unwrap_err();
        assert!(matches!(err, Error::RateLimited { retry_after: 61 }));
        assert!(limiter.check("export", "1.1.1.1", Limit::per_minute(0)).is_err());
    }

    #[test]
    fn idle_keys_are_swept() {
        let limiter = SlidingWindow::new();
        let limit = Limit {
            max_requests: 5,
            window: Duration::from_millis(1),
        };
        let start = Instant::now();
        for i in 0..SWEEP_EVERY - 1 {
            limiter.check_at("submit", &format!("10.1.{}.{}", i / 256, i % 256), limit, start).unwrap();
        }
        assert_eq!(limiter.requests.len(), SWEEP_EVERY - 1);
        limiter.check_at("submit", "10.9.9.9", limit, start + Duration::from_millis(20)).unwrap();
        assert_eq!(limiter.requests.len(), 1);
    }

    #[test]
    fn sweep_respects_each_keys_window() {
        let limiter = SlidingWindow::new();
        let start = Instant::now();
        limiter.check_at("export", "a", Limit::per_minute(5), start).unwrap();
        limiter
            .check_at(
                "submit",
                "a",
                Limit {
                    max_requests: 5,
                    window: Duration::from_secs(1),
                },
                start,
            )
            .unwrap();
        limiter.cleanup_old_entries(start + Duration::from_secs(30));
        assert_eq!(limiter.requests.len(), 1);
        assert!(limiter.requests.contains_key("export:a"));
    }
}
