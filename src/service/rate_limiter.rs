//! Per-source-IP request throttle.
//!
//! The limiter enforces a minimum inter-arrival gap of
//! `window / max_per_window` between accepted requests from the same key,
//! tracked as a single "last accepted" timestamp per key. With the default
//! 60-second window and budget of 5 this means one request per 12 seconds.
//! This is deliberately NOT a sliding-window counter, so a burst of 5
//! instant requests is not what gets enforced. The documented "5 per
//! minute" intent and this gap check diverge; the gap semantics are kept
//! on purpose (see DESIGN.md).

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Shared per-key throttle with minimum-inter-arrival-gap semantics.
///
/// One instance is owned by the application state and injected wherever a
/// throttle decision is needed; there is no process-global map. Key
/// cardinality is unbounded; eviction is a known improvement, skipped for
/// behavioral parity with the original gateway.
#[derive(Debug)]
pub struct RateLimiter {
    min_gap: Duration,
    last_accepted: Mutex<HashMap<String, Instant>>,
}

impl RateLimiter {
    /// Creates a limiter enforcing `window / max_per_window` between
    /// accepted requests per key. A zero budget is treated as 1.
    #[must_use]
    pub fn new(window: Duration, max_per_window: u32) -> Self {
        Self {
            min_gap: window / max_per_window.max(1),
            last_accepted: Mutex::new(HashMap::new()),
        }
    }

    /// Decides whether a request from `key` is allowed right now.
    ///
    /// On allow, the key's last-accepted timestamp is updated; on reject
    /// it is left untouched. A key never seen before is always allowed.
    /// Never errors.
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    /// Clock-explicit variant of [`RateLimiter::allow`], used by tests.
    pub(crate) fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut map = match self.last_accepted.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(last) = map.get(key)
            && now.saturating_duration_since(*last) < self.min_gap
        {
            return false;
        }

        map.insert(key.to_string(), now);
        true
    }

    /// The enforced minimum gap between accepted requests per key.
    #[must_use]
    pub const fn min_gap(&self) -> Duration {
        self.min_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> RateLimiter {
        // 60s window, 5 requests -> 12s minimum gap.
        RateLimiter::new(Duration::from_secs(60), 5)
    }

    #[test]
    fn gap_is_window_over_budget() {
        assert_eq!(limiter().min_gap(), Duration::from_secs(12));
    }

    #[test]
    fn unknown_key_is_allowed() {
        let limiter = limiter();
        assert!(limiter.allow("203.0.113.1"));
    }

    #[test]
    fn second_request_inside_gap_is_rejected() {
        let limiter = limiter();
        let start = Instant::now();
        assert!(limiter.allow_at("ip", start));
        assert!(!limiter.allow_at("ip", start + Duration::from_secs(11)));
    }

    #[test]
    fn second_request_past_gap_is_allowed() {
        let limiter = limiter();
        let start = Instant::now();
        assert!(limiter.allow_at("ip", start));
        assert!(limiter.allow_at("ip", start + Duration::from_secs(13)));
    }

    #[test]
    fn rejection_does_not_reset_the_clock() {
        let limiter = limiter();
        let start = Instant::now();
        assert!(limiter.allow_at("ip", start));

        // Rejected probes at 6s and 11s must not push the window out:
        // 13s after the ACCEPTED request is still allowed.
        assert!(!limiter.allow_at("ip", start + Duration::from_secs(6)));
        assert!(!limiter.allow_at("ip", start + Duration::from_secs(11)));
        assert!(limiter.allow_at("ip", start + Duration::from_secs(13)));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = limiter();
        let start = Instant::now();
        assert!(limiter.allow_at("a", start));
        assert!(limiter.allow_at("b", start));
        assert!(!limiter.allow_at("a", start + Duration::from_secs(1)));
        assert!(!limiter.allow_at("b", start + Duration::from_secs(1)));
    }

    #[test]
    fn zero_budget_does_not_divide_by_zero() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 0);
        assert_eq!(limiter.min_gap(), Duration::from_secs(60));
    }
}
