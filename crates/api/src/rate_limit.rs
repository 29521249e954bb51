//! Fixed-window rate limiting.
//!
//! One limiter per policy, keyed by an arbitrary string (here `"ip:{addr}"`).
//! The first request for a key opens a window; requests inside the window
//! count against the policy and the window resets wholesale when it expires.
//! Reset times are wall-clock because they are reported to callers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

/// A fixed-window policy: at most `max_requests` per `window_secs`.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration in seconds.
    pub window_secs: u64,
}

impl RateLimitPolicy {
    /// Create a new policy.
    #[must_use]
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request counted and allowed.
    Allowed {
        /// Requests left in the current window after this one.
        remaining: u32,
        /// When the current window expires.
        reset_at: DateTime<Utc>,
    },
    /// Request rejected; nothing was counted.
    Limited {
        /// When the current window expires.
        reset_at: DateTime<Utc>,
    },
}

/// Upper bound on a window, one year. `chrono::Duration::seconds` panics
/// far past this, and no sane policy comes close.
const MAX_WINDOW_SECS: i64 = 365 * 24 * 3600;

#[derive(Debug, Clone)]
struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// In-process fixed-window rate limiter.
///
/// Cheap to clone; clones share the same window map.
#[derive(Clone)]
pub struct RateLimiter {
    policy: RateLimitPolicy,
    windows: Arc<RwLock<HashMap<String, Window>>>,
}

impl RateLimiter {
    /// Create a limiter for the given policy.
    #[must_use]
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn window_duration(&self) -> Duration {
        let secs = i64::try_from(self.policy.window_secs)
            .unwrap_or(MAX_WINDOW_SECS)
            .min(MAX_WINDOW_SECS);
        Duration::seconds(secs)
    }

    /// Check and count a request for `key`.
    pub async fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Utc::now()).await
    }

    /// [`check`](Self::check) with an explicit clock.
    pub async fn check_at(&self, key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let mut windows = self.windows.write().await;

        let window = windows.entry(key.to_string()).or_insert_with(|| Window {
            count: 0,
            reset_at: now + self.window_duration(),
        });

        if now >= window.reset_at {
            window.count = 0;
            window.reset_at = now + self.window_duration();
        }

        if window.count >= self.policy.max_requests {
            return RateLimitDecision::Limited {
                reset_at: window.reset_at,
            };
        }

        window.count += 1;
        RateLimitDecision::Allowed {
            remaining: self.policy.max_requests - window.count,
            reset_at: window.reset_at,
        }
    }

    /// Drop windows that have already expired. Called periodically so the
    /// map does not grow with one entry per IP ever seen.
    pub async fn sweep_expired(&self) {
        self.sweep_expired_at(Utc::now()).await;
    }

    /// [`sweep_expired`](Self::sweep_expired) with an explicit clock.
    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) {
        let mut windows = self.windows.write().await;
        windows.retain(|_, window| window.reset_at > now);
    }

    /// Number of tracked keys.
    pub async fn key_count(&self) -> usize {
        self.windows.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_up_to_the_limit_then_rejects() {
        let limiter = RateLimiter::new(RateLimitPolicy::new(3, 3600));
        let now = Utc::now();

        for i in 0..3 {
            match limiter.check_at("ip:203.0.113.1", now).await {
                RateLimitDecision::Allowed { remaining, .. } => {
                    assert_eq!(remaining, 2 - i);
                }
                RateLimitDecision::Limited { .. } => panic!("request {i} should be allowed"),
            }
        }

        match limiter.check_at("ip:203.0.113.1", now).await {
            RateLimitDecision::Limited { reset_at } => {
                assert_eq!(reset_at, now + Duration::seconds(3600));
            }
            RateLimitDecision::Allowed { .. } => panic!("fourth request should be limited"),
        }
    }

    #[tokio::test]
    async fn rejected_requests_are_not_counted() {
        let limiter = RateLimiter::new(RateLimitPolicy::new(1, 3600));
        let now = Utc::now();

        limiter.check_at("k", now).await;
        for _ in 0..5 {
            assert!(matches!(
                limiter.check_at("k", now).await,
                RateLimitDecision::Limited { .. }
            ));
        }

        // A fresh window still honors the full quota.
        let later = now + Duration::seconds(3601);
        assert!(matches!(
            limiter.check_at("k", later).await,
            RateLimitDecision::Allowed { remaining: 0, .. }
        ));
    }

    #[tokio::test]
    async fn window_expiry_resets_the_count() {
        let limiter = RateLimiter::new(RateLimitPolicy::new(2, 60));
        let now = Utc::now();

        limiter.check_at("k", now).await;
        limiter.check_at("k", now).await;
        assert!(matches!(
            limiter.check_at("k", now + Duration::seconds(59)).await,
            RateLimitDecision::Limited { .. }
        ));
        assert!(matches!(
            limiter.check_at("k", now + Duration::seconds(60)).await,
            RateLimitDecision::Allowed { .. }
        ));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let limiter = RateLimiter::new(RateLimitPolicy::new(1, 3600));
        let now = Utc::now();

        limiter.check_at("ip:a", now).await;
        assert!(matches!(
            limiter.check_at("ip:a", now).await,
            RateLimitDecision::Limited { .. }
        ));
        assert!(matches!(
            limiter.check_at("ip:b", now).await,
            RateLimitDecision::Allowed { .. }
        ));
    }

    #[tokio::test]
    async fn oversized_window_is_clamped() {
        let limiter = RateLimiter::new(RateLimitPolicy::new(1, u64::MAX));
        let now = Utc::now();

        match limiter.check_at("k", now).await {
            RateLimitDecision::Allowed { reset_at, .. } => {
                assert_eq!(reset_at, now + Duration::seconds(MAX_WINDOW_SECS));
            }
            RateLimitDecision::Limited { .. } => panic!("first request should be allowed"),
        }
        assert!(matches!(
            limiter.check_at("k", now).await,
            RateLimitDecision::Limited { .. }
        ));
    }

    #[tokio::test]
    async fn sweep_drops_only_expired_windows() {
        let limiter = RateLimiter::new(RateLimitPolicy::new(5, 60));
        let now = Utc::now();

        limiter.check_at("old", now).await;
        limiter.check_at("fresh", now + Duration::seconds(50)).await;
        assert_eq!(limiter.key_count().await, 2);

        limiter.sweep_expired_at(now + Duration::seconds(70)).await;
        assert_eq!(limiter.key_count().await, 1);
    }
}
