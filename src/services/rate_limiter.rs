//! Keyed request throttle.
//!
//! An explicitly owned token-bucket limiter keyed by caller identity (an IP
//! address, a provider id). Idle keys are dropped by a background cleanup
//! task that lives between `start` and `stop`.

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::models::RateLimitConfig;

/// Keyed token-bucket throttle with an explicit cleanup lifecycle.
pub struct RequestThrottle {
    limiter: Arc<DefaultKeyedRateLimiter<String>>,
    cleanup_interval: Duration,
    cleanup_task: Mutex<Option<JoinHandle<()>>>,
}

impl RequestThrottle {
    pub fn new(config: &RateLimitConfig) -> Self {
        let per_minute = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_minute(per_minute).allow_burst(burst);

        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            cleanup_interval: Duration::from_secs(config.cleanup_interval_secs.max(1)),
            cleanup_task: Mutex::new(None),
        }
    }

    /// Consume one request for `key`. Returns `false` when the key is over quota.
    pub fn check(&self, key: &str) -> bool {
        let allowed = self.limiter.check_key(&key.to_string()).is_ok();
        if !allowed {
            debug!(key, "request throttled");
        }
        allowed
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.limiter.len()
    }

    /// Drop keys whose buckets have fully refilled.
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Spawn the periodic cleanup task. Calling `start` twice is a no-op.
    pub fn start(&self) {
        let Ok(mut slot) = self.cleanup_task.lock() else {
            warn!("throttle cleanup slot poisoned; cleanup not started");
            return;
        };
        if slot.is_some() {
            return;
        }

        let limiter = Arc::clone(&self.limiter);
        let interval = self.cleanup_interval;
        *slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                limiter.retain_recent();
                limiter.shrink_to_fit();
                debug!(keys = limiter.len(), "throttle cleanup");
            }
        }));
    }

    /// Stop the cleanup task.
    pub fn stop(&self) {
        if let Ok(mut slot) = self.cleanup_task.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.cleanup_task
            .lock()
            .map(|slot| slot.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }
}

impl Drop for RequestThrottle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(burst: u32) -> RateLimitConfig {
        RateLimitConfig {
            requests_per_minute: 1,
            burst_size: burst,
            cleanup_interval_secs: 60,
        }
    }

    #[test]
    fn test_burst_then_throttled() {
        let throttle = RequestThrottle::new(&config(2));
        assert!(throttle.check("10.0.0.1"));
        assert!(throttle.check("10.0.0.1"));
        assert!(!throttle.check("10.0.0.1"));
    }

    #[test]
    fn test_keys_are_independent() {
        let throttle = RequestThrottle::new(&config(1));
        assert!(throttle.check("a"));
        assert!(!throttle.check("a"));
        assert!(throttle.check("b"));
        assert_eq!(throttle.tracked_keys(), 2);
    }

    #[test]
    fn test_zero_quota_clamped() {
        let throttle = RequestThrottle::new(&RateLimitConfig {
            requests_per_minute: 0,
            burst_size: 0,
            cleanup_interval_secs: 0,
        });
        assert!(throttle.check("a"));
    }

    #[tokio::test]
    async fn test_start_stop_lifecycle() {
        let throttle = RequestThrottle::new(&config(1));
        assert!(!throttle.is_running());

        throttle.start();
        throttle.start();
        assert!(throttle.is_running());

        throttle.stop();
        tokio::task::yield_now().await;
        assert!(!throttle.is_running());
    }
}
