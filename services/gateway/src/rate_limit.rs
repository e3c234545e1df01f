use crate::error::AppError;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

#[derive(Clone)]
struct Bucket {
    capacity: u32,
    tokens: f64,
    refill_rate: f64,
    last_update: Instant,
}

impl Bucket {
    fn new(capacity: u32, refill_rate: f64) -> Self {
        Self {
            capacity,
            tokens: capacity as f64,
            refill_rate,
            last_update: Instant::now(),
        }
    }

    fn allow_request(&mut self, tokens: u32) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        self.tokens = f64::min(
            self.capacity as f64,
            self.tokens + elapsed * self.refill_rate,
        );
        self.last_update = now;

        if self.tokens >= tokens as f64 {
            self.tokens -= tokens as f64;
            true
        } else {
            false
        }
    }
}

/// Per caller and endpoint token buckets
///
/// Buckets live only in this process. Idle ones are dropped by
/// [`RateLimiter::sweep_idle`] so the map stays bounded by active callers.
pub struct RateLimiter {
    buckets: DashMap<String, Bucket>,
    capacity: u32,
    refill_rate: f64,
    idle_ttl: Duration,
}

impl RateLimiter {
    pub fn new(capacity: u32, refill_rate: f64, idle_ttl: Duration) -> Self {
        Self {
            buckets: DashMap::new(),
            capacity,
            refill_rate,
            idle_ttl,
        }
    }

    pub fn check_rate_limit(&self, key: &str) -> Result<(), AppError> {
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| Bucket::new(self.capacity, self.refill_rate));

        if bucket.allow_request(1) {
            Ok(())
        } else {
            Err(AppError::RateLimitExceeded(format!("Rate limit for {}", key)))
        }
    }

    /// Drop buckets untouched for longer than the idle TTL
    pub fn sweep_idle(&self) -> usize {
        let before = self.buckets.len();
        let ttl = self.idle_ttl;
        self.buckets.retain(|_, bucket| bucket.last_update.elapsed() < ttl);
        before.saturating_sub(self.buckets.len())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = limiter.sweep_idle();
                if evicted > 0 {
                    tracing::debug!(evicted, remaining = limiter.len(), "rate limit buckets evicted");
                }
            }
        })
    }
}
