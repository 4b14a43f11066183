use std::time::Instant;

/// Lazy-refill token bucket: capacity and refill rate come straight from
/// [`reef_config::BucketConfig`]. Refill only happens on `try_consume`, so
/// an idle bucket costs nothing between requests.
#[derive(Debug, Clone, Copy)]
pub struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(config: reef_config::BucketConfig, now: Instant) -> Self {
        Self {
            capacity: config.capacity,
            refill_per_sec: config.refill_per_sec,
            tokens: config.capacity,
            last_refill: now,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;
    }

    /// Refills, then tries to spend one token's worth of cost. Returns
    /// `true` and deducts on success; `false` and leaves the bucket
    /// untouched on exhaustion.
    pub fn try_consume(&mut self, now: Instant, cost: f64) -> bool {
        self.refill(now);
        if self.tokens >= cost {
            self.tokens -= cost;
            true
        } else {
            false
        }
    }

    pub fn tokens(&self) -> f64 {
        self.tokens
    }
}
