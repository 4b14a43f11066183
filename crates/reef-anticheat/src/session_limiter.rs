use crate::bucket::TokenBucket;
use reef_config::{BucketCategory, RateLimitConfig};
use std::time::Instant;

/// Violation count at which a session's subsequent admission checks start
/// returning [`Admission::Banned`] regardless of remaining tokens. Not
/// fixed by the specification; chosen so a session can trip several
/// different buckets before the ban takes effect, and recorded here as an
/// explicit constant rather than folded into a magic number.
pub const VIOLATION_BAN_THRESHOLD: u32 = 10;

/// Outcome of one rate-limit admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    RateLimited,
    Banned,
}

/// Per-session bucket set: one [`TokenBucket`] per throttled category, plus
/// the violation counter that escalates to a ban. Only the connection's
/// own task ever mutates this, per §5's single-writer rule.
pub struct SessionLimiter {
    buckets: [TokenBucket; 8],
    violations: u32,
    banned: bool,
}

impl SessionLimiter {
    pub fn new(config: &RateLimitConfig, now: Instant) -> Self {
        let buckets = BucketCategory::ALL.map(|c| TokenBucket::new(config.get(c), now));
        Self {
            buckets,
            violations: 0,
            banned: false,
        }
    }

    fn bucket_mut(&mut self, category: BucketCategory) -> &mut TokenBucket {
        let index = BucketCategory::ALL
            .iter()
            .position(|&c| c == category)
            .expect("BucketCategory::ALL is exhaustive");
        &mut self.buckets[index]
    }

    pub fn violations(&self) -> u32 {
        self.violations
    }
    pub fn is_banned(&self) -> bool {
        self.banned
    }

    /// Admits one request against `category`'s bucket. A banned session
    /// short-circuits without touching any bucket; the caller must
    /// terminate the connection on [`Admission::Banned`].
    pub fn admit(&mut self, category: BucketCategory, now: Instant) -> Admission {
        if self.banned {
            return Admission::Banned;
        }
        if self.bucket_mut(category).try_consume(now, 1.0) {
            Admission::Admitted
        } else {
            self.violations += 1;
            if self.violations >= VIOLATION_BAN_THRESHOLD {
                self.banned = true;
                Admission::Banned
            } else {
                Admission::RateLimited
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RateLimitConfig {
        let bucket = reef_config::BucketConfig {
            capacity: 2.0,
            refill_per_sec: 0.0,
        };
        RateLimitConfig {
            shoot: bucket,
            movement: bucket,
            room_action: bucket,
            weapon_switch: bucket,
            time_sync: bucket,
            state_request: bucket,
            handshake: bucket,
            global: bucket,
        }
    }

    #[test]
    fn admits_until_bucket_exhausted_then_rate_limits() {
        let now = Instant::now();
        let mut limiter = SessionLimiter::new(&config(), now);
        assert_eq!(limiter.admit(BucketCategory::Shoot, now), Admission::Admitted);
        assert_eq!(limiter.admit(BucketCategory::Shoot, now), Admission::Admitted);
        assert_eq!(limiter.admit(BucketCategory::Shoot, now), Admission::RateLimited);
        assert_eq!(limiter.violations(), 1);
    }

    #[test]
    fn bans_after_threshold_violations_and_stays_banned() {
        let now = Instant::now();
        let mut limiter = SessionLimiter::new(&config(), now);
        limiter.admit(BucketCategory::Shoot, now);
        limiter.admit(BucketCategory::Shoot, now);
        let mut last = Admission::Admitted;
        for _ in 0..VIOLATION_BAN_THRESHOLD {
            last = limiter.admit(BucketCategory::Shoot, now);
        }
        assert_eq!(last, Admission::Banned);
        assert!(limiter.is_banned());
        assert_eq!(limiter.admit(BucketCategory::Movement, now), Admission::Banned);
    }

    #[test]
    fn categories_are_independent() {
        let now = Instant::now();
        let mut limiter = SessionLimiter::new(&config(), now);
        limiter.admit(BucketCategory::Shoot, now);
        limiter.admit(BucketCategory::Shoot, now);
        assert_eq!(
            limiter.admit(BucketCategory::Movement, now),
            Admission::Admitted
        );
    }
}
