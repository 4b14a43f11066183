use crate::bucket::TokenBucket;
use crate::session_limiter::Admission;
use reef_config::ConnectionLimits;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Per-source-IP throttling: independent `handshake` and `global` buckets,
/// a sliding-window room-op counter, and a hard cap on concurrent
/// connections. One instance is shared by every session from the same IP.
pub struct IpLimiter {
    handshake: TokenBucket,
    global: TokenBucket,
    room_ops: VecDeque<Instant>,
    window: Duration,
    max_room_ops: u32,
    connections: u32,
    max_connections: u32,
}

impl IpLimiter {
    pub fn new(
        handshake: reef_config::BucketConfig,
        global: reef_config::BucketConfig,
        limits: &ConnectionLimits,
        now: Instant,
    ) -> Self {
        Self {
            handshake: TokenBucket::new(handshake, now),
            global: TokenBucket::new(global, now),
            room_ops: VecDeque::new(),
            window: Duration::from_millis(limits.room_ops_window_ms),
            max_room_ops: limits.max_room_ops_per_ip_window,
            connections: 0,
            max_connections: limits.max_connections_per_ip,
        }
    }

    pub fn admit_handshake(&mut self, now: Instant) -> Admission {
        if self.handshake.try_consume(now, 1.0) {
            Admission::Admitted
        } else {
            Admission::RateLimited
        }
    }

    pub fn admit_global(&mut self, now: Instant) -> Admission {
        if self.global.try_consume(now, 1.0) {
            Admission::Admitted
        } else {
            Admission::RateLimited
        }
    }

    /// Trims room-op timestamps outside the sliding window, then admits
    /// one more if the window isn't already at capacity.
    pub fn admit_room_op(&mut self, now: Instant) -> Admission {
        while let Some(&oldest) = self.room_ops.front() {
            if now.saturating_duration_since(oldest) > self.window {
                self.room_ops.pop_front();
            } else {
                break;
            }
        }
        if self.room_ops.len() as u32 >= self.max_room_ops {
            Admission::RateLimited
        } else {
            self.room_ops.push_back(now);
            Admission::Admitted
        }
    }

    /// Accepts a new connection from this IP if under the hard cap.
    pub fn try_connect(&mut self) -> bool {
        if self.connections >= self.max_connections {
            false
        } else {
            self.connections += 1;
            true
        }
    }

    pub fn disconnect(&mut self) {
        self.connections = self.connections.saturating_sub(1);
    }

    pub fn connection_count(&self) -> u32 {
        self.connections
    }
}
