//! Token-bucket rate limiting, sequence anti-replay with a bounded gap,
//! timestamp lag validation, and z-score hit-rate anomaly detection with
//! escalation.
//!
//! ## Per-session
//!
//! - [`SessionLimiter`] — one [`bucket::TokenBucket`] per throttled category
//! - [`SequenceTracker`] — monotonic sequence watermark, bounded gap
//! - [`AnomalyTracker`] — per-weapon z-score, flag count, escalation
//!
//! ## Per-IP
//!
//! - [`IpLimiter`] — handshake/global buckets, sliding-window room ops,
//!   connection cap

pub mod anomaly;
pub mod bucket;
pub mod ip_limiter;
pub mod session_limiter;
pub mod sequence;
pub mod timestamp;

pub use anomaly::{AnomalyTracker, Escalation};
pub use bucket::TokenBucket;
pub use ip_limiter::IpLimiter;
pub use sequence::{SequenceOutcome, SequenceTracker, MAX_SEQ_GAP};
pub use session_limiter::{Admission, SessionLimiter, VIOLATION_BAN_THRESHOLD};
pub use timestamp::{validate_timestamp, TimestampOutcome, CLOCK_FORWARD_BOUND_MS, LAG_BUDGET_MS};
