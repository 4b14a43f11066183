//! Fixed-tick authoritative simulation: target/projectile lifecycle, swept
//! line-circle collision, seeded spawning, and contribution-based kill
//! attribution.
//!
//! This crate deliberately stops short of calling into `reef-rtp`: a
//! collision only reports a [`HitEvent`], and whether that hit actually
//! pays out is a decision the room controller makes by calling the RTP
//! engine. Hit points are a visual/cooldown signal here, not a proxy for
//! the RTP engine's `killed` flag — see DESIGN.md.
//!
//! ## Core types
//!
//! - [`Simulation`] — owns the tick loop: advance, collide, spawn
//! - [`tick::TickClock`] — fixed 60 Hz step with catch-up cap
//! - [`collision::swept_hit`] — line-circle sweep test
//! - [`attribution::distribute_reward`] — proportional, residue-exact payout split

pub mod attribution;
pub mod collision;
pub mod simulation;
pub mod spawn;
pub mod target;
pub mod tick;

pub use simulation::{HitEvent, RoomBounds, Simulation, SpawnConfig, StepReport, AOE_DISTANCE_SCALE};
pub use target::{ProjectileState, TargetState, Vec2};
