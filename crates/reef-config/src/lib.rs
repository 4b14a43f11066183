//! Fixed-point configuration: single source of truth for per-tier RTP,
//! weapon/fish tables, and rate-limit parameters.
//!
//! This crate does not load files or environment variables — Non-goal per
//! the system specification; it only validates an already-constructed
//! [`GameConfig`] value.
//!
//! ## Core Types
//!
//! - [`TierTable`] / [`TierEntry`] — per-tier RTP, pity, reward
//! - [`WeaponTable`] / [`WeaponEntry`] — per-weapon cost, damage, RTP
//! - [`FishTable`] / [`FishSpecies`] — spawn-weighted species table
//! - [`RateLimitConfig`] / [`ConnectionLimits`] — throttling parameters
//! - [`GameConfig`] — the aggregate, validated configuration object

mod fish;
mod rate_limit;
mod tier;
mod weapon;

pub use fish::*;
pub use rate_limit::*;
pub use tier::*;
pub use weapon::*;

use serde::Deserialize;
use serde::Serialize;

/// Default smoothing factor `K` applied to the soft-roll probability.
///
/// Treated as tier-independent per the specification's open question;
/// implementers must set this explicitly — it is not guessed, it is a
/// first-class config field with this value as the documented default.
pub const DEFAULT_SMOOTHING_K_FP: i64 = 1_200; // K = 1.2, scaled by 1000

/// Errors raised validating a [`GameConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyWeaponTable,
    EmptyFishTable,
    ZeroTargetCap,
    ZeroRefillRate(BucketCategory),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWeaponTable => write!(f, "weapon table must not be empty"),
            Self::EmptyFishTable => write!(f, "fish species table must not be empty"),
            Self::ZeroTargetCap => write!(f, "aoe/laser max targets must be positive"),
            Self::ZeroRefillRate(c) => write!(f, "bucket category {:?} has zero refill rate", c),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The aggregate, validated configuration object described in the
/// specification's external-interfaces section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub tier_config: TierTable,
    pub weapons: WeaponTable,
    pub target_caps: TargetCaps,
    pub fish_species: FishTable,
    pub rate_limits: RateLimitConfig,
    pub connection_limits: ConnectionLimits,
    #[serde(default = "default_sigma_threshold")]
    pub sigma_threshold: f64,
    #[serde(default = "default_min_shots")]
    pub min_shots_for_detection: u32,
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_duration_ms: u64,
    #[serde(default = "default_smoothing_k")]
    pub smoothing_k_fp: i64,
}

fn default_sigma_threshold() -> f64 {
    3.0
}
fn default_min_shots() -> u32 {
    50
}
fn default_cooldown_ms() -> u64 {
    10_000
}
fn default_smoothing_k() -> i64 {
    DEFAULT_SMOOTHING_K_FP
}

impl GameConfig {
    /// Validates structural invariants the rest of the workspace assumes
    /// hold: non-empty tables, positive caps, non-zero refill rates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weapons.iter().next().is_none() {
            return Err(ConfigError::EmptyWeaponTable);
        }
        if self.fish_species.iter().next().is_none() {
            return Err(ConfigError::EmptyFishTable);
        }
        if self.target_caps.aoe_max_targets == 0 || self.target_caps.laser_max_targets == 0 {
            return Err(ConfigError::ZeroTargetCap);
        }
        for category in BucketCategory::ALL {
            if self.rate_limits.get(category).refill_per_sec <= 0.0 {
                return Err(ConfigError::ZeroRefillRate(category));
            }
        }
        Ok(())
    }
}
