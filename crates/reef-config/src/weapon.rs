use reef_core::MoneyFp;
use reef_core::RtpFp;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Which multi-target rule (§4.4) a weapon's fire events resolve under.
/// `Single` never reaches the multi-target allocator's weight computation
/// at all — the room controller still routes it through
/// `compute_weights`/`compute_budget` for a one-candidate list, which
/// degenerates to the single-target formulas exactly (see
/// `reef-rtp::multi`'s `single_candidate_takes_entire_weight` test).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponClass {
    #[default]
    Single,
    /// Area weapon: candidates ordered by distance from the impact point,
    /// capped at `TargetCaps::aoe_max_targets`.
    Aoe,
    /// Beam weapon: candidates ordered by beam index, capped at
    /// `TargetCaps::laser_max_targets`.
    Laser,
}

/// A weapon's cost, damage, cooldown, and RTP parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponEntry {
    pub cost: MoneyFp,
    pub damage: i32,
    pub cooldown_ms: u32,
    pub multiplier: u32,
    pub rtp: RtpFp,
    /// Expected hit rate against a typical target, the `p` the anomaly
    /// detector's z-score test compares observed hit rate against.
    #[serde(default = "default_expected_hit_rate")]
    pub expected_hit_rate: f64,
    /// Which multi-target rule this weapon's fire events resolve under.
    #[serde(default)]
    pub class: WeaponClass,
    /// Splash radius for `Aoe` weapons, in room units; unused otherwise.
    #[serde(default)]
    pub splash_radius: f32,
}

fn default_expected_hit_rate() -> f64 {
    0.35
}

/// Per-weapon-class target caps for multi-target fire events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCaps {
    pub aoe_max_targets: usize,
    pub laser_max_targets: usize,
}

/// Weapon table keyed by weapon name, sorted for deterministic iteration
/// (feeds canonical config hashing in `reef-audit`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponTable {
    weapons: BTreeMap<String, WeaponEntry>,
}

impl WeaponTable {
    pub fn new(weapons: BTreeMap<String, WeaponEntry>) -> Self {
        Self { weapons }
    }
    pub fn get(&self, key: &str) -> Option<&WeaponEntry> {
        self.weapons.get(key)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&String, &WeaponEntry)> {
        self.weapons.iter()
    }
}
