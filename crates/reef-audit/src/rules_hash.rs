use crate::canonical::canonical_bytes;
use reef_config::GameConfig;
use sha2::{Digest, Sha256};

/// SHA-256 of the canonicalized, sorted union of weapons, fish species,
/// and tier config.
pub fn rules_hash(config: &GameConfig) -> [u8; 32] {
    let bytes = canonical_bytes(&config.weapons, &config.fish_species, &config.tier_config);
    Sha256::digest(bytes).into()
}

/// Tracks the current `rules_hash` and auto-increments `rules_version`
/// whenever a config mutation changes the hash. Starts at version 1 for
/// the config it was constructed with.
pub struct RulesRegistry {
    hash: [u8; 32],
    version: u32,
}

impl RulesRegistry {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            hash: rules_hash(config),
            version: 1,
        }
    }

    pub fn hash(&self) -> [u8; 32] {
        self.hash
    }
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Recomputes the hash for `config`; if it differs from the current
    /// one, bumps the version and adopts the new hash. Returns whether the
    /// version changed.
    pub fn refresh(&mut self, config: &GameConfig) -> bool {
        let new_hash = rules_hash(config);
        if new_hash != self.hash {
            self.hash = new_hash;
            self.version += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_config::{BucketConfig, ConnectionLimits, FishSpecies, FishTable, RateLimitConfig, TargetCaps, TierEntry, TierTable, WeaponEntry, WeaponTable};
    use reef_core::Tier;
    use std::collections::BTreeMap;

    fn bucket() -> BucketConfig {
        BucketConfig {
            capacity: 10.0,
            refill_per_sec: 1.0,
        }
    }

    fn config(weapon_cost: i64) -> GameConfig {
        let mut weapons = BTreeMap::new();
        weapons.insert(
            "cannon".to_string(),
            WeaponEntry {
                cost: weapon_cost,
                damage: 10,
                cooldown_ms: 200,
                multiplier: 1,
                rtp: 9000,
                expected_hit_rate: 0.35,
                class: reef_config::WeaponClass::Single,
                splash_radius: 0.0,
            },
        );
        let mut species = BTreeMap::new();
        species.insert(
            "minnow".to_string(),
            FishSpecies {
                id: 1,
                tier: Tier::new(1),
                health: 100,
                multiplier: 1,
                size: 1.0,
                speed: 1.0,
                spawn_weight: 10,
                is_boss: false,
                is_special: false,
                special_type: None,
            },
        );
        GameConfig {
            tier_config: TierTable::new([TierEntry {
                rtp_tier_fp: 9000,
                n1_fp: 6000,
                reward_fp: 4500,
                pity_comp_fp: None,
            }; 6]),
            weapons: WeaponTable::new(weapons),
            target_caps: TargetCaps {
                aoe_max_targets: 8,
                laser_max_targets: 6,
            },
            fish_species: FishTable::new(species),
            rate_limits: RateLimitConfig {
                shoot: bucket(),
                movement: bucket(),
                room_action: bucket(),
                weapon_switch: bucket(),
                time_sync: bucket(),
                state_request: bucket(),
                handshake: bucket(),
                global: bucket(),
            },
            connection_limits: ConnectionLimits {
                max_connections_per_ip: 4,
                room_ops_window_ms: 1000,
                max_room_ops_per_ip_window: 10,
                bucket_expiry_ms: 60_000,
            },
            sigma_threshold: 3.0,
            min_shots_for_detection: 50,
            cooldown_duration_ms: 10_000,
            smoothing_k_fp: 1_200,
        }
    }

    #[test]
    fn identical_configs_hash_identically() {
        assert_eq!(rules_hash(&config(1000)), rules_hash(&config(1000)));
    }

    #[test]
    fn changed_config_hashes_differently() {
        assert_ne!(rules_hash(&config(1000)), rules_hash(&config(2000)));
    }

    #[test]
    fn registry_bumps_version_only_on_change() {
        let mut registry = RulesRegistry::new(&config(1000));
        assert_eq!(registry.version(), 1);
        assert!(!registry.refresh(&config(1000)));
        assert_eq!(registry.version(), 1);
        assert!(registry.refresh(&config(2000)));
        assert_eq!(registry.version(), 2);
    }
}
