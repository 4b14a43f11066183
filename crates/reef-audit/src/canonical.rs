use reef_config::{FishTable, TierTable, WeaponTable};
use serde::Serialize;

/// The subset of configuration that feeds the rules hash: weapons, fish
/// species, and the tier table. Each table already stores its rows in a
/// `BTreeMap`, so serializing straight through already sorts object keys
/// recursively — the "canonical encoding" the specification calls for.
#[derive(Serialize)]
struct CanonicalConfig<'a> {
    weapons: &'a WeaponTable,
    fish_species: &'a FishTable,
    tier_config: &'a TierTable,
}

/// Stable JSON-like byte encoding of the union of weapons, fish species,
/// and tier config, suitable for hashing into a `rules_hash`.
pub fn canonical_bytes(weapons: &WeaponTable, fish_species: &FishTable, tier_config: &TierTable) -> Vec<u8> {
    let canonical = CanonicalConfig {
        weapons,
        fish_species,
        tier_config,
    };
    serde_json::to_vec(&canonical).expect("config types are always serializable")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_config::{FishSpecies, TierEntry, WeaponEntry};
    use reef_core::Tier;
    use std::collections::BTreeMap;

    fn sample() -> (WeaponTable, FishTable, TierTable) {
        let mut weapons = BTreeMap::new();
        weapons.insert(
            "cannon".to_string(),
            WeaponEntry {
                cost: 1000,
                damage: 10,
                cooldown_ms: 200,
                multiplier: 1,
                rtp: 9000,
                expected_hit_rate: 0.35,
                class: reef_config::WeaponClass::Single,
                splash_radius: 0.0,
            },
        );
        let mut fish = BTreeMap::new();
        fish.insert(
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
        let tiers = TierTable::new([TierEntry {
            rtp_tier_fp: 9000,
            n1_fp: 6000,
            reward_fp: 4500,
            pity_comp_fp: None,
        }; 6]);
        (WeaponTable::new(weapons), FishTable::new(fish), tiers)
    }

    #[test]
    fn encoding_is_deterministic_across_calls() {
        let (weapons, fish, tiers) = sample();
        let a = canonical_bytes(&weapons, &fish, &tiers);
        let b = canonical_bytes(&weapons, &fish, &tiers);
        assert_eq!(a, b);
    }

    #[test]
    fn changing_a_value_changes_the_encoding() {
        let (weapons, fish, tiers) = sample();
        let before = canonical_bytes(&weapons, &fish, &tiers);
        let mut changed_weapons = BTreeMap::new();
        changed_weapons.insert(
            "cannon".to_string(),
            WeaponEntry {
                cost: 2000,
                damage: 10,
                cooldown_ms: 200,
                multiplier: 1,
                rtp: 9000,
                expected_hit_rate: 0.35,
                class: reef_config::WeaponClass::Single,
                splash_radius: 0.0,
            },
        );
        let after = canonical_bytes(&WeaponTable::new(changed_weapons), &fish, &tiers);
        assert_ne!(before, after);
    }
}
