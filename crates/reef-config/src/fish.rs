use reef_core::Tier;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// An optional "special" behavior tag for boss/event fish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialType {
    Freeze,
    Shockwave,
    Multiplier,
}

/// A fish species' combat, kinematic, and spawn-weight parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishSpecies {
    pub id: u32,
    pub tier: Tier,
    pub health: i32,
    pub multiplier: u32,
    pub size: f32,
    pub speed: f32,
    pub spawn_weight: u32,
    #[serde(default)]
    pub is_boss: bool,
    #[serde(default)]
    pub is_special: bool,
    #[serde(default)]
    pub special_type: Option<SpecialType>,
}

/// Fish species table keyed by name, sorted for deterministic iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishTable {
    species: BTreeMap<String, FishSpecies>,
}

impl FishTable {
    pub fn new(species: BTreeMap<String, FishSpecies>) -> Self {
        Self { species }
    }
    pub fn get(&self, name: &str) -> Option<&FishSpecies> {
        self.species.get(name)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FishSpecies)> {
        self.species.iter()
    }
    /// Weighted-random species name, used by the spawn pass (`reef-engine`).
    /// `draw` is expected to be uniform in `[0, total_weight)`.
    pub fn pick_weighted(&self, draw: u64) -> Option<&str> {
        let total: u64 = self.species.values().map(|s| s.spawn_weight as u64).sum();
        if total == 0 {
            return None;
        }
        let mut remaining = draw % total;
        for (name, species) in &self.species {
            let w = species.spawn_weight as u64;
            if remaining < w {
                return Some(name.as_str());
            }
            remaining -= w;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(weight: u32) -> FishSpecies {
        FishSpecies {
            id: 1,
            tier: Tier::new(1),
            health: 100,
            multiplier: 1,
            size: 1.0,
            speed: 1.0,
            spawn_weight: weight,
            is_boss: false,
            is_special: false,
            special_type: None,
        }
    }

    #[test]
    fn weighted_pick_is_deterministic_for_a_given_draw() {
        let mut map = BTreeMap::new();
        map.insert("minnow".to_string(), species(1));
        map.insert("shark".to_string(), species(9));
        let table = FishTable::new(map);
        // first 1/10 of the range goes to "minnow" (sorted key order), rest to "shark"
        assert_eq!(table.pick_weighted(0), Some("minnow"));
        assert_eq!(table.pick_weighted(5), Some("shark"));
    }

    #[test]
    fn weighted_pick_on_empty_table_is_none() {
        let table = FishTable::new(BTreeMap::new());
        assert_eq!(table.pick_weighted(0), None);
    }
}
