use crate::target::{TargetState, Vec2};
use rand::Rng;
use reef_config::{FishSpecies, FishTable};
use reef_core::Tier;
use std::collections::HashMap;

/// Which border of the room a target enters from or exits towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

const EDGES: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

fn random_edge(rng: &mut impl Rng) -> Edge {
    EDGES[rng.random_range(0..EDGES.len())]
}

fn point_on_edge(edge: Edge, half_width: f32, half_height: f32, rng: &mut impl Rng) -> Vec2 {
    match edge {
        Edge::Top => Vec2 {
            x: rng.random_range(-half_width..half_width),
            z: -half_height,
        },
        Edge::Bottom => Vec2 {
            x: rng.random_range(-half_width..half_width),
            z: half_height,
        },
        Edge::Left => Vec2 {
            x: -half_width,
            z: rng.random_range(-half_height..half_height),
        },
        Edge::Right => Vec2 {
            x: half_width,
            z: rng.random_range(-half_height..half_height),
        },
    }
}

fn velocity_towards(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    let len = (dx * dx + dz * dz).sqrt();
    if len < f32::EPSILON {
        return Vec2::ZERO;
    }
    Vec2 {
        x: dx / len * speed,
        z: dz / len * speed,
    }
}

/// A freshly spawned target's kinematic and combat parameters, derived
/// from a weighted-random species pick over the fish table.
pub struct SpawnedTarget {
    pub species_name: String,
    pub species: FishSpecies,
    pub state: TargetState,
}

/// Picks a species by spawn weight, an entry edge and a distinct
/// destination edge, and computes a velocity vector scaled by
/// `global_speed_scale * species.speed`. Deterministic given the RNG
/// stream, matching the room-seeded PRNG requirement in §4.5.3.
pub fn spawn_target(
    rng: &mut impl Rng,
    fish: &FishTable,
    half_width: f32,
    half_height: f32,
    global_speed_scale: f32,
) -> Option<SpawnedTarget> {
    let draw: u64 = rng.random();
    let species_name = fish.pick_weighted(draw)?.to_string();
    let species = fish.get(&species_name)?.clone();

    let entry = random_edge(rng);
    let mut destination = random_edge(rng);
    while destination == entry {
        destination = random_edge(rng);
    }

    let entry_point = point_on_edge(entry, half_width, half_height, rng);
    let destination_point = point_on_edge(destination, half_width, half_height, rng);
    let speed = global_speed_scale * species.speed;
    let velocity = velocity_towards(entry_point, destination_point, speed);

    let state = TargetState {
        species_id: species.id,
        tier: species.tier,
        prev_pos: entry_point,
        cur_pos: entry_point,
        velocity,
        hp: species.health,
        max_hp: species.health,
        size_scale: species.size,
        damage_by_player: HashMap::new(),
        last_hit_by: None,
        rotation: velocity.z.atan2(velocity.x),
    };

    Some(SpawnedTarget {
        species_name,
        species,
        state,
    })
}

/// Convenience used by property tests and multi-target candidate setup:
/// the tier a spawned target resolves to, re-exposed without requiring the
/// whole `SpawnedTarget`.
pub fn tier_of(spawned: &SpawnedTarget) -> Tier {
    spawned.species.tier
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::BTreeMap;

    fn fish_table() -> FishTable {
        let mut species = BTreeMap::new();
        species.insert(
            "minnow".to_string(),
            FishSpecies {
                id: 1,
                tier: Tier::new(1),
                health: 100,
                multiplier: 1,
                size: 1.0,
                speed: 2.0,
                spawn_weight: 1,
                is_boss: false,
                is_special: false,
                special_type: None,
            },
        );
        FishTable::new(species)
    }

    #[test]
    fn spawned_target_starts_within_bounds() {
        let table = fish_table();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let spawned = spawn_target(&mut rng, &table, 100.0, 60.0, 1.0).unwrap();
        assert!(spawned.state.cur_pos.x.abs() <= 100.0 + f32::EPSILON);
        assert!(spawned.state.cur_pos.z.abs() <= 60.0 + f32::EPSILON);
        assert_eq!(spawned.state.hp, 100);
        assert_eq!(spawned.state.max_hp, 100);
    }

    #[test]
    fn deterministic_given_same_seed() {
        let table = fish_table();
        let mut rng_a = ChaCha20Rng::seed_from_u64(7);
        let mut rng_b = ChaCha20Rng::seed_from_u64(7);
        let a = spawn_target(&mut rng_a, &table, 50.0, 50.0, 1.0).unwrap();
        let b = spawn_target(&mut rng_b, &table, 50.0, 50.0, 1.0).unwrap();
        assert_eq!(a.state.cur_pos, b.state.cur_pos);
        assert_eq!(a.state.velocity, b.state.velocity);
    }

    #[test]
    fn empty_fish_table_yields_no_spawn() {
        let table = FishTable::new(BTreeMap::new());
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(spawn_target(&mut rng, &table, 50.0, 50.0, 1.0).is_none());
    }
}
