use crate::collision::swept_hit;
use crate::spawn::spawn_target;
use crate::target::{ProjectileState, TargetState, Vec2};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use reef_config::{FishTable, WeaponClass};
use reef_core::{ProjectileId, Tier, TargetId};
use std::collections::HashMap;

/// Scale applied to an `Aoe` hit's raw float distance before it is carried
/// as the integer `HitEvent::distance_or_index` the weight allocator reads.
pub const AOE_DISTANCE_SCALE: f32 = 100.0;

/// Half-extents of the room's playing field, plus the margin a target may
/// drift past the edge before it is despawned (projectiles use a tighter,
/// margin-free bound since they're expected to die at the wall).
#[derive(Debug, Clone, Copy)]
pub struct RoomBounds {
    pub half_width: f32,
    pub half_height: f32,
    pub target_margin: f32,
}

/// Spawn-pass parameters: target cap, cadence (in ticks), global speed
/// scale applied on top of each species' own speed, and the base hit
/// radius combined with a target's `size_scale` during collision.
#[derive(Debug, Clone, Copy)]
pub struct SpawnConfig {
    pub max_targets: usize,
    pub spawn_interval_ticks: u64,
    pub global_speed_scale: f32,
    pub base_radius: f32,
}

/// One confirmed projectile-target collision this tick. `hp_after` is
/// reported for telemetry/snapshot purposes only — whether the target is
/// actually removed is the room controller's decision once it has asked
/// the RTP engine whether this hit pays out.
///
/// `weapon_class`/`distance_or_index` carry the ordering a multi-target
/// fire event needs for `reef-rtp::multi::compute_weights`: all `HitEvent`s
/// sharing a `bullet_id` are one event, already capped and ordered by the
/// bullet's weapon class (AOE: distance from the primary impact point
/// ascending; laser: beam index ascending) — the room controller needs
/// only group by `bullet_id` and feed them to the allocator in order.
#[derive(Debug, Clone, Copy)]
pub struct HitEvent {
    pub target_id: TargetId,
    pub bullet_id: ProjectileId,
    pub owner: reef_core::PlayerId,
    pub damage: i32,
    pub target_tier: Tier,
    pub hp_after: i32,
    pub weapon_class: WeaponClass,
    pub distance_or_index: u32,
}

/// Everything that happened during one [`Simulation::step`] call.
#[derive(Debug, Default)]
pub struct StepReport {
    pub hits: Vec<HitEvent>,
    pub expired_projectiles: Vec<ProjectileId>,
    pub despawned_targets: Vec<TargetId>,
    pub spawned_targets: Vec<TargetId>,
}

/// Owns one room's live targets and projectiles and advances them one
/// fixed tick at a time: kinematics, swept collision, then the spawn pass.
/// Seeded at construction so spawn outcomes replay deterministically given
/// the same room seed, per §5's reproducibility requirement.
pub struct Simulation {
    targets: HashMap<TargetId, TargetState>,
    projectiles: HashMap<ProjectileId, ProjectileState>,
    rng: ChaCha20Rng,
    bounds: RoomBounds,
    spawn: SpawnConfig,
    ticks_since_spawn: u64,
}

impl Simulation {
    pub fn new(seed: u64, bounds: RoomBounds, spawn: SpawnConfig) -> Self {
        Self {
            targets: HashMap::new(),
            projectiles: HashMap::new(),
            rng: ChaCha20Rng::seed_from_u64(seed),
            bounds,
            spawn,
            ticks_since_spawn: 0,
        }
    }

    pub fn targets(&self) -> &HashMap<TargetId, TargetState> {
        &self.targets
    }
    pub fn projectiles(&self) -> &HashMap<ProjectileId, ProjectileState> {
        &self.projectiles
    }
    pub fn target(&self, id: TargetId) -> Option<&TargetState> {
        self.targets.get(&id)
    }

    pub fn insert_projectile(&mut self, id: ProjectileId, state: ProjectileState) {
        self.projectiles.insert(id, state);
    }

    /// Removes a target the room controller has confirmed dead (the RTP
    /// engine returned a kill outcome for the hit that triggered this),
    /// returning its final state for reward attribution.
    pub fn remove_target(&mut self, id: TargetId) -> Option<TargetState> {
        self.targets.remove(&id)
    }

    /// Advances targets and projectiles, runs the collision pass, then the
    /// spawn pass if due. Matches the update order in §4.5: kinematics,
    /// collision, spawn — anti-cheat bookkeeping and network broadcast
    /// cadence are the room controller's responsibility, not this crate's.
    pub fn step(&mut self, dt_seconds: f32, fish: &FishTable) -> StepReport {
        let mut report = StepReport::default();

        for target in self.targets.values_mut() {
            target.advance(dt_seconds);
        }
        self.targets.retain(|id, target| {
            let keep = !target.out_of_bounds(
                self.bounds.half_width,
                self.bounds.half_height,
                self.bounds.target_margin,
            );
            if !keep {
                report.despawned_targets.push(*id);
            }
            keep
        });

        for projectile in self.projectiles.values_mut() {
            projectile.advance(dt_seconds);
        }
        self.projectiles.retain(|id, projectile| {
            let keep = !projectile.is_expired()
                && !projectile.out_of_bounds(self.bounds.half_width, self.bounds.half_height);
            if !keep {
                report.expired_projectiles.push(*id);
            }
            keep
        });

        self.run_collisions(&mut report);

        self.ticks_since_spawn += 1;
        if self.ticks_since_spawn >= self.spawn.spawn_interval_ticks
            && self.targets.len() < self.spawn.max_targets
        {
            self.ticks_since_spawn = 0;
            if let Some(spawned) = spawn_target(
                &mut self.rng,
                fish,
                self.bounds.half_width,
                self.bounds.half_height,
                self.spawn.global_speed_scale,
            ) {
                let id = TargetId::default();
                self.targets.insert(id, spawned.state);
                report.spawned_targets.push(id);
            }
        }

        report
    }

    /// A `Single` bullet hits at most one target per tick (§4.5.1): the
    /// nearest intersecting target by sweep time. An `Aoe`/`Laser` bullet
    /// may hit several, capped at `max_multi_targets` and ordered per
    /// §4.4 (AOE: distance from the primary impact point ascending;
    /// laser: beam index, i.e. sweep time, ascending) — every `HitEvent`
    /// it produces carries that same ordering so the room controller can
    /// feed them straight to the multi-target allocator.
    ///
    /// Ties among simultaneous candidates are broken by `HashMap`
    /// iteration order, an acceptable nondeterminism since two targets
    /// cannot legitimately occupy the same point at the same time.
    fn run_collisions(&mut self, report: &mut StepReport) {
        let mut hit_bullets = Vec::new();
        for (&bullet_id, bullet) in self.projectiles.iter() {
            let candidates = self.candidate_hits(bullet);
            if candidates.is_empty() {
                continue;
            }
            for (target_id, distance_or_index) in candidates {
                let target = self.targets.get_mut(&target_id).expect("found above");
                target.apply_damage(bullet.owner, bullet.damage);
                report.hits.push(HitEvent {
                    target_id,
                    bullet_id,
                    owner: bullet.owner,
                    damage: bullet.damage,
                    target_tier: target.tier,
                    hp_after: target.hp,
                    weapon_class: bullet.weapon_class,
                    distance_or_index,
                });
            }
            hit_bullets.push(bullet_id);
        }
        for bullet_id in hit_bullets {
            self.projectiles.remove(&bullet_id);
        }
    }

    /// Collects this bullet's hit targets for one tick, already capped and
    /// ordered by its weapon class, each paired with the `distance_or_index`
    /// `reef-rtp::multi::compute_weights` expects for that class: `Aoe`
    /// carries the actual distance from the primary impact point (scaled by
    /// [`AOE_DISTANCE_SCALE`] since the allocator works in integers), and
    /// `Single`/`Laser` carry beam rank (0-based), which the allocator's
    /// laser branch reads from array position rather than this field but is
    /// still reported here for telemetry.
    fn candidate_hits(&self, bullet: &ProjectileState) -> Vec<(TargetId, u32)> {
        let swept: Vec<(TargetId, f32)> = self
            .targets
            .iter()
            .filter_map(|(&target_id, target)| {
                let radius = self.spawn.base_radius * target.size_scale + bullet.radius;
                swept_hit(bullet.prev_pos, bullet.cur_pos, target.cur_pos, radius)
                    .map(|t| (target_id, t))
            })
            .collect();

        match bullet.weapon_class {
            WeaponClass::Single => swept
                .into_iter()
                .min_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(target_id, _)| (target_id, 0))
                .into_iter()
                .collect(),
            WeaponClass::Laser => {
                let mut hits = swept;
                hits.sort_by(|(_, a), (_, b)| a.total_cmp(b));
                hits.truncate(bullet.max_multi_targets.max(1));
                hits.into_iter()
                    .enumerate()
                    .map(|(rank, (target_id, _))| (target_id, rank as u32))
                    .collect()
            }
            WeaponClass::Aoe => {
                let Some(&(_, primary_t)) =
                    swept.iter().min_by(|(_, a), (_, b)| a.total_cmp(b))
                else {
                    return Vec::new();
                };
                let impact = Self::lerp(bullet.prev_pos, bullet.cur_pos, primary_t);
                let splash = bullet.radius + bullet.splash_radius;
                let mut within: Vec<(TargetId, f32)> = self
                    .targets
                    .iter()
                    .filter_map(|(&target_id, target)| {
                        let reach = self.spawn.base_radius * target.size_scale + splash;
                        let dist = Self::distance(impact, target.cur_pos);
                        (dist <= reach).then_some((target_id, dist))
                    })
                    .collect();
                within.sort_by(|(_, a), (_, b)| a.total_cmp(b));
                within.truncate(bullet.max_multi_targets.max(1));
                within
                    .into_iter()
                    .map(|(target_id, dist)| {
                        (target_id, (dist * AOE_DISTANCE_SCALE).round() as u32)
                    })
                    .collect()
            }
        }
    }

    fn lerp(prev: Vec2, cur: Vec2, t: f32) -> Vec2 {
        Vec2 {
            x: prev.x + (cur.x - prev.x) * t,
            z: prev.z + (cur.z - prev.z) * t,
        }
    }

    fn distance(a: Vec2, b: Vec2) -> f32 {
        ((a.x - b.x).powi(2) + (a.z - b.z).powi(2)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Vec2;
    use reef_core::{Player, ID};
    use std::collections::BTreeMap;

    fn bounds() -> RoomBounds {
        RoomBounds {
            half_width: 100.0,
            half_height: 60.0,
            target_margin: 10.0,
        }
    }
    fn spawn_cfg() -> SpawnConfig {
        SpawnConfig {
            max_targets: 20,
            spawn_interval_ticks: 1000,
            global_speed_scale: 1.0,
            base_radius: 1.0,
        }
    }

    fn fish_table() -> FishTable {
        let mut species = BTreeMap::new();
        species.insert(
            "minnow".to_string(),
            reef_config::FishSpecies {
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
    fn stationary_bullet_inside_target_registers_a_hit() {
        let mut sim = Simulation::new(1, bounds(), spawn_cfg());
        let target_id = TargetId::default();
        sim.targets.insert(
            target_id,
            TargetState {
                species_id: 1,
                tier: Tier::new(1),
                prev_pos: Vec2::ZERO,
                cur_pos: Vec2::ZERO,
                velocity: Vec2::ZERO,
                hp: 100,
                max_hp: 100,
                size_scale: 1.0,
                damage_by_player: HashMap::new(),
                last_hit_by: None,
                rotation: 0.0,
            },
        );
        let owner: reef_core::PlayerId = ID::<Player>::default();
        let bullet_id = ProjectileId::default();
        sim.insert_projectile(
            bullet_id,
            ProjectileState {
                owner,
                prev_pos: Vec2::ZERO,
                cur_pos: Vec2::ZERO,
                velocity: Vec2::ZERO,
                damage: 25,
                radius: 1.0,
                ticks_remaining: 10,
                weapon_class: WeaponClass::Single,
                splash_radius: 0.0,
                max_multi_targets: 1,
            },
        );

        let report = sim.step(1.0 / 60.0, &fish_table());
        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].damage, 25);
        assert!(sim.projectiles().is_empty());
        assert_eq!(sim.target(target_id).unwrap().hp, 75);
    }

    #[test]
    fn aoe_bullet_hits_every_target_within_splash_radius() {
        let mut sim = Simulation::new(4, bounds(), spawn_cfg());
        let near = TargetId::default();
        let far = TargetId::default();
        let out_of_range = TargetId::default();
        let make_target = |pos: Vec2| TargetState {
            species_id: 1,
            tier: Tier::new(1),
            prev_pos: pos,
            cur_pos: pos,
            velocity: Vec2::ZERO,
            hp: 100,
            max_hp: 100,
            size_scale: 1.0,
            damage_by_player: HashMap::new(),
            last_hit_by: None,
            rotation: 0.0,
        };
        sim.targets.insert(near, make_target(Vec2::ZERO));
        sim.targets
            .insert(far, make_target(Vec2 { x: 3.0, z: 0.0 }));
        sim.targets
            .insert(out_of_range, make_target(Vec2 { x: 50.0, z: 0.0 }));

        let owner: reef_core::PlayerId = ID::<Player>::default();
        let bullet_id = ProjectileId::default();
        sim.insert_projectile(
            bullet_id,
            ProjectileState {
                owner,
                prev_pos: Vec2::ZERO,
                cur_pos: Vec2::ZERO,
                velocity: Vec2::ZERO,
                damage: 10,
                radius: 1.0,
                ticks_remaining: 10,
                weapon_class: WeaponClass::Aoe,
                splash_radius: 5.0,
                max_multi_targets: 8,
            },
        );

        let report = sim.step(1.0 / 60.0, &fish_table());
        let hit_targets: Vec<TargetId> = report.hits.iter().map(|h| h.target_id).collect();
        assert_eq!(hit_targets.len(), 2);
        assert!(hit_targets.contains(&near));
        assert!(hit_targets.contains(&far));
        assert!(!hit_targets.contains(&out_of_range));
        assert!(sim.projectiles().is_empty());
        // near is strictly closer to the impact point than far.
        let near_idx = report
            .hits
            .iter()
            .position(|h| h.target_id == near)
            .unwrap();
        let far_idx = report
            .hits
            .iter()
            .position(|h| h.target_id == far)
            .unwrap();
        assert!(report.hits[near_idx].distance_or_index < report.hits[far_idx].distance_or_index);
    }

    #[test]
    fn out_of_bounds_target_is_despawned() {
        let mut sim = Simulation::new(2, bounds(), spawn_cfg());
        let target_id = TargetId::default();
        sim.targets.insert(
            target_id,
            TargetState {
                species_id: 1,
                tier: Tier::new(1),
                prev_pos: Vec2 { x: 200.0, z: 0.0 },
                cur_pos: Vec2 { x: 200.0, z: 0.0 },
                velocity: Vec2::ZERO,
                hp: 100,
                max_hp: 100,
                size_scale: 1.0,
                damage_by_player: HashMap::new(),
                last_hit_by: None,
                rotation: 0.0,
            },
        );
        let report = sim.step(1.0 / 60.0, &fish_table());
        assert_eq!(report.despawned_targets, vec![target_id]);
        assert!(sim.targets().is_empty());
    }

    #[test]
    fn spawn_pass_respects_the_target_cap() {
        let mut cfg = spawn_cfg();
        cfg.spawn_interval_ticks = 1;
        cfg.max_targets = 1;
        let mut sim = Simulation::new(3, bounds(), cfg);
        let table = fish_table();
        let first = sim.step(1.0 / 60.0, &table);
        assert_eq!(first.spawned_targets.len(), 1);
        let second = sim.step(1.0 / 60.0, &table);
        assert!(second.spawned_targets.is_empty());
        assert_eq!(sim.targets().len(), 1);
    }
}
