use reef_config::WeaponClass;
use reef_core::{PlayerId, Tier};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub z: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, z: 0.0 };

    pub fn scaled(self, dt: f32) -> Vec2 {
        Vec2 {
            x: self.x * dt,
            z: self.z * dt,
        }
    }
    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            z: self.z + other.z,
        }
    }
}

/// A live target (fish) in a room's simulation.
#[derive(Debug, Clone)]
pub struct TargetState {
    pub species_id: u32,
    pub tier: Tier,
    pub prev_pos: Vec2,
    pub cur_pos: Vec2,
    pub velocity: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    pub size_scale: f32,
    pub damage_by_player: HashMap<PlayerId, i32>,
    pub last_hit_by: Option<PlayerId>,
    pub rotation: f32,
}

impl TargetState {
    /// Hit-point depletion is a display/cooldown signal only: whether a
    /// target is actually removed from the room is decided by the RTP
    /// engine's `killed` flag, not by `hp <= 0` alone.
    pub fn is_hp_depleted(&self) -> bool {
        self.hp <= 0
    }

    pub fn advance(&mut self, dt: f32) {
        self.prev_pos = self.cur_pos;
        self.cur_pos = self.cur_pos.add(self.velocity.scaled(dt));
    }

    pub fn out_of_bounds(&self, half_width: f32, half_height: f32, margin: f32) -> bool {
        self.cur_pos.x.abs() > half_width + margin || self.cur_pos.z.abs() > half_height + margin
    }

    pub fn apply_damage(&mut self, owner: PlayerId, damage: i32) {
        self.hp -= damage;
        *self.damage_by_player.entry(owner).or_insert(0) += damage;
        self.last_hit_by = Some(owner);
    }

    pub fn total_damage(&self) -> i64 {
        self.damage_by_player.values().map(|&d| d as i64).sum()
    }
}

/// A live projectile (bullet) in a room's simulation.
#[derive(Debug, Clone, Copy)]
pub struct ProjectileState {
    pub owner: PlayerId,
    pub prev_pos: Vec2,
    pub cur_pos: Vec2,
    pub velocity: Vec2,
    pub damage: i32,
    pub radius: f32,
    pub ticks_remaining: u32,
    /// Which multi-target rule (§4.4) this bullet's hits resolve under.
    /// Set from the firing weapon's `WeaponClass` at spawn time.
    pub weapon_class: WeaponClass,
    /// `Aoe` splash radius around the primary impact point; unused by
    /// `Single`/`Laser`.
    pub splash_radius: f32,
    /// Cap on targets a single hit event may resolve against — the
    /// firing weapon's `TargetCaps::aoe_max_targets` or
    /// `laser_max_targets`; `1` for `Single`.
    pub max_multi_targets: usize,
}

impl ProjectileState {
    pub fn advance(&mut self, dt: f32) {
        self.prev_pos = self.cur_pos;
        self.cur_pos = self.cur_pos.add(self.velocity.scaled(dt));
        self.ticks_remaining = self.ticks_remaining.saturating_sub(1);
    }

    pub fn is_expired(&self) -> bool {
        self.ticks_remaining == 0
    }

    pub fn out_of_bounds(&self, half_width: f32, half_height: f32) -> bool {
        self.cur_pos.x.abs() > half_width || self.cur_pos.z.abs() > half_height
    }
}
