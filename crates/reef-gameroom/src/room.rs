use reef_audit::ReceiptChain;
use reef_core::{MoneyFp, PlayerId, ProjectileId, RoomId};
use reef_engine::tick::TickClock;
use reef_engine::{ProjectileState, RoomBounds, Simulation, SpawnConfig};
use reef_rtp::RtpEngine;
use std::collections::HashMap;
use std::time::Instant;

/// Playing-field geometry. Not part of [`reef_config::GameConfig`] — the
/// wire protocol's aim coordinates are room-relative floats and the
/// renderer collaborator owns visual scale, but collision still needs
/// authoritative bounds, so the controller picks one fixed field size.
pub const ROOM_BOUNDS: RoomBounds = RoomBounds {
    half_width: 960.0,
    half_height: 540.0,
    target_margin: 80.0,
};

pub const DEFAULT_SPAWN: SpawnConfig = SpawnConfig {
    max_targets: 24,
    spawn_interval_ticks: 90,
    global_speed_scale: 1.0,
    base_radius: 20.0,
};

/// Placeholder for the external wallet/account system a production
/// deployment wires into [`GameRoom::join`] instead — out of scope here,
/// but a fixed starting stake keeps the balance/insufficient-funds path
/// exercisable end to end.
pub const DEFAULT_STARTING_BALANCE_FP: MoneyFp = 1_000_000;

pub const BULLET_SPEED: f32 = 900.0;
pub const BULLET_RADIUS: f32 = 4.0;
pub const BULLET_LIFETIME_TICKS: u32 = 180;

/// One seated player's room-scoped state: display name, seat index,
/// fixed-point balance, and whether this player currently holds host
/// privileges (required for `GameStart`).
#[derive(Debug, Clone)]
pub struct Member {
    pub player_id: PlayerId,
    pub name: String,
    pub seat: u8,
    pub balance_fp: MoneyFp,
    pub is_host: bool,
}

/// Per-bullet bookkeeping the simulation crate doesn't carry: which
/// weapon fired it and what it cost, needed when a `HitEvent` resolves
/// through the RTP engine.
struct BulletMeta {
    weapon_name: String,
    cost_fp: MoneyFp,
}

/// One table's full server-side state: the live simulation, its RTP
/// engine, its receipt chain, and the seated players. Deliberately plain
/// data plus methods — the controller owns concurrency and I/O.
pub struct GameRoom {
    pub id: RoomId,
    pub code: String,
    pub seed: u64,
    pub stake_tier: u8,
    pub max_players: u8,
    pub started: bool,
    pub simulation: Simulation,
    pub rtp: RtpEngine,
    pub receipts: ReceiptChain,
    pub tick_clock: TickClock,
    pub epoch: Instant,
    members: Vec<Member>,
    bullet_meta: HashMap<ProjectileId, BulletMeta>,
}

impl GameRoom {
    pub fn new(
        id: RoomId,
        code: String,
        stake_tier: u8,
        max_players: u8,
        seed: u64,
        smoothing_k_fp: i64,
        now: Instant,
    ) -> Self {
        Self {
            id,
            code,
            seed,
            stake_tier,
            max_players,
            started: false,
            simulation: Simulation::new(seed, ROOM_BOUNDS, DEFAULT_SPAWN),
            rtp: RtpEngine::new(smoothing_k_fp),
            receipts: ReceiptChain::new(),
            tick_clock: TickClock::starting_at(std::time::Duration::ZERO),
            epoch: now,
            members: Vec::new(),
            bullet_meta: HashMap::new(),
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() as u8 >= self.max_players
    }

    pub fn member(&self, player_id: PlayerId) -> Option<&Member> {
        self.members.iter().find(|m| m.player_id == player_id)
    }

    fn member_mut(&mut self, player_id: PlayerId) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.player_id == player_id)
    }

    /// Seats a new member, granting host to whoever joins an empty room.
    pub fn join(&mut self, player_id: PlayerId, name: String, starting_balance_fp: MoneyFp) -> u8 {
        let seat = self.members.len() as u8;
        let is_host = self.members.is_empty();
        self.members.push(Member {
            player_id,
            name,
            seat,
            balance_fp: starting_balance_fp,
            is_host,
        });
        seat
    }

    /// Removes a member. If they held host, reassigns it to the
    /// lowest-seated remaining member and returns the new host's id.
    pub fn leave(&mut self, player_id: PlayerId) -> Option<PlayerId> {
        let was_host = self.member(player_id).is_some_and(|m| m.is_host);
        self.members.retain(|m| m.player_id != player_id);
        if was_host {
            if let Some(next) = self.members.iter_mut().min_by_key(|m| m.seat) {
                next.is_host = true;
                return Some(next.player_id);
            }
        }
        None
    }

    /// How many simulation ticks are due right now, per §4.5's fixed-step
    /// clock with catch-up cap. Converts the caller's wall-clock `now`
    /// into this room's own elapsed-time axis.
    pub fn ticks_due(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.epoch);
        self.tick_clock.ticks_due(elapsed)
    }

    pub fn host(&self) -> Option<PlayerId> {
        self.members.iter().find(|m| m.is_host).map(|m| m.player_id)
    }

    pub fn balance(&self, player_id: PlayerId) -> Option<MoneyFp> {
        self.member(player_id).map(|m| m.balance_fp)
    }

    /// Debits `amount_fp` if the member can afford it. Returns whether the
    /// debit happened; an underfunded player is left untouched so the
    /// caller can report `InsufficientBalance` without side effects.
    pub fn debit(&mut self, player_id: PlayerId, amount_fp: MoneyFp) -> bool {
        match self.member_mut(player_id) {
            Some(member) if member.balance_fp >= amount_fp => {
                member.balance_fp -= amount_fp;
                true
            }
            _ => false,
        }
    }

    pub fn credit(&mut self, player_id: PlayerId, amount_fp: MoneyFp) {
        if let Some(member) = self.member_mut(player_id) {
            member.balance_fp += amount_fp;
        }
    }

    pub fn spawn_bullet(
        &mut self,
        id: ProjectileId,
        state: ProjectileState,
        weapon_name: String,
        cost_fp: MoneyFp,
    ) {
        self.simulation.insert_projectile(id, state);
        self.bullet_meta.insert(
            id,
            BulletMeta {
                weapon_name,
                cost_fp,
            },
        );
    }

    /// Reads a bullet's cost/weapon metadata without consuming it. A
    /// multi-target (AOE/laser) hit event reports one [`reef_engine::HitEvent`]
    /// per target but they all share one `bullet_id`, so the controller
    /// peeks this once per group and calls [`Self::clear_bullet_meta`] only
    /// after every target in the group has been resolved.
    pub fn peek_bullet_meta(&self, id: ProjectileId) -> Option<(&str, MoneyFp)> {
        self.bullet_meta
            .get(&id)
            .map(|meta| (meta.weapon_name.as_str(), meta.cost_fp))
    }

    /// Bullets that expire unfired are left to leak out of this map
    /// naturally when the simulation drops them on expiry.
    pub fn clear_bullet_meta(&mut self, id: ProjectileId) {
        self.bullet_meta.remove(&id);
    }
}
