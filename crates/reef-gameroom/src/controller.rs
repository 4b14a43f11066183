//! The session & room controller: §4.7's packet dispatch, admission, and
//! lifecycle management, expressed as plain methods so the transport that
//! actually owns sockets can drive it from whatever event loop it likes.

use crate::protocol::ProtocolError;
use crate::room::{
    GameRoom, BULLET_LIFETIME_TICKS, BULLET_RADIUS, BULLET_SPEED, DEFAULT_STARTING_BALANCE_FP,
};
use crate::session::{Session, SessionTable};
use crate::broadcaster::Outbound;
use reef_anticheat::{validate_timestamp, Admission, IpLimiter, SequenceOutcome, TimestampOutcome};
use reef_audit::RulesRegistry;
use reef_config::{BucketCategory, GameConfig};
use reef_core::{PlayerId, ProjectileId, RoomId, SessionId};
use reef_crypto::ServerHandshake;
use reef_engine::{ProjectileState, Vec2};
use reef_rtp::Reason;
use reef_wire::payload::{
    BalanceUpdate, FishDeath, FishDeathContributor, FishSpawn, HandshakeRequest,
    HandshakeResponse, HitResult, PlayerJoin, RoomCreate, RoomJoin, ShotFired, TimeSyncPing,
    TimeSyncPong, WeaponSwitch,
};
use reef_wire::{PacketId, WireError};
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// The wire protocol version this controller's handshake expects. Bumping
/// this is a breaking wire change, not a config value.
const PROTO_VERSION: u8 = 2;

fn wall_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is after the unix epoch")
        .as_millis() as u64
}

fn aim_velocity(origin: Vec2, target: Vec2, speed: f32) -> Vec2 {
    let dx = target.x - origin.x;
    let dz = target.z - origin.z;
    let len = (dx * dx + dz * dz).sqrt();
    if len <= f32::EPSILON {
        return Vec2::ZERO;
    }
    Vec2 {
        x: dx / len * speed,
        z: dz / len * speed,
    }
}

fn reason_code(reason: Reason) -> u8 {
    match reason {
        Reason::AlreadyKilled => 0,
        Reason::BudgetGate => 1,
        Reason::RollFailed => 2,
        Reason::HardPity => 3,
        Reason::Soft => 4,
    }
}

/// A commitment to the room's seed and the killed target, so an external
/// auditor can later verify the kill was resolved by the seeded RNG this
/// room actually ran, not a substituted one.
fn seed_commitment(seed: u64, target_id: reef_core::TargetId) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(seed.to_be_bytes());
    hasher.update(target_id.inner().as_bytes());
    hasher.finalize().into()
}

/// Owns every session and room live on this process: the single entry
/// point the transport layer calls into for handshakes, packet dispatch,
/// tick advancement, and idle/disconnect cleanup.
pub struct GameController {
    config: GameConfig,
    rules: RulesRegistry,
    sessions: SessionTable,
    rooms: HashMap<RoomId, GameRoom>,
    room_codes: HashMap<String, RoomId>,
    ip_limiters: HashMap<IpAddr, IpLimiter>,
    pending_handshakes: HashMap<SessionId, ServerHandshake>,
    seed_counter: u64,
}

impl GameController {
    pub fn new(config: GameConfig) -> Self {
        let rules = RulesRegistry::new(&config);
        Self {
            config,
            rules,
            sessions: SessionTable::new(),
            rooms: HashMap::new(),
            room_codes: HashMap::new(),
            ip_limiters: HashMap::new(),
            pending_handshakes: HashMap::new(),
            seed_counter: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rules(&self) -> &RulesRegistry {
        &self.rules
    }

    pub fn room(&self, room_id: RoomId) -> Option<&GameRoom> {
        self.rooms.get(&room_id)
    }

    fn ip_limiter(&mut self, ip: IpAddr, now: Instant) -> &mut IpLimiter {
        let limits = self.config.connection_limits;
        let rate_limits = self.config.rate_limits.clone();
        self.ip_limiters
            .entry(ip)
            .or_insert_with(|| IpLimiter::new(rate_limits.handshake, rate_limits.global, &limits, now))
    }

    /// Admits a new connection attempt from `ip` against the per-IP
    /// connection cap and handshake bucket, then opens a session slot
    /// awaiting the client's `HandshakeRequest`.
    pub fn open_session(&mut self, ip: IpAddr, now: Instant) -> Result<SessionId, ProtocolError> {
        let limiter = self.ip_limiter(ip, now);
        if !limiter.try_connect() {
            return Err(ProtocolError::RateLimited);
        }
        if limiter.admit_handshake(now) != Admission::Admitted {
            limiter.disconnect();
            return Err(ProtocolError::RateLimited);
        }
        let id = SessionId::default();
        self.sessions
            .insert(Session::new(id, ip, &self.config.rate_limits, now));
        self.pending_handshakes.insert(id, ServerHandshake::generate());
        Ok(id)
    }

    /// Completes the ECDH handshake for a pending session. Failures here
    /// are fatal per §7 — the caller must close the socket without
    /// sending an encrypted error, since there are no session keys yet to
    /// encrypt one with.
    pub fn complete_handshake(
        &mut self,
        session_id: SessionId,
        req: &HandshakeRequest,
    ) -> Result<HandshakeResponse, ProtocolError> {
        if req.proto_version != PROTO_VERSION {
            return Err(ProtocolError::Wire(WireError::InvalidHandshake));
        }
        let handshake = self
            .pending_handshakes
            .remove(&session_id)
            .ok_or(ProtocolError::UnknownSession)?;
        let server_public = handshake.public_key_bytes();
        let server_nonce = handshake.server_nonce();
        let salt = handshake.salt();
        let keys = handshake
            .derive(&req.client_public_key, &req.client_nonce, req.proto_version)
            .map_err(|_| ProtocolError::Wire(WireError::KeyDerivationFailed))?;
        let session = self
            .sessions
            .get_mut(session_id)
            .ok_or(ProtocolError::UnknownSession)?;
        session.keys = Some(keys);
        Ok(HandshakeResponse {
            server_public_key: server_public,
            server_nonce,
            salt,
            session_id: session_id.inner().into_bytes(),
        })
    }

    fn admit(
        &mut self,
        session_id: SessionId,
        category: BucketCategory,
        now: Instant,
    ) -> Result<(), ProtocolError> {
        let session = self
            .sessions
            .get_mut(session_id)
            .ok_or(ProtocolError::UnknownSession)?;
        session.touch(now);
        match session.limiter.admit(category, now) {
            Admission::Admitted => Ok(()),
            Admission::RateLimited => Err(ProtocolError::RateLimited),
            Admission::Banned => Err(ProtocolError::Banned),
        }
    }

    fn session_room_player(&self, session_id: SessionId) -> Result<(RoomId, PlayerId), ProtocolError> {
        let session = self.sessions.get(session_id).ok_or(ProtocolError::UnknownSession)?;
        let room_id = session.room_id.ok_or(ProtocolError::PlayerNotInRoom)?;
        let player_id = session.player_id.ok_or(ProtocolError::PlayerNotInRoom)?;
        Ok((room_id, player_id))
    }

    /// Decodes and dispatches one already-decrypted, already-authenticated
    /// payload. This is the single integration point the transport layer
    /// calls after the wire codec's decode step and before its encode step
    /// — everything in between is this crate's job.
    pub fn handle_packet(
        &mut self,
        session_id: SessionId,
        packet_id: PacketId,
        payload: &[u8],
        now: Instant,
    ) -> Result<Vec<Outbound>, ProtocolError> {
        match packet_id {
            PacketId::RoomCreate => {
                let req = RoomCreate::decode(payload)?;
                self.create_room(session_id, &req, now)
            }
            PacketId::RoomJoin => {
                let req = RoomJoin::decode(payload)?;
                self.join_room(session_id, &req, now)
            }
            PacketId::GameStart => {
                let req = reef_wire::payload::GameStart::decode(payload)?;
                self.game_start(session_id, &req, now)
            }
            PacketId::ShotFired => {
                let req = ShotFired::decode(payload)?;
                self.shot_fired(session_id, &req, now)
            }
            PacketId::WeaponSwitch => {
                let req = WeaponSwitch::decode(payload)?;
                self.weapon_switch(session_id, &req, now)
            }
            PacketId::TimeSyncPing => {
                let req = TimeSyncPing::decode(payload)?;
                self.time_sync(session_id, &req, now)
            }
            _ => Err(ProtocolError::UnexpectedPacket),
        }
    }

    pub fn create_room(
        &mut self,
        session_id: SessionId,
        req: &RoomCreate,
        now: Instant,
    ) -> Result<Vec<Outbound>, ProtocolError> {
        self.admit(session_id, BucketCategory::RoomAction, now)?;
        if self.room_codes.contains_key(&req.room_code) {
            return Err(ProtocolError::DuplicateRoomCode);
        }
        let room_id = RoomId::default();
        self.seed_counter += 1;
        let mut room = GameRoom::new(
            room_id,
            req.room_code.clone(),
            req.stake_tier,
            req.max_players,
            self.seed_counter,
            self.config.smoothing_k_fp,
            now,
        );
        let seat = room.join(req.player_id, "player-0".to_string(), DEFAULT_STARTING_BALANCE_FP);
        self.room_codes.insert(req.room_code.clone(), room_id);
        self.rooms.insert(room_id, room);
        self.sessions.bind_player(session_id, req.player_id);
        if let Some(session) = self.sessions.get_mut(session_id) {
            session.room_id = Some(room_id);
        }
        Ok(vec![Outbound::Unicast {
            session_id,
            packet_id: PacketId::PlayerJoin,
            payload: PlayerJoin {
                player_id: req.player_id,
                player_name: format!("player-{}", seat),
                seat,
                balance_fp: DEFAULT_STARTING_BALANCE_FP,
                team: 0,
            }
            .encode(),
        }])
    }

    pub fn join_room(
        &mut self,
        session_id: SessionId,
        req: &RoomJoin,
        now: Instant,
    ) -> Result<Vec<Outbound>, ProtocolError> {
        self.admit(session_id, BucketCategory::RoomAction, now)?;
        {
            let session = self
                .sessions
                .get_mut(session_id)
                .ok_or(ProtocolError::UnknownSession)?;
            match session.sequence.validate(req.seq) {
                SequenceOutcome::Accepted => {}
                _ => return Err(ProtocolError::SequenceRejected),
            }
        }
        let room_id = *self
            .room_codes
            .get(&req.room_code)
            .ok_or(ProtocolError::UnknownRoom)?;
        let room = self.rooms.get_mut(&room_id).ok_or(ProtocolError::UnknownRoom)?;
        if room.is_full() {
            return Err(ProtocolError::RoomFull);
        }
        let name = format!("player-{}", room.members().len());
        let seat = room.join(req.player_id, name, DEFAULT_STARTING_BALANCE_FP);
        self.sessions.bind_player(session_id, req.player_id);
        if let Some(session) = self.sessions.get_mut(session_id) {
            session.room_id = Some(room_id);
        }
        Ok(vec![Outbound::Broadcast {
            room_id,
            packet_id: PacketId::PlayerJoin,
            payload: PlayerJoin {
                player_id: req.player_id,
                player_name: format!("player-{}", seat),
                seat,
                balance_fp: DEFAULT_STARTING_BALANCE_FP,
                team: 0,
            }
            .encode(),
        }])
    }

    pub fn game_start(
        &mut self,
        session_id: SessionId,
        _req: &reef_wire::payload::GameStart,
        now: Instant,
    ) -> Result<Vec<Outbound>, ProtocolError> {
        self.admit(session_id, BucketCategory::RoomAction, now)?;
        let (room_id, player_id) = self.session_room_player(session_id)?;
        let room = self.rooms.get_mut(&room_id).ok_or(ProtocolError::UnknownRoom)?;
        if room.host() != Some(player_id) {
            return Err(ProtocolError::NotHost);
        }
        if room.started {
            return Err(ProtocolError::AlreadyStarted);
        }
        room.started = true;
        Ok(Vec::new())
    }

    pub fn weapon_switch(
        &mut self,
        session_id: SessionId,
        req: &WeaponSwitch,
        now: Instant,
    ) -> Result<Vec<Outbound>, ProtocolError> {
        self.admit(session_id, BucketCategory::WeaponSwitch, now)?;
        {
            let session = self
                .sessions
                .get_mut(session_id)
                .ok_or(ProtocolError::UnknownSession)?;
            match session.sequence.validate(req.seq) {
                SequenceOutcome::Accepted => {}
                _ => return Err(ProtocolError::SequenceRejected),
            }
        }
        if self.config.weapons.iter().nth(req.weapon_id as usize).is_none() {
            return Err(ProtocolError::UnknownWeapon);
        }
        Ok(Vec::new())
    }

    pub fn shot_fired(
        &mut self,
        session_id: SessionId,
        req: &ShotFired,
        now: Instant,
    ) -> Result<Vec<Outbound>, ProtocolError> {
        self.admit(session_id, BucketCategory::Shoot, now)?;
        let (room_id, player_id) = self.session_room_player(session_id)?;
        {
            let session = self
                .sessions
                .get_mut(session_id)
                .ok_or(ProtocolError::UnknownSession)?;
            match session.sequence.validate(req.seq) {
                SequenceOutcome::Accepted => {}
                _ => return Err(ProtocolError::SequenceRejected),
            }
            if validate_timestamp(req.client_ts, wall_ms()) != TimestampOutcome::Valid {
                return Err(ProtocolError::TimestampRejected);
            }
        }
        let (weapon_name, weapon) = self
            .config
            .weapons
            .iter()
            .nth(req.weapon_id as usize)
            .map(|(name, w)| (name.clone(), *w))
            .ok_or(ProtocolError::UnknownWeapon)?;
        let room = self.rooms.get_mut(&room_id).ok_or(ProtocolError::UnknownRoom)?;
        if !room.debit(player_id, weapon.cost) {
            return Err(ProtocolError::InsufficientBalance);
        }
        let origin = Vec2 {
            x: req.origin_x,
            z: req.origin_z,
        };
        let aim = Vec2 {
            x: req.target_x,
            z: req.target_z,
        };
        let velocity = aim_velocity(origin, aim, BULLET_SPEED);
        let bullet_id = ProjectileId::default();
        let max_multi_targets = match weapon.class {
            reef_config::WeaponClass::Single => 1,
            reef_config::WeaponClass::Aoe => self.config.target_caps.aoe_max_targets,
            reef_config::WeaponClass::Laser => self.config.target_caps.laser_max_targets,
        };
        room.spawn_bullet(
            bullet_id,
            ProjectileState {
                owner: player_id,
                prev_pos: origin,
                cur_pos: origin,
                velocity,
                damage: weapon.damage,
                radius: BULLET_RADIUS,
                ticks_remaining: BULLET_LIFETIME_TICKS,
                weapon_class: weapon.class,
                splash_radius: weapon.splash_radius,
                max_multi_targets,
            },
            weapon_name.clone(),
            weapon.cost,
        );
        if let Some(session) = self.sessions.get_mut(session_id) {
            session.anomaly.record_shot(&weapon_name);
        }
        Ok(Vec::new())
    }

    pub fn time_sync(
        &mut self,
        session_id: SessionId,
        req: &TimeSyncPing,
        now: Instant,
    ) -> Result<Vec<Outbound>, ProtocolError> {
        self.admit(session_id, BucketCategory::TimeSync, now)?;
        Ok(vec![Outbound::Unicast {
            session_id,
            packet_id: PacketId::TimeSyncPong,
            payload: TimeSyncPong {
                client_ts: req.client_ts,
                server_ts: wall_ms(),
                seq: req.seq,
            }
            .encode(),
        }])
    }

    /// Runs every tick due for `room_id`, resolving hits through the RTP
    /// engine and minting receipts for confirmed kills. Returns every
    /// packet produced; the caller is expected to invoke this once per
    /// room per event-loop iteration and flush the result.
    pub fn tick_room(&mut self, room_id: RoomId, now: Instant) -> Vec<Outbound> {
        let mut outbound = Vec::new();
        let due = match self.rooms.get_mut(&room_id) {
            Some(room) if room.started => room.ticks_due(now),
            _ => 0,
        };
        for _ in 0..due {
            outbound.extend(self.step_room_once(room_id, now));
        }
        outbound
    }

    fn step_room_once(&mut self, room_id: RoomId, now: Instant) -> Vec<Outbound> {
        let mut outbound = Vec::new();
        let rules_hash = self.rules.hash();
        let rules_version = self.rules.version();
        let fish = self.config.fish_species.clone();
        let report = {
            let Some(room) = self.rooms.get_mut(&room_id) else {
                return outbound;
            };
            room.simulation.step(1.0 / reef_engine::tick::TICK_HZ as f32, &fish)
        };

        for spawned in &report.spawned_targets {
            let Some(room) = self.rooms.get(&room_id) else {
                break;
            };
            let Some(target) = room.simulation.target(*spawned) else {
                continue;
            };
            outbound.push(Outbound::Broadcast {
                room_id,
                packet_id: PacketId::FishSpawn,
                payload: FishSpawn {
                    target_id: *spawned,
                    species_id: target.species_id,
                    tier: target.tier.get(),
                    x: target.cur_pos.x,
                    z: target.cur_pos.z,
                    vx: target.velocity.x,
                    vz: target.velocity.z,
                    hp: target.hp,
                    max_hp: target.max_hp,
                    rotation: target.rotation,
                    spawn_time: wall_ms() as u32,
                }
                .encode(),
            });
        }

        // §4.4: every `HitEvent` sharing a `bullet_id` is one fire event.
        // `run_collisions` already orders and caps them per weapon class, so
        // grouping consecutive runs (rather than a HashMap) preserves that
        // order without re-sorting.
        let mut hit_index = 0;
        while hit_index < report.hits.len() {
            let bullet_id = report.hits[hit_index].bullet_id;
            let group_end = report.hits[hit_index..]
                .iter()
                .position(|h| h.bullet_id != bullet_id)
                .map(|offset| hit_index + offset)
                .unwrap_or(report.hits.len());
            let group = &report.hits[hit_index..group_end];
            hit_index = group_end;

            let Some(room) = self.rooms.get_mut(&room_id) else {
                break;
            };
            let Some((weapon_name, cost_fp)) = room
                .peek_bullet_meta(bullet_id)
                .map(|(name, cost)| (name.to_string(), cost))
            else {
                continue;
            };

            let candidates: Vec<reef_rtp::MultiTargetCandidate> = group
                .iter()
                .map(|hit| reef_rtp::MultiTargetCandidate {
                    tier: hit.target_tier,
                    distance_or_index: hit.distance_or_index,
                })
                .collect();
            let is_laser = group[0].weapon_class == reef_config::WeaponClass::Laser;
            let weights = reef_rtp::compute_weights(&candidates, is_laser);
            let tiers: Vec<reef_config::TierEntry> = group
                .iter()
                .map(|hit| *self.config.tier_config.get(hit.target_tier))
                .collect();
            let (budgets, costs) = reef_rtp::compute_budget(&weights, &tiers, cost_fp);

            let mut recorded_hit = false;
            for (idx, hit) in group.iter().enumerate() {
                let tier_entry = tiers[idx];
                let mut rng = rand::rng();
                let outcome = room.rtp.resolve_attributed_shot(
                    hit.owner,
                    hit.target_id,
                    costs[idx],
                    budgets[idx],
                    &tier_entry,
                    &mut rng,
                );

                if let Some(hitter_session) = self.sessions.by_player(hit.owner) {
                    if !recorded_hit {
                        if let Some(session) = self.sessions.get_mut(hitter_session) {
                            session.anomaly.record_hit(&weapon_name);
                        }
                        recorded_hit = true;
                    }
                    outbound.push(Outbound::Unicast {
                        session_id: hitter_session,
                        packet_id: PacketId::HitResult,
                        payload: HitResult {
                            target_id: hit.target_id,
                            bullet_local_id: 0,
                            outcome: outcome.kill as u8,
                            reason_code: reason_code(outcome.reason),
                            reward_fp: outcome.reward_fp.unwrap_or(0),
                            reason_text: String::new(),
                        }
                        .encode(),
                    });
                }

                if !outcome.kill {
                    continue;
                }

                let Some(target_state) = room.simulation.remove_target(hit.target_id) else {
                    continue;
                };
                let reward_fp = outcome.reward_fp.unwrap_or(0);
                let splits = reef_engine::attribution::distribute_reward(
                    &target_state.damage_by_player,
                    reward_fp,
                );
                let mut contributors = Vec::with_capacity(splits.len());
                for (contributor, share_fp) in &splits {
                    room.credit(*contributor, *share_fp);
                    contributors.push(FishDeathContributor {
                        player_id: *contributor,
                        reward_fp: *share_fp,
                        damage: target_state
                            .damage_by_player
                            .get(contributor)
                            .copied()
                            .unwrap_or(0) as u32,
                    });
                    if let Some(contributor_session) = self.sessions.by_player(*contributor) {
                        outbound.push(Outbound::Unicast {
                            session_id: contributor_session,
                            packet_id: PacketId::BalanceUpdate,
                            payload: BalanceUpdate {
                                player_id: *contributor,
                                balance_fp: room.balance(*contributor).unwrap_or(0),
                                delta_fp: *share_fp,
                                reason_code: 1,
                                server_ts: wall_ms() as u32,
                            }
                            .encode(),
                        });
                    }
                }

                let commitment = seed_commitment(room.seed, hit.target_id);
                match room.receipts.mint(
                    hit.target_id,
                    splits.clone(),
                    reward_fp,
                    rules_hash,
                    rules_version,
                    commitment,
                ) {
                    Ok(receipt) => {
                        log::info!(
                            "minted receipt for target {:?}: {:?}",
                            hit.target_id,
                            receipt.hash()
                        );
                    }
                    Err(err) => {
                        log::warn!(
                            "refused duplicate kill receipt for target {:?}: {:?}",
                            hit.target_id,
                            err
                        );
                    }
                }
                room.rtp.clear_target(hit.target_id);

                outbound.push(Outbound::Broadcast {
                    room_id,
                    packet_id: PacketId::FishDeath,
                    payload: FishDeath {
                        target_id: hit.target_id,
                        tier: hit.target_tier.get(),
                        total_reward_fp: reward_fp,
                        killed_by_weapon: 0,
                        contributors,
                    }
                    .encode(),
                });
            }

            room.clear_bullet_meta(bullet_id);
        }

        outbound
    }

    /// Tears down a session: releases its IP connection slot, removes it
    /// from its room (reassigning host if needed), and deletes the room
    /// once it has no members left.
    pub fn disconnect_session(&mut self, session_id: SessionId) {
        let Some(session) = self.sessions.remove(session_id) else {
            return;
        };
        if let Some(limiter) = self.ip_limiters.get_mut(&session.ip) {
            limiter.disconnect();
        }
        self.pending_handshakes.remove(&session_id);
        let (Some(room_id), Some(player_id)) = (session.room_id, session.player_id) else {
            return;
        };
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return;
        };
        room.leave(player_id);
        if room.is_empty() {
            self.rooms.remove(&room_id);
            self.room_codes.retain(|_, id| *id != room_id);
        }
    }

    /// Evicts sessions idle past the timeout and disconnects each one
    /// (reassigning host / deleting empty rooms as normal). Returns the
    /// reaped session ids so the transport can close their sockets.
    pub fn reap_idle_sessions(&mut self, now: Instant) -> Vec<SessionId> {
        let idle = self.sessions.reap_idle(now);
        for &id in &idle {
            self.disconnect_session(id);
        }
        idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_config::{
        BucketConfig, ConnectionLimits, FishSpecies, RateLimitConfig, TierEntry, TierTable,
        WeaponEntry, WeaponTable,
    };
    use reef_core::Tier;
    use std::collections::BTreeMap;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    fn ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))
    }

    fn bucket() -> BucketConfig {
        BucketConfig {
            capacity: 100.0,
            refill_per_sec: 100.0,
        }
    }

    fn sample_config() -> GameConfig {
        let mut weapons = BTreeMap::new();
        weapons.insert(
            "cannon".to_string(),
            WeaponEntry {
                cost: reef_core::MONEY_SCALE,
                damage: 100,
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
            target_caps: reef_config::TargetCaps {
                aoe_max_targets: 8,
                laser_max_targets: 6,
            },
            fish_species: reef_config::FishTable::new(species),
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
                max_connections_per_ip: 8,
                room_ops_window_ms: 1000,
                max_room_ops_per_ip_window: 20,
                bucket_expiry_ms: 60_000,
            },
            sigma_threshold: 3.0,
            min_shots_for_detection: 50,
            cooldown_duration_ms: 10_000,
            smoothing_k_fp: reef_config::DEFAULT_SMOOTHING_K_FP,
        }
    }

    fn handshake(controller: &mut GameController, now: Instant) -> SessionId {
        let session_id = controller.open_session(ip(), now).unwrap();
        let client = ServerHandshake::generate();
        let req = HandshakeRequest {
            client_public_key: client.public_key_bytes(),
            client_nonce: [9u8; 32],
            proto_version: PROTO_VERSION,
        };
        controller.complete_handshake(session_id, &req).unwrap();
        session_id
    }

    #[test]
    fn handshake_then_room_create_seats_the_host() {
        let mut controller = GameController::new(sample_config());
        let now = Instant::now();
        let session_id = handshake(&mut controller, now);
        let player_id = PlayerId::default();
        let outbound = controller
            .create_room(
                session_id,
                &RoomCreate {
                    player_id,
                    room_code: "ABCDEF".to_string(),
                    max_players: 4,
                    stake_tier: 1,
                    client_ts: wall_ms(),
                },
                now,
            )
            .unwrap();
        assert_eq!(outbound.len(), 1);
        let (room_id, bound_player) = controller.session_room_player(session_id).unwrap();
        assert_eq!(bound_player, player_id);
        assert_eq!(controller.room(room_id).unwrap().host(), Some(player_id));
    }

    #[test]
    fn duplicate_room_code_is_rejected() {
        let mut controller = GameController::new(sample_config());
        let now = Instant::now();
        let first = handshake(&mut controller, now);
        let second = handshake(&mut controller, now);
        let req = RoomCreate {
            player_id: PlayerId::default(),
            room_code: "SAME01".to_string(),
            max_players: 4,
            stake_tier: 1,
            client_ts: wall_ms(),
        };
        controller.create_room(first, &req, now).unwrap();
        let result = controller.create_room(second, &req, now);
        assert_eq!(result, Err(ProtocolError::DuplicateRoomCode));
    }

    #[test]
    fn only_host_can_start_the_game() {
        let mut controller = GameController::new(sample_config());
        let now = Instant::now();
        let host_session = handshake(&mut controller, now);
        let guest_session = handshake(&mut controller, now);
        let host_id = PlayerId::default();
        let guest_id = PlayerId::default();
        controller
            .create_room(
                host_session,
                &RoomCreate {
                    player_id: host_id,
                    room_code: "ROOM01".to_string(),
                    max_players: 4,
                    stake_tier: 1,
                    client_ts: wall_ms(),
                },
                now,
            )
            .unwrap();
        controller
            .join_room(
                guest_session,
                &RoomJoin {
                    player_id: guest_id,
                    room_code: "ROOM01".to_string(),
                    seq: 1,
                    client_ts: wall_ms(),
                },
                now,
            )
            .unwrap();
        let result = controller.game_start(guest_session, &reef_wire::payload::GameStart { seq: 1 }, now);
        assert_eq!(result, Err(ProtocolError::NotHost));
        let result = controller.game_start(host_session, &reef_wire::payload::GameStart { seq: 1 }, now);
        assert!(result.is_ok());
    }

    #[test]
    fn shot_without_a_room_is_rejected() {
        let mut controller = GameController::new(sample_config());
        let now = Instant::now();
        let session_id = handshake(&mut controller, now);
        let result = controller.shot_fired(
            session_id,
            &ShotFired {
                player_id: PlayerId::default(),
                seq: 1,
                client_ts: wall_ms(),
                weapon_id: 0,
                target_x: 10.0,
                target_z: 10.0,
                origin_x: 0.0,
                origin_z: 0.0,
                bullet_local_id: 1,
            },
            now,
        );
        assert_eq!(result, Err(ProtocolError::PlayerNotInRoom));
    }

    #[test]
    fn replayed_sequence_is_rejected_after_room_join() {
        let mut controller = GameController::new(sample_config());
        let now = Instant::now();
        let session_id = handshake(&mut controller, now);
        let player_id = PlayerId::default();
        controller
            .create_room(
                session_id,
                &RoomCreate {
                    player_id,
                    room_code: "REPLAY".to_string(),
                    max_players: 4,
                    stake_tier: 1,
                    client_ts: wall_ms(),
                },
                now,
            )
            .unwrap();
        let shot = ShotFired {
            player_id,
            seq: 5,
            client_ts: wall_ms(),
            weapon_id: 0,
            target_x: 10.0,
            target_z: 10.0,
            origin_x: 0.0,
            origin_z: 0.0,
            bullet_local_id: 1,
        };
        controller.shot_fired(session_id, &shot, now).unwrap();
        let replay = controller.shot_fired(session_id, &shot, now);
        assert_eq!(replay, Err(ProtocolError::SequenceRejected));
    }

    #[test]
    fn disconnect_reassigns_host_and_deletes_empty_room() {
        let mut controller = GameController::new(sample_config());
        let now = Instant::now();
        let host_session = handshake(&mut controller, now);
        let guest_session = handshake(&mut controller, now);
        let host_id = PlayerId::default();
        let guest_id = PlayerId::default();
        controller
            .create_room(
                host_session,
                &RoomCreate {
                    player_id: host_id,
                    room_code: "LEAVE1".to_string(),
                    max_players: 4,
                    stake_tier: 1,
                    client_ts: wall_ms(),
                },
                now,
            )
            .unwrap();
        controller
            .join_room(
                guest_session,
                &RoomJoin {
                    player_id: guest_id,
                    room_code: "LEAVE1".to_string(),
                    seq: 1,
                    client_ts: wall_ms(),
                },
                now,
            )
            .unwrap();
        let (room_id, _) = controller.session_room_player(guest_session).unwrap();
        controller.disconnect_session(host_session);
        assert_eq!(controller.room(room_id).unwrap().host(), Some(guest_id));
        controller.disconnect_session(guest_session);
        assert!(controller.room(room_id).is_none());
    }

    #[test]
    fn idle_sessions_are_reaped_and_disconnected() {
        let mut controller = GameController::new(sample_config());
        let now = Instant::now();
        let session_id = handshake(&mut controller, now);
        let later = now + Duration::from_secs(30 * 60 + 1);
        let reaped = controller.reap_idle_sessions(later);
        assert_eq!(reaped, vec![session_id]);
    }
}
