//! Per-packet-id payload structs and their binary encode/decode.
//!
//! Field layouts are this codec's own choice where the protocol only
//! declares a total byte count and a type list (player ids are 16 bytes,
//! room codes 6, player names 32): each struct below is sized to match its
//! declared total exactly.

use crate::codec::{BinaryReader, BinaryWriter};
use crate::error::WireError;
use reef_core::{PlayerId, RoomId, TargetId};

pub struct HandshakeRequest {
    pub client_public_key: [u8; 65],
    pub client_nonce: [u8; 32],
    pub proto_version: u8,
}

impl HandshakeRequest {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .bytes(&self.client_public_key)
            .bytes(&self.client_nonce)
            .u8(self.proto_version)
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        let client_public_key: [u8; 65] = r.bytes(65)?.try_into().unwrap();
        let client_nonce: [u8; 32] = r.bytes(32)?.try_into().unwrap();
        let proto_version = r.u8()?;
        Ok(Self {
            client_public_key,
            client_nonce,
            proto_version,
        })
    }
}

pub struct HandshakeResponse {
    pub server_public_key: [u8; 65],
    pub server_nonce: [u8; 32],
    pub salt: [u8; 32],
    pub session_id: [u8; 16],
}

impl HandshakeResponse {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .bytes(&self.server_public_key)
            .bytes(&self.server_nonce)
            .bytes(&self.salt)
            .bytes(&self.session_id)
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        Ok(Self {
            server_public_key: r.bytes(65)?.try_into().unwrap(),
            server_nonce: r.bytes(32)?.try_into().unwrap(),
            salt: r.bytes(32)?.try_into().unwrap(),
            session_id: r.array16()?,
        })
    }
}

pub struct ShotFired {
    pub player_id: PlayerId,
    pub seq: u64,
    pub client_ts: u64,
    pub weapon_id: u8,
    pub target_x: f32,
    pub target_z: f32,
    pub origin_x: f32,
    pub origin_z: f32,
    pub bullet_local_id: u32,
}

impl ShotFired {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .bytes(&self.player_id.inner().into_bytes())
            .u64(self.seq)
            .u64(self.client_ts)
            .u8(self.weapon_id)
            .f32(self.target_x)
            .f32(self.target_z)
            .f32(self.origin_x)
            .f32(self.origin_z)
            .u32(self.bullet_local_id)
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        let player_id: PlayerId = uuid::Uuid::from_bytes(r.array16()?).into();
        Ok(Self {
            player_id,
            seq: r.u64()?,
            client_ts: r.u64()?,
            weapon_id: r.u8()?,
            target_x: r.f32()?,
            target_z: r.f32()?,
            origin_x: r.f32()?,
            origin_z: r.f32()?,
            bullet_local_id: r.u32()?,
        })
    }
}

pub struct HitResult {
    pub target_id: TargetId,
    pub bullet_local_id: u32,
    pub outcome: u8,
    pub reason_code: u8,
    pub reward_fp: i64,
    pub reason_text: String,
}

impl HitResult {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .bytes(&self.target_id.inner().into_bytes())
            .u32(self.bullet_local_id)
            .u8(self.outcome)
            .u8(self.reason_code)
            .i64(self.reward_fp)
            .counted_bytes(self.reason_text.as_bytes())
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        let target_id: TargetId = uuid::Uuid::from_bytes(r.array16()?).into();
        let bullet_local_id = r.u32()?;
        let outcome = r.u8()?;
        let reason_code = r.u8()?;
        let reward_fp = r.i64()?;
        let reason_text = if r.remaining() > 0 {
            String::from_utf8_lossy(&r.counted_bytes()?).into_owned()
        } else {
            String::new()
        };
        Ok(Self {
            target_id,
            bullet_local_id,
            outcome,
            reason_code,
            reward_fp,
            reason_text,
        })
    }
}

pub struct BalanceUpdate {
    pub player_id: PlayerId,
    pub balance_fp: i64,
    pub delta_fp: i64,
    pub reason_code: u8,
    pub server_ts: u32,
}

impl BalanceUpdate {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .bytes(&self.player_id.inner().into_bytes())
            .i64(self.balance_fp)
            .i64(self.delta_fp)
            .u8(self.reason_code)
            .u32(self.server_ts)
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        let player_id: PlayerId = uuid::Uuid::from_bytes(r.array16()?).into();
        Ok(Self {
            player_id,
            balance_fp: r.i64()?,
            delta_fp: r.i64()?,
            reason_code: r.u8()?,
            server_ts: r.u32()?,
        })
    }
}

pub struct WeaponSwitch {
    pub player_id: PlayerId,
    pub weapon_id: u8,
    pub seq: u64,
}

impl WeaponSwitch {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .bytes(&self.player_id.inner().into_bytes())
            .u8(self.weapon_id)
            .u64(self.seq)
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        let player_id: PlayerId = uuid::Uuid::from_bytes(r.array16()?).into();
        Ok(Self {
            player_id,
            weapon_id: r.u8()?,
            seq: r.u64()?,
        })
    }
}

pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub tick: u64,
    pub target_count: u16,
    pub player_count: u16,
    pub targets: Vec<u8>,
    pub players: Vec<u8>,
}

impl RoomSnapshot {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .bytes(&self.room_id.inner().into_bytes())
            .u64(self.tick)
            .u16(self.target_count)
            .u16(self.player_count)
            .u32(0)
            .counted_bytes(&self.targets)
            .counted_bytes(&self.players)
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        let room_id: RoomId = uuid::Uuid::from_bytes(r.array16()?).into();
        let tick = r.u64()?;
        let target_count = r.u16()?;
        let player_count = r.u16()?;
        let _reserved = r.u32()?;
        let targets = r.counted_bytes().unwrap_or_default();
        let players = r.counted_bytes().unwrap_or_default();
        Ok(Self {
            room_id,
            tick,
            target_count,
            player_count,
            targets,
            players,
        })
    }
}

pub struct FishSpawn {
    pub target_id: TargetId,
    pub species_id: u32,
    pub tier: u8,
    pub x: f32,
    pub z: f32,
    pub vx: f32,
    pub vz: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub rotation: f32,
    pub spawn_time: u32,
}

impl FishSpawn {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .bytes(&self.target_id.inner().into_bytes())
            .u32(self.species_id)
            .u8(self.tier)
            .f32(self.x)
            .f32(self.z)
            .f32(self.vx)
            .f32(self.vz)
            .i32(self.hp)
            .i32(self.max_hp)
            .f32(self.rotation)
            .u32(self.spawn_time)
            .u8(0)
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        let target_id: TargetId = uuid::Uuid::from_bytes(r.array16()?).into();
        let species_id = r.u32()?;
        let tier = r.u8()?;
        let x = r.f32()?;
        let z = r.f32()?;
        let vx = r.f32()?;
        let vz = r.f32()?;
        let hp = r.i32()?;
        let max_hp = r.i32()?;
        let rotation = r.f32()?;
        let spawn_time = r.u32()?;
        let _pad = r.u8()?;
        Ok(Self {
            target_id,
            species_id,
            tier,
            x,
            z,
            vx,
            vz,
            hp,
            max_hp,
            rotation,
            spawn_time,
        })
    }
}

pub struct FishDeathContributor {
    pub player_id: PlayerId,
    pub reward_fp: i64,
    pub damage: u32,
}

pub struct FishDeath {
    pub target_id: TargetId,
    pub tier: u8,
    pub total_reward_fp: i64,
    pub killed_by_weapon: u8,
    pub contributors: Vec<FishDeathContributor>,
}

impl FishDeath {
    pub fn encode(&self) -> Vec<u8> {
        let mut w = BinaryWriter::new();
        w.bytes(&self.target_id.inner().into_bytes())
            .u8(self.tier)
            .i64(self.total_reward_fp)
            .u8(self.killed_by_weapon)
            .u16(self.contributors.len() as u16)
            .bytes(&[0u8; 8]);
        for c in &self.contributors {
            w.bytes(&c.player_id.inner().into_bytes())
                .i64(c.reward_fp)
                .u32(c.damage);
        }
        w.into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        let target_id: TargetId = uuid::Uuid::from_bytes(r.array16()?).into();
        let tier = r.u8()?;
        let total_reward_fp = r.i64()?;
        let killed_by_weapon = r.u8()?;
        let contributor_count = r.u16()?;
        let _reserved = r.bytes(8)?;
        let mut contributors = Vec::with_capacity(contributor_count as usize);
        for _ in 0..contributor_count {
            let player_id: PlayerId = uuid::Uuid::from_bytes(r.array16()?).into();
            let reward_fp = r.i64()?;
            let damage = r.u32()?;
            contributors.push(FishDeathContributor {
                player_id,
                reward_fp,
                damage,
            });
        }
        Ok(Self {
            target_id,
            tier,
            total_reward_fp,
            killed_by_weapon,
            contributors,
        })
    }
}

pub struct PlayerJoin {
    pub player_id: PlayerId,
    pub player_name: String,
    pub seat: u8,
    pub balance_fp: i64,
    pub team: u8,
}

impl PlayerJoin {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .bytes(&self.player_id.inner().into_bytes())
            .fixed_str(&self.player_name, 32)
            .u8(self.seat)
            .i64(self.balance_fp)
            .u8(self.team)
            .bytes(&[0u8; 8])
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        let player_id: PlayerId = uuid::Uuid::from_bytes(r.array16()?).into();
        let player_name = r.fixed_str(32)?;
        let seat = r.u8()?;
        let balance_fp = r.i64()?;
        let team = r.u8()?;
        let _reserved = r.bytes(8)?;
        Ok(Self {
            player_id,
            player_name,
            seat,
            balance_fp,
            team,
        })
    }
}

pub struct RoomCreate {
    pub player_id: PlayerId,
    pub room_code: String,
    pub max_players: u8,
    pub stake_tier: u8,
    pub client_ts: u64,
}

impl RoomCreate {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .bytes(&self.player_id.inner().into_bytes())
            .fixed_str(&self.room_code, 6)
            .u8(self.max_players)
            .u8(self.stake_tier)
            .u64(self.client_ts)
            .bytes(&[0u8; 9])
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        let player_id: PlayerId = uuid::Uuid::from_bytes(r.array16()?).into();
        let room_code = r.fixed_str(6)?;
        let max_players = r.u8()?;
        let stake_tier = r.u8()?;
        let client_ts = r.u64()?;
        let _reserved = r.bytes(9)?;
        Ok(Self {
            player_id,
            room_code,
            max_players,
            stake_tier,
            client_ts,
        })
    }
}

pub struct RoomJoin {
    pub player_id: PlayerId,
    pub room_code: String,
    pub seq: u64,
    pub client_ts: u64,
}

impl RoomJoin {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .bytes(&self.player_id.inner().into_bytes())
            .fixed_str(&self.room_code, 6)
            .u64(self.seq)
            .u64(self.client_ts)
            .bytes(&[0u8; 8])
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        let player_id: PlayerId = uuid::Uuid::from_bytes(r.array16()?).into();
        let room_code = r.fixed_str(6)?;
        let seq = r.u64()?;
        let client_ts = r.u64()?;
        let _reserved = r.bytes(8)?;
        Ok(Self {
            player_id,
            room_code,
            seq,
            client_ts,
        })
    }
}

pub struct GameStart {
    pub seq: u64,
}

impl GameStart {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new().u64(self.seq).into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        Ok(Self { seq: r.u64()? })
    }
}

pub struct TimeSyncPing {
    pub client_ts: u64,
    pub seq: u32,
}

impl TimeSyncPing {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .u64(self.client_ts)
            .u32(self.seq)
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        Ok(Self {
            client_ts: r.u64()?,
            seq: r.u32()?,
        })
    }
}

pub struct TimeSyncPong {
    pub client_ts: u64,
    pub server_ts: u64,
    pub seq: u32,
}

impl TimeSyncPong {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .u64(self.client_ts)
            .u64(self.server_ts)
            .u32(self.seq)
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        Ok(Self {
            client_ts: r.u64()?,
            server_ts: r.u64()?,
            seq: r.u32()?,
        })
    }
}

pub struct ErrorPacket {
    pub error_code: u16,
    pub message: String,
}

impl ErrorPacket {
    pub fn encode(&self) -> Vec<u8> {
        BinaryWriter::new()
            .u16(self.error_code)
            .counted_bytes(self.message.as_bytes())
            .into_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        let mut r = BinaryReader::new(bytes);
        let error_code = r.u16()?;
        let message = String::from_utf8_lossy(&r.counted_bytes()?).into_owned();
        Ok(Self {
            error_code,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shot_fired_round_trips_and_matches_declared_size() {
        let shot = ShotFired {
            player_id: uuid::Uuid::nil().into(),
            seq: 5,
            client_ts: 123456,
            weapon_id: 2,
            target_x: 1.5,
            target_z: -2.25,
            origin_x: 0.0,
            origin_z: 0.0,
            bullet_local_id: 77,
        };
        let encoded = shot.encode();
        assert_eq!(encoded.len(), 53);
        let decoded = ShotFired::decode(&encoded).unwrap();
        assert_eq!(decoded.seq, 5);
        assert_eq!(decoded.bullet_local_id, 77);
        assert_eq!(decoded.target_x, 1.5);
    }

    #[test]
    fn handshake_request_matches_declared_size() {
        let req = HandshakeRequest {
            client_public_key: [9u8; 65],
            client_nonce: [1u8; 32],
            proto_version: 2,
        };
        assert_eq!(req.encode().len(), 98);
    }

    #[test]
    fn player_join_round_trips_name() {
        let join = PlayerJoin {
            player_id: uuid::Uuid::nil().into(),
            player_name: "reef_shark".to_string(),
            seat: 3,
            balance_fp: 500_000,
            team: 0,
        };
        let encoded = join.encode();
        assert_eq!(encoded.len(), 66);
        let decoded = PlayerJoin::decode(&encoded).unwrap();
        assert_eq!(decoded.player_name, "reef_shark");
        assert_eq!(decoded.balance_fp, 500_000);
    }

    #[test]
    fn fish_death_round_trips_contributors() {
        let death = FishDeath {
            target_id: uuid::Uuid::nil().into(),
            tier: 3,
            total_reward_fp: 9_000,
            killed_by_weapon: 1,
            contributors: vec![FishDeathContributor {
                player_id: uuid::Uuid::nil().into(),
                reward_fp: 9_000,
                damage: 40,
            }],
        };
        let encoded = death.encode();
        let decoded = FishDeath::decode(&encoded).unwrap();
        assert_eq!(decoded.contributors.len(), 1);
        assert_eq!(decoded.contributors[0].damage, 40);
    }
}
