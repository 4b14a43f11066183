use crate::error::WireError;

/// Upper bound on a variable-size payload, independent of its declared
/// minimum. Guards against a malicious `payload_length` field driving an
/// unbounded allocation before the CRC/HMAC checks even run.
pub const MAX_VARIABLE_PAYLOAD: usize = 4096;

/// Whether a packet id's payload is a fixed number of bytes or a
/// variable-length payload with a declared minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePolicy {
    Fixed(usize),
    Variable { min: usize, max: usize },
}

impl SizePolicy {
    pub fn accepts(&self, len: usize) -> Result<(), WireError> {
        match *self {
            SizePolicy::Fixed(n) if len == n => Ok(()),
            SizePolicy::Fixed(n) if len < n => Err(WireError::PayloadTooSmall),
            SizePolicy::Fixed(_) => Err(WireError::PayloadTooLarge),
            SizePolicy::Variable { min, .. } if len < min => Err(WireError::PayloadTooSmall),
            SizePolicy::Variable { max, .. } if len > max => Err(WireError::PayloadTooLarge),
            SizePolicy::Variable { .. } => Ok(()),
        }
    }
}

/// The whitelisted packet ids, grouped by range exactly as the wire
/// protocol organizes them: handshake (0x0001-0x000F), game action
/// (0x0010-0x001F), game state (0x0020-0x002F), player (0x0040-0x004F),
/// room (0x0050-0x005F), time-sync (0x0060-0x006F), system (0x00F0-0x00FF).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum PacketId {
    HandshakeRequest = 0x0001,
    HandshakeResponse = 0x0002,
    ShotFired = 0x0010,
    HitResult = 0x0011,
    BalanceUpdate = 0x0012,
    WeaponSwitch = 0x0013,
    RoomSnapshot = 0x0020,
    FishSpawn = 0x0021,
    FishDeath = 0x0022,
    PlayerJoin = 0x0040,
    RoomCreate = 0x0050,
    RoomJoin = 0x0051,
    GameStart = 0x0054,
    TimeSyncPing = 0x0060,
    TimeSyncPong = 0x0061,
    Error = 0x00F0,
}

impl PacketId {
    pub fn from_u16(id: u16) -> Result<Self, WireError> {
        match id {
            0x0001 => Ok(PacketId::HandshakeRequest),
            0x0002 => Ok(PacketId::HandshakeResponse),
            0x0010 => Ok(PacketId::ShotFired),
            0x0011 => Ok(PacketId::HitResult),
            0x0012 => Ok(PacketId::BalanceUpdate),
            0x0013 => Ok(PacketId::WeaponSwitch),
            0x0020 => Ok(PacketId::RoomSnapshot),
            0x0021 => Ok(PacketId::FishSpawn),
            0x0022 => Ok(PacketId::FishDeath),
            0x0040 => Ok(PacketId::PlayerJoin),
            0x0050 => Ok(PacketId::RoomCreate),
            0x0051 => Ok(PacketId::RoomJoin),
            0x0054 => Ok(PacketId::GameStart),
            0x0060 => Ok(PacketId::TimeSyncPing),
            0x0061 => Ok(PacketId::TimeSyncPong),
            0x00F0 => Ok(PacketId::Error),
            other => Err(WireError::UnknownPacketId(other)),
        }
    }

    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn size_policy(self) -> SizePolicy {
        use SizePolicy::*;
        match self {
            PacketId::HandshakeRequest => Fixed(98),
            PacketId::HandshakeResponse => Fixed(145),
            PacketId::ShotFired => Fixed(53),
            PacketId::HitResult => Variable {
                min: 30,
                max: MAX_VARIABLE_PAYLOAD,
            },
            PacketId::BalanceUpdate => Fixed(37),
            PacketId::WeaponSwitch => Fixed(25),
            PacketId::RoomSnapshot => Variable {
                min: 32,
                max: MAX_VARIABLE_PAYLOAD,
            },
            PacketId::FishSpawn => Fixed(54),
            PacketId::FishDeath => Variable {
                min: 36,
                max: MAX_VARIABLE_PAYLOAD,
            },
            PacketId::PlayerJoin => Fixed(66),
            PacketId::RoomCreate => Fixed(41),
            PacketId::RoomJoin => Fixed(46),
            PacketId::GameStart => Fixed(8),
            PacketId::TimeSyncPing => Fixed(12),
            PacketId::TimeSyncPong => Fixed(20),
            PacketId::Error => Variable {
                min: 4,
                max: MAX_VARIABLE_PAYLOAD,
            },
        }
    }
}
