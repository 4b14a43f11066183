use serde::Deserialize;
use serde::Serialize;

/// Per-category bucket parameters: capacity and steady-state refill rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    pub capacity: f64,
    pub refill_per_sec: f64,
}

/// The rate-limit categories a session or IP is throttled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BucketCategory {
    Shoot,
    Movement,
    RoomAction,
    WeaponSwitch,
    TimeSync,
    StateRequest,
    Handshake,
    Global,
}

impl BucketCategory {
    pub const ALL: [BucketCategory; 8] = [
        BucketCategory::Shoot,
        BucketCategory::Movement,
        BucketCategory::RoomAction,
        BucketCategory::WeaponSwitch,
        BucketCategory::TimeSync,
        BucketCategory::StateRequest,
        BucketCategory::Handshake,
        BucketCategory::Global,
    ];
}

/// Per-session bucket configuration (one entry per throttled category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub shoot: BucketConfig,
    pub movement: BucketConfig,
    pub room_action: BucketConfig,
    pub weapon_switch: BucketConfig,
    pub time_sync: BucketConfig,
    pub state_request: BucketConfig,
    pub handshake: BucketConfig,
    pub global: BucketConfig,
}

impl RateLimitConfig {
    pub fn get(&self, category: BucketCategory) -> BucketConfig {
        match category {
            BucketCategory::Shoot => self.shoot,
            BucketCategory::Movement => self.movement,
            BucketCategory::RoomAction => self.room_action,
            BucketCategory::WeaponSwitch => self.weapon_switch,
            BucketCategory::TimeSync => self.time_sync,
            BucketCategory::StateRequest => self.state_request,
            BucketCategory::Handshake => self.handshake,
            BucketCategory::Global => self.global,
        }
    }
}

/// Connection-level limits enforced per source IP.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionLimits {
    pub max_connections_per_ip: u32,
    pub room_ops_window_ms: u64,
    pub max_room_ops_per_ip_window: u32,
    pub bucket_expiry_ms: u64,
}
