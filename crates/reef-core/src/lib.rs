//! Shared identifiers, fixed-point type aliases, and process-wide constants.
//!
//! Every monetary, probability, and weight quantity in the workspace is an
//! integer scaled by one of the constants below — floating point is
//! reserved for physics (position, velocity) where rounding is not
//! outcome-bearing.
//!
//! ## Core Types
//!
//! - [`ID`] — Type-safe wrapper over `uuid::Uuid`, parameterized by marker type
//! - [`Unique`] — Trait for entities with a stable opaque id
//!
//! ## Fixed-Point Scales
//!
//! - [`MONEY_SCALE`], [`RTP_SCALE`], [`WEIGHT_SCALE`], [`P_SCALE`]
#![allow(dead_code)]

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

// ============================================================================
// FIXED-POINT TYPE ALIASES
// ============================================================================
/// Integer fixed-point quantity: money, cost, reward, budget.
pub type MoneyFp = i64;
/// Integer fixed-point RTP ratio, scaled by [`RTP_SCALE`] (9000 = 90.00%).
pub type RtpFp = i64;
/// Integer fixed-point weight, scaled by [`WEIGHT_SCALE`].
pub type WeightFp = i64;
/// Integer fixed-point probability draw, scaled by [`P_SCALE`].
pub type ProbFp = i64;

/// Scale factor for all monetary/cost/reward/budget quantities.
pub const MONEY_SCALE: i64 = 1_000;
/// Scale factor for RTP ratios (basis-points-style: 9000 = 90.00%).
pub const RTP_SCALE: i64 = 10_000;
/// Scale factor for multi-target weight allocation.
pub const WEIGHT_SCALE: i64 = 1_000_000;
/// Scale factor for the soft-roll probability draw.
pub const P_SCALE: i64 = 1_000_000;

// ============================================================================
// TRAITS
// ============================================================================
/// Entities carrying a stable, opaque, type-tagged identifier.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
/// Generic ID wrapper providing compile-time type safety over `uuid::Uuid`.
///
/// `ID<Player>` and `ID<Target>` are distinct types even though both wrap a
/// `Uuid` — the marker prevents accidentally comparing or looking up a
/// player id where a target id was expected.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Casts `ID<T>` to `ID<U>` while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self::from(uuid::Uuid::deserialize(deserializer)?))
    }
}

// ============================================================================
// ENTITY MARKERS
// ============================================================================
/// Marker type for `ID<Player>`.
#[derive(Debug)]
pub struct Player;
/// Marker type for `ID<Target>`.
#[derive(Debug)]
pub struct Target;
/// Marker type for `ID<Projectile>` (bullet ids).
#[derive(Debug)]
pub struct Projectile;
/// Marker type for `ID<Room>`.
#[derive(Debug)]
pub struct Room;
/// Marker type for `ID<Session>`.
#[derive(Debug)]
pub struct Session;
/// Marker type for `ID<Receipt>`.
#[derive(Debug)]
pub struct Receipt;

/// Convenience aliases for the marker ids used throughout the workspace.
pub type PlayerId = ID<Player>;
pub type TargetId = ID<Target>;
pub type ProjectileId = ID<Projectile>;
pub type RoomId = ID<Room>;
pub type SessionId = ID<Session>;
pub type ReceiptId = ID<Receipt>;

// ============================================================================
// TIER
// ============================================================================
/// A target's tier, 1 through 6. Drives RTP, pity, and reward lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tier(u8);

impl Tier {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// Constructs a tier, clamped to `[1, 6]`.
    pub fn new(n: u8) -> Self {
        Self(n.clamp(Self::MIN, Self::MAX))
    }
    pub fn get(self) -> u8 {
        self.0
    }
    /// Zero-based index into a 6-entry tier table.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "tier {}", self.0)
    }
}

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initializes dual logging (terminal + file) with a timestamped log file.
///
/// Creates a `logs/` directory and writes DEBUG level to file, INFO to
/// terminal — same shape the rest of the workspace's binaries expect.
#[cfg(feature = "server")]
pub fn init_logging() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_cast_preserves_uuid() {
        let id: ID<Player> = ID::default();
        let uuid = id.inner();
        let cast: ID<Target> = id.cast();
        assert_eq!(cast.inner(), uuid);
    }

    #[test]
    fn id_default_is_unique() {
        let a: ID<Player> = ID::default();
        let b: ID<Player> = ID::default();
        assert_ne!(a, b);
    }

    #[test]
    fn tier_clamps_to_valid_range() {
        assert_eq!(Tier::new(0).get(), 1);
        assert_eq!(Tier::new(7).get(), 6);
        assert_eq!(Tier::new(3).get(), 3);
        assert_eq!(Tier::new(1).index(), 0);
        assert_eq!(Tier::new(6).index(), 5);
    }
}
