use reef_anticheat::Admission;
use reef_wire::WireError;

/// Errors the controller can raise while dispatching one inbound packet.
///
/// Mirrors §7's error taxonomy: fatal wire errors close the socket, the
/// rest are reported and the session continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    Wire(WireError),
    RateLimited,
    Banned,
    SequenceRejected,
    TimestampRejected,
    NotHandshaked,
    UnexpectedPacket,
    UnknownSession,
    UnknownRoom,
    RoomFull,
    PlayerNotInRoom,
    UnknownWeapon,
    NotHost,
    AlreadyStarted,
    InsufficientBalance,
    DuplicateRoomCode,
}

impl ProtocolError {
    /// Whether this error is fatal (close the socket) or reported with the
    /// session left open, per §7's two-bucket policy.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProtocolError::Wire(_) | ProtocolError::Banned)
    }

    /// The short, detail-free code sent in an `ERROR` packet — §7 forbids
    /// leaking internal diagnostic detail over the wire.
    pub fn code(&self) -> u16 {
        match self {
            ProtocolError::Wire(WireError::InvalidPacket) => 0x0001,
            ProtocolError::Wire(WireError::InvalidChecksum) => 0x0002,
            ProtocolError::Wire(WireError::InvalidHmac) => 0x0003,
            ProtocolError::Wire(WireError::DecryptionFailed) => 0x0004,
            ProtocolError::Wire(WireError::InvalidNonce) => 0x0005,
            ProtocolError::Wire(WireError::InvalidHandshake) => 0x0006,
            ProtocolError::Wire(WireError::UnknownPacketId(_)) => 0x0007,
            ProtocolError::Wire(WireError::PayloadTooLarge) => 0x0008,
            ProtocolError::Wire(WireError::PayloadTooSmall) => 0x0009,
            ProtocolError::Wire(WireError::KeyDerivationFailed) => 0x000A,
            ProtocolError::RateLimited => 0x0010,
            ProtocolError::Banned => 0x0011,
            ProtocolError::SequenceRejected => 0x0012,
            ProtocolError::TimestampRejected => 0x0013,
            ProtocolError::NotHandshaked => 0x0014,
            ProtocolError::UnexpectedPacket => 0x0015,
            ProtocolError::UnknownSession => 0x0016,
            ProtocolError::UnknownRoom => 0x0017,
            ProtocolError::RoomFull => 0x0018,
            ProtocolError::PlayerNotInRoom => 0x0019,
            ProtocolError::UnknownWeapon => 0x001A,
            ProtocolError::NotHost => 0x001B,
            ProtocolError::AlreadyStarted => 0x001C,
            ProtocolError::InsufficientBalance => 0x001D,
            ProtocolError::DuplicateRoomCode => 0x001E,
        }
    }

    /// Builds the `ERROR` packet to send back for this failure. Per §7 the
    /// wire-visible message carries only the short code, never the debug
    /// detail in this enum's variants.
    pub fn to_error_packet(&self) -> reef_wire::payload::ErrorPacket {
        reef_wire::payload::ErrorPacket {
            error_code: self.code(),
            message: format!("{}", self),
        }
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ProtocolError {}

impl From<WireError> for ProtocolError {
    fn from(e: WireError) -> Self {
        ProtocolError::Wire(e)
    }
}

impl From<Admission> for ProtocolError {
    fn from(a: Admission) -> Self {
        match a {
            Admission::Admitted => {
                unreachable!("callers only convert non-admitted outcomes")
            }
            Admission::RateLimited => ProtocolError::RateLimited,
            Admission::Banned => ProtocolError::Banned,
        }
    }
}
