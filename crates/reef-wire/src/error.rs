use std::fmt;

/// Fatal framing errors: any of these terminates the connection per the
/// wire protocol's error policy, since they indicate either a corrupted
/// stream or a tampering attempt and no recovery is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    InvalidPacket,
    InvalidChecksum,
    InvalidHmac,
    DecryptionFailed,
    InvalidNonce,
    InvalidHandshake,
    UnknownPacketId(u16),
    PayloadTooLarge,
    PayloadTooSmall,
    KeyDerivationFailed,
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::InvalidPacket => write!(f, "INVALID_PACKET"),
            WireError::InvalidChecksum => write!(f, "INVALID_CHECKSUM"),
            WireError::InvalidHmac => write!(f, "INVALID_HMAC"),
            WireError::DecryptionFailed => write!(f, "DECRYPTION_FAILED"),
            WireError::InvalidNonce => write!(f, "INVALID_NONCE"),
            WireError::InvalidHandshake => write!(f, "INVALID_HANDSHAKE"),
            WireError::UnknownPacketId(id) => write!(f, "UNKNOWN_PACKET_ID(0x{id:04X})"),
            WireError::PayloadTooLarge => write!(f, "PAYLOAD_TOO_LARGE"),
            WireError::PayloadTooSmall => write!(f, "PAYLOAD_TOO_SMALL"),
            WireError::KeyDerivationFailed => write!(f, "KEY_DERIVATION_FAILED"),
        }
    }
}

impl std::error::Error for WireError {}

impl From<reef_crypto::CryptoError> for WireError {
    fn from(_: reef_crypto::CryptoError) -> Self {
        WireError::DecryptionFailed
    }
}

impl From<reef_crypto::HandshakeError> for WireError {
    fn from(_: reef_crypto::HandshakeError) -> Self {
        WireError::KeyDerivationFailed
    }
}
