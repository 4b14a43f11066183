/// Failures during handshake or session key derivation.
///
/// All variants here are fatal per the wire protocol's error policy — the
/// socket closes without emitting an encrypted error packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeError {
    InvalidClientPublicKey,
    KeyDerivationFailed,
}

impl std::fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidClientPublicKey => write!(f, "invalid client public key"),
            Self::KeyDerivationFailed => write!(f, "key derivation failed"),
        }
    }
}

impl std::error::Error for HandshakeError {}

/// Failures encrypting/decrypting/authenticating a frame's ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    DecryptionFailed,
    AuthenticationFailed,
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DecryptionFailed => write!(f, "decryption failed"),
            Self::AuthenticationFailed => write!(f, "hmac authentication failed"),
        }
    }
}

impl std::error::Error for CryptoError {}
