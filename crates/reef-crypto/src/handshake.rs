use crate::error::HandshakeError;
use crate::keys::SessionKeys;
use hkdf::Hkdf;
use p256::EncodedPoint;
use p256::PublicKey;
use p256::ecdh::EphemeralSecret;
use rand_core::OsRng;
use rand_core::RngCore;
use sha2::Digest;
use sha2::Sha256;

/// Info string folded into the HKDF expansion, binding the derived keys to
/// this protocol version so a different wire version can never collide.
const KDF_INFO_SUFFIX: &[u8] = b"fishshoot-v2 session keys";

/// Server-side ephemeral material generated for one handshake attempt.
///
/// Holds the ephemeral secret only until [`Self::derive`] consumes it —
/// after that the secret is dropped and only `SessionKeys` remain.
pub struct ServerHandshake {
    secret: EphemeralSecret,
    public_bytes: [u8; 65],
    server_nonce: [u8; 32],
    salt: [u8; 32],
}

impl ServerHandshake {
    /// Generates a fresh ephemeral P-256 keypair, server nonce, and salt.
    pub fn generate() -> Self {
        let secret = EphemeralSecret::random(&mut OsRng);
        let encoded = EncodedPoint::from(secret.public_key());
        let mut public_bytes = [0u8; 65];
        public_bytes.copy_from_slice(encoded.as_bytes());
        let mut server_nonce = [0u8; 32];
        let mut salt = [0u8; 32];
        OsRng.fill_bytes(&mut server_nonce);
        OsRng.fill_bytes(&mut salt);
        Self {
            secret,
            public_bytes,
            server_nonce,
            salt,
        }
    }

    pub fn public_key_bytes(&self) -> [u8; 65] {
        self.public_bytes
    }
    pub fn server_nonce(&self) -> [u8; 32] {
        self.server_nonce
    }
    pub fn salt(&self) -> [u8; 32] {
        self.salt
    }

    /// Completes the handshake: parses the client's public key, computes
    /// the ECDH shared secret, binds a transcript of both public keys and
    /// both nonces, and expands 64 bytes of session key material via
    /// HKDF-SHA256.
    pub fn derive(
        self,
        client_public_key: &[u8; 65],
        client_nonce: &[u8; 32],
        proto_version: u8,
    ) -> Result<SessionKeys, HandshakeError> {
        let client_public = PublicKey::from_sec1_bytes(client_public_key)
            .map_err(|_| HandshakeError::InvalidClientPublicKey)?;
        let shared = self.secret.diffie_hellman(&client_public);
        let transcript = transcript(
            client_public_key,
            &self.public_bytes,
            client_nonce,
            &self.server_nonce,
            proto_version,
        );
        derive_session_keys(shared.raw_secret_bytes().as_slice(), &self.salt, &transcript)
    }
}

/// `transcript = SHA256(client_pub || server_pub || client_nonce || server_nonce || proto_version)`.
pub fn transcript(
    client_public_key: &[u8; 65],
    server_public_key: &[u8; 65],
    client_nonce: &[u8; 32],
    server_nonce: &[u8; 32],
    proto_version: u8,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(client_public_key);
    hasher.update(server_public_key);
    hasher.update(client_nonce);
    hasher.update(server_nonce);
    hasher.update([proto_version]);
    hasher.finalize().into()
}

/// `HKDF(ikm=shared, salt=salt, info=transcript || "fishshoot-v2 session keys", L=64)`.
pub fn derive_session_keys(
    shared_secret: &[u8],
    salt: &[u8; 32],
    transcript: &[u8; 32],
) -> Result<SessionKeys, HandshakeError> {
    let hk = Hkdf::<Sha256>::new(Some(salt), shared_secret);
    let mut info = Vec::with_capacity(32 + KDF_INFO_SUFFIX.len());
    info.extend_from_slice(transcript);
    info.extend_from_slice(KDF_INFO_SUFFIX);
    let mut okm = [0u8; 64];
    hk.expand(&info, &mut okm)
        .map_err(|_| HandshakeError::KeyDerivationFailed)?;
    Ok(SessionKeys::from_okm(&okm))
}

/// Client-side counterpart: given the server's response material and the
/// client's own ephemeral secret, derive the same session keys.
pub fn client_derive(
    client_secret: EphemeralSecret,
    client_public_key: &[u8; 65],
    server_public_key: &[u8; 65],
    client_nonce: &[u8; 32],
    server_nonce: &[u8; 32],
    salt: &[u8; 32],
    proto_version: u8,
) -> Result<SessionKeys, HandshakeError> {
    let server_public = PublicKey::from_sec1_bytes(server_public_key)
        .map_err(|_| HandshakeError::InvalidClientPublicKey)?;
    let shared = client_secret.diffie_hellman(&server_public);
    let transcript = transcript(
        client_public_key,
        server_public_key,
        client_nonce,
        server_nonce,
        proto_version,
    );
    derive_session_keys(shared.raw_secret_bytes().as_slice(), salt, &transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_and_server_derive_matching_keys() {
        let client_secret = EphemeralSecret::random(&mut OsRng);
        let encoded = EncodedPoint::from(client_secret.public_key());
        let mut client_public_bytes = [0u8; 65];
        client_public_bytes.copy_from_slice(encoded.as_bytes());
        let client_nonce = [7u8; 32];

        let server = ServerHandshake::generate();
        let server_public_bytes = server.public_key_bytes();
        let server_nonce = server.server_nonce();
        let salt = server.salt();

        let server_keys = server
            .derive(&client_public_bytes, &client_nonce, 2)
            .expect("server derivation succeeds");
        let client_keys = client_derive(
            client_secret,
            &client_public_bytes,
            &server_public_bytes,
            &client_nonce,
            &server_nonce,
            &salt,
            2,
        )
        .expect("client derivation succeeds");

        assert_eq!(server_keys.encryption_key(), client_keys.encryption_key());
        assert_eq!(server_keys.hmac_key(), client_keys.hmac_key());
    }

    #[test]
    fn garbage_client_public_key_is_rejected() {
        let server = ServerHandshake::generate();
        let garbage = [0xFFu8; 65];
        let result = server.derive(&garbage, &[0u8; 32], 2);
        assert_eq!(result.unwrap_err(), HandshakeError::InvalidClientPublicKey);
    }

    #[test]
    fn transcript_changes_with_any_input() {
        let a = transcript(&[1u8; 65], &[2u8; 65], &[3u8; 32], &[4u8; 32], 2);
        let b = transcript(&[1u8; 65], &[2u8; 65], &[3u8; 32], &[4u8; 32], 3);
        assert_ne!(a, b);
    }
}
