use crate::error::CryptoError;
use aes_gcm::Aes256Gcm;
use aes_gcm::Key;
use aes_gcm::Nonce;
use aes_gcm::aead::Aead;
use aes_gcm::aead::KeyInit;
use aes_gcm::aead::Payload;
use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Derived per-session {encryption_key, hmac_key} pair, the output of the
/// handshake's HKDF expansion.
#[derive(Clone)]
pub struct SessionKeys {
    encryption_key: [u8; 32],
    hmac_key: [u8; 32],
}

impl SessionKeys {
    /// Splits a 64-byte HKDF output into the two session keys: first 32
    /// bytes encryption, next 32 bytes HMAC, per the key schedule.
    pub fn from_okm(okm: &[u8; 64]) -> Self {
        let mut encryption_key = [0u8; 32];
        let mut hmac_key = [0u8; 32];
        encryption_key.copy_from_slice(&okm[0..32]);
        hmac_key.copy_from_slice(&okm[32..64]);
        Self {
            encryption_key,
            hmac_key,
        }
    }

    pub fn encryption_key(&self) -> &[u8; 32] {
        &self.encryption_key
    }
    pub fn hmac_key(&self) -> &[u8; 32] {
        &self.hmac_key
    }

    /// Encrypts `plaintext` with AES-256-GCM. The 12-byte IV is
    /// `be_u64(nonce) || u32_zero`, matching the wire protocol's nonce
    /// derivation. Returns ciphertext with the 16-byte GCM tag appended.
    pub fn encrypt(&self, nonce: u64, plaintext: &[u8]) -> Vec<u8> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.encryption_key));
        let iv = iv_from_nonce(nonce);
        cipher
            .encrypt(
                Nonce::from_slice(&iv),
                Payload {
                    msg: plaintext,
                    aad: &[],
                },
            )
            .expect("aes-gcm encryption over bounded plaintext never fails")
    }

    /// Decrypts `ciphertext_and_tag` (ciphertext with the 16-byte GCM tag
    /// appended) using the same nonce derivation as [`Self::encrypt`].
    pub fn decrypt(&self, nonce: u64, ciphertext_and_tag: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.encryption_key));
        let iv = iv_from_nonce(nonce);
        cipher
            .decrypt(
                Nonce::from_slice(&iv),
                Payload {
                    msg: ciphertext_and_tag,
                    aad: &[],
                },
            )
            .map_err(|_| CryptoError::DecryptionFailed)
    }

    /// Computes HMAC-SHA256 over `data` with the session's hmac key.
    pub fn hmac(&self, data: &[u8]) -> [u8; 32] {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.hmac_key)
            .expect("hmac accepts any key length");
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Verifies a 32-byte HMAC tag in constant time.
    pub fn verify_hmac(&self, data: &[u8], tag: &[u8; 32]) -> Result<(), CryptoError> {
        let computed = self.hmac(data);
        if computed.ct_eq(tag).into() {
            Ok(())
        } else {
            Err(CryptoError::AuthenticationFailed)
        }
    }
}

/// Derives the 12-byte AES-GCM IV from the monotonic nonce: `be_u64(nonce) || u32_zero`.
fn iv_from_nonce(nonce: u64) -> [u8; 12] {
    let mut iv = [0u8; 12];
    iv[0..8].copy_from_slice(&nonce.to_be_bytes());
    iv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SessionKeys {
        let mut okm = [0u8; 64];
        for (i, b) in okm.iter_mut().enumerate() {
            *b = i as u8;
        }
        SessionKeys::from_okm(&okm)
    }

    #[test]
    fn round_trips_plaintext() {
        let k = keys();
        let ct = k.encrypt(1, b"shot fired payload");
        let pt = k.decrypt(1, &ct).unwrap();
        assert_eq!(pt, b"shot fired payload");
    }

    #[test]
    fn wrong_nonce_fails_decryption() {
        let k = keys();
        let ct = k.encrypt(1, b"payload");
        assert_eq!(k.decrypt(2, &ct), Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn tampered_ciphertext_fails_decryption() {
        let k = keys();
        let mut ct = k.encrypt(1, b"payload");
        let last = ct.len() - 1;
        ct[last] ^= 0xFF;
        assert_eq!(k.decrypt(1, &ct), Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn hmac_round_trips() {
        let k = keys();
        let tag = k.hmac(b"header||ciphertext||tag");
        assert!(k.verify_hmac(b"header||ciphertext||tag", &tag).is_ok());
    }

    #[test]
    fn hmac_rejects_tampered_data() {
        let k = keys();
        let tag = k.hmac(b"original");
        assert_eq!(
            k.verify_hmac(b"tampered", &tag),
            Err(CryptoError::AuthenticationFailed)
        );
    }
}
