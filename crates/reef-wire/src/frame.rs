//! The ordered receive and send pipelines that sit between a raw TCP/WS
//! byte stream and decoded payload bytes.
//!
//! Receive order: parse header -> enforce packet-id whitelist and size
//! policy -> CRC32 check -> HMAC verify (constant time) -> AES-GCM decrypt
//! -> nonce monotonicity check. Each step fails fast with the matching
//! fatal [`WireError`], since a tampered or malformed frame is never worth
//! trying to recover.

use crate::error::WireError;
use crate::header::{Header, HEADER_LEN};
use crate::packet_id::PacketId;
use reef_crypto::SessionKeys;

const GCM_TAG_LEN: usize = 16;
const HMAC_LEN: usize = 32;

/// A validated, decrypted frame ready for payload decoding.
pub struct DecodedFrame {
    pub packet_id: PacketId,
    pub nonce: u64,
    pub payload: Vec<u8>,
}

/// Runs the full receive pipeline over one raw frame.
///
/// `last_nonce` is the session's high-water mark; frames must carry a
/// strictly greater nonce than the last one accepted, enforcing both replay
/// rejection and ordering. The caller updates `*last_nonce` only after this
/// call returns `Ok`.
pub fn decode_frame(
    raw: &[u8],
    keys: &SessionKeys,
    last_nonce: u64,
) -> Result<DecodedFrame, WireError> {
    if raw.len() < HEADER_LEN {
        return Err(WireError::PayloadTooSmall);
    }
    let header = Header::decode(raw)?;
    let packet_id = PacketId::from_u16(header.packet_id)?;

    let body = &raw[HEADER_LEN..];
    if body.len() != header.payload_length as usize {
        return Err(WireError::InvalidPacket);
    }
    if body.len() < GCM_TAG_LEN + HMAC_LEN {
        return Err(WireError::PayloadTooSmall);
    }
    let ciphertext_and_tag_len = body.len() - HMAC_LEN;
    let (ciphertext_and_tag, hmac_tag_bytes) = body.split_at(ciphertext_and_tag_len);

    let mut computed_crc = crc32fast::Hasher::new();
    computed_crc.update(&header.crc_window());
    computed_crc.update(ciphertext_and_tag);
    if computed_crc.finalize() != header.crc32 {
        return Err(WireError::InvalidChecksum);
    }

    let mut hmac_input = Vec::with_capacity(HEADER_LEN + ciphertext_and_tag.len());
    hmac_input.extend_from_slice(&header.encode());
    hmac_input.extend_from_slice(ciphertext_and_tag);
    let hmac_tag: [u8; HMAC_LEN] = hmac_tag_bytes
        .try_into()
        .map_err(|_| WireError::InvalidPacket)?;
    keys.verify_hmac(&hmac_input, &hmac_tag)
        .map_err(|_| WireError::InvalidHmac)?;

    if header.nonce <= last_nonce {
        return Err(WireError::InvalidNonce);
    }

    let plaintext = keys.decrypt(header.nonce, ciphertext_and_tag)?;

    let policy = packet_id.size_policy();
    policy.accepts(plaintext.len())?;

    Ok(DecodedFrame {
        packet_id,
        nonce: header.nonce,
        payload: plaintext,
    })
}

/// Builds one framed, encrypted, authenticated message ready to write to
/// the wire: `header || ciphertext || gcm_tag || hmac_tag`.
pub fn encode_frame(
    packet_id: PacketId,
    payload: &[u8],
    proto_version: u8,
    nonce: u64,
    keys: &SessionKeys,
) -> Vec<u8> {
    let ciphertext_and_tag = keys.encrypt(nonce, payload);

    let mut header = Header {
        proto_version,
        packet_id: packet_id.as_u16(),
        payload_length: (ciphertext_and_tag.len() + HMAC_LEN) as u32,
        crc32: 0,
        nonce,
    };
    let mut crc = crc32fast::Hasher::new();
    crc.update(&header.crc_window());
    crc.update(&ciphertext_and_tag);
    header.crc32 = crc.finalize();

    let mut hmac_input = Vec::with_capacity(HEADER_LEN + ciphertext_and_tag.len());
    hmac_input.extend_from_slice(&header.encode());
    hmac_input.extend_from_slice(&ciphertext_and_tag);
    let hmac_tag = keys.hmac(&hmac_input);

    let mut framed = Vec::with_capacity(HEADER_LEN + ciphertext_and_tag.len() + HMAC_LEN);
    framed.extend_from_slice(&header.encode());
    framed.extend_from_slice(&ciphertext_and_tag);
    framed.extend_from_slice(&hmac_tag);
    framed
}
