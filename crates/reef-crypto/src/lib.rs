//! ECDH-P256 handshake, HKDF-SHA256 key schedule, and the AES-256-GCM /
//! HMAC-SHA256 primitives used by the wire codec.
//!
//! ## Handshake
//!
//! - [`ServerHandshake`] — server-side ephemeral keypair + nonce + salt,
//!   consumed by [`ServerHandshake::derive`] to produce [`SessionKeys`]
//! - [`client_derive`] — client-side counterpart
//! - [`transcript`] — the transcript binding hashed into the HKDF info
//!
//! ## Session crypto
//!
//! - [`SessionKeys`] — encrypt/decrypt (AES-256-GCM) and HMAC-SHA256
//!   sign/verify, keyed by the handshake's derived keys

mod error;
mod handshake;
mod keys;

pub use error::*;
pub use handshake::*;
pub use keys::*;
