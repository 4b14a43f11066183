//! Length-framed binary wire protocol: header, packet-id whitelist, CRC32
//! integrity check, and the AES-256-GCM / HMAC-SHA256 receive and send
//! pipelines built on [`reef_crypto::SessionKeys`].
//!
//! ## Framing
//!
//! - [`header::Header`] — the 19-byte big-endian frame header
//! - [`packet_id::PacketId`] — the whitelisted packet ids and their size policy
//! - [`frame::decode_frame`] / [`frame::encode_frame`] — the full pipeline
//!
//! ## Payloads
//!
//! - [`payload`] — one struct per packet id, with binary encode/decode

pub mod codec;
pub mod error;
pub mod frame;
pub mod header;
pub mod packet_id;
pub mod payload;

pub use error::WireError;
pub use frame::{decode_frame, encode_frame, DecodedFrame};
pub use header::Header;
pub use packet_id::{PacketId, SizePolicy};
