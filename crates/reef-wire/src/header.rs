use crate::error::WireError;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

/// Fixed-size header prefixed to every frame: 19 bytes, big-endian.
///
/// Byte layout: `proto_version(1) | packet_id(2) | payload_length(4) |
/// crc32(4) | nonce(8)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub proto_version: u8,
    pub packet_id: u16,
    pub payload_length: u32,
    pub crc32: u32,
    pub nonce: u64,
}

pub const HEADER_LEN: usize = 19;

impl Header {
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        let mut cursor = Cursor::new(&mut buf[..]);
        cursor.write_u8(self.proto_version).unwrap();
        cursor.write_u16::<BigEndian>(self.packet_id).unwrap();
        cursor.write_u32::<BigEndian>(self.payload_length).unwrap();
        cursor.write_u32::<BigEndian>(self.crc32).unwrap();
        cursor.write_u64::<BigEndian>(self.nonce).unwrap();
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() < HEADER_LEN {
            return Err(WireError::PayloadTooSmall);
        }
        let mut cursor = Cursor::new(bytes);
        let proto_version = cursor.read_u8().map_err(|_| WireError::InvalidPacket)?;
        let packet_id = cursor
            .read_u16::<BigEndian>()
            .map_err(|_| WireError::InvalidPacket)?;
        let payload_length = cursor
            .read_u32::<BigEndian>()
            .map_err(|_| WireError::InvalidPacket)?;
        let crc32 = cursor
            .read_u32::<BigEndian>()
            .map_err(|_| WireError::InvalidPacket)?;
        let nonce = cursor
            .read_u64::<BigEndian>()
            .map_err(|_| WireError::InvalidPacket)?;
        Ok(Header {
            proto_version,
            packet_id,
            payload_length,
            crc32,
            nonce,
        })
    }

    /// The CRC window is the header with the `crc32` field zeroed, so the
    /// checksum can cover its own slot without a chicken-and-egg problem.
    /// The nonce is deliberately left out of the CRC window: its integrity
    /// is carried by the HMAC over the full header instead, since CRC32 is
    /// only a cheap early filter, not an authenticator.
    pub fn crc_window(&self) -> [u8; 11] {
        let mut window = [0u8; 11];
        window[0] = self.proto_version;
        window[1..3].copy_from_slice(&self.packet_id.to_be_bytes());
        window[3..7].copy_from_slice(&self.payload_length.to_be_bytes());
        window
    }
}
