use crate::error::WireError;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

/// Appends big-endian primitives and fixed-width byte arrays to a growable
/// buffer. Every payload struct's `encode` builds on this.
#[derive(Default)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.write_u8(v).unwrap();
        self
    }
    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.buf.write_u16::<BigEndian>(v).unwrap();
        self
    }
    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.write_u32::<BigEndian>(v).unwrap();
        self
    }
    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.write_i32::<BigEndian>(v).unwrap();
        self
    }
    pub fn u64(&mut self, v: u64) -> &mut Self {
        self.buf.write_u64::<BigEndian>(v).unwrap();
        self
    }
    pub fn i64(&mut self, v: i64) -> &mut Self {
        self.buf.write_i64::<BigEndian>(v).unwrap();
        self
    }
    pub fn f32(&mut self, v: f32) -> &mut Self {
        self.buf.write_f32::<BigEndian>(v).unwrap();
        self
    }
    pub fn bytes(&mut self, v: &[u8]) -> &mut Self {
        self.buf.write_all(v).unwrap();
        self
    }

    /// Writes `v` left-justified into exactly `width` bytes, zero-padded or
    /// truncated, matching the fixed-width string fields in the payload
    /// table (`player_name`, `room_code`).
    pub fn fixed_str(&mut self, v: &str, width: usize) -> &mut Self {
        let mut field = vec![0u8; width];
        let src = v.as_bytes();
        let n = src.len().min(width);
        field[..n].copy_from_slice(&src[..n]);
        self.buf.write_all(&field).unwrap();
        self
    }

    /// Writes a variable-length byte array as a u16 count followed by the
    /// bytes, per the protocol's array-framing convention.
    pub fn counted_bytes(&mut self, v: &[u8]) -> &mut Self {
        self.u16(v.len() as u16);
        self.bytes(v)
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads big-endian primitives and fixed-width byte arrays from a byte
/// slice, returning [`WireError::PayloadTooSmall`] on truncation.
pub struct BinaryReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> BinaryReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    pub fn u8(&mut self) -> Result<u8, WireError> {
        self.cursor.read_u8().map_err(|_| WireError::PayloadTooSmall)
    }
    pub fn u16(&mut self) -> Result<u16, WireError> {
        self.cursor
            .read_u16::<BigEndian>()
            .map_err(|_| WireError::PayloadTooSmall)
    }
    pub fn u32(&mut self) -> Result<u32, WireError> {
        self.cursor
            .read_u32::<BigEndian>()
            .map_err(|_| WireError::PayloadTooSmall)
    }
    pub fn i32(&mut self) -> Result<i32, WireError> {
        self.cursor
            .read_i32::<BigEndian>()
            .map_err(|_| WireError::PayloadTooSmall)
    }
    pub fn u64(&mut self) -> Result<u64, WireError> {
        self.cursor
            .read_u64::<BigEndian>()
            .map_err(|_| WireError::PayloadTooSmall)
    }
    pub fn i64(&mut self) -> Result<i64, WireError> {
        self.cursor
            .read_i64::<BigEndian>()
            .map_err(|_| WireError::PayloadTooSmall)
    }
    pub fn f32(&mut self) -> Result<f32, WireError> {
        self.cursor
            .read_f32::<BigEndian>()
            .map_err(|_| WireError::PayloadTooSmall)
    }

    pub fn bytes(&mut self, n: usize) -> Result<Vec<u8>, WireError> {
        let mut buf = vec![0u8; n];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|_| WireError::PayloadTooSmall)?;
        Ok(buf)
    }

    pub fn array16(&mut self) -> Result<[u8; 16], WireError> {
        let mut buf = [0u8; 16];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|_| WireError::PayloadTooSmall)?;
        Ok(buf)
    }

    pub fn fixed_str(&mut self, width: usize) -> Result<String, WireError> {
        let raw = self.bytes(width)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    pub fn counted_bytes(&mut self) -> Result<Vec<u8>, WireError> {
        let len = self.u16()? as usize;
        self.bytes(len)
    }

    pub fn remaining(&self) -> usize {
        let pos = self.cursor.position() as usize;
        self.cursor.get_ref().len().saturating_sub(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_primitives() {
        let mut w = BinaryWriter::new();
        w.u8(7).u16(1000).u32(70000).i64(-5).f32(1.5);
        let bytes = w.into_vec();
        let mut r = BinaryReader::new(&bytes);
        assert_eq!(r.u8().unwrap(), 7);
        assert_eq!(r.u16().unwrap(), 1000);
        assert_eq!(r.u32().unwrap(), 70000);
        assert_eq!(r.i64().unwrap(), -5);
        assert_eq!(r.f32().unwrap(), 1.5);
    }

    #[test]
    fn fixed_str_pads_and_truncates() {
        let mut w = BinaryWriter::new();
        w.fixed_str("hi", 6);
        let bytes = w.into_vec();
        assert_eq!(bytes.len(), 6);
        let mut r = BinaryReader::new(&bytes);
        assert_eq!(r.fixed_str(6).unwrap(), "hi");
    }

    #[test]
    fn counted_bytes_round_trip() {
        let mut w = BinaryWriter::new();
        w.counted_bytes(b"reason text");
        let bytes = w.into_vec();
        let mut r = BinaryReader::new(&bytes);
        assert_eq!(r.counted_bytes().unwrap(), b"reason text");
    }

    #[test]
    fn truncated_read_errors() {
        let bytes = [0u8; 1];
        let mut r = BinaryReader::new(&bytes);
        assert_eq!(r.u64(), Err(WireError::PayloadTooSmall));
    }
}
