//! Bounds-checked big-endian reader over the hop stream.

use alloy_primitives::Address;

use crate::config::HOP_HEADER_LEN;
use crate::error::DecodeError;

/// Read position within an encoded hop stream.
///
/// Every read either consumes exactly the requested bytes or fails with
/// [`DecodeError::Truncated`] without moving.
#[derive(Debug, Clone)]
pub struct RouteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RouteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether enough bytes remain for at least one more hop header
    #[inline]
    pub fn has_hop(&self) -> bool {
        self.remaining() >= HOP_HEADER_LEN
    }

    pub fn take(&mut self, field: &'static str, len: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(DecodeError::Truncated {
                field,
                needed: len,
                remaining,
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.take(field, 1)?[0])
    }

    pub fn read_u16(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        let b = self.take(field, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u24(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        let b = self.take(field, 3)?;
        Ok(u32::from_be_bytes([0, b[0], b[1], b[2]]))
    }

    /// Signed 24-bit, sign-extended to 32 bits
    pub fn read_i24(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        let raw = self.read_u24(field)?;
        Ok(((raw << 8) as i32) >> 8)
    }

    pub fn read_address(&mut self, field: &'static str) -> Result<Address, DecodeError> {
        Ok(Address::from_slice(self.take(field, 20)?))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
