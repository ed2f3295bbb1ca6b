//! Big-endian output writer for handshake encodings.

use crate::core::{EncodeError, MAX_U24};

/// Placeholder for a length prefix written before its body is known.
#[derive(Debug)]
#[must_use = "a reserved length must be finished"]
pub struct LengthSlot {
    offset: usize,
    width: usize,
}

/// Append-only writer producing handshake wire bytes.
#[derive(Debug, Clone, Default)]
pub struct HandshakeWriter {
    buf: Vec<u8>,
}

impl HandshakeWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// View the written bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Take the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Write an 8-bit integer.
    pub fn put_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Write a big-endian 16-bit integer.
    pub fn put_u16(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Write the low 24 bits of `val`, big-endian.
    pub fn put_u24(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_be_bytes()[1..]);
    }

    /// Write a big-endian 32-bit integer.
    pub fn put_u32(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Write raw bytes.
    pub fn put_bytes(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Write a vector with an 8-bit length prefix.
    pub fn put_vector8(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        check_fits(data.len(), u8::MAX as usize)?;
        self.put_u8(data.len() as u8);
        self.put_bytes(data);
        Ok(())
    }

    /// Write a vector with a 16-bit length prefix.
    pub fn put_vector16(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        check_fits(data.len(), u16::MAX as usize)?;
        self.put_u16(data.len() as u16);
        self.put_bytes(data);
        Ok(())
    }

    /// Write a vector with a 24-bit length prefix.
    pub fn put_vector24(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        check_fits(data.len(), MAX_U24)?;
        self.put_u24(data.len() as u32);
        self.put_bytes(data);
        Ok(())
    }

    /// Reserve a 16-bit length prefix to be filled by [`Self::finish_length`].
    pub fn reserve_length16(&mut self) -> LengthSlot {
        let offset = self.buf.len();
        self.put_u16(0);
        LengthSlot { offset, width: 2 }
    }

    /// Patch a reserved prefix with the number of bytes written since.
    ///
    /// Returns the body length.
    pub fn finish_length(&mut self, slot: LengthSlot) -> Result<usize, EncodeError> {
        let body = self.buf.len() - slot.offset - slot.width;
        let max = (1usize << (8 * slot.width)) - 1;
        check_fits(body, max)?;
        let be = (body as u32).to_be_bytes();
        self.buf[slot.offset..slot.offset + slot.width].copy_from_slice(&be[4 - slot.width..]);
        Ok(body)
    }
}

fn check_fits(len: usize, max: usize) -> Result<(), EncodeError> {
    if len > max {
        return Err(EncodeError::VectorTooLong { len, max });
    }
    Ok(())
}
