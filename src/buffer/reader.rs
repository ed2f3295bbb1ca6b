//! Handshake message reassembly buffer.
//!
//! Transport records deliver handshake bytes in arbitrary chunks: one message
//! may span several records, or one record may carry several messages. The
//! [`HandshakeBuffer`] linearizes those chunks and exposes bounds-checked,
//! big-endian readers over the unread region.
//!
//! Layout:
//! ```text
//! +-----------------+----------------------+----------------+
//! | consumed        | unread (available)   | spare capacity |
//! +-----------------+----------------------+----------------+
//! 0                pos                    len            capacity
//! ```
//!
//! Every reader checks the requested count against `available()` before
//! touching a byte, so a failed read never advances the cursor.

use tracing::{debug, trace};

use crate::core::{DecodeError, MAX_U24};

/// Position marker returned by [`HandshakeBuffer::checkpoint`].
///
/// Only valid until the next [`HandshakeBuffer::append`], which may compact
/// the buffer and move unread bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pos: usize,
    generation: u64,
}

/// Growable reassembly buffer with a read cursor.
#[derive(Debug, Clone, Default)]
pub struct HandshakeBuffer {
    /// Bytes received; `data.len()` is the logical length.
    data: Vec<u8>,
    /// Read cursor. Invariant: `pos <= data.len()`.
    pos: usize,
    /// Bumped on every compaction, invalidating outstanding checkpoints.
    generation: u64,
}

impl HandshakeBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            pos: 0,
            generation: 0,
        }
    }

    /// Create a buffer holding `bytes`, cursor at the start.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            data: bytes.into(),
            pos: 0,
            generation: 0,
        }
    }

    /// Ingest one transport-delivered chunk.
    ///
    /// Consumed bytes are discarded first by shifting the unread region to
    /// the start, then capacity grows as needed to hold `unread + fragment`.
    pub fn append(&mut self, fragment: &[u8]) {
        self.compact();
        if !fragment.is_empty() {
            let before = self.data.capacity();
            self.data.extend_from_slice(fragment);
            if self.data.capacity() != before {
                trace!(
                    old_capacity = before,
                    new_capacity = self.data.capacity(),
                    "handshake buffer grown"
                );
            }
        }
    }

    /// Drop already-consumed bytes.
    pub fn compact(&mut self) {
        if self.pos == 0 {
            return;
        }
        let unread = self.data.len() - self.pos;
        self.data.copy_within(self.pos.., 0);
        self.data.truncate(unread);
        trace!(discarded = self.pos, unread, "handshake buffer compacted");
        self.pos = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Number of unread bytes.
    pub fn available(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Check if there are no unread bytes.
    pub fn is_empty(&self) -> bool {
        self.available() == 0
    }

    /// Logical length (consumed + unread).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Allocated capacity.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Read cursor offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The unread bytes, without consuming them.
    pub fn unread(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    /// Discard everything, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.clear();
        self.pos = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Remember the current cursor position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            generation: self.generation,
        }
    }

    /// Move the cursor back to a checkpoint taken since the last compaction.
    ///
    /// # Errors
    /// Returns `StaleCheckpoint` if the buffer compacted or was cleared after
    /// the checkpoint was taken. The cursor is not moved.
    pub fn rewind(&mut self, checkpoint: Checkpoint) -> Result<(), DecodeError> {
        if checkpoint.generation != self.generation {
            debug!(
                taken = checkpoint.generation,
                current = self.generation,
                "rewind to stale checkpoint refused"
            );
            return Err(DecodeError::StaleCheckpoint {
                taken: checkpoint.generation,
                current: self.generation,
            });
        }
        self.pos = checkpoint.pos.min(self.data.len());
        Ok(())
    }

    /// Run `decode` against the buffer, restoring the cursor if it fails.
    ///
    /// Lets multi-field decoders present the same all-or-nothing behaviour as
    /// the single reads.
    pub fn with_rollback<T, E, F>(&mut self, decode: F) -> Result<T, E>
    where
        E: From<DecodeError>,
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let start = self.checkpoint();
        match decode(self) {
            Ok(value) => Ok(value),
            Err(e) => {
                self.rewind(start)?;
                Err(e)
            }
        }
    }

    fn ensure(&self, requested: usize) -> Result<(), DecodeError> {
        let available = self.available();
        if requested > available {
            return Err(DecodeError::UnexpectedEndOfData {
                requested,
                available,
            });
        }
        Ok(())
    }

    // Callers must have checked bounds.
    fn take_u8(&mut self) -> u8 {
        let b = self.data[self.pos];
        self.pos += 1;
        b
    }

    /// Peek at the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8, DecodeError> {
        self.ensure(1)?;
        Ok(self.data[self.pos])
    }

    /// Read an 8-bit integer.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.ensure(1)?;
        Ok(self.take_u8())
    }

    /// Read a big-endian 16-bit integer.
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.ensure(2)?;
        let hi = self.take_u8() as u16;
        Ok((hi << 8) | self.take_u8() as u16)
    }

    /// Read a big-endian 24-bit integer.
    pub fn read_u24(&mut self) -> Result<u32, DecodeError> {
        self.ensure(3)?;
        let mut val = 0u32;
        for _ in 0..3 {
            val = (val << 8) | self.take_u8() as u32;
        }
        Ok(val)
    }

    /// Read a big-endian 32-bit integer.
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.ensure(4)?;
        let mut val = 0u32;
        for _ in 0..4 {
            val = (val << 8) | self.take_u8() as u32;
        }
        Ok(val)
    }

    /// Skip `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Fill `dst` completely from the unread bytes.
    ///
    /// Short reads are an error; nothing is copied unless all of `dst` can be.
    pub fn read_bytes(&mut self, dst: &mut [u8]) -> Result<(), DecodeError> {
        self.ensure(dst.len())?;
        dst.copy_from_slice(&self.data[self.pos..self.pos + dst.len()]);
        self.pos += dst.len();
        Ok(())
    }

    /// Consume exactly `n` bytes and return them.
    pub fn read_slice(&mut self, n: usize) -> Result<&[u8], DecodeError> {
        self.ensure(n)?;
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..start + n])
    }

    /// Read a vector with an 8-bit length prefix.
    pub fn read_vector8(&mut self) -> Result<&[u8], DecodeError> {
        self.read_vector(1)
    }

    /// Read a vector with a 16-bit length prefix.
    pub fn read_vector16(&mut self) -> Result<&[u8], DecodeError> {
        self.read_vector(2)
    }

    /// Read a vector with a 24-bit length prefix.
    pub fn read_vector24(&mut self) -> Result<&[u8], DecodeError> {
        self.read_vector(3)
    }

    // The prefix is peeked, not consumed, so a body that overruns the
    // available bytes leaves the cursor on the prefix.
    fn read_vector(&mut self, prefix: usize) -> Result<&[u8], DecodeError> {
        self.ensure(prefix)?;
        let len = self.data[self.pos..self.pos + prefix]
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);
        debug_assert!(len <= MAX_U24);
        self.ensure(prefix + len)?;
        let start = self.pos + prefix;
        self.pos = start + len;
        Ok(&self.data[start..start + len])
    }
}

impl From<&[u8]> for HandshakeBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eod(requested: usize, available: usize) -> DecodeError {
        DecodeError::UnexpectedEndOfData {
            requested,
            available,
        }
    }

    #[test]
    fn test_read_integers() {
        let mut buf = HandshakeBuffer::from_bytes(hex::decode("01020304050607080910").unwrap());

        assert_eq!(buf.read_u8().unwrap(), 0x01);
        assert_eq!(buf.read_u16().unwrap(), 0x0203);
        assert_eq!(buf.read_u24().unwrap(), 0x040506);
        assert_eq!(buf.read_u32().unwrap(), 0x07080910);
        assert!(buf.is_empty());
        assert_eq!(buf.read_u8(), Err(eod(1, 0)));
    }

    #[test]
    fn test_short_integer_read_does_not_consume() {
        let mut buf = HandshakeBuffer::from_bytes(vec![0xAA, 0xBB, 0xCC]);

        assert_eq!(buf.read_u32(), Err(eod(4, 3)));
        assert_eq!(buf.available(), 3);
        assert_eq!(buf.read_u24().unwrap(), 0xAABBCC);
    }

    #[test]
    fn test_read_vectors() {
        let mut buf = HandshakeBuffer::new();
        buf.append(&[0x02, 0xAA, 0xBB]);
        buf.append(&[0x00, 0x01, 0xCC]);
        buf.append(&[0x00, 0x00, 0x03, 0x01, 0x02, 0x03]);

        assert_eq!(buf.read_vector8().unwrap(), &[0xAA, 0xBB]);
        assert_eq!(buf.read_vector16().unwrap(), &[0xCC]);
        assert_eq!(buf.read_vector24().unwrap(), &[0x01, 0x02, 0x03]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_empty_vector() {
        let mut buf = HandshakeBuffer::from_bytes(vec![0x00, 0x00]);
        assert!(buf.read_vector16().unwrap().is_empty());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_vector_overrun_leaves_cursor() {
        // Prefix claims 5 bytes, only 2 follow
        let mut buf = HandshakeBuffer::from_bytes(vec![0x00, 0x05, 0x01, 0x02]);

        assert_eq!(buf.read_vector16(), Err(eod(7, 4)));
        assert_eq!(buf.available(), 4);
        assert_eq!(buf.position(), 0);

        // Truncated prefix
        let mut buf = HandshakeBuffer::from_bytes(vec![0x00, 0x00]);
        assert_eq!(buf.read_vector24(), Err(eod(3, 2)));
        assert_eq!(buf.available(), 2);
    }

    #[test]
    fn test_vector_never_exceeds_available() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        for cut in 0..bytes.len() {
            let mut buf = HandshakeBuffer::from_bytes(bytes[..cut].to_vec());
            let before = buf.available();
            match buf.read_vector8() {
                Ok(v) => assert!(v.len() < before),
                Err(_) => assert_eq!(buf.available(), before),
            }
        }
    }

    #[test]
    fn test_read_bytes_exact() {
        let mut buf = HandshakeBuffer::from_bytes(vec![1, 2, 3]);

        let mut dst = [0u8; 4];
        assert_eq!(buf.read_bytes(&mut dst), Err(eod(4, 3)));
        assert_eq!(dst, [0u8; 4]);
        assert_eq!(buf.available(), 3);

        let mut dst = [0u8; 2];
        buf.read_bytes(&mut dst).unwrap();
        assert_eq!(dst, [1, 2]);
        assert_eq!(buf.available(), 1);
    }

    #[test]
    fn test_compaction_on_append() {
        let mut buf = HandshakeBuffer::new();
        buf.append(&[1, 2, 3, 4]);
        buf.skip(3).unwrap();
        assert_eq!(buf.position(), 3);

        buf.append(&[5, 6]);
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.unread(), &[4, 5, 6]);
    }

    #[test]
    fn test_many_small_reads_stay_bounded() {
        let mut buf = HandshakeBuffer::new();
        for i in 0..10_000u32 {
            buf.append(&i.to_be_bytes());
            assert_eq!(buf.read_u32().unwrap(), i);
        }
        assert!(buf.len() <= 4);
        assert!(buf.capacity() < 1024);
    }

    #[test]
    fn test_growth_keeps_unread_bytes() {
        let mut buf = HandshakeBuffer::with_capacity(2);
        buf.append(&[0xDE]);
        let big = vec![0x5A; 4096];
        buf.append(&big);

        assert_eq!(buf.read_u8().unwrap(), 0xDE);
        assert_eq!(buf.read_slice(4096).unwrap(), &big[..]);
    }

    #[test]
    fn test_fragmentation_invariance() {
        let stream = hex::decode(
            "16000102030400000568322d7370020a0b0c0d0e0f101112131415161718191a1b",
        )
        .unwrap();

        let read_all = |buf: &mut HandshakeBuffer| {
            (
                buf.read_u8().unwrap(),
                buf.read_u24().unwrap(),
                buf.read_u16().unwrap(),
                buf.read_vector16().unwrap().to_vec(),
                buf.read_vector8().unwrap().to_vec(),
                buf.read_u32().unwrap(),
            )
        };

        let mut whole = HandshakeBuffer::from_bytes(stream.clone());
        let expected = read_all(&mut whole);

        for chunk in 1..=stream.len() {
            let mut buf = HandshakeBuffer::new();
            for part in stream.chunks(chunk) {
                buf.append(part);
            }
            assert_eq!(read_all(&mut buf), expected, "chunk size {chunk}");
        }
    }

    #[test]
    fn test_checkpoint_rewind() {
        let mut buf = HandshakeBuffer::from_bytes(vec![0x00, 0x03, 0x61, 0x62, 0x63]);
        let cp = buf.checkpoint();

        buf.read_u16().unwrap();
        buf.skip(2).unwrap();
        assert_eq!(buf.available(), 1);

        buf.rewind(cp).unwrap();
        assert_eq!(buf.read_vector16().unwrap(), b"abc");
    }

    #[test]
    fn test_rewind_after_compaction_refused() {
        let mut buf = HandshakeBuffer::from_bytes(vec![1, 2, 3, 4]);
        buf.skip(2).unwrap();
        let cp = buf.checkpoint();
        buf.skip(1).unwrap();

        buf.append(&[5]);
        assert_eq!(buf.position(), 0);
        assert_eq!(
            buf.rewind(cp),
            Err(DecodeError::StaleCheckpoint {
                taken: 0,
                current: 1,
            })
        );
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.unread(), &[4, 5]);

        let mut buf = HandshakeBuffer::from_bytes(vec![1, 2]);
        let cp = buf.checkpoint();
        buf.clear();
        assert!(buf.rewind(cp).is_err());
    }

    #[test]
    fn test_with_rollback() {
        let mut buf = HandshakeBuffer::from_bytes(vec![0x00, 0x01, 0x02]);

        let result: Result<(u16, u16), DecodeError> =
            buf.with_rollback(|b| Ok((b.read_u16()?, b.read_u16()?)));
        assert_eq!(result, Err(eod(2, 1)));
        assert_eq!(buf.position(), 0);

        let result: Result<(u16, u8), DecodeError> =
            buf.with_rollback(|b| Ok((b.read_u16()?, b.read_u8()?)));
        assert_eq!(result, Ok((0x0001, 0x02)));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_with_rollback_reports_compaction() {
        let mut buf = HandshakeBuffer::from_bytes(vec![1, 2, 3]);
        buf.skip(1).unwrap();

        let result: Result<(), DecodeError> = buf.with_rollback(|b| {
            b.read_u8()?;
            b.compact();
            Err(eod(9, 0))
        });
        assert!(matches!(result, Err(DecodeError::StaleCheckpoint { .. })));
        assert_eq!(buf.unread(), &[3]);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut buf = HandshakeBuffer::from_bytes(vec![0x07]);
        assert_eq!(buf.peek_u8().unwrap(), 0x07);
        assert_eq!(buf.available(), 1);
        assert_eq!(buf.read_u8().unwrap(), 0x07);
        assert_eq!(buf.peek_u8(), Err(eod(1, 0)));
    }
}
