//! Forward-only binary reader over a byte slice.

use crate::error::PlyError;
use glam::Vec3;

/// Reads little-endian values from a fixed-length byte source.
///
/// The position only ever moves forward and never passes the end of the source.
/// Every typed read either consumes its full width or fails with
/// [`PlyError::Truncated`] without moving.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total length of the source.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], PlyError> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(PlyError::Truncated {
                offset: self.position,
                needed,
                remaining,
            });
        }
        let data = self.data;
        let bytes = &data[self.position..self.position + needed];
        self.position += needed;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, PlyError> {
        Ok(self.take(1)?[0])
    }

    /// Read a single header character. Headers are ASCII, so one byte is one char.
    pub fn read_char(&mut self) -> Result<char, PlyError> {
        self.read_u8().map(char::from)
    }

    pub fn read_f32_le(&mut self) -> Result<f32, PlyError> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read three consecutive little-endian floats.
    pub fn read_vec3_le(&mut self) -> Result<Vec3, PlyError> {
        // Check the whole triple first so a short read leaves the cursor untouched.
        let bytes = self.take(12)?;
        let f = |o: usize| f32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);
        Ok(Vec3::new(f(0), f(4), f(8)))
    }

    /// Skip exactly `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<(), PlyError> {
        self.take(count).map(|_| ())
    }

    /// Skip up to `count` bytes, stopping at the end of the source.
    /// Returns the number of bytes actually skipped.
    pub fn skip_up_to(&mut self, count: usize) -> usize {
        let skipped = count.min(self.remaining());
        self.position += skipped;
        skipped
    }

    /// Return the next `\n`-terminated line without its terminator and move past it.
    ///
    /// Returns `None` and leaves the cursor in place when no terminator remains.
    pub fn next_line(&mut self) -> Option<&'a [u8]> {
        let data = self.data;
        let rest = &data[self.position..];
        let end = rest.iter().position(|&b| b == b'\n')?;
        self.position += end + 1;
        Some(&rest[..end])
    }
}
