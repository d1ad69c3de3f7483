//! MSB-first bit cursor over a byte slice.

use crate::error::ParseError;

/// Reads fields of arbitrary bit width from a section buffer.
///
/// Most SCTE-35 fields are not byte aligned (33-bit PTS values, 12-bit
/// lengths, single flags), so the cursor counts bits rather than bytes.
pub(crate) struct BitReader<'a> {
    buffer: &'a [u8],
    /// Bits consumed so far.
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        BitReader {
            buffer,
            position: 0,
        }
    }

    /// Reads `num_bits` (at most 64) into the low bits of the result.
    ///
    /// # Errors
    ///
    /// [`ParseError::InvalidLength`] if fewer bits remain. The position does
    /// not move on error.
    pub fn read_bits(&mut self, num_bits: usize) -> Result<u64, ParseError> {
        debug_assert!(num_bits <= 64);
        if num_bits > self.remaining_bits() {
            return Err(ParseError::InvalidLength("read past end of buffer"));
        }

        let mut value = 0u64;
        let mut left = num_bits;
        while left > 0 {
            let used = self.position % 8;
            let take = left.min(8 - used);
            let byte = u64::from(self.buffer[self.position / 8]);
            let chunk = (byte >> (8 - used - take)) & ((1 << take) - 1);

            value = (value << take) | chunk;
            self.position += take;
            left -= take;
        }

        Ok(value)
    }

    pub fn read_flag(&mut self) -> Result<bool, ParseError> {
        self.read_bits(1).map(|bit| bit == 1)
    }

    pub fn read_u8(&mut self) -> Result<u8, ParseError> {
        self.read_bits(8).map(|value| value as u8)
    }

    pub fn read_u16(&mut self) -> Result<u16, ParseError> {
        self.read_bits(16).map(|value| value as u16)
    }

    pub fn read_u32(&mut self) -> Result<u32, ParseError> {
        self.read_bits(32).map(|value| value as u32)
    }

    /// Borrows the next `len` bytes. Only valid on a byte boundary.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ParseError> {
        debug_assert_eq!(self.position % 8, 0);
        let start = self.position / 8;
        let bytes = start
            .checked_add(len)
            .and_then(|end| self.buffer.get(start..end))
            .ok_or(ParseError::InvalidLength("byte run past end of buffer"))?;
        self.position += len * 8;
        Ok(bytes)
    }

    /// Skips reserved or ignored bits.
    pub fn skip_bits(&mut self, num_bits: usize) -> Result<(), ParseError> {
        if num_bits > self.remaining_bits() {
            return Err(ParseError::InvalidLength("skip past end of buffer"));
        }
        self.position += num_bits;
        Ok(())
    }

    /// Bits consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining_bits(&self) -> usize {
        self.buffer.len() * 8 - self.position
    }

    pub fn remaining_bytes(&self) -> usize {
        self.remaining_bits() / 8
    }
}
