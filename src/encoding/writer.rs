//! Bit-level writer for encoding binary data.

use super::error::{EncodingError, EncodingResult};

/// A writer that packs values of arbitrary bit width, MSB first.
///
/// This is the encoding counterpart to the parser's bit reader.
#[derive(Debug, Default)]
pub struct BitWriter {
    buffer: Vec<u8>,
    /// Bits already used in `current_byte` (0-7).
    bit_position: u8,
    current_byte: u8,
}

impl BitWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with `capacity` bytes reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Writes the low `bits` bits of `value`; higher bits are dropped.
    ///
    /// # Errors
    /// [`EncodingError::InvalidFieldValue`] if `bits` is 0 or greater than 64.
    pub fn write_bits(&mut self, value: u64, bits: u8) -> EncodingResult<()> {
        if bits == 0 || bits > 64 {
            return Err(EncodingError::InvalidFieldValue {
                field: "bits",
                value: bits.to_string(),
            });
        }

        let mut remaining = bits;
        while remaining > 0 {
            let free = 8 - self.bit_position;
            let take = remaining.min(free);
            let shift = remaining - take;
            let chunk = ((value >> shift) & ((1u64 << take) - 1)) as u8;

            self.current_byte |= chunk << (free - take);
            self.bit_position += take;
            if self.bit_position == 8 {
                self.buffer.push(self.current_byte);
                self.current_byte = 0;
                self.bit_position = 0;
            }
            remaining -= take;
        }

        Ok(())
    }

    /// Writes `value` into a `bits` wide field, rejecting values that do not
    /// fit instead of truncating them.
    ///
    /// # Errors
    /// [`EncodingError::ValueTooLarge`] naming `field`.
    pub fn write_field(&mut self, field: &'static str, value: u64, bits: u8) -> EncodingResult<()> {
        let max_value = if bits >= 64 {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        };
        if value > max_value {
            return Err(EncodingError::ValueTooLarge {
                field,
                max_value,
                actual_value: value,
            });
        }
        self.write_bits(value, bits)
    }

    /// Writes a single bit.
    pub fn write_bit(&mut self, bit: bool) -> EncodingResult<()> {
        self.write_bits(bit as u64, 1)
    }

    /// Writes whole bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> EncodingResult<()> {
        if self.bit_position == 0 {
            self.buffer.extend_from_slice(bytes);
            return Ok(());
        }
        for &byte in bytes {
            self.write_bits(byte as u64, 8)?;
        }
        Ok(())
    }

    /// Returns the written bytes, zero padding a partial last byte.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_position > 0 {
            self.buffer.push(self.current_byte);
        }
        self.buffer
    }

    /// Bytes written so far, counting a partial byte.
    pub fn len(&self) -> usize {
        self.buffer.len() + usize::from(self.bit_position > 0)
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && self.bit_position == 0
    }
}
