//! Trait definitions for encodable types.

use super::error::EncodingResult;
use super::writer::BitWriter;

/// Types that can be written in SCTE-35 binary format.
pub trait Encodable {
    /// Writes the structure to `writer`.
    fn encode(&self, writer: &mut BitWriter) -> EncodingResult<()>;

    /// Exact number of bytes `encode` writes.
    fn encoded_size(&self) -> usize;

    /// Encodes into a new byte vector.
    fn encode_to_vec(&self) -> EncodingResult<Vec<u8>> {
        let mut writer = BitWriter::with_capacity(self.encoded_size());
        self.encode(&mut writer)?;
        Ok(writer.finish())
    }
}
