//! Serialization of complete splice_info_sections.

use crate::crc;
use crate::encoding::{BitWriter, Encodable, EncodingError, EncodingResult};
use crate::fmt::to_hex;
use crate::types::{SCTE35_TABLE_ID, SpliceInfoSection};

/// Largest `section_length` that keeps a section within 4096 bytes.
pub const MAX_SECTION_LENGTH: usize = 4093;

/// Bytes from `protocol_version` through `splice_command_type`.
const FIXED_HEADER_TAIL: usize = 11;

impl SpliceInfoSection {
    fn descriptor_loop_length(&self) -> usize {
        self.splice_descriptors
            .iter()
            .map(|descriptor| descriptor.encoded_size())
            .sum()
    }

    /// Value of the `section_length` field: every byte after it, CRC included.
    fn section_length(&self) -> usize {
        FIXED_HEADER_TAIL
            + self.splice_command.encoded_size()
            + 2
            + self.descriptor_loop_length()
            + 4
    }

    /// Serializes the section to wire bytes.
    ///
    /// Every length field is recomputed from the current values and a seeded
    /// CRC-32 (see [`crc::checksum`]) is appended.
    ///
    /// # Errors
    /// [`EncodingError::ValueTooLarge`] when a field overflows its wire width
    /// or the section exceeds [`MAX_SECTION_LENGTH`], and
    /// [`EncodingError::InvalidFieldValue`] for splice inserts missing a
    /// required splice time.
    pub fn serialize(&self) -> EncodingResult<Vec<u8>> {
        let section_length = self.section_length();
        if section_length > MAX_SECTION_LENGTH {
            return Err(EncodingError::ValueTooLarge {
                field: "section_length",
                max_value: MAX_SECTION_LENGTH as u64,
                actual_value: section_length as u64,
            });
        }

        let mut writer = BitWriter::with_capacity(3 + section_length);

        writer.write_bits(SCTE35_TABLE_ID as u64, 8)?;
        // section_syntax_indicator, private_indicator
        writer.write_bits(0, 2)?;
        writer.write_bits(self.sap_type.bits() as u64, 2)?;
        writer.write_bits(section_length as u64, 12)?;

        writer.write_bits(self.protocol_version() as u64, 8)?;
        // encrypted_packet, encryption_algorithm
        writer.write_bits(0, 7)?;
        writer.write_field("pts_adjustment", self.pts_adjustment, 33)?;
        writer.write_bits(self.cw_index as u64, 8)?;
        writer.write_field("tier", self.tier as u64, 12)?;

        writer.write_field(
            "splice_command_length",
            self.splice_command.encoded_size() as u64,
            12,
        )?;
        writer.write_bits(self.splice_command.command_type() as u64, 8)?;
        self.splice_command.encode(&mut writer)?;

        writer.write_field(
            "descriptor_loop_length",
            self.descriptor_loop_length() as u64,
            16,
        )?;
        for descriptor in &self.splice_descriptors {
            descriptor.encode(&mut writer)?;
        }

        let mut buffer = writer.finish();
        let crc_32 = crc::checksum(&buffer);
        buffer.extend_from_slice(&crc_32.to_be_bytes());
        Ok(buffer)
    }

    /// Serializes the section as lowercase hex.
    pub fn to_hex(&self) -> EncodingResult<String> {
        Ok(to_hex(&self.serialize()?))
    }

    /// Serializes the section as standard base64.
    #[cfg(feature = "base64")]
    pub fn to_base64(&self) -> EncodingResult<String> {
        Ok(data_encoding::BASE64.encode(&self.serialize()?))
    }
}
