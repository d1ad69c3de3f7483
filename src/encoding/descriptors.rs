//! Encoding implementations for SCTE-35 descriptors.

use crate::descriptors::{CUEI_IDENTIFIER, SEGMENTATION_DESCRIPTOR_TAG, SegmentationDescriptor, SpliceDescriptor};
use crate::encoding::{BitWriter, Encodable, EncodingResult};
use crate::upid::SegmentationUpid;

/// Largest payload a one-byte `descriptor_length` can announce.
const MAX_DESCRIPTOR_LENGTH: u64 = 0xFF;

impl Encodable for SpliceDescriptor {
    fn encode(&self, writer: &mut BitWriter) -> EncodingResult<()> {
        match self {
            SpliceDescriptor::Segmentation(segmentation) => segmentation.encode(writer),
            SpliceDescriptor::Unknown { tag, data } => {
                writer.write_bits(*tag as u64, 8)?;
                writer.write_field("descriptor_length", data.len() as u64, 8)?;
                writer.write_bytes(data)
            }
        }
    }

    fn encoded_size(&self) -> usize {
        match self {
            SpliceDescriptor::Segmentation(segmentation) => segmentation.encoded_size(),
            SpliceDescriptor::Unknown { data, .. } => 2 + data.len(),
        }
    }
}

impl SegmentationDescriptor {
    /// Bytes following `descriptor_length`.
    fn payload_length(&self) -> usize {
        // identifier, event id, cancel indicator and reserved bits
        let mut length = 9;
        if self.segmentation_event_cancel_indicator {
            return length;
        }

        // flags
        length += 1;
        if !self.program_segmentation_flag {
            length += 1 + 6 * self.components.len();
        }
        if self.segmentation_duration.is_some() {
            length += 5;
        }
        // upid type, upid length, upid, type id, segment num, segments expected
        length += 2 + self.segmentation_upid.encoded_len() + 3;
        if self.sub_segment_num.is_some() && self.sub_segments_expected.is_some() {
            length += 2;
        }
        length
    }

    fn encode_payload(&self, writer: &mut BitWriter) -> EncodingResult<()> {
        writer.write_bits(CUEI_IDENTIFIER as u64, 32)?;
        writer.write_bits(self.segmentation_event_id as u64, 32)?;
        writer.write_bit(self.segmentation_event_cancel_indicator)?;
        writer.write_bits(0x7F, 7)?;

        if self.segmentation_event_cancel_indicator {
            return Ok(());
        }

        writer.write_bit(self.program_segmentation_flag)?;
        writer.write_bit(self.segmentation_duration.is_some())?;
        writer.write_bit(self.delivery_restrictions.is_none())?;
        match &self.delivery_restrictions {
            Some(restrictions) => {
                writer.write_bit(restrictions.web_delivery_allowed)?;
                writer.write_bit(restrictions.no_regional_blackout)?;
                writer.write_bit(restrictions.archive_allowed)?;
                writer.write_bits(restrictions.device_restrictions.bits() as u64, 2)?;
            }
            None => writer.write_bits(0x1F, 5)?,
        }

        if !self.program_segmentation_flag {
            writer.write_field("component_count", self.components.len() as u64, 8)?;
            for component in &self.components {
                writer.write_bits(component.component_tag as u64, 8)?;
                writer.write_bits(0x7F, 7)?;
                writer.write_field("pts_offset", component.pts_offset, 33)?;
            }
        }

        if let Some(duration) = self.segmentation_duration {
            writer.write_field("segmentation_duration", duration, 40)?;
        }

        writer.write_bits(self.segmentation_upid.upid_type().id() as u64, 8)?;
        writer.write_field(
            "segmentation_upid_length",
            self.segmentation_upid.encoded_len() as u64,
            8,
        )?;
        match &self.segmentation_upid {
            SegmentationUpid::Single(upid) => writer.write_bytes(&upid.value)?,
            SegmentationUpid::Mid(upids) => {
                for upid in upids {
                    writer.write_bits(upid.upid_type.id() as u64, 8)?;
                    writer.write_field("mid_upid_length", upid.value.len() as u64, 8)?;
                    writer.write_bytes(&upid.value)?;
                }
            }
        }

        writer.write_bits(self.segmentation_type.id() as u64, 8)?;
        writer.write_bits(self.segment_num as u64, 8)?;
        writer.write_bits(self.segments_expected as u64, 8)?;
        if let (Some(num), Some(expected)) = (self.sub_segment_num, self.sub_segments_expected) {
            writer.write_bits(num as u64, 8)?;
            writer.write_bits(expected as u64, 8)?;
        }
        Ok(())
    }
}

impl Encodable for SegmentationDescriptor {
    fn encode(&self, writer: &mut BitWriter) -> EncodingResult<()> {
        writer.write_bits(SEGMENTATION_DESCRIPTOR_TAG as u64, 8)?;
        let payload_length = self.payload_length() as u64;
        if payload_length > MAX_DESCRIPTOR_LENGTH {
            return Err(crate::encoding::EncodingError::ValueTooLarge {
                field: "descriptor_length",
                max_value: MAX_DESCRIPTOR_LENGTH,
                actual_value: payload_length,
            });
        }
        writer.write_bits(payload_length, 8)?;
        self.encode_payload(writer)
    }

    fn encoded_size(&self) -> usize {
        2 + self.payload_length()
    }
}
