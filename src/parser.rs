//! Main parsing functions for SCTE-35 messages.
//!
//! This module contains the decoding logic for `splice_info_section` and the
//! commands and descriptors it carries.

use tracing::{debug, warn};

use crate::bit_reader::BitReader;
use crate::crc::validate_message_crc;
use crate::descriptors::{
    CUEI_IDENTIFIER, Component, DeliveryRestrictions, DeviceRestrictions,
    SEGMENTATION_DESCRIPTOR_TAG, SegmentationDescriptor, SpliceDescriptor,
};
use crate::error::ParseError;
use crate::pts::Pts;
use crate::time::{BreakDuration, SpliceTime};
use crate::types::{
    SCTE35_TABLE_ID, SapType, SegmentationType, SpliceCommand, SpliceInfoSection, SpliceInsert,
    SpliceInsertComponent, TimeSignal,
};
use crate::upid::{SegmentationUpid, SegmentationUpidType};

/// Fixed header (14 bytes), descriptor loop length (2) and CRC (4).
pub const MIN_SECTION_LENGTH: usize = 20;

const CRC_LENGTH: usize = 4;

/// `splice_command_length` value meaning "length not given".
const UNSPECIFIED_COMMAND_LENGTH: usize = 0xFFF;

/// Parses a complete SCTE-35 splice information section.
///
/// The buffer must start at the table id. The CRC is not validated; use
/// [`parse_splice_info_section_checked`] for that.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first malformed field. No partial
/// section is returned.
///
/// # Example
///
/// ```rust
/// use scte35_cue::{parse_splice_info_section, SpliceCommand};
/// use data_encoding::BASE64;
///
/// let buffer = BASE64.decode(b"/DAWAAAAAAAAAP/wBQb+Qjo1vQAAuwxz9A==").unwrap();
/// let section = parse_splice_info_section(&buffer).unwrap();
///
/// assert!(matches!(section.splice_command(), SpliceCommand::TimeSignal(_)));
/// assert_eq!(section.pts().map(|pts| pts.ticks()), Some(0x423a35bd));
/// ```
pub fn parse_splice_info_section(buffer: &[u8]) -> Result<SpliceInfoSection, ParseError> {
    if buffer.len() < MIN_SECTION_LENGTH {
        return Err(ParseError::TooShort(buffer.len()));
    }

    let mut reader = BitReader::new(buffer);

    let table_id = reader.read_u8()?;
    if table_id != SCTE35_TABLE_ID {
        return Err(ParseError::UnknownTableId(table_id));
    }
    let _section_syntax_indicator = reader.read_flag()?;
    let _private_indicator = reader.read_flag()?;
    let sap_type = SapType::from_bits(reader.read_bits(2)? as u8);
    let section_length = reader.read_bits(12)? as usize;
    if section_length + 3 != buffer.len() {
        debug!(
            section_length,
            buffer_length = buffer.len(),
            "section_length does not match buffer length"
        );
    }

    let protocol_version = reader.read_u8()?;
    if protocol_version != 0 {
        return Err(ParseError::UnsupportedProtocolVersion(protocol_version));
    }
    if reader.read_flag()? {
        return Err(ParseError::EncryptionUnsupported);
    }
    let _encryption_algorithm = reader.read_bits(6)?;
    let pts_adjustment = reader.read_bits(33)?;
    let cw_index = reader.read_u8()?;
    let tier = reader.read_bits(12)? as u16;
    let splice_command_length = reader.read_bits(12)? as usize;
    let splice_command_type = reader.read_u8()?;

    let command_start = reader.position();
    let splice_command = parse_splice_command(&mut reader, splice_command_type)?;
    let command_bytes_read = (reader.position() - command_start) / 8;

    if splice_command_length != UNSPECIFIED_COMMAND_LENGTH
        && splice_command_length != command_bytes_read
    {
        warn!(
            splice_command_length,
            command_bytes_read, "splice_command_length does not match the decoded command"
        );
        // Skip a longer declared command when the skipped bytes still leave
        // room for the loop length and CRC.
        let extra = splice_command_length.saturating_sub(command_bytes_read);
        if extra > 0 && reader.remaining_bytes() >= extra + 2 + CRC_LENGTH {
            reader.skip_bits(extra * 8)?;
        }
    }

    let descriptor_loop_length = reader.read_u16()? as usize;
    if descriptor_loop_length + CRC_LENGTH > reader.remaining_bytes() {
        return Err(ParseError::InvalidLength(
            "descriptor_loop_length overruns section",
        ));
    }
    let descriptor_loop = reader.read_bytes(descriptor_loop_length)?;
    let splice_descriptors = parse_descriptor_loop(descriptor_loop)?;

    if reader.remaining_bytes() > CRC_LENGTH {
        debug!(
            trailing = reader.remaining_bytes() - CRC_LENGTH,
            "ignoring bytes between descriptor loop and CRC"
        );
    }

    Ok(SpliceInfoSection::assemble(
        sap_type,
        pts_adjustment,
        cw_index,
        tier,
        splice_command,
        splice_descriptors,
    ))
}

/// Parses a section after verifying its CRC-32.
///
/// Both the seeded CRC written by [`SpliceInfoSection::serialize`] and the
/// conventional MPEG-2 CRC are accepted.
///
/// # Errors
///
/// [`ParseError::ChecksumMismatch`] when the CRC matches neither variant, or
/// any error of [`parse_splice_info_section`].
pub fn parse_splice_info_section_checked(
    buffer: &[u8],
) -> Result<SpliceInfoSection, ParseError> {
    let section = parse_splice_info_section(buffer)?;

    // The CRC closes the section as delimited by section_length, unless that
    // length is inconsistent with the buffer.
    let section_end = 3 + ((((buffer[1] & 0x0F) as usize) << 8) | buffer[2] as usize);
    let crc_scope = if (MIN_SECTION_LENGTH..=buffer.len()).contains(&section_end) {
        &buffer[..section_end]
    } else {
        buffer
    };
    validate_message_crc(crc_scope)?;
    Ok(section)
}

/// Parses a PSI payload that starts with a pointer field.
///
/// The pointer field byte and the `pointer` bytes it announces are skipped.
///
/// # Example
///
/// ```rust
/// use scte35_cue::parse_with_pointer_field;
/// use data_encoding::BASE64;
///
/// let mut payload = vec![0x00];
/// payload.extend(BASE64.decode(b"/DAWAAAAAAAAAP/wBQb+Qjo1vQAAuwxz9A==").unwrap());
/// assert!(parse_with_pointer_field(&payload).is_ok());
/// ```
pub fn parse_with_pointer_field(payload: &[u8]) -> Result<SpliceInfoSection, ParseError> {
    parse_splice_info_section(skip_pointer_field(payload)?)
}

/// Like [`parse_with_pointer_field`], verifying the CRC-32 the way
/// [`parse_splice_info_section_checked`] does.
pub fn parse_with_pointer_field_checked(payload: &[u8]) -> Result<SpliceInfoSection, ParseError> {
    parse_splice_info_section_checked(skip_pointer_field(payload)?)
}

fn skip_pointer_field(payload: &[u8]) -> Result<&[u8], ParseError> {
    let Some((&pointer, rest)) = payload.split_first() else {
        return Err(ParseError::TooShort(0));
    };
    rest.get(pointer as usize..)
        .ok_or(ParseError::TooShort(payload.len()))
}

fn parse_splice_command(
    reader: &mut BitReader,
    splice_command_type: u8,
) -> Result<SpliceCommand, ParseError> {
    match splice_command_type {
        SpliceCommand::SPLICE_NULL => Ok(SpliceCommand::SpliceNull),
        SpliceCommand::SPLICE_INSERT => Ok(SpliceCommand::SpliceInsert(parse_splice_insert(reader)?)),
        SpliceCommand::TIME_SIGNAL => Ok(SpliceCommand::TimeSignal(TimeSignal {
            splice_time: parse_splice_time(reader)?,
        })),
        other => Err(ParseError::UnsupportedSpliceCommand(other)),
    }
}

fn parse_splice_insert(reader: &mut BitReader) -> Result<SpliceInsert, ParseError> {
    let splice_event_id = reader.read_u32()?;
    let splice_event_cancel_indicator = reader.read_flag()?;
    reader.skip_bits(7)?;

    if splice_event_cancel_indicator {
        return Ok(SpliceInsert {
            splice_event_id,
            splice_event_cancel_indicator,
            ..SpliceInsert::default()
        });
    }

    let out_of_network_indicator = reader.read_flag()?;
    let program_splice_flag = reader.read_flag()?;
    let duration_flag = reader.read_flag()?;
    let splice_immediate_flag = reader.read_flag()?;
    reader.skip_bits(4)?;

    let mut splice_time = None;
    let mut components = Vec::new();
    if program_splice_flag {
        if !splice_immediate_flag {
            let time = parse_splice_time(reader)?;
            if !time.time_specified_flag() {
                return Err(ParseError::UnsupportedSpliceCommand(
                    SpliceCommand::SPLICE_INSERT,
                ));
            }
            splice_time = Some(time);
        }
    } else {
        let component_count = reader.read_u8()?;
        for _ in 0..component_count {
            let component_tag = reader.read_u8()?;
            let splice_time = if splice_immediate_flag {
                None
            } else {
                Some(parse_splice_time(reader)?)
            };
            components.push(SpliceInsertComponent {
                component_tag,
                splice_time,
            });
        }
    }

    let break_duration = if duration_flag {
        Some(parse_break_duration(reader)?)
    } else {
        None
    };

    Ok(SpliceInsert {
        splice_event_id,
        splice_event_cancel_indicator,
        out_of_network_indicator,
        program_splice_flag,
        splice_immediate_flag,
        splice_time,
        components,
        break_duration,
        unique_program_id: reader.read_u16()?,
        avail_num: reader.read_u8()?,
        avails_expected: reader.read_u8()?,
    })
}

fn parse_splice_time(reader: &mut BitReader) -> Result<SpliceTime, ParseError> {
    if reader.read_flag()? {
        reader.skip_bits(6)?;
        Ok(SpliceTime::new(Pts::new(reader.read_bits(33)?)))
    } else {
        reader.skip_bits(7)?;
        Ok(SpliceTime::unspecified())
    }
}

fn parse_break_duration(reader: &mut BitReader) -> Result<BreakDuration, ParseError> {
    let auto_return = reader.read_flag()?;
    reader.skip_bits(6)?;
    Ok(BreakDuration {
        auto_return,
        duration: reader.read_bits(33)?,
    })
}

fn parse_descriptor_loop(mut loop_bytes: &[u8]) -> Result<Vec<SpliceDescriptor>, ParseError> {
    let mut descriptors = Vec::new();
    while !loop_bytes.is_empty() {
        let [tag, length, rest @ ..] = loop_bytes else {
            return Err(ParseError::InvalidLength(
                "descriptor header overruns descriptor loop",
            ));
        };
        let length = *length as usize;
        if length > rest.len() {
            return Err(ParseError::InvalidLength(
                "descriptor_length overruns descriptor loop",
            ));
        }
        let (payload, remaining) = rest.split_at(length);

        descriptors.push(match *tag {
            SEGMENTATION_DESCRIPTOR_TAG => {
                SpliceDescriptor::Segmentation(parse_segmentation_descriptor(payload)?)
            }
            tag => SpliceDescriptor::Unknown {
                tag,
                data: payload.to_vec(),
            },
        });
        loop_bytes = remaining;
    }
    Ok(descriptors)
}

/// Parses the payload of a segmentation descriptor (the bytes after the
/// length field). Every read is bounded by the payload.
pub(crate) fn parse_segmentation_descriptor(
    payload: &[u8],
) -> Result<SegmentationDescriptor, ParseError> {
    let mut reader = BitReader::new(payload);

    let identifier = reader
        .read_u32()
        .map_err(|_| ParseError::InvalidLength("segmentation descriptor too short for identifier"))?;
    if identifier != CUEI_IDENTIFIER {
        return Err(ParseError::InvalidDescriptorId(identifier));
    }

    let segmentation_event_id = reader.read_u32()?;
    let segmentation_event_cancel_indicator = reader.read_flag()?;
    reader.skip_bits(7)?;

    if segmentation_event_cancel_indicator {
        return Ok(SegmentationDescriptor::cancelled(segmentation_event_id));
    }

    let program_segmentation_flag = reader.read_flag()?;
    let segmentation_duration_flag = reader.read_flag()?;
    let delivery_not_restricted_flag = reader.read_flag()?;
    let delivery_restrictions = if delivery_not_restricted_flag {
        reader.skip_bits(5)?;
        None
    } else {
        Some(DeliveryRestrictions {
            web_delivery_allowed: reader.read_flag()?,
            no_regional_blackout: reader.read_flag()?,
            archive_allowed: reader.read_flag()?,
            device_restrictions: DeviceRestrictions::from_bits(reader.read_bits(2)? as u8),
        })
    };

    let mut components = Vec::new();
    if !program_segmentation_flag {
        let component_count = reader.read_u8()?;
        for _ in 0..component_count {
            let component_tag = reader.read_u8()?;
            reader.skip_bits(7)?;
            components.push(Component {
                component_tag,
                pts_offset: reader.read_bits(33)?,
            });
        }
    }

    let segmentation_duration = if segmentation_duration_flag {
        Some(reader.read_bits(40)?)
    } else {
        None
    };

    let upid_type = SegmentationUpidType::from(reader.read_u8()?);
    let upid_length = reader.read_u8()? as usize;
    let upid_bytes = reader
        .read_bytes(upid_length)
        .map_err(|_| ParseError::InvalidLength("segmentation_upid_length overruns descriptor"))?;
    let segmentation_upid = SegmentationUpid::read(upid_type, upid_bytes)?;

    let segmentation_type = SegmentationType::from_id(reader.read_u8()?);
    let segment_num = reader.read_u8()?;
    let segments_expected = reader.read_u8()?;

    let (sub_segment_num, sub_segments_expected) =
        if segmentation_type.has_sub_segments() && reader.remaining_bytes() >= 2 {
            (Some(reader.read_u8()?), Some(reader.read_u8()?))
        } else {
            (None, None)
        };

    Ok(SegmentationDescriptor {
        segmentation_event_id,
        segmentation_event_cancel_indicator,
        program_segmentation_flag,
        delivery_restrictions,
        components,
        segmentation_duration,
        segmentation_upid,
        segmentation_type,
        segment_num,
        segments_expected,
        sub_segment_num,
        sub_segments_expected,
        pts: None,
    })
}
