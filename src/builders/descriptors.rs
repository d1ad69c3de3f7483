//! Builder for segmentation descriptors.

use std::time::Duration;

use super::error::{BuilderError, BuilderResult, ticks_within};
use crate::descriptors::{Component, DeliveryRestrictions, SegmentationDescriptor};
use crate::encoding::Encodable;
use crate::types::SegmentationType;
use crate::upid::{SegmentationUpid, SegmentationUpidType, Upid};

/// Largest byte run a one-byte length field can describe.
const MAX_LENGTH: usize = 255;

/// Builder for [`SegmentationDescriptor`].
///
/// Defaults to a program-level, unrestricted descriptor without UPID,
/// numbered segment 1 of 1.
///
/// ```rust
/// use std::time::Duration;
/// use scte35_cue::builders::SegmentationDescriptorBuilder;
/// use scte35_cue::{SegmentationType, SegmentationUpidType, Upid};
///
/// let descriptor = SegmentationDescriptorBuilder::new(
///     0x4800_008e,
///     SegmentationType::ProviderPlacementOpportunityStart,
/// )
/// .duration(Duration::from_secs(30))
/// .unwrap()
/// .upid(Upid::new(SegmentationUpidType::AiringID, 0x2ca0_a18a_u64.to_be_bytes()))
/// .unwrap()
/// .segment(2, 0)
/// .build()
/// .unwrap();
///
/// assert_eq!(descriptor.segmentation_duration(), Some(2_700_000));
/// assert!(descriptor.is_out());
/// ```
#[derive(Debug)]
pub struct SegmentationDescriptorBuilder {
    segmentation_event_id: u32,
    cancel: bool,
    components: Option<Vec<Component>>,
    duration: Option<u64>,
    delivery_restrictions: Option<DeliveryRestrictions>,
    upid: SegmentationUpid,
    segmentation_type: SegmentationType,
    segment_num: u8,
    segments_expected: u8,
    sub_segment: Option<(u8, u8)>,
}

impl SegmentationDescriptorBuilder {
    /// Creates a builder for the given event id and segmentation type.
    pub fn new(event_id: u32, segmentation_type: SegmentationType) -> Self {
        Self {
            segmentation_event_id: event_id,
            cancel: false,
            components: None,
            duration: None,
            delivery_restrictions: None,
            upid: SegmentationUpid::default(),
            segmentation_type,
            segment_num: 1,
            segments_expected: 1,
            sub_segment: None,
        }
    }

    /// Cancels the event. Every other setting is ignored.
    pub fn cancel_event(mut self) -> Self {
        self.cancel = true;
        self
    }

    /// Sets the segment duration.
    ///
    /// # Errors
    /// [`BuilderError::DurationTooLarge`] when the duration needs more than
    /// 40 bits of 90kHz ticks.
    pub fn duration(mut self, duration: Duration) -> BuilderResult<Self> {
        self.duration = Some(ticks_within("segmentation_duration", duration, 40)?);
        Ok(self)
    }

    /// Clears any delivery restrictions.
    pub fn no_restrictions(mut self) -> Self {
        self.delivery_restrictions = None;
        self
    }

    pub fn delivery_restrictions(mut self, restrictions: DeliveryRestrictions) -> Self {
        self.delivery_restrictions = Some(restrictions);
        self
    }

    /// Sets a single UPID.
    ///
    /// # Errors
    /// * [`BuilderError::InvalidUpidLength`] when a fixed-length type gets the
    ///   wrong number of bytes.
    /// * [`BuilderError::InvalidValue`] above 255 bytes, or for the MID type,
    ///   which must go through [`SegmentationDescriptorBuilder::mid`].
    pub fn upid(mut self, upid: Upid) -> BuilderResult<Self> {
        if upid.upid_type == SegmentationUpidType::MID {
            return Err(BuilderError::InvalidValue {
                field: "segmentation_upid",
                reason: "MID UPIDs are built from a list of UPIDs".to_string(),
            });
        }
        validate_upid(&upid)?;
        self.upid = SegmentationUpid::Single(upid);
        Ok(self)
    }

    /// Sets a MID: an ordered list of UPIDs.
    ///
    /// Entries are not held to the fixed lengths of their types, as
    /// stream switch signals carry free text under the Ad-ID type.
    ///
    /// # Errors
    /// [`BuilderError::InvalidValue`] for nested MIDs and for lists encoding
    /// to more than 255 bytes.
    pub fn mid(mut self, upids: Vec<Upid>) -> BuilderResult<Self> {
        for upid in &upids {
            if upid.upid_type == SegmentationUpidType::MID {
                return Err(BuilderError::InvalidValue {
                    field: "segmentation_upid",
                    reason: "MID entries cannot be MIDs".to_string(),
                });
            }
        }

        let upid = SegmentationUpid::Mid(upids);
        if upid.encoded_len() > MAX_LENGTH {
            return Err(BuilderError::InvalidValue {
                field: "segmentation_upid",
                reason: format!("MID encodes to {} bytes, maximum is 255", upid.encoded_len()),
            });
        }
        self.upid = upid;
        Ok(self)
    }

    /// Switches to component-level segmentation.
    ///
    /// # Errors
    /// [`BuilderError::InvalidComponentCount`] above 255 components, and
    /// [`BuilderError::InvalidValue`] for offsets wider than 33 bits.
    pub fn component_segmentation(mut self, components: Vec<Component>) -> BuilderResult<Self> {
        if components.len() > MAX_LENGTH {
            return Err(BuilderError::InvalidComponentCount {
                max: MAX_LENGTH,
                actual: components.len(),
            });
        }
        if let Some(component) = components.iter().find(|c| c.pts_offset >> 33 != 0) {
            return Err(BuilderError::InvalidValue {
                field: "pts_offset",
                reason: format!("{} does not fit in 33 bits", component.pts_offset),
            });
        }
        self.components = Some(components);
        Ok(self)
    }

    /// Sets segment numbering.
    pub fn segment(mut self, num: u8, expected: u8) -> Self {
        self.segment_num = num;
        self.segments_expected = expected;
        self
    }

    /// Sets sub-segment numbering.
    ///
    /// # Errors
    /// [`BuilderError::InvalidValue`] unless the segmentation type is a
    /// provider or distributor placement opportunity start.
    pub fn sub_segment(mut self, num: u8, expected: u8) -> BuilderResult<Self> {
        if !self.segmentation_type.has_sub_segments() {
            return Err(BuilderError::InvalidValue {
                field: "sub_segment_num",
                reason: format!("{} cannot carry sub-segments", self.segmentation_type),
            });
        }
        self.sub_segment = Some((num, expected));
        Ok(self)
    }

    /// Builds the descriptor.
    ///
    /// # Errors
    /// [`BuilderError::InvalidValue`] when the descriptor would not fit in
    /// 255 bytes.
    pub fn build(self) -> BuilderResult<SegmentationDescriptor> {
        if self.cancel {
            return Ok(SegmentationDescriptor::cancelled(self.segmentation_event_id));
        }

        let descriptor = SegmentationDescriptor {
            segmentation_event_id: self.segmentation_event_id,
            segmentation_event_cancel_indicator: false,
            program_segmentation_flag: self.components.is_none(),
            delivery_restrictions: self.delivery_restrictions,
            components: self.components.unwrap_or_default(),
            segmentation_duration: self.duration,
            segmentation_upid: self.upid,
            segmentation_type: self.segmentation_type,
            segment_num: self.segment_num,
            segments_expected: self.segments_expected,
            sub_segment_num: self.sub_segment.map(|(num, _)| num),
            sub_segments_expected: self.sub_segment.map(|(_, expected)| expected),
            pts: None,
        };

        let payload_length = descriptor.encoded_size() - 2;
        if payload_length > MAX_LENGTH {
            return Err(BuilderError::InvalidValue {
                field: "descriptor_length",
                reason: format!("descriptor payload is {payload_length} bytes, maximum is 255"),
            });
        }
        Ok(descriptor)
    }
}

fn validate_upid(upid: &Upid) -> BuilderResult<()> {
    if let Some(expected) = upid.upid_type.expected_length() {
        if upid.value.len() != expected {
            return Err(BuilderError::InvalidUpidLength {
                expected,
                actual: upid.value.len(),
            });
        }
    }
    if upid.value.len() > MAX_LENGTH {
        return Err(BuilderError::InvalidValue {
            field: "segmentation_upid",
            reason: format!("{} bytes, maximum is 255", upid.value.len()),
        });
    }
    Ok(())
}
