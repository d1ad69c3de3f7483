//! Splice descriptors.
//!
//! Only the segmentation descriptor (tag 0x02) is modelled. Every other tag
//! is kept as opaque bytes so it survives a parse/serialize round trip.

use std::time::Duration;

use crate::pts::Pts;
use crate::types::SegmentationType;
use crate::upid::{SegmentationUpid, SegmentationUpidType};

#[cfg(feature = "serde")]
use serde::Serialize;

/// The "CUEI" identifier every SCTE-35 descriptor must carry.
pub const CUEI_IDENTIFIER: u32 = 0x4355_4549;

/// Descriptor tag of the segmentation descriptor.
pub const SEGMENTATION_DESCRIPTOR_TAG: u8 = 0x02;

const BLACKOUT_MARKER: &str = "BLACKOUT";
const LICENSE_ROTATION_MARKER: &str = "comcast:linear:licenserotation";

/// A descriptor from the section's descriptor loop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SpliceDescriptor {
    /// A segmentation descriptor (tag 0x02).
    Segmentation(SegmentationDescriptor),
    /// Any other descriptor, kept verbatim.
    Unknown {
        /// Descriptor tag.
        tag: u8,
        /// Payload following the length byte.
        #[cfg_attr(feature = "serde", serde(serialize_with = "crate::serialization::as_base64"))]
        data: Vec<u8>,
    },
}

impl SpliceDescriptor {
    /// The `splice_descriptor_tag`.
    pub fn tag(&self) -> u8 {
        match self {
            SpliceDescriptor::Segmentation(_) => SEGMENTATION_DESCRIPTOR_TAG,
            SpliceDescriptor::Unknown { tag, .. } => *tag,
        }
    }

    /// Returns the segmentation descriptor, if this is one.
    pub fn as_segmentation(&self) -> Option<&SegmentationDescriptor> {
        match self {
            SpliceDescriptor::Segmentation(segmentation) => Some(segmentation),
            SpliceDescriptor::Unknown { .. } => None,
        }
    }
}

impl From<SegmentationDescriptor> for SpliceDescriptor {
    fn from(segmentation: SegmentationDescriptor) -> Self {
        SpliceDescriptor::Segmentation(segmentation)
    }
}

/// Restrictions that apply when `delivery_not_restricted_flag` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DeliveryRestrictions {
    /// Delivery over the web is allowed.
    pub web_delivery_allowed: bool,
    /// No regional blackout applies.
    pub no_regional_blackout: bool,
    /// Recording for archive is allowed.
    pub archive_allowed: bool,
    /// Device group restriction.
    pub device_restrictions: DeviceRestrictions,
}

/// Device group restrictions, defined by an out of band message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum DeviceRestrictions {
    /// Restricted for device group 0.
    RestrictGroup0,
    /// Restricted for device group 1.
    RestrictGroup1,
    /// Restricted for device group 2.
    RestrictGroup2,
    /// No device restrictions.
    #[default]
    None,
}

impl DeviceRestrictions {
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => DeviceRestrictions::RestrictGroup0,
            1 => DeviceRestrictions::RestrictGroup1,
            2 => DeviceRestrictions::RestrictGroup2,
            _ => DeviceRestrictions::None,
        }
    }

    pub(crate) fn bits(&self) -> u8 {
        match self {
            DeviceRestrictions::RestrictGroup0 => 0,
            DeviceRestrictions::RestrictGroup1 => 1,
            DeviceRestrictions::RestrictGroup2 => 2,
            DeviceRestrictions::None => 3,
        }
    }
}

/// A component entry of a component-mode segmentation descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Component {
    /// Elementary stream component tag.
    pub component_tag: u8,
    /// Offset from the signal PTS in 90kHz ticks (33 bits).
    pub pts_offset: u64,
}

/// A segmentation descriptor (`segmentation_descriptor()`, tag 0x02).
///
/// Descriptors carry a copy of the PTS of the signal they arrived in. It is
/// stamped when the owning section is parsed or built and is what the
/// [`State`](crate::State) machine orders descriptors by.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SegmentationDescriptor {
    pub(crate) segmentation_event_id: u32,
    pub(crate) segmentation_event_cancel_indicator: bool,
    pub(crate) program_segmentation_flag: bool,
    pub(crate) delivery_restrictions: Option<DeliveryRestrictions>,
    pub(crate) components: Vec<Component>,
    pub(crate) segmentation_duration: Option<u64>,
    pub(crate) segmentation_upid: SegmentationUpid,
    pub(crate) segmentation_type: SegmentationType,
    pub(crate) segment_num: u8,
    pub(crate) segments_expected: u8,
    pub(crate) sub_segment_num: Option<u8>,
    pub(crate) sub_segments_expected: Option<u8>,
    pub(crate) pts: Option<Pts>,
}

impl SegmentationDescriptor {
    /// A descriptor cancelling the event `event_id`. Nothing but the id is
    /// carried on the wire.
    pub(crate) fn cancelled(event_id: u32) -> Self {
        SegmentationDescriptor {
            segmentation_event_id: event_id,
            segmentation_event_cancel_indicator: true,
            program_segmentation_flag: true,
            delivery_restrictions: None,
            components: Vec::new(),
            segmentation_duration: None,
            segmentation_upid: SegmentationUpid::default(),
            segmentation_type: SegmentationType::NotIndicated,
            segment_num: 0,
            segments_expected: 0,
            sub_segment_num: None,
            sub_segments_expected: None,
            pts: None,
        }
    }

    /// Always [`CUEI_IDENTIFIER`].
    pub fn identifier(&self) -> u32 {
        CUEI_IDENTIFIER
    }

    pub fn segmentation_event_id(&self) -> u32 {
        self.segmentation_event_id
    }

    pub fn segmentation_event_cancel_indicator(&self) -> bool {
        self.segmentation_event_cancel_indicator
    }

    pub fn program_segmentation_flag(&self) -> bool {
        self.program_segmentation_flag
    }

    pub fn segmentation_duration_flag(&self) -> bool {
        self.segmentation_duration.is_some()
    }

    pub fn delivery_not_restricted_flag(&self) -> bool {
        self.delivery_restrictions.is_none()
    }

    /// Delivery restrictions, present when delivery is restricted.
    pub fn delivery_restrictions(&self) -> Option<&DeliveryRestrictions> {
        self.delivery_restrictions.as_ref()
    }

    /// Component entries, empty for program segmentation.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Segment duration in 90kHz ticks (40 bits).
    pub fn segmentation_duration(&self) -> Option<u64> {
        self.segmentation_duration
    }

    /// Segment duration as a [`Duration`].
    pub fn duration(&self) -> Option<Duration> {
        self.segmentation_duration.map(|ticks| {
            Duration::from_secs(ticks / crate::pts::PTS_CLOCK_RATE)
                + Duration::from_nanos(
                    (ticks % crate::pts::PTS_CLOCK_RATE) * 1_000_000_000
                        / crate::pts::PTS_CLOCK_RATE,
                )
        })
    }

    pub fn segmentation_upid(&self) -> &SegmentationUpid {
        &self.segmentation_upid
    }

    pub fn segmentation_upid_type(&self) -> SegmentationUpidType {
        self.segmentation_upid.upid_type()
    }

    pub fn segmentation_type(&self) -> SegmentationType {
        self.segmentation_type
    }

    pub fn segmentation_type_id(&self) -> u8 {
        self.segmentation_type.id()
    }

    pub fn segment_num(&self) -> u8 {
        self.segment_num
    }

    pub fn segments_expected(&self) -> u8 {
        self.segments_expected
    }

    pub fn sub_segment_num(&self) -> Option<u8> {
        self.sub_segment_num
    }

    pub fn sub_segments_expected(&self) -> Option<u8> {
        self.sub_segments_expected
    }

    /// PTS of the signal this descriptor arrived in.
    pub fn pts(&self) -> Option<Pts> {
        self.pts
    }

    /// Whether the segmentation type opens a segment.
    pub fn is_out(&self) -> bool {
        self.segmentation_type.is_out()
    }

    /// Whether the segmentation type ends a segment.
    pub fn is_in(&self) -> bool {
        self.segmentation_type.is_in()
    }

    /// Whether sub-segment numbering was carried.
    pub fn has_sub_segments(&self) -> bool {
        self.sub_segment_num.is_some() && self.sub_segments_expected.is_some()
    }

    /// True unless this descriptor is a non-final sub-segment.
    pub fn is_terminal_sub_segment(&self) -> bool {
        match (self.sub_segment_num, self.sub_segments_expected) {
            (Some(num), Some(expected)) => num == expected,
            _ => true,
        }
    }

    /// Whether two descriptors describe the same signal: same type, event id,
    /// PTS and segment numbering, and sub-segment numbering when both carry it.
    pub fn matches(&self, other: &SegmentationDescriptor) -> bool {
        let sub_segments_match = !(self.has_sub_segments() && other.has_sub_segments())
            || (self.sub_segment_num == other.sub_segment_num
                && self.sub_segments_expected == other.sub_segments_expected);

        self.segmentation_type == other.segmentation_type
            && self.segmentation_event_id == other.segmentation_event_id
            && self.pts == other.pts
            && self.segment_num == other.segment_num
            && self.segments_expected == other.segments_expected
            && sub_segments_match
    }

    /// Identifier of a stream switch signal.
    ///
    /// Present when the UPID is a MID of exactly two entries: an ADI containing
    /// `BLACKOUT` followed by an Ad-ID containing
    /// `comcast:linear:licenserotation`. The id is the ADI text.
    pub fn stream_switch_signal_id(&self) -> Option<String> {
        let SegmentationUpid::Mid(upids) = &self.segmentation_upid else {
            return None;
        };
        match upids.as_slice() {
            [adi, rotation]
                if adi.upid_type == SegmentationUpidType::ADI
                    && adi.contains(BLACKOUT_MARKER)
                    && rotation.upid_type == SegmentationUpidType::AdID
                    && rotation.contains(LICENSE_ROTATION_MARKER) =>
            {
                Some(adi.as_text())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upid::Upid;

    fn descriptor(segmentation_type: SegmentationType, event_id: u32, pts: u64) -> SegmentationDescriptor {
        SegmentationDescriptor {
            segmentation_event_cancel_indicator: false,
            segmentation_type,
            segment_num: 1,
            segments_expected: 1,
            pts: Some(Pts::new(pts)),
            ..SegmentationDescriptor::cancelled(event_id)
        }
    }

    #[test]
    fn test_matches() {
        let a = descriptor(SegmentationType::ProgramStart, 7, 1000);
        assert!(a.matches(&a.clone()));
        assert!(!a.matches(&descriptor(SegmentationType::ProgramStart, 8, 1000)));
        assert!(!a.matches(&descriptor(SegmentationType::ProgramStart, 7, 1001)));
        assert!(!a.matches(&descriptor(SegmentationType::ProgramEnd, 7, 1000)));
    }

    #[test]
    fn test_matches_sub_segments() {
        let mut a = descriptor(SegmentationType::ProviderPlacementOpportunityStart, 1, 10);
        a.sub_segment_num = Some(1);
        a.sub_segments_expected = Some(2);
        let mut b = a.clone();
        b.sub_segment_num = Some(2);
        assert!(!a.matches(&b));

        // Sub-segments are ignored unless both sides carry them.
        b.sub_segment_num = None;
        b.sub_segments_expected = None;
        assert!(a.matches(&b));
    }

    #[test]
    fn test_terminal_sub_segment() {
        let mut a = descriptor(SegmentationType::ProviderPlacementOpportunityStart, 1, 10);
        assert!(a.is_terminal_sub_segment());
        a.sub_segment_num = Some(1);
        a.sub_segments_expected = Some(2);
        assert!(!a.is_terminal_sub_segment());
        a.sub_segment_num = Some(2);
        assert!(a.is_terminal_sub_segment());
    }

    #[test]
    fn test_stream_switch_signal_id() {
        let mut a = descriptor(SegmentationType::UnscheduledEventStart, 1, 10);
        assert_eq!(a.stream_switch_signal_id(), None);

        a.segmentation_upid = SegmentationUpid::Mid(vec![
            Upid::new(SegmentationUpidType::ADI, "BLACKOUT:1234"),
            Upid::new(SegmentationUpidType::AdID, "comcast:linear:licenserotation"),
        ]);
        assert_eq!(a.stream_switch_signal_id().as_deref(), Some("BLACKOUT:1234"));

        a.segmentation_upid = SegmentationUpid::Mid(vec![Upid::new(
            SegmentationUpidType::ADI,
            "BLACKOUT:1234",
        )]);
        assert_eq!(a.stream_switch_signal_id(), None);
    }

    #[test]
    fn test_device_restrictions_bits() {
        for bits in 0..4 {
            assert_eq!(DeviceRestrictions::from_bits(bits).bits(), bits);
        }
    }

    #[test]
    fn test_duration() {
        let mut a = descriptor(SegmentationType::BreakStart, 1, 0);
        a.segmentation_duration = Some(2_700_000);
        assert_eq!(a.duration(), Some(Duration::from_secs(30)));
        assert!(a.segmentation_duration_flag());
    }
}
