//! Core SCTE-35 data structures and types.
//!
//! This module contains the main structures representing SCTE-35 messages,
//! commands, and related components.

use crate::descriptors::{SegmentationDescriptor, SpliceDescriptor};
use crate::pts::Pts;
use crate::time::{BreakDuration, SpliceTime};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Table identifier of every SCTE-35 section.
pub const SCTE35_TABLE_ID: u8 = 0xFC;

/// Tier value meaning "no authorization tier".
pub const TIER_IGNORED: u16 = 0xFFF;

/// Represents a complete SCTE-35 splice information section.
///
/// Sections are frozen once constructed, either by
/// [`parse_splice_info_section`](crate::parse_splice_info_section) or by
/// [`SpliceInfoSectionBuilder`](crate::builders::SpliceInfoSectionBuilder).
/// Length fields and the CRC are not stored: [`SpliceInfoSection::serialize`]
/// recomputes them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpliceInfoSection {
    pub(crate) sap_type: SapType,
    pub(crate) pts_adjustment: u64,
    pub(crate) cw_index: u8,
    pub(crate) tier: u16,
    pub(crate) splice_command: SpliceCommand,
    pub(crate) splice_descriptors: Vec<SpliceDescriptor>,
    pub(crate) pts: Option<Pts>,
}

impl SpliceInfoSection {
    /// Assembles a section and stamps the signal PTS onto every
    /// segmentation descriptor.
    pub(crate) fn assemble(
        sap_type: SapType,
        pts_adjustment: u64,
        cw_index: u8,
        tier: u16,
        splice_command: SpliceCommand,
        mut splice_descriptors: Vec<SpliceDescriptor>,
    ) -> Self {
        let pts = splice_command
            .pts()
            .map(|pts| pts.add(pts_adjustment));

        for descriptor in &mut splice_descriptors {
            if let SpliceDescriptor::Segmentation(segmentation) = descriptor {
                segmentation.pts = pts;
            }
        }

        SpliceInfoSection {
            sap_type,
            pts_adjustment,
            cw_index,
            tier,
            splice_command,
            splice_descriptors,
            pts,
        }
    }

    /// Always [`SCTE35_TABLE_ID`].
    pub fn table_id(&self) -> u8 {
        SCTE35_TABLE_ID
    }

    /// Stream access point type.
    pub fn sap_type(&self) -> SapType {
        self.sap_type
    }

    /// Always 0, the only protocol version this crate accepts.
    pub fn protocol_version(&self) -> u8 {
        0
    }

    /// Always false: encrypted sections are rejected by the parser.
    pub fn encrypted_packet(&self) -> bool {
        false
    }

    /// PTS adjustment in 90kHz ticks (33 bits).
    pub fn pts_adjustment(&self) -> u64 {
        self.pts_adjustment
    }

    /// Control word index.
    pub fn cw_index(&self) -> u8 {
        self.cw_index
    }

    /// Authorization tier (12 bits). [`TIER_IGNORED`] means no tier.
    pub fn tier(&self) -> u16 {
        self.tier
    }

    /// The splice command carried by this section.
    pub fn splice_command(&self) -> &SpliceCommand {
        &self.splice_command
    }

    /// Wire code of the splice command.
    pub fn splice_command_type(&self) -> u8 {
        self.splice_command.command_type()
    }

    /// All descriptors in wire order.
    pub fn splice_descriptors(&self) -> &[SpliceDescriptor] {
        &self.splice_descriptors
    }

    /// The segmentation descriptors in wire order.
    pub fn segmentation_descriptors(&self) -> impl Iterator<Item = &SegmentationDescriptor> {
        self.splice_descriptors
            .iter()
            .filter_map(SpliceDescriptor::as_segmentation)
    }

    /// Signal PTS: the command PTS plus the PTS adjustment, wrapped to 33
    /// bits. `None` when the command carries no program-level time.
    pub fn pts(&self) -> Option<Pts> {
        self.pts
    }
}

/// Stream access point type signalled in the section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SapType {
    /// Closed GOP with no leading pictures.
    Type1,
    /// Closed GOP with leading pictures.
    Type2,
    /// Open GOP.
    Type3,
    /// Type not specified.
    #[default]
    Unspecified,
}

impl SapType {
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => SapType::Type1,
            1 => SapType::Type2,
            2 => SapType::Type3,
            _ => SapType::Unspecified,
        }
    }

    pub(crate) fn bits(&self) -> u8 {
        match self {
            SapType::Type1 => 0,
            SapType::Type2 => 1,
            SapType::Type3 => 2,
            SapType::Unspecified => 3,
        }
    }
}

/// Represents the splice commands this crate understands.
///
/// Any other command type is rejected at parse time with
/// [`ParseError::UnsupportedSpliceCommand`](crate::ParseError::UnsupportedSpliceCommand).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SpliceCommand {
    /// Null command (0x00).
    #[default]
    SpliceNull,
    /// Splice insert command (0x05).
    SpliceInsert(SpliceInsert),
    /// Time signal command (0x06).
    TimeSignal(TimeSignal),
}

impl SpliceCommand {
    /// Wire code for `splice_null`.
    pub const SPLICE_NULL: u8 = 0x00;
    /// Wire code for `splice_insert`.
    pub const SPLICE_INSERT: u8 = 0x05;
    /// Wire code for `time_signal`.
    pub const TIME_SIGNAL: u8 = 0x06;

    /// Returns the `splice_command_type` wire code.
    pub fn command_type(&self) -> u8 {
        match self {
            SpliceCommand::SpliceNull => Self::SPLICE_NULL,
            SpliceCommand::SpliceInsert(_) => Self::SPLICE_INSERT,
            SpliceCommand::TimeSignal(_) => Self::TIME_SIGNAL,
        }
    }

    /// Returns the command name as written in SCTE-35.
    pub fn name(&self) -> &'static str {
        match self {
            SpliceCommand::SpliceNull => "splice_null",
            SpliceCommand::SpliceInsert(_) => "splice_insert",
            SpliceCommand::TimeSignal(_) => "time_signal",
        }
    }

    /// Returns the PTS embedded in the command, before adjustment.
    ///
    /// Splice inserts only carry one when they are scheduled program splices;
    /// cancelled, immediate and component-mode inserts yield `None`.
    pub fn pts(&self) -> Option<Pts> {
        match self {
            SpliceCommand::SpliceNull => None,
            SpliceCommand::TimeSignal(signal) => signal.splice_time.pts_time,
            SpliceCommand::SpliceInsert(insert)
                if !insert.splice_event_cancel_indicator
                    && insert.program_splice_flag
                    && !insert.splice_immediate_flag =>
            {
                insert.splice_time.as_ref().and_then(|splice_time| splice_time.pts_time)
            }
            SpliceCommand::SpliceInsert(_) => None,
        }
    }
}

/// Represents a splice insert command (0x05).
///
/// When `splice_event_cancel_indicator` is set every other field keeps its
/// default value, as nothing else is carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpliceInsert {
    /// Unique identifier for this splice event.
    pub splice_event_id: u32,
    /// The event previously sent with this id is cancelled.
    pub splice_event_cancel_indicator: bool,
    /// Going out of the network feed (true) or returning to it (false).
    pub out_of_network_indicator: bool,
    /// Program-level splice (true) or component-level splice (false).
    pub program_splice_flag: bool,
    /// Splice at the next opportunity rather than at a given time.
    pub splice_immediate_flag: bool,
    /// Program splice time, present when program-level and not immediate.
    pub splice_time: Option<SpliceTime>,
    /// Component splice entries, present when component-level.
    pub components: Vec<SpliceInsertComponent>,
    /// Break duration. Its presence sets `duration_flag` on the wire.
    pub break_duration: Option<BreakDuration>,
    /// Unique identifier for the viewing event.
    pub unique_program_id: u16,
    /// Avail number within the break.
    pub avail_num: u8,
    /// Expected number of avails in the break.
    pub avails_expected: u8,
}

impl SpliceInsert {
    /// Whether a break duration is carried.
    pub fn duration_flag(&self) -> bool {
        self.break_duration.is_some()
    }
}

/// Represents component-specific timing information for splice insert commands.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpliceInsertComponent {
    /// Elementary stream component tag.
    pub component_tag: u8,
    /// Splice time for this component, absent for immediate splices.
    pub splice_time: Option<SpliceTime>,
}

/// Represents a time signal command (0x06).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TimeSignal {
    /// The signalled time.
    pub splice_time: SpliceTime,
}

coded_enum! {
    /// Segmentation type ids, as carried by segmentation descriptors.
    ///
    /// ```rust
    /// use scte35_cue::SegmentationType;
    ///
    /// assert_eq!(SegmentationType::ProviderAdvertisementStart.id(), 0x30);
    /// assert_eq!(SegmentationType::from_id(0x10), SegmentationType::ProgramStart);
    /// assert_eq!(SegmentationType::from_id(0xFE), SegmentationType::Reserved(0xFE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub enum SegmentationType {
        NotIndicated = 0x00 => "Not Indicated",
        ContentIdentification = 0x01 => "Content Identification",
        ProgramStart = 0x10 => "Program Start",
        ProgramEnd = 0x11 => "Program End",
        ProgramEarlyTermination = 0x12 => "Program Early Termination",
        ProgramBreakaway = 0x13 => "Program Breakaway",
        ProgramResumption = 0x14 => "Program Resumption",
        ProgramRunoverPlanned = 0x15 => "Program Runover Planned",
        ProgramRunoverUnplanned = 0x16 => "Program Runover Unplanned",
        ProgramOverlapStart = 0x17 => "Program Overlap Start",
        ProgramBlackoutOverride = 0x18 => "Program Blackout Override",
        ProgramStartInProgress = 0x19 => "Program Start - In Progress",
        ChapterStart = 0x20 => "Chapter Start",
        ChapterEnd = 0x21 => "Chapter End",
        BreakStart = 0x22 => "Break Start",
        BreakEnd = 0x23 => "Break End",
        OpeningCreditStart = 0x24 => "Opening Credit Start",
        OpeningCreditEnd = 0x25 => "Opening Credit End",
        ClosingCreditStart = 0x26 => "Closing Credit Start",
        ClosingCreditEnd = 0x27 => "Closing Credit End",
        ProviderAdvertisementStart = 0x30 => "Provider Advertisement Start",
        ProviderAdvertisementEnd = 0x31 => "Provider Advertisement End",
        DistributorAdvertisementStart = 0x32 => "Distributor Advertisement Start",
        DistributorAdvertisementEnd = 0x33 => "Distributor Advertisement End",
        ProviderPlacementOpportunityStart = 0x34 => "Provider Placement Opportunity Start",
        ProviderPlacementOpportunityEnd = 0x35 => "Provider Placement Opportunity End",
        DistributorPlacementOpportunityStart = 0x36 => "Distributor Placement Opportunity Start",
        DistributorPlacementOpportunityEnd = 0x37 => "Distributor Placement Opportunity End",
        ProviderOverlayPlacementOpportunityStart = 0x38 => "Provider Overlay Placement Opportunity Start",
        ProviderOverlayPlacementOpportunityEnd = 0x39 => "Provider Overlay Placement Opportunity End",
        DistributorOverlayPlacementOpportunityStart = 0x3A => "Distributor Overlay Placement Opportunity Start",
        DistributorOverlayPlacementOpportunityEnd = 0x3B => "Distributor Overlay Placement Opportunity End",
        UnscheduledEventStart = 0x40 => "Unscheduled Event Start",
        UnscheduledEventEnd = 0x41 => "Unscheduled Event End",
        NetworkStart = 0x50 => "Network Start",
        NetworkEnd = 0x51 => "Network End",
    }
}

impl Default for SegmentationType {
    fn default() -> Self {
        SegmentationType::NotIndicated
    }
}

impl SegmentationType {
    /// Types that open a segment.
    pub fn is_out(&self) -> bool {
        use SegmentationType::*;
        matches!(
            self,
            ProgramStart
                | ProgramOverlapStart
                | ProgramStartInProgress
                | ChapterStart
                | BreakStart
                | ProviderAdvertisementStart
                | DistributorAdvertisementStart
                | ProviderPlacementOpportunityStart
                | DistributorPlacementOpportunityStart
                | UnscheduledEventStart
                | NetworkStart
        )
    }

    /// Types that end a segment opened by an out type.
    pub fn is_in(&self) -> bool {
        use SegmentationType::*;
        matches!(
            self,
            ProgramEnd
                | ChapterEnd
                | BreakEnd
                | ProviderAdvertisementEnd
                | DistributorAdvertisementEnd
                | ProviderPlacementOpportunityEnd
                | DistributorPlacementOpportunityEnd
                | UnscheduledEventEnd
                | NetworkEnd
        )
    }

    /// Only placement opportunity starts carry sub-segment numbering.
    pub fn has_sub_segments(&self) -> bool {
        matches!(
            self,
            SegmentationType::ProviderPlacementOpportunityStart
                | SegmentationType::DistributorPlacementOpportunityStart
        )
    }
}
