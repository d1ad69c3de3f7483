//! Closing rules between segmentation types.
//!
//! Each `(closer, open)` pair of segmentation types maps to a [`CloseRule`]
//! deciding whether the newly received descriptor ends the open one. Pairs
//! without an entry never close.

use crate::descriptors::SegmentationDescriptor;
use crate::types::SegmentationType;

/// Condition under which one descriptor closes another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseRule {
    /// Always closes.
    Normal,
    /// Always closes, whatever else is open.
    Unconditional,
    /// Closes when both carry the same segmentation event id.
    EventId,
    /// Closes when the signals carry different PTS values.
    DiffPts,
    /// Closes unless the closer is a non-final sub-segment.
    NotNested,
    /// [`CloseRule::EventId`] and [`CloseRule::NotNested`] together.
    EventIdNotNested,
    /// A breakaway ends what it interrupts.
    Breakaway,
    /// Closes across a breakaway boundary.
    NoBreakaway,
}

impl CloseRule {
    /// Looks up the rule for `closer` ending `open`.
    pub fn lookup(closer: SegmentationType, open: SegmentationType) -> Option<CloseRule> {
        use CloseRule::*;
        use SegmentationType::*;

        let rule = match (closer, open) {
            (
                ProgramStart | ProgramStartInProgress | ProgramOverlapStart,
                ProgramStart
                | ProgramOverlapStart
                | ProgramStartInProgress
                | ChapterStart
                | BreakStart
                | ProviderAdvertisementStart
                | DistributorAdvertisementStart
                | ProviderPlacementOpportunityStart
                | DistributorPlacementOpportunityStart
                | UnscheduledEventStart,
            ) => Normal,
            (ProgramStart | ProgramStartInProgress | ProgramOverlapStart, ProgramBreakaway) => {
                NoBreakaway
            }

            (ProgramEnd, ProgramStart | ProgramResumption) => Normal,

            (
                ProgramEarlyTermination,
                ProgramStart
                | ProgramOverlapStart
                | ProgramStartInProgress
                | ProgramBreakaway
                | ChapterStart
                | BreakStart
                | ProviderAdvertisementStart
                | DistributorAdvertisementStart
                | ProviderPlacementOpportunityStart
                | DistributorPlacementOpportunityStart
                | UnscheduledEventStart,
            ) => Unconditional,

            (
                ProgramBreakaway,
                ChapterStart
                | BreakStart
                | ProviderAdvertisementStart
                | DistributorAdvertisementStart
                | ProviderPlacementOpportunityStart
                | DistributorPlacementOpportunityStart
                | UnscheduledEventStart,
            ) => Breakaway,

            (ProgramResumption, ProgramBreakaway) => Breakaway,
            (
                ProgramResumption,
                ChapterStart
                | BreakStart
                | ProviderAdvertisementStart
                | DistributorAdvertisementStart
                | ProviderPlacementOpportunityStart
                | DistributorPlacementOpportunityStart
                | UnscheduledEventStart,
            ) => NoBreakaway,

            (
                ChapterStart,
                ChapterStart
                | BreakStart
                | ProviderAdvertisementStart
                | DistributorAdvertisementStart
                | ProviderPlacementOpportunityStart
                | DistributorPlacementOpportunityStart,
            ) => Normal,
            (ChapterEnd, ChapterStart) => EventId,
            (
                ChapterEnd,
                BreakStart
                | ProviderAdvertisementStart
                | DistributorAdvertisementStart
                | ProviderPlacementOpportunityStart
                | DistributorPlacementOpportunityStart,
            ) => Normal,

            (
                BreakStart,
                BreakStart
                | ProviderAdvertisementStart
                | DistributorAdvertisementStart
                | ProviderPlacementOpportunityStart
                | DistributorPlacementOpportunityStart,
            ) => Normal,
            (BreakEnd, BreakStart) => EventId,
            (
                BreakEnd,
                ProviderAdvertisementStart
                | DistributorAdvertisementStart
                | ProviderPlacementOpportunityStart
                | DistributorPlacementOpportunityStart,
            ) => Normal,

            (
                ProviderAdvertisementStart | DistributorAdvertisementStart,
                ProviderAdvertisementStart | DistributorAdvertisementStart,
            ) => Normal,
            (ProviderAdvertisementEnd, ProviderAdvertisementStart) => EventId,
            (ProviderAdvertisementEnd, DistributorAdvertisementStart) => Normal,
            (DistributorAdvertisementEnd, DistributorAdvertisementStart) => EventId,

            (ProviderPlacementOpportunityStart, ProviderPlacementOpportunityStart) => DiffPts,
            (ProviderPlacementOpportunityStart, DistributorPlacementOpportunityStart) => NotNested,
            (
                ProviderPlacementOpportunityStart,
                ProviderAdvertisementStart | DistributorAdvertisementStart,
            ) => Normal,
            (DistributorPlacementOpportunityStart, DistributorPlacementOpportunityStart) => DiffPts,
            (
                DistributorPlacementOpportunityStart,
                ProviderAdvertisementStart | DistributorAdvertisementStart,
            ) => Normal,

            (ProviderPlacementOpportunityEnd, ProviderPlacementOpportunityStart) => {
                EventIdNotNested
            }
            (
                ProviderPlacementOpportunityEnd,
                DistributorPlacementOpportunityStart
                | ProviderAdvertisementStart
                | DistributorAdvertisementStart,
            ) => Normal,
            (DistributorPlacementOpportunityEnd, DistributorPlacementOpportunityStart) => {
                EventIdNotNested
            }
            (
                DistributorPlacementOpportunityEnd,
                ProviderAdvertisementStart | DistributorAdvertisementStart,
            ) => Normal,

            (UnscheduledEventStart, UnscheduledEventStart) => EventId,
            (UnscheduledEventEnd, UnscheduledEventStart) => EventId,
            (
                UnscheduledEventEnd,
                ProviderAdvertisementStart
                | DistributorAdvertisementStart
                | ProviderPlacementOpportunityStart
                | DistributorPlacementOpportunityStart,
            ) => Normal,

            (NetworkStart, NetworkStart) => Normal,
            (
                NetworkEnd,
                NetworkStart
                | ProgramStart
                | ProgramOverlapStart
                | ProgramStartInProgress
                | ProgramBreakaway
                | ChapterStart
                | BreakStart
                | ProviderAdvertisementStart
                | DistributorAdvertisementStart
                | ProviderPlacementOpportunityStart
                | DistributorPlacementOpportunityStart
                | UnscheduledEventStart,
            ) => Unconditional,

            _ => return None,
        };
        Some(rule)
    }

    /// Evaluates the rule for a concrete pair of descriptors.
    pub fn applies(&self, closer: &SegmentationDescriptor, open: &SegmentationDescriptor) -> bool {
        let same_event = || closer.segmentation_event_id() == open.segmentation_event_id();
        match self {
            CloseRule::Normal
            | CloseRule::Unconditional
            | CloseRule::Breakaway
            | CloseRule::NoBreakaway => true,
            CloseRule::EventId => same_event(),
            CloseRule::DiffPts => closer.pts() != open.pts(),
            CloseRule::NotNested => closer.is_terminal_sub_segment(),
            CloseRule::EventIdNotNested => same_event() && closer.is_terminal_sub_segment(),
        }
    }
}

impl SegmentationDescriptor {
    /// Whether receiving `self` ends the already open `other`.
    ///
    /// ```rust
    /// use scte35_cue::builders::SegmentationDescriptorBuilder;
    /// use scte35_cue::SegmentationType;
    ///
    /// let start = SegmentationDescriptorBuilder::new(1, SegmentationType::ChapterStart)
    ///     .build()
    ///     .unwrap();
    /// let end = SegmentationDescriptorBuilder::new(1, SegmentationType::ChapterEnd)
    ///     .build()
    ///     .unwrap();
    /// let other_end = SegmentationDescriptorBuilder::new(2, SegmentationType::ChapterEnd)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(end.can_close(&start));
    /// assert!(!other_end.can_close(&start));
    /// assert!(!start.can_close(&end));
    /// ```
    pub fn can_close(&self, other: &SegmentationDescriptor) -> bool {
        CloseRule::lookup(self.segmentation_type(), other.segmentation_type())
            .is_some_and(|rule| rule.applies(self, other))
    }
}
