//! Builder for complete splice_info_sections.

use super::error::{BuilderError, BuilderResult};
use crate::descriptors::{SegmentationDescriptor, SpliceDescriptor};
use crate::types::{SapType, SpliceCommand, SpliceInfoSection, SpliceInsert, TIER_IGNORED, TimeSignal};

/// Builder for a [`SpliceInfoSection`].
///
/// Segmentation descriptors added here get the section's signal PTS stamped
/// on them by [`SpliceInfoSectionBuilder::build`].
///
/// ```rust
/// use scte35_cue::builders::{SegmentationDescriptorBuilder, SpliceInfoSectionBuilder, TimeSignalBuilder};
/// use scte35_cue::{Pts, SegmentationType};
///
/// let section = SpliceInfoSectionBuilder::new()
///     .time_signal(TimeSignalBuilder::new().at(Pts::new(0x0_86df_7550)).build().unwrap())
///     .add_segmentation_descriptor(
///         SegmentationDescriptorBuilder::new(0x4142_4344, SegmentationType::ProgramStart)
///             .build()
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
///
/// let descriptor = section.segmentation_descriptors().next().unwrap();
/// assert_eq!(descriptor.pts(), Some(Pts::new(2_262_791_504)));
/// ```
#[derive(Debug)]
pub struct SpliceInfoSectionBuilder {
    sap_type: SapType,
    pts_adjustment: u64,
    cw_index: u8,
    tier: u16,
    splice_command: SpliceCommand,
    descriptors: Vec<SpliceDescriptor>,
}

impl SpliceInfoSectionBuilder {
    /// Creates a builder for a `splice_null` section with no tier.
    pub fn new() -> Self {
        Self {
            sap_type: SapType::Unspecified,
            pts_adjustment: 0,
            cw_index: 0,
            tier: TIER_IGNORED,
            splice_command: SpliceCommand::SpliceNull,
            descriptors: Vec::new(),
        }
    }

    pub fn sap_type(mut self, sap_type: SapType) -> Self {
        self.sap_type = sap_type;
        self
    }

    /// Sets the PTS adjustment in 90kHz ticks (33 bits).
    pub fn pts_adjustment(mut self, pts_adjustment: u64) -> Self {
        self.pts_adjustment = pts_adjustment;
        self
    }

    pub fn cw_index(mut self, cw_index: u8) -> Self {
        self.cw_index = cw_index;
        self
    }

    /// Sets the authorization tier (12 bits).
    pub fn tier(mut self, tier: u16) -> Self {
        self.tier = tier;
        self
    }

    /// Sets the splice command.
    pub fn splice_command(mut self, command: SpliceCommand) -> Self {
        self.splice_command = command;
        self
    }

    pub fn splice_null(self) -> Self {
        self.splice_command(SpliceCommand::SpliceNull)
    }

    pub fn splice_insert(self, insert: SpliceInsert) -> Self {
        self.splice_command(SpliceCommand::SpliceInsert(insert))
    }

    pub fn time_signal(self, time_signal: TimeSignal) -> Self {
        self.splice_command(SpliceCommand::TimeSignal(time_signal))
    }

    /// Appends a descriptor to the descriptor loop.
    pub fn add_descriptor(mut self, descriptor: SpliceDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Appends a segmentation descriptor to the descriptor loop.
    pub fn add_segmentation_descriptor(self, descriptor: SegmentationDescriptor) -> Self {
        self.add_descriptor(SpliceDescriptor::Segmentation(descriptor))
    }

    /// Builds the section.
    ///
    /// # Errors
    /// [`BuilderError::InvalidValue`] when the tier exceeds 12 bits, the
    /// PTS adjustment exceeds 33 bits, or a splice insert carries fields its
    /// flags leave off the wire.
    pub fn build(self) -> BuilderResult<SpliceInfoSection> {
        if self.tier > TIER_IGNORED {
            return Err(BuilderError::InvalidValue {
                field: "tier",
                reason: format!("0x{:x} does not fit in 12 bits", self.tier),
            });
        }
        if self.pts_adjustment >> 33 != 0 {
            return Err(BuilderError::InvalidValue {
                field: "pts_adjustment",
                reason: format!("{} does not fit in 33 bits", self.pts_adjustment),
            });
        }

        if let SpliceCommand::SpliceInsert(insert) = &self.splice_command {
            validate_splice_insert(insert)?;
        }

        Ok(SpliceInfoSection::assemble(
            self.sap_type,
            self.pts_adjustment,
            self.cw_index,
            self.tier,
            self.splice_command,
            self.descriptors,
        ))
    }
}

fn invalid(field: &'static str, reason: &str) -> BuilderError {
    BuilderError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

/// Checks that every field of `insert` is either written by its flags or
/// left at its default, so the parsed section equals the built one.
fn validate_splice_insert(insert: &SpliceInsert) -> BuilderResult<()> {
    if insert.splice_event_cancel_indicator {
        let cancelled = SpliceInsert {
            splice_event_id: insert.splice_event_id,
            splice_event_cancel_indicator: true,
            ..SpliceInsert::default()
        };
        if *insert != cancelled {
            return Err(invalid(
                "splice_event_cancel_indicator",
                "a cancelled splice insert carries only its event id",
            ));
        }
        return Ok(());
    }

    if insert.program_splice_flag {
        if !insert.components.is_empty() {
            return Err(invalid("components", "a program splice has no components"));
        }
        match (&insert.splice_time, insert.splice_immediate_flag) {
            (Some(_), true) => {
                return Err(invalid("splice_time", "an immediate splice has no splice time"));
            }
            (Some(splice_time), false) if splice_time.time_specified_flag() => {}
            (_, false) => {
                return Err(invalid("splice_time", "a scheduled program splice needs a PTS"));
            }
            (None, true) => {}
        }
        return Ok(());
    }

    if insert.splice_time.is_some() {
        return Err(invalid("splice_time", "a component splice has no program splice time"));
    }
    if insert.components.len() > 255 {
        return Err(BuilderError::InvalidComponentCount {
            max: 255,
            actual: insert.components.len(),
        });
    }
    for component in &insert.components {
        match (&component.splice_time, insert.splice_immediate_flag) {
            (Some(_), true) => {
                return Err(invalid("components", "an immediate splice has no component times"));
            }
            (None, false) => {
                return Err(invalid("components", "a scheduled component splice needs a splice time"));
            }
            _ => {}
        }
    }
    Ok(())
}

impl Default for SpliceInfoSectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
