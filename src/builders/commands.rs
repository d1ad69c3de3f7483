//! Builders for splice commands.

use std::time::Duration;

use super::error::{BuilderError, BuilderResult, ticks_within};
use crate::pts::Pts;
use crate::time::{BreakDuration, SpliceTime};
use crate::types::{SpliceInsert, SpliceInsertComponent, TimeSignal};

/// A time given either as a clock offset or as exact ticks.
#[derive(Clone, Copy, Debug)]
enum TimeInput {
    Offset(Duration),
    Ticks(Pts),
}

impl TimeInput {
    fn resolve(self, field: &'static str) -> BuilderResult<SpliceTime> {
        match self {
            TimeInput::Offset(duration) => {
                Ok(SpliceTime::new(Pts::new(ticks_within(field, duration, 33)?)))
            }
            TimeInput::Ticks(pts) => Ok(SpliceTime::new(pts)),
        }
    }
}

/// Builder for [`SpliceInsert`] commands.
///
/// Defaults to a program-level, out-of-network splice that needs a time.
#[derive(Debug)]
pub struct SpliceInsertBuilder {
    splice_event_id: u32,
    cancel: bool,
    out_of_network: bool,
    program_splice: bool,
    splice_immediate: bool,
    splice_time: Option<TimeInput>,
    components: Vec<(u8, Option<TimeInput>)>,
    duration: Option<Duration>,
    auto_return: bool,
    unique_program_id: u16,
    avail_num: u8,
    avails_expected: u8,
}

impl SpliceInsertBuilder {
    /// Creates a builder for the given splice event id.
    pub fn new(splice_event_id: u32) -> Self {
        Self {
            splice_event_id,
            cancel: false,
            out_of_network: true,
            program_splice: true,
            splice_immediate: false,
            splice_time: None,
            components: Vec::new(),
            duration: None,
            auto_return: true,
            unique_program_id: 0,
            avail_num: 0,
            avails_expected: 0,
        }
    }

    /// Cancels the event. Every other setting is ignored.
    pub fn cancel_event(mut self) -> Self {
        self.cancel = true;
        self
    }

    /// Sets the out-of-network indicator.
    pub fn out_of_network(mut self, out: bool) -> Self {
        self.out_of_network = out;
        self
    }

    /// Splices at the next opportunity.
    pub fn immediate(mut self) -> Self {
        self.splice_immediate = true;
        self.splice_time = None;
        self
    }

    /// Splices at a clock offset.
    pub fn at_pts(mut self, pts_time: Duration) -> Self {
        self.splice_immediate = false;
        self.splice_time = Some(TimeInput::Offset(pts_time));
        self
    }

    /// Splices at an exact PTS.
    pub fn at(mut self, pts: Pts) -> Self {
        self.splice_immediate = false;
        self.splice_time = Some(TimeInput::Ticks(pts));
        self
    }

    /// Switches to component-level splicing with the given (tag, time)
    /// entries.
    ///
    /// # Errors
    /// [`BuilderError::InvalidComponentCount`] above 255 components.
    pub fn component_splice(mut self, components: Vec<(u8, Option<Duration>)>) -> BuilderResult<Self> {
        if components.len() > 255 {
            return Err(BuilderError::InvalidComponentCount {
                max: 255,
                actual: components.len(),
            });
        }
        self.program_splice = false;
        self.components = components
            .into_iter()
            .map(|(tag, time)| (tag, time.map(TimeInput::Offset)))
            .collect();
        Ok(self)
    }

    /// Sets the break duration.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Sets the auto-return flag of the break duration.
    pub fn auto_return(mut self, auto_return: bool) -> Self {
        self.auto_return = auto_return;
        self
    }

    pub fn unique_program_id(mut self, id: u16) -> Self {
        self.unique_program_id = id;
        self
    }

    /// Sets the avail number and expected avail count.
    pub fn avail(mut self, num: u8, expected: u8) -> Self {
        self.avail_num = num;
        self.avails_expected = expected;
        self
    }

    /// Builds the command.
    ///
    /// # Errors
    /// * [`BuilderError::MissingRequiredField`] when a scheduled splice has
    ///   no time.
    /// * [`BuilderError::DurationTooLarge`] when a time or the break
    ///   duration does not fit in 33 bits.
    pub fn build(self) -> BuilderResult<SpliceInsert> {
        if self.cancel {
            return Ok(SpliceInsert {
                splice_event_id: self.splice_event_id,
                splice_event_cancel_indicator: true,
                ..SpliceInsert::default()
            });
        }

        let splice_time = if self.program_splice && !self.splice_immediate {
            let time = self
                .splice_time
                .ok_or(BuilderError::MissingRequiredField("splice_time"))?;
            Some(time.resolve("splice_time")?)
        } else {
            None
        };

        let mut components = Vec::with_capacity(self.components.len());
        if !self.program_splice {
            for (component_tag, time) in self.components {
                let splice_time = if self.splice_immediate {
                    None
                } else {
                    let time = time.ok_or(BuilderError::MissingRequiredField("component_splice_time"))?;
                    Some(time.resolve("component_splice_time")?)
                };
                components.push(SpliceInsertComponent {
                    component_tag,
                    splice_time,
                });
            }
        }

        let break_duration = match self.duration {
            Some(duration) => Some(BreakDuration {
                auto_return: self.auto_return,
                duration: ticks_within("break_duration", duration, 33)?,
            }),
            None => None,
        };

        Ok(SpliceInsert {
            splice_event_id: self.splice_event_id,
            splice_event_cancel_indicator: false,
            out_of_network_indicator: self.out_of_network,
            program_splice_flag: self.program_splice,
            splice_immediate_flag: self.splice_immediate,
            splice_time,
            components,
            break_duration,
            unique_program_id: self.unique_program_id,
            avail_num: self.avail_num,
            avails_expected: self.avails_expected,
        })
    }
}

/// Builder for [`TimeSignal`] commands.
#[derive(Debug, Default)]
pub struct TimeSignalBuilder {
    pts_time: Option<TimeInput>,
}

impl TimeSignalBuilder {
    /// Creates a builder for a time signal with no time specified.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears any time previously set.
    pub fn immediate(mut self) -> Self {
        self.pts_time = None;
        self
    }

    /// Signals at a clock offset.
    pub fn at_pts(mut self, pts_time: Duration) -> Self {
        self.pts_time = Some(TimeInput::Offset(pts_time));
        self
    }

    /// Signals at an exact PTS.
    pub fn at(mut self, pts: Pts) -> Self {
        self.pts_time = Some(TimeInput::Ticks(pts));
        self
    }

    /// Builds the command.
    pub fn build(self) -> BuilderResult<TimeSignal> {
        let splice_time = match self.pts_time {
            Some(time) => time.resolve("pts_time")?,
            None => SpliceTime::unspecified(),
        };
        Ok(TimeSignal { splice_time })
    }
}
