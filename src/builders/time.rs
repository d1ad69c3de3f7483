//! Time-related builders.

use std::time::Duration;

use super::error::{BuilderResult, ticks_within};
use crate::pts::Pts;
use crate::time::{BreakDuration, SpliceTime};

/// Builder for [`SpliceTime`].
#[derive(Debug, Default)]
pub struct SpliceTimeBuilder {
    pts_time: Option<Duration>,
}

impl SpliceTimeBuilder {
    /// Creates a builder for an unspecified (immediate) splice time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaves the time unspecified.
    pub fn immediate(mut self) -> Self {
        self.pts_time = None;
        self
    }

    /// Sets the splice time as an offset on the 90kHz clock.
    pub fn at_pts(mut self, pts_time: Duration) -> Self {
        self.pts_time = Some(pts_time);
        self
    }

    /// Builds the splice time.
    ///
    /// # Errors
    /// [`BuilderError::DurationTooLarge`](super::BuilderError::DurationTooLarge)
    /// when the time does not fit in 33 bits.
    pub fn build(self) -> BuilderResult<SpliceTime> {
        match self.pts_time {
            Some(duration) => {
                let ticks = ticks_within("pts_time", duration, 33)?;
                Ok(SpliceTime::new(Pts::new(ticks)))
            }
            None => Ok(SpliceTime::unspecified()),
        }
    }
}

/// Builder for [`BreakDuration`]. Auto-return defaults to on.
#[derive(Debug)]
pub struct BreakDurationBuilder {
    duration: Duration,
    auto_return: bool,
}

impl BreakDurationBuilder {
    /// Creates a builder for a break of the given length.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            auto_return: true,
        }
    }

    /// Sets whether the splicer returns to the network at the end of the break.
    pub fn auto_return(mut self, auto_return: bool) -> Self {
        self.auto_return = auto_return;
        self
    }

    /// Builds the break duration.
    pub fn build(self) -> BuilderResult<BreakDuration> {
        Ok(BreakDuration {
            auto_return: self.auto_return,
            duration: ticks_within("break_duration", self.duration, 33)?,
        })
    }
}
