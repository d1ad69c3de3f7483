//! Time-related structures for SCTE-35 messages.

use std::time::Duration;

use crate::pts::Pts;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A `splice_time()` structure: an optional 33-bit PTS.
///
/// On the wire `time_specified_flag` is set exactly when `pts_time` is
/// present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpliceTime {
    /// Presentation time in 90kHz ticks.
    pub pts_time: Option<Pts>,
}

impl SpliceTime {
    /// A splice time carrying `pts`.
    pub fn new(pts: Pts) -> Self {
        SpliceTime {
            pts_time: Some(pts),
        }
    }

    /// A splice time with no time specified.
    pub fn unspecified() -> Self {
        SpliceTime { pts_time: None }
    }

    /// Whether a PTS is carried.
    pub fn time_specified_flag(&self) -> bool {
        self.pts_time.is_some()
    }

    /// Converts the PTS to a [`Duration`] from the clock origin.
    pub fn to_duration(&self) -> Option<Duration> {
        self.pts_time.map(|pts| pts.to_duration())
    }
}

impl From<Pts> for SpliceTime {
    fn from(pts: Pts) -> Self {
        SpliceTime::new(pts)
    }
}

/// A `break_duration()` structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BreakDuration {
    /// The splicer returns to the network feed on its own when the break ends.
    pub auto_return: bool,
    /// Break length in 90kHz ticks (33 bits).
    pub duration: u64,
}

impl BreakDuration {
    /// Converts the break length to a [`Duration`].
    pub fn to_duration(&self) -> Duration {
        Pts::new(self.duration).to_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_time_flag() {
        assert!(SpliceTime::new(Pts::new(90_000)).time_specified_flag());
        assert!(!SpliceTime::unspecified().time_specified_flag());
        assert_eq!(
            SpliceTime::from(Pts::new(90_000)).to_duration(),
            Some(Duration::from_secs(1))
        );
    }

    #[test]
    fn test_break_duration() {
        let duration = BreakDuration {
            auto_return: true,
            duration: 2_700_000,
        };
        assert_eq!(duration.to_duration(), Duration::from_secs(30));
    }
}
