//! Presentation timestamp arithmetic.
//!
//! SCTE-35 carries times as 33-bit counters of a 90kHz clock. The counter wraps
//! roughly every 26.5 hours, so ordering two timestamps has to take rollover
//! into account. [`Pts`] implements the comparisons used to order signals.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Ticks per second of the MPEG system clock used by PTS values.
pub const PTS_CLOCK_RATE: u64 = 90_000;

/// Largest valid 33-bit PTS value.
pub const MAX_PTS: u64 = (1 << 33) - 1;

/// A value below this threshold may have rolled over past a value above
/// [`ROLLOVER_HIGH_THRESHOLD`]. Roughly 30 minutes of ticks.
pub const ROLLOVER_LOW_THRESHOLD: u64 = 162_000_000;

/// Counterpart of [`ROLLOVER_LOW_THRESHOLD`] at the top of the 33-bit range.
pub const ROLLOVER_HIGH_THRESHOLD: u64 = MAX_PTS - ROLLOVER_LOW_THRESHOLD;

const POSITIVE_INFINITY_TICKS: u64 = u64::MAX;
const NEGATIVE_INFINITY_TICKS: u64 = u64::MAX - 1;

/// A 33-bit presentation timestamp in 90kHz ticks.
///
/// Values are always within `[0, 2^33 - 1]`, except for the two sentinels
/// [`Pts::POSITIVE_INFINITY`] and [`Pts::NEGATIVE_INFINITY`].
///
/// # Example
///
/// ```rust
/// use scte35_cue::{Pts, MAX_PTS};
///
/// // 1 comes right after the counter wrapped.
/// assert!(Pts::new(1).after(Pts::new(MAX_PTS)));
/// assert_eq!(Pts::new(5).duration_from(Pts::new(MAX_PTS - 10)), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct Pts(u64);

impl Pts {
    /// Sentinel that is after every finite timestamp.
    pub const POSITIVE_INFINITY: Pts = Pts(POSITIVE_INFINITY_TICKS);

    /// Sentinel that every finite timestamp is after.
    pub const NEGATIVE_INFINITY: Pts = Pts(NEGATIVE_INFINITY_TICKS);

    /// Creates a timestamp, masking the value to 33 bits.
    pub const fn new(ticks: u64) -> Self {
        Pts(ticks & MAX_PTS)
    }

    /// Returns the raw tick count.
    pub const fn ticks(&self) -> u64 {
        self.0
    }

    /// Returns true for either infinity sentinel.
    pub const fn is_infinite(&self) -> bool {
        self.0 == POSITIVE_INFINITY_TICKS || self.0 == NEGATIVE_INFINITY_TICKS
    }

    /// Returns true if `self` sits just past the wrap point while `other` sits
    /// just before it, i.e. `self` is considered to have rolled over `other`.
    pub fn rolled_over(&self, other: Pts) -> bool {
        !self.is_infinite()
            && !other.is_infinite()
            && self.0 < ROLLOVER_LOW_THRESHOLD
            && other.0 > ROLLOVER_HIGH_THRESHOLD
    }

    /// Returns true if `self` comes after `other`, accounting for rollover.
    pub fn after(&self, other: Pts) -> bool {
        match (*self, other) {
            (_, Pts::POSITIVE_INFINITY) => false,
            (Pts::NEGATIVE_INFINITY, _) => false,
            (_, Pts::NEGATIVE_INFINITY) => true,
            (Pts::POSITIVE_INFINITY, _) => true,
            (this, other) if this.rolled_over(other) => true,
            (this, other) if other.rolled_over(this) => false,
            (this, other) => this.0 > other.0,
        }
    }

    /// Returns the number of ticks between `earlier` and `self`.
    ///
    /// A single rollover in either direction is handled by adding `2^33`
    /// before subtracting. Must not be called with an infinity sentinel.
    pub fn duration_from(&self, earlier: Pts) -> u64 {
        if self.rolled_over(earlier) {
            (self.0 + MAX_PTS + 1) - earlier.0
        } else if earlier.rolled_over(*self) {
            (earlier.0 + MAX_PTS + 1) - self.0
        } else {
            self.0.abs_diff(earlier.0)
        }
    }

    /// Adds `ticks`, wrapping at 33 bits. Must not be called on an infinity
    /// sentinel.
    pub fn add(&self, ticks: u64) -> Pts {
        Pts(self.0.wrapping_add(ticks) & MAX_PTS)
    }

    /// Converts the timestamp to seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / PTS_CLOCK_RATE as f64
    }

    /// Converts the timestamp to a [`Duration`] since the clock origin.
    pub fn to_duration(&self) -> Duration {
        let secs = self.0 / PTS_CLOCK_RATE;
        let nanos = (self.0 % PTS_CLOCK_RATE) * 1_000_000_000 / PTS_CLOCK_RATE;
        Duration::new(secs, nanos as u32)
    }
}

/// Converts a [`Duration`] to 90kHz ticks.
///
/// Returns `None` when the tick count does not fit in a `u64`.
pub fn duration_to_ticks(duration: Duration) -> Option<u64> {
    u64::try_from(exact_ticks(duration)).ok()
}

fn exact_ticks(duration: Duration) -> u128 {
    duration.as_nanos() * u128::from(PTS_CLOCK_RATE) / 1_000_000_000
}

/// Wraps modulo the 33-bit clock, like [`Pts::add`].
impl From<Duration> for Pts {
    fn from(duration: Duration) -> Self {
        Pts::new((exact_ticks(duration) & u128::from(MAX_PTS)) as u64)
    }
}

impl From<Pts> for u64 {
    fn from(pts: Pts) -> Self {
        pts.0
    }
}

impl fmt::Display for Pts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Pts::POSITIVE_INFINITY => write!(f, "+inf"),
            Pts::NEGATIVE_INFINITY => write!(f, "-inf"),
            pts => write!(f, "{:.6}s", pts.as_secs_f64()),
        }
    }
}
