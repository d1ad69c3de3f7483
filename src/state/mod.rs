//! Segmentation event state for one signaling stream.
//!
//! [`State`] consumes segmentation descriptors in arrival order and keeps the
//! stack of descriptors currently in effect. Each new descriptor may close
//! entries at the top of the stack (see [`CloseRule`]), open a new segment,
//! or start or end a program breakaway.

mod rules;

use circular_buffer::CircularBuffer;
use tracing::{debug, trace};

use crate::descriptors::SegmentationDescriptor;
use crate::error::StateError;
use crate::pts::Pts;
use crate::types::SegmentationType;

pub use rules::CloseRule;

/// Number of recent signals remembered for duplicate suppression.
pub const RECEIVED_CAPACITY: usize = 10;

/// Descriptors received in signals sharing one PTS.
#[derive(Debug, Clone)]
struct Received {
    pts: Pts,
    descriptors: Vec<SegmentationDescriptor>,
}

/// Tracks open segmentation events across a stream of signals.
///
/// ```rust
/// use scte35_cue::{parse_with_pointer_field, State};
///
/// let payload = [
///     0x00, 0xfc, 0x00, 0x2c, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xf0, 0x05,
///     0x06, 0xfe, 0x86, 0xdf, 0x75, 0x50, 0x00, 0x11, 0x02, 0x0f, 0x43, 0x55, 0x45, 0x49,
///     0x41, 0x42, 0x43, 0x44, 0x7f, 0x8f, 0x00, 0x00, 0x10, 0x01, 0x01, 0x3a, 0x6d, 0xda,
///     0xee,
/// ];
/// let section = parse_with_pointer_field(&payload).unwrap();
///
/// let mut state = State::new();
/// for descriptor in section.segmentation_descriptors() {
///     let closed = state.process_descriptor(descriptor.clone()).unwrap();
///     assert!(closed.is_empty());
/// }
/// assert_eq!(state.open().count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct State {
    open: Vec<SegmentationDescriptor>,
    /// Stack height at which the current breakaway began.
    blackout: Option<usize>,
    received: CircularBuffer<RECEIVED_CAPACITY, Received>,
}

impl State {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptors currently in effect, oldest first. The breakaway marker
    /// itself is not listed.
    pub fn open(&self) -> impl Iterator<Item = &SegmentationDescriptor> {
        self.open
            .iter()
            .filter(|descriptor| descriptor.segmentation_type() != SegmentationType::ProgramBreakaway)
    }

    /// Whether a program breakaway is in progress.
    pub fn in_blackout(&self) -> bool {
        self.blackout.is_some()
    }

    /// Feeds one segmentation descriptor into the state.
    ///
    /// Returns the descriptors it closed, most recently opened first. On
    /// error the state is left untouched.
    ///
    /// # Errors
    ///
    /// * [`StateError::UnsupportedSpliceCommand`] when the descriptor carries
    ///   no PTS.
    /// * [`StateError::DuplicateDescriptor`] when the same signal was seen
    ///   recently.
    /// * [`StateError::InvalidDescriptor`] for a resumption outside a breakaway.
    /// * [`StateError::MissingOut`] for an in-signal with no matching out.
    pub fn process_descriptor(
        &mut self,
        descriptor: SegmentationDescriptor,
    ) -> Result<Vec<SegmentationDescriptor>, StateError> {
        let pts = descriptor.pts().ok_or(StateError::UnsupportedSpliceCommand)?;

        if self.is_duplicate(&descriptor, pts) {
            trace!(
                event_id = descriptor.segmentation_event_id(),
                segmentation_type = %descriptor.segmentation_type(),
                "duplicate descriptor"
            );
            return Err(StateError::DuplicateDescriptor);
        }

        let closing = self
            .open
            .iter()
            .rev()
            .take_while(|open| {
                let closes = descriptor.can_close(open);
                trace!(
                    closer = %descriptor.segmentation_type(),
                    open = %open.segmentation_type(),
                    closes,
                    "closing rule"
                );
                closes
            })
            .count();
        let remaining = self.open.len() - closing;

        let mut blackout = self.blackout;
        let mut truncate_to = remaining;
        let mut push = false;

        match descriptor.segmentation_type() {
            SegmentationType::ProgramBreakaway => {
                blackout = Some(remaining);
                push = true;
            }
            SegmentationType::ProgramResumption => {
                let marker = self.blackout.ok_or(StateError::InvalidDescriptor)?;
                truncate_to = remaining.min(marker);
                blackout = None;
            }
            SegmentationType::ProgramEnd => {
                let closed = &self.open[remaining..];
                let all_program = closed.iter().all(|open| {
                    matches!(
                        open.segmentation_type(),
                        SegmentationType::ProgramStart | SegmentationType::ProgramResumption
                    )
                });
                if closed.is_empty() || !all_program {
                    return Err(StateError::MissingOut);
                }
            }
            segmentation_type if segmentation_type.is_out() => push = true,
            segmentation_type if segmentation_type.is_in() => {
                self.check_in_signal(&descriptor, remaining)?;
            }
            _ => {}
        }

        // popping the breakaway marker by any other rule ends the blackout
        if let Some(marker) = self.blackout {
            if blackout == self.blackout && marker >= truncate_to {
                blackout = None;
            }
        }

        let closed: Vec<_> = self.open.drain(truncate_to..).rev().collect();
        if push {
            self.open.push(descriptor.clone());
        }
        if blackout != self.blackout {
            debug!(
                in_blackout = blackout.is_some(),
                segmentation_type = %descriptor.segmentation_type(),
                "blackout changed"
            );
        }
        self.blackout = blackout;
        self.record(pts, descriptor);

        debug!(closed = closed.len(), open = self.open.len(), "processed descriptor");
        Ok(closed)
    }

    /// Explicitly closes `descriptor` and everything opened after it.
    ///
    /// Returns the removed descriptors, most recently opened first.
    ///
    /// # Errors
    /// [`StateError::DescriptorNotFound`] when no open descriptor matches; the
    /// state is unchanged.
    pub fn close(
        &mut self,
        descriptor: &SegmentationDescriptor,
    ) -> Result<Vec<SegmentationDescriptor>, StateError> {
        let index = self
            .open
            .iter()
            .rposition(|open| open.matches(descriptor))
            .ok_or(StateError::DescriptorNotFound)?;

        if self.blackout.is_some_and(|marker| marker >= index) {
            debug!("breakaway closed explicitly");
            self.blackout = None;
        }

        let closed: Vec<_> = self.open.drain(index..).rev().collect();
        debug!(closed = closed.len(), open = self.open.len(), "closed descriptor");
        Ok(closed)
    }

    fn is_duplicate(&self, descriptor: &SegmentationDescriptor, pts: Pts) -> bool {
        let switch_id = match descriptor.segmentation_type() {
            SegmentationType::UnscheduledEventStart => descriptor.stream_switch_signal_id(),
            _ => None,
        };

        self.received.iter().any(|received| {
            received.descriptors.iter().any(|seen| {
                let same_signal = received.pts == pts && seen.matches(descriptor);
                let same_switch = switch_id.is_some()
                    && seen.segmentation_type() == SegmentationType::UnscheduledEventStart
                    && seen.segmentation_event_id() == descriptor.segmentation_event_id()
                    && seen.stream_switch_signal_id() == switch_id;
                same_signal || same_switch
            })
        })
    }

    /// Checks that an in-signal ends the segment it names.
    fn check_in_signal(
        &self,
        descriptor: &SegmentationDescriptor,
        remaining: usize,
    ) -> Result<(), StateError> {
        let closed = &self.open[remaining..];
        if !closed.is_empty() && remaining == 0 {
            return Ok(());
        }

        let paired_start = descriptor.segmentation_type_id().wrapping_sub(1);
        let out = match closed.first() {
            Some(deepest) if deepest.segmentation_type_id() == paired_start => Some(deepest),
            _ => self.open[..remaining].last(),
        };

        match out {
            Some(out) if out.segmentation_event_id() == descriptor.segmentation_event_id() => Ok(()),
            _ => Err(StateError::MissingOut),
        }
    }

    fn record(&mut self, pts: Pts, descriptor: SegmentationDescriptor) {
        if let Some(group) = self.received.iter_mut().find(|received| received.pts == pts) {
            group.descriptors.push(descriptor);
            return;
        }
        self.received.push_back(Received {
            pts,
            descriptors: vec![descriptor],
        });
    }
}
