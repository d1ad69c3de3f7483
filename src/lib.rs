//! SCTE-35 cue decoding, encoding and segmentation state tracking.
//!
//! This crate reads and writes `splice_info_section` messages, the binary
//! ad-insertion signals carried in MPEG transport streams, and follows a live
//! sequence of them to know which segmentation events are in effect.
//!
//! # Decoding
//!
//! ```rust
//! use scte35_cue::{parse_splice_info_section, SpliceCommand};
//! use data_encoding::BASE64;
//!
//! let buffer = BASE64.decode(b"/DAWAAAAAAAAAP/wBQb+Qjo1vQAAuwxz9A==").unwrap();
//! let section = parse_splice_info_section(&buffer).unwrap();
//!
//! assert!(matches!(section.splice_command(), SpliceCommand::TimeSignal(_)));
//! assert_eq!(section.pts().map(|pts| pts.ticks()), Some(0x0_423a_35bd));
//! ```
//!
//! # Tracking segmentation state
//!
//! Feed every segmentation descriptor of every section, in arrival order,
//! into one [`State`] per stream. Each call returns the descriptors the new
//! one closed.
//!
//! ```rust
//! use scte35_cue::builders::{SegmentationDescriptorBuilder, SpliceInfoSectionBuilder, TimeSignalBuilder};
//! use scte35_cue::{Pts, SegmentationType, State};
//!
//! let signal = |pts: u64, event_id: u32, segmentation_type: SegmentationType| {
//!     SpliceInfoSectionBuilder::new()
//!         .time_signal(TimeSignalBuilder::new().at(Pts::new(pts)).build().unwrap())
//!         .add_segmentation_descriptor(
//!             SegmentationDescriptorBuilder::new(event_id, segmentation_type).build().unwrap(),
//!         )
//!         .build()
//!         .unwrap()
//! };
//!
//! let mut state = State::new();
//! let out = signal(90_000, 7, SegmentationType::ProviderAdvertisementStart);
//! let back = signal(2_790_000, 7, SegmentationType::ProviderAdvertisementEnd);
//!
//! for descriptor in out.segmentation_descriptors() {
//!     assert!(state.process_descriptor(descriptor.clone()).unwrap().is_empty());
//! }
//! for descriptor in back.segmentation_descriptors() {
//!     let closed = state.process_descriptor(descriptor.clone()).unwrap();
//!     assert_eq!(closed.len(), 1);
//! }
//! assert_eq!(state.open().count(), 0);
//! ```
//!
//! # Features
//!
//! * `serde` (default): `Serialize` for every data type.
//! * `base64`: [`SpliceInfoSection::to_base64`].
//! * `cli`: the `scte35-cue` command line decoder.

#[macro_use]
mod macros;

mod bit_reader;
pub mod builders;
pub mod crc;
pub mod descriptors;
pub mod encoding;
pub mod error;
pub mod fmt;
mod parser;
pub mod pts;
#[cfg(feature = "serde")]
mod serialization;
pub mod state;
pub mod time;
pub mod types;
pub mod upid;

pub use descriptors::{
    Component, DeliveryRestrictions, DeviceRestrictions, SegmentationDescriptor, SpliceDescriptor,
};
pub use encoding::EncodingError;
pub use error::{ParseError, StateError};
pub use parser::{
    parse_splice_info_section, parse_splice_info_section_checked, parse_with_pointer_field,
    parse_with_pointer_field_checked,
};
pub use pts::{MAX_PTS, PTS_CLOCK_RATE, Pts, duration_to_ticks};
pub use state::State;
pub use time::{BreakDuration, SpliceTime};
pub use types::{
    SapType, SegmentationType, SpliceCommand, SpliceInfoSection, SpliceInsert,
    SpliceInsertComponent, TimeSignal,
};
pub use upid::{SegmentationUpid, SegmentationUpidType, Upid};
