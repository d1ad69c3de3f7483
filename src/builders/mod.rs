//! Builders for creating SCTE-35 messages from scratch.
//!
//! Builders validate field ranges and flag consistency up front and report
//! problems as [`BuilderError`] values. A section built from the typed
//! builders serializes and parses back to an equal section; sections
//! assembled from hand-written command structs can still fail in
//! [`serialize`](crate::SpliceInfoSection::serialize) with an
//! [`EncodingError`](crate::EncodingError).

/// Error types for the builder API.
pub mod error;
/// Builder for splice information sections.
pub mod splice_info_section;
/// Builders for splice commands.
pub mod commands;
/// Builder for segmentation descriptors.
pub mod descriptors;
/// Time-related builders.
pub mod time;

#[cfg(test)]
mod tests;

pub use commands::{SpliceInsertBuilder, TimeSignalBuilder};
pub use descriptors::SegmentationDescriptorBuilder;
pub use error::{BuilderError, BuilderResult};
pub use splice_info_section::SpliceInfoSectionBuilder;
pub use time::{BreakDurationBuilder, SpliceTimeBuilder};
