//! Binary encoding support for SCTE-35 messages.
//!
//! Serialization recomputes every length field from the current values and
//! appends a fresh CRC-32. Nothing is cached from a previous parse.

/// Error types for encoding operations.
pub mod error;

/// Bit-level writer for encoding binary data.
pub mod writer;

/// Trait definitions for encodable types.
pub mod traits;

mod commands;
mod descriptors;
mod splice_info_section;
mod time;


pub use error::{EncodingError, EncodingResult};
pub use splice_info_section::MAX_SECTION_LENGTH;
pub use traits::Encodable;
pub use writer::BitWriter;
