//! Error types for the builder API.

use std::time::Duration;

use thiserror::Error;

use crate::pts::duration_to_ticks;

/// Errors that can occur while building a message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuilderError {
    /// A required field is missing.
    #[error("required field '{0}' is missing")]
    MissingRequiredField(&'static str),

    /// An invalid value was provided for a field.
    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue {
        /// The field that had an invalid value.
        field: &'static str,
        /// Why the value is invalid.
        reason: String,
    },

    /// A duration does not fit in its wire field.
    #[error("duration for field '{field}' is too large: {duration:?}")]
    DurationTooLarge {
        /// The field that received the duration.
        field: &'static str,
        /// The rejected duration.
        duration: Duration,
    },

    /// A UPID has the wrong length for its type.
    #[error("invalid UPID length: expected {expected} bytes, got {actual}")]
    InvalidUpidLength {
        /// The required length.
        expected: usize,
        /// The length provided.
        actual: usize,
    },

    /// Too many components were specified.
    #[error("too many components: maximum {max}, got {actual}")]
    InvalidComponentCount {
        /// The maximum number of components allowed.
        max: usize,
        /// The number of components provided.
        actual: usize,
    },
}

/// Result type for builder operations.
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Converts `duration` to ticks, failing when it needs more than `bits` bits.
pub(crate) fn ticks_within(field: &'static str, duration: Duration, bits: u32) -> BuilderResult<u64> {
    match duration_to_ticks(duration) {
        Some(ticks) if ticks >> bits == 0 => Ok(ticks),
        _ => Err(BuilderError::DurationTooLarge { field, duration }),
    }
}
