//! Error types for parsing SCTE-35 messages and tracking segmentation state.

use thiserror::Error;

/// Errors raised while decoding a `splice_info_section`.
///
/// Every variant is terminal for the parse call: no partial structure is
/// returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The buffer cannot hold even the fixed-size parts of a section.
    #[error("buffer too short for a splice_info_section: {0} bytes")]
    TooShort(usize),

    /// The table id is not the SCTE-35 table id (0xFC).
    #[error("unknown table id 0x{0:02x}, expected 0xfc")]
    UnknownTableId(u8),

    /// Only protocol version 0 is defined.
    #[error("unsupported protocol version {0}")]
    UnsupportedProtocolVersion(u8),

    /// Encrypted sections cannot be decoded.
    #[error("encrypted splice_info_section is not supported")]
    EncryptionUnsupported,

    /// The splice command is not one of splice_null, splice_insert or
    /// time_signal, or it lacks a PTS it is expected to carry.
    #[error("unsupported splice command type 0x{0:02x}")]
    UnsupportedSpliceCommand(u8),

    /// A segmentation descriptor does not carry the "CUEI" identifier.
    #[error("invalid segmentation descriptor identifier 0x{0:08x}, expected CUEI")]
    InvalidDescriptorId(u32),

    /// A length field overruns its container or data ends early.
    #[error("invalid length: {0}")]
    InvalidLength(&'static str),

    /// The CRC-32 stored in the section does not match its contents.
    #[error("checksum mismatch: stored 0x{stored:08x}, computed 0x{computed:08x}")]
    ChecksumMismatch {
        /// CRC read from the section.
        stored: u32,
        /// CRC computed over the section bytes.
        computed: u32,
    },
}

/// Errors raised by [`State`](crate::State) operations.
///
/// A failed call leaves the state exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The descriptor's signal carries no PTS, so it cannot be ordered.
    #[error("descriptor signal carries no PTS")]
    UnsupportedSpliceCommand,

    /// The descriptor was already received.
    #[error("duplicate segmentation descriptor")]
    DuplicateDescriptor,

    /// The descriptor is not valid in the current state.
    #[error("segmentation descriptor is invalid in the current state")]
    InvalidDescriptor,

    /// An in-signal arrived without its matching out-signal.
    #[error("no matching out-signal is open")]
    MissingOut,

    /// An explicit close targeted a descriptor that is not open.
    #[error("segmentation descriptor is not open")]
    DescriptorNotFound,
}
