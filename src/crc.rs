//! CRC-32 computation and validation for SCTE-35 messages.
//!
//! Sections produced by this crate carry a CRC-32 over the MPEG-2 polynomial
//! seeded with `0x46AF6449`. Sections produced elsewhere usually carry the
//! conventional MPEG-2 CRC (seed `0xFFFFFFFF`). Validation accepts either.

use crc::{Algorithm, CRC_32_MPEG_2, Crc};

use crate::error::ParseError;

/// CRC-32 parameters used when serializing sections.
pub const CRC_32_SCTE35_SEEDED: Algorithm<u32> = Algorithm {
    width: 32,
    poly: 0x04c1_1db7,
    init: 0x46af_6449,
    refin: false,
    refout: false,
    xorout: 0x0000_0000,
    check: 0xceb1_32e3,
    residue: 0x0000_0000,
};

/// Seeded CRC-32 instance written by [`SpliceInfoSection::serialize`](crate::SpliceInfoSection::serialize).
pub const SEEDED: Crc<u32> = Crc::<u32>::new(&CRC_32_SCTE35_SEEDED);

/// Conventional MPEG-2 CRC-32 instance.
pub const MPEG_2: Crc<u32> = Crc::<u32>::new(&CRC_32_MPEG_2);

/// Computes the CRC-32 written at the end of a serialized section.
pub fn checksum(data: &[u8]) -> u32 {
    SEEDED.checksum(data)
}

/// Returns true if `expected_crc` matches `data` under either CRC variant.
pub fn validate_crc(data: &[u8], expected_crc: u32) -> bool {
    SEEDED.checksum(data) == expected_crc || MPEG_2.checksum(data) == expected_crc
}

/// Validates the CRC-32 stored in the last 4 bytes of `buffer`.
///
/// # Errors
///
/// * [`ParseError::TooShort`] when the buffer cannot hold a CRC.
/// * [`ParseError::ChecksumMismatch`] when neither CRC variant matches. The
///   reported `computed` value is the seeded variant.
///
/// # Example
///
/// ```rust
/// use scte35_cue::crc::validate_message_crc;
/// use data_encoding::BASE64;
///
/// let buffer = BASE64.decode(b"/DAWAAAAAAAAAP/wBQb+Qjo1vQAAuwxz9A==").unwrap();
/// assert!(validate_message_crc(&buffer).is_ok());
/// ```
pub fn validate_message_crc(buffer: &[u8]) -> Result<(), ParseError> {
    if buffer.len() < 4 {
        return Err(ParseError::TooShort(buffer.len()));
    }

    let (data, crc_bytes) = buffer.split_at(buffer.len() - 4);
    let stored = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);

    if validate_crc(data, stored) {
        Ok(())
    } else {
        Err(ParseError::ChecksumMismatch {
            stored,
            computed: checksum(data),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_check_value() {
        assert_eq!(checksum(b"123456789"), CRC_32_SCTE35_SEEDED.check);
    }

    #[test]
    fn test_accepts_both_variants() {
        let data = [0xFC, 0x30, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(validate_crc(&data, SEEDED.checksum(&data)));
        assert!(validate_crc(&data, MPEG_2.checksum(&data)));
        assert!(!validate_crc(&data, 0xDEAD_BEEF));
    }

    #[test]
    fn test_message_crc_validation_short_buffer() {
        assert_eq!(
            validate_message_crc(&[0x01, 0x02]),
            Err(ParseError::TooShort(2))
        );
    }

    #[test]
    fn test_message_crc_mismatch() {
        let mut message = vec![0xFC, 0x30, 0x11, 0x00];
        let computed = checksum(&message);
        message.extend_from_slice(&[0, 0, 0, 0]);

        assert_eq!(
            validate_message_crc(&message),
            Err(ParseError::ChecksumMismatch {
                stored: 0,
                computed
            })
        );
    }
}
