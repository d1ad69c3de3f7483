//! Formatting utilities for SCTE-35 data structures.
//!
//! Binary fields such as UPIDs and opaque descriptor payloads are shown as
//! text when they are printable and as hex otherwise.

/// Converts a 32-bit identifier such as `0x43554549` to its ASCII form.
///
/// Falls back to hex when any byte is not an ASCII letter or digit.
///
/// # Examples
/// ```rust
/// use scte35_cue::fmt::format_identifier_to_string;
///
/// assert_eq!(format_identifier_to_string(0x43554549), "CUEI");
/// assert_eq!(format_identifier_to_string(0x12345678), "0x12345678");
/// ```
pub fn format_identifier_to_string(identifier: u32) -> String {
    let bytes = identifier.to_be_bytes();

    if bytes.iter().all(|b| b.is_ascii_alphanumeric()) {
        bytes.iter().map(|&b| b as char).collect()
    } else {
        format!("0x{:08X}", identifier)
    }
}

/// Formats bytes as quoted text when printable, otherwise as hex.
///
/// # Examples
/// ```rust
/// use scte35_cue::fmt::format_text_or_hex;
///
/// assert_eq!(format_text_or_hex(b"test"), "\"test\"");
/// assert_eq!(format_text_or_hex(&[0x01, 0x02, 0x03]), "0x010203");
/// assert_eq!(format_text_or_hex(&[]), "empty");
/// ```
pub fn format_text_or_hex(data: &[u8]) -> String {
    if data.is_empty() {
        return "empty".to_string();
    }

    match std::str::from_utf8(data) {
        Ok(text) if text.chars().all(|c| c.is_ascii_graphic() || c == ' ') => {
            if text.len() <= 50 {
                format!("\"{}\"", text)
            } else {
                format!("\"{}...\" ({} bytes)", &text[..47], data.len())
            }
        }
        _ => format_as_hex(data),
    }
}

/// Formats data as hex, truncated after six bytes when longer than eight.
///
/// # Examples
/// ```rust
/// use scte35_cue::fmt::format_as_hex;
///
/// assert_eq!(format_as_hex(&[0x01, 0x02, 0x03]), "0x010203");
/// assert_eq!(format_as_hex(&(0..20).collect::<Vec<u8>>()), "0x000102030405... (20 bytes)");
/// ```
pub fn format_as_hex(data: &[u8]) -> String {
    if data.len() <= 8 {
        format!("0x{}", to_hex(data))
    } else {
        format!("0x{}... ({} bytes)", to_hex(&data[..6]), data.len())
    }
}

/// Lowercase hex with no prefix and no truncation.
pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_identifier_to_string() {
        assert_eq!(format_identifier_to_string(0x43554549), "CUEI");
        assert_eq!(format_identifier_to_string(0x41424344), "ABCD");
        // "AB-D"
        assert_eq!(format_identifier_to_string(0x41422D44), "0x41422D44");
        assert_eq!(format_identifier_to_string(0), "0x00000000");
    }

    #[test]
    fn test_format_text_or_hex() {
        assert_eq!(format_text_or_hex(b"hello world"), "\"hello world\"");
        assert_eq!(format_text_or_hex(&[0xFF, 0xFE, 0xFD]), "0xfffefd");
        assert_eq!(format_text_or_hex(b"test\x00\x01"), "0x746573740001");

        let long = "a".repeat(60);
        let result = format_text_or_hex(long.as_bytes());
        assert!(result.ends_with("...\" (60 bytes)"));
    }

    #[test]
    fn test_format_as_hex() {
        assert_eq!(format_as_hex(&[]), "0x");
        assert_eq!(
            format_as_hex(&[1, 2, 3, 4, 5, 6, 7, 8]),
            "0x0102030405060708"
        );
        assert_eq!(to_hex(&[0xfc, 0x30]), "fc30");
    }
}
