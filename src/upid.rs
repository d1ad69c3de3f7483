//! UPID (Unique Program Identifier) types and formatting utilities.
//!
//! A segmentation descriptor names the content it delimits with a UPID. Most
//! UPIDs are a single (type, bytes) pair. The MID type (0x0D) instead packs an
//! ordered list of UPIDs, each written as type, length and bytes.

use std::fmt;

use crate::bit_reader::BitReader;
use crate::error::ParseError;
use crate::fmt::{format_as_hex, format_text_or_hex};

#[cfg(feature = "serde")]
use serde::Serialize;

coded_enum! {
    /// The `segmentation_upid_type` values defined by SCTE-35.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub enum SegmentationUpidType {
        NotUsed = 0x00 => "Not Used",
        UserDefinedDeprecated = 0x01 => "User Defined (Deprecated)",
        ISCI = 0x02 => "ISCI (Industry Standard Commercial Identifier)",
        AdID = 0x03 => "Ad Identifier",
        UMID = 0x04 => "UMID (Unique Material Identifier)",
        ISANDeprecated = 0x05 => "ISAN (Deprecated)",
        ISAN = 0x06 => "ISAN (International Standard Audiovisual Number)",
        TID = 0x07 => "TID (Tribune Media Systems Program Identifier)",
        AiringID = 0x08 => "Airing ID",
        ADI = 0x09 => "ADI (Advertising Digital Identification)",
        EIDR = 0x0A => "EIDR (Entertainment Identifier Registry)",
        ATSCContentIdentifier = 0x0B => "ATSC Content Identifier",
        MPU = 0x0C => "MPU (Managed Private UPID)",
        MID = 0x0D => "MID (Multiple UPID)",
        ADSInformation = 0x0E => "ADS Information",
        URI = 0x0F => "URI (Uniform Resource Identifier)",
        UUID = 0x10 => "UUID (Universally Unique Identifier)",
        SCR = 0x11 => "SCR (Subscriber Company Reporting)",
    }
}

impl Default for SegmentationUpidType {
    fn default() -> Self {
        SegmentationUpidType::NotUsed
    }
}

impl SegmentationUpidType {
    /// Byte length mandated for fixed-length UPID types.
    pub fn expected_length(&self) -> Option<usize> {
        use SegmentationUpidType::*;
        match self {
            NotUsed => Some(0),
            ISCI | ISANDeprecated | AiringID => Some(8),
            AdID | ISAN | TID | EIDR => Some(12),
            UUID => Some(16),
            UMID => Some(32),
            _ => None,
        }
    }

    /// Whether the UPID bytes are ASCII text.
    fn is_text(&self) -> bool {
        use SegmentationUpidType::*;
        matches!(
            self,
            UserDefinedDeprecated | ISCI | AdID | TID | ADI | URI | SCR | ADSInformation
        )
    }
}

/// A single (type, bytes) UPID.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Upid {
    /// The UPID type.
    pub upid_type: SegmentationUpidType,
    /// The raw UPID bytes.
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::serialization::as_base64"))]
    pub value: Vec<u8>,
}

impl Upid {
    /// Creates a UPID from its type and raw bytes.
    pub fn new(upid_type: SegmentationUpidType, value: impl Into<Vec<u8>>) -> Self {
        Upid {
            upid_type,
            value: value.into(),
        }
    }

    /// The UPID bytes decoded as text, replacing invalid UTF-8.
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }

    /// Returns true if the UPID bytes contain `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        let needle = needle.as_bytes();
        !needle.is_empty() && self.value.windows(needle.len()).any(|window| window == needle)
    }
}

impl fmt::Display for Upid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SegmentationUpidType::*;
        match self.upid_type {
            NotUsed => f.write_str("none"),
            UUID if self.value.len() == 16 => f.write_str(&format_uuid(&self.value)),
            ISAN | ISANDeprecated => f.write_str(&format_isan(&self.value)),
            AiringID if self.value.len() == 8 => {
                let mut id = [0u8; 8];
                id.copy_from_slice(&self.value);
                write!(f, "0x{:016x}", u64::from_be_bytes(id))
            }
            t if t.is_text() => f.write_str(&format_text_or_hex(&self.value)),
            _ => f.write_str(&format_as_hex(&self.value)),
        }
    }
}

/// The UPID carried by a segmentation descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SegmentationUpid {
    /// One UPID of any type but MID.
    Single(Upid),
    /// A MID: an ordered list of UPIDs.
    Mid(Vec<Upid>),
}

impl Default for SegmentationUpid {
    fn default() -> Self {
        SegmentationUpid::Single(Upid::default())
    }
}

impl SegmentationUpid {
    /// The `segmentation_upid_type` written on the wire.
    pub fn upid_type(&self) -> SegmentationUpidType {
        match self {
            SegmentationUpid::Single(upid) => upid.upid_type,
            SegmentationUpid::Mid(_) => SegmentationUpidType::MID,
        }
    }

    /// Returns true when no UPID is carried.
    pub fn is_empty(&self) -> bool {
        match self {
            SegmentationUpid::Single(upid) => upid.value.is_empty(),
            SegmentationUpid::Mid(upids) => upids.is_empty(),
        }
    }

    /// The UPIDs in order: one entry for a single UPID, every entry of a MID.
    pub fn upids(&self) -> &[Upid] {
        match self {
            SegmentationUpid::Single(upid) => std::slice::from_ref(upid),
            SegmentationUpid::Mid(upids) => upids,
        }
    }

    /// Length of the `segmentation_upid()` bytes.
    pub fn encoded_len(&self) -> usize {
        match self {
            SegmentationUpid::Single(upid) => upid.value.len(),
            SegmentationUpid::Mid(upids) => upids.iter().map(|upid| 2 + upid.value.len()).sum(),
        }
    }

    /// Reads `segmentation_upid()` bytes of the given type.
    pub(crate) fn read(
        upid_type: SegmentationUpidType,
        bytes: &[u8],
    ) -> Result<Self, ParseError> {
        if upid_type != SegmentationUpidType::MID {
            return Ok(SegmentationUpid::Single(Upid::new(upid_type, bytes)));
        }

        let mut reader = BitReader::new(bytes);
        let mut upids = Vec::new();
        while reader.remaining_bytes() > 0 {
            let upid_type = SegmentationUpidType::from(reader.read_u8()?);
            let length = reader.read_u8()? as usize;
            let value = reader
                .read_bytes(length)
                .map_err(|_| ParseError::InvalidLength("MID entry overruns segmentation_upid"))?;
            upids.push(Upid::new(upid_type, value));
        }
        Ok(SegmentationUpid::Mid(upids))
    }
}

impl fmt::Display for SegmentationUpid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentationUpid::Single(upid) => upid.fmt(f),
            SegmentationUpid::Mid(upids) => {
                f.write_str("[")?;
                for (i, upid) in upids.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", upid.upid_type, upid)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Formats 16 bytes as a standard UUID string.
pub fn format_uuid(bytes: &[u8]) -> String {
    if bytes.len() != 16 {
        return format_as_hex(bytes);
    }

    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Formats ISAN bytes as dash separated groups of four hex digits.
pub fn format_isan(bytes: &[u8]) -> String {
    if bytes.len() < 8 || bytes.len() % 2 != 0 {
        return format_as_hex(bytes);
    }

    bytes
        .chunks(2)
        .map(|pair| format!("{:02x}{:02x}", pair[0], pair[1]))
        .collect::<Vec<_>>()
        .join("-")
}
