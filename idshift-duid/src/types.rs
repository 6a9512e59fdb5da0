//! DUID value and type-tag types

use crate::hex;
use std::fmt;

/// DUID encodings defined by RFC 8415
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum DuidType {
    /// Link-layer address plus time
    Llt = 1,
    /// Vendor-assigned, based on enterprise number
    En = 2,
    /// Link-layer address only
    Ll = 3,
    /// UUID-based
    Uuid = 4,
}

impl DuidType {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::Llt),
            2 => Some(Self::En),
            3 => Some(Self::Ll),
            4 => Some(Self::Uuid),
            _ => None,
        }
    }

    pub fn to_u16(self) -> u16 {
        self as u16
    }

    /// Wire-style name, as reported by `parse`
    pub fn name(self) -> &'static str {
        match self {
            Self::Llt => "DUID_LLT",
            Self::En => "DUID_EN",
            Self::Ll => "DUID_LL",
            Self::Uuid => "DUID_UUID",
        }
    }
}

impl fmt::Display for DuidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A DHCP Unique Identifier.
///
/// Opaque byte string, 3..130 bytes on the wire, beginning with a 2-byte
/// big-endian type tag. Immutable once constructed; transformations
/// produce new values. Unknown type tags are carried as-is so a DUID can
/// always be stored and re-installed even when it cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duid(Vec<u8>);

impl Duid {
    /// Wrap raw bytes as a DUID without interpretation
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The recognized type tag, if any
    pub fn duid_type(&self) -> Option<DuidType> {
        if self.0.len() < 2 {
            return None;
        }
        DuidType::from_u16(u16::from_be_bytes([self.0[0], self.0[1]]))
    }

    /// Canonical unpunctuated uppercase hex form
    pub fn to_hex(&self) -> String {
        hex::to_hex(&self.0)
    }
}

impl fmt::Display for Duid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::colon_hex(&self.0))
    }
}

impl From<Vec<u8>> for Duid {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Duid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
