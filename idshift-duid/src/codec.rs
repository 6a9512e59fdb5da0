//! DUID generation and decoding
//!
//! Builds the four RFC 8415 DUID layouts and decodes received bytes back
//! into their fields. Decoding never fails: unknown type tags and
//! under-length buffers degrade to a partially populated result instead
//! of erroring, because an undecodable DUID must still be storable and
//! re-installable.

use bytes::{BufMut, BytesMut};
use idshift_core::{Error, MacAddr, Result};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::{Duid, DuidType};

/// Seconds between 1970-01-01 and 2000-01-01; the DUID-LLT time field
/// counts from the latter.
pub const DUID_TIME_EPOCH_OFFSET: u64 = 946_684_800;

/// Hardware type for Ethernet link-layer addresses
pub const HW_TYPE_ETHERNET: u16 = 1;

/// Enterprise number for generated DUID-EN values (IANA documentation
/// range, RFC 5612)
pub const ENTERPRISE_NUMBER: u32 = 32_473;

/// Generate a DUID of the requested type.
///
/// When `mac` is omitted a random locally-administered address is
/// generated first, so every type can be produced without knowing any
/// real interface.
pub fn generate(duid_type: DuidType, mac: Option<MacAddr>) -> Duid {
    let mac = mac.unwrap_or_else(MacAddr::random_local);
    let mut buf = BytesMut::with_capacity(18);
    buf.put_u16(duid_type.to_u16());

    match duid_type {
        DuidType::Llt => {
            buf.put_u16(HW_TYPE_ETHERNET);
            buf.put_u32(duid_time_now());
            buf.put_slice(mac.as_bytes());
        }
        DuidType::En => {
            buf.put_u32(ENTERPRISE_NUMBER);
            buf.put_slice(mac.as_bytes());
        }
        DuidType::Ll => {
            buf.put_u16(HW_TYPE_ETHERNET);
            buf.put_slice(mac.as_bytes());
        }
        DuidType::Uuid => {
            // new_v4 already carries the RFC 4122 version/variant bits
            buf.put_slice(uuid::Uuid::new_v4().as_bytes());
        }
    }

    Duid::from_bytes(buf.to_vec())
}

/// Generate a DUID from a numeric type code.
///
/// Fails with `UnsupportedDuidType` for any code outside {1,2,3,4}.
pub fn generate_code(code: u16, mac: Option<MacAddr>) -> Result<Duid> {
    let duid_type = DuidType::from_u16(code).ok_or(Error::UnsupportedDuidType(code))?;
    Ok(generate(duid_type, mac))
}

fn duid_time_now() -> u32 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    now.saturating_sub(DUID_TIME_EPOCH_OFFSET) as u32
}

/// Decoded view of a DUID.
///
/// Fields are populated only when the buffer is long enough to guarantee
/// them for the recognized type; everything else stays `None`. `raw` is
/// always the full input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDuid {
    /// Recognized type, `None` for unknown tags or buffers under 2 bytes
    pub duid_type: Option<DuidType>,
    /// The numeric type tag, when at least 2 bytes were present
    pub type_code: Option<u16>,
    /// The full undecoded input
    pub raw: Vec<u8>,
    /// Hardware type (LLT, LL)
    pub hw_type: Option<u16>,
    /// Seconds since 2000-01-01 (LLT)
    pub time: Option<u32>,
    /// Link-layer address (LLT, LL)
    pub link_layer: Option<MacAddr>,
    /// Enterprise number (EN)
    pub enterprise_number: Option<u32>,
    /// Vendor identifier bytes (EN)
    pub identifier: Option<Vec<u8>>,
    /// UUID payload (UUID)
    pub uuid: Option<[u8; 16]>,
}

impl ParsedDuid {
    /// Wire-style type name, `"unknown"` when the tag is unrecognized
    pub fn type_name(&self) -> &'static str {
        self.duid_type.map(DuidType::name).unwrap_or("unknown")
    }

    fn opaque(raw: &[u8]) -> Self {
        Self {
            duid_type: None,
            type_code: None,
            raw: raw.to_vec(),
            hw_type: None,
            time: None,
            link_layer: None,
            enterprise_number: None,
            identifier: None,
            uuid: None,
        }
    }
}

/// Decode a DUID byte string.
///
/// Buffers under 2 bytes produce the unknown sentinel carrying the raw
/// bytes. Recognized type tags with buffers shorter than the type's
/// minimum length produce type/type-name/raw only; this is a defined
/// degraded mode, not an error.
pub fn decode(bytes: &[u8]) -> ParsedDuid {
    if bytes.len() < 2 {
        return ParsedDuid::opaque(bytes);
    }

    let code = u16::from_be_bytes([bytes[0], bytes[1]]);
    let mut parsed = ParsedDuid {
        type_code: Some(code),
        duid_type: DuidType::from_u16(code),
        ..ParsedDuid::opaque(bytes)
    };

    match parsed.duid_type {
        Some(DuidType::Llt) if bytes.len() >= 14 => {
            parsed.hw_type = Some(u16::from_be_bytes([bytes[2], bytes[3]]));
            parsed.time = Some(u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]));
            parsed.link_layer = MacAddr::from_slice(&bytes[8..14]);
        }
        Some(DuidType::En) if bytes.len() >= 6 => {
            parsed.enterprise_number =
                Some(u32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]));
            parsed.identifier = Some(bytes[6..].to_vec());
        }
        Some(DuidType::Ll) if bytes.len() >= 10 => {
            parsed.hw_type = Some(u16::from_be_bytes([bytes[2], bytes[3]]));
            parsed.link_layer = MacAddr::from_slice(&bytes[4..10]);
        }
        Some(DuidType::Uuid) if bytes.len() >= 18 => {
            let mut payload = [0u8; 16];
            payload.copy_from_slice(&bytes[2..18]);
            parsed.uuid = Some(payload);
        }
        _ => {}
    }

    parsed
}
