//! idshift DUID codec
//!
//! Encoding, decoding and textual forms for the four RFC 8415 DUID
//! variants (LLT, EN, LL, UUID).

pub mod codec;
pub mod hex;
pub mod types;

pub use codec::{
    decode, generate, generate_code, ParsedDuid, DUID_TIME_EPOCH_OFFSET, ENTERPRISE_NUMBER,
    HW_TYPE_ETHERNET,
};
pub use hex::{colon_hex, from_hex, to_hex};
pub use types::{Duid, DuidType};
