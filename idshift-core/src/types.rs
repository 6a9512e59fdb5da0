//! Common types used throughout idshift

use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// MAC Address (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Create a new MAC address
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Zero MAC address (00:00:00:00:00:00)
    pub const fn zero() -> Self {
        Self([0x00, 0x00, 0x00, 0x00, 0x00, 0x00])
    }

    /// Generate a random locally-administered unicast address.
    ///
    /// Bit 1 of the first octet is set (locally administered) and bit 0 is
    /// cleared (unicast), so the result never collides with a vendor OUI
    /// and never reads as multicast.
    pub fn random_local() -> Self {
        let mut bytes = [0u8; 6];
        rand::thread_rng().fill(&mut bytes);
        bytes[0] |= 0x02;
        bytes[0] &= 0xfe;
        Self(bytes)
    }

    /// Create a MAC address from a slice
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 6 {
            let mut bytes = [0u8; 6];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Get bytes as slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Convert to array
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Is the locally-administered bit set?
    pub fn is_locally_administered(&self) -> bool {
        self.0[0] & 0x02 == 0x02
    }

    /// Is this a multicast address (bit 0 of first octet is 1)?
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 == 0x01
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddr {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split([':', '-']).collect();
        if parts.len() != 6 {
            return Err(crate::Error::InvalidMac(s.to_string()));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            bytes[i] = u8::from_str_radix(part, 16)
                .map_err(|_| crate::Error::InvalidMac(s.to_string()))?;
        }

        Ok(MacAddr(bytes))
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddr(bytes)
    }
}

impl From<MacAddr> for [u8; 6] {
    fn from(mac: MacAddr) -> Self {
        mac.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_mac_display() {
        let mac = MacAddr([0xAA, 0xBB, 0xCC, 0x0D, 0xEE, 0xFF]);
        assert_eq!(format!("{}", mac), "aa:bb:cc:0d:ee:ff");
    }

    #[test]
    fn test_mac_from_str() {
        let mac: MacAddr = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        assert_eq!(mac.octets(), [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);

        let upper: MacAddr = "AA-BB-CC-DD-EE-FF".parse().unwrap();
        assert_eq!(upper, mac);

        assert!("aa:bb:cc".parse::<MacAddr>().is_err());
        assert!("aa:bb:cc:dd:ee:zz".parse::<MacAddr>().is_err());
    }

    #[test]
    fn test_random_local_bits() {
        for _ in 0..100 {
            let mac = MacAddr::random_local();
            assert_eq!(mac.0[0] & 0x02, 0x02);
            assert_eq!(mac.0[0] & 0x01, 0x00);
        }
    }

    #[test]
    fn test_random_local_spread() {
        let mut seen = HashSet::new();
        let mut collisions = 0;
        for _ in 0..100 {
            if !seen.insert(MacAddr::random_local()) {
                collisions += 1;
            }
        }
        assert!(collisions < 5, "too many collisions: {}", collisions);
    }

    #[test]
    fn test_roundtrip() {
        let mac = MacAddr::random_local();
        let parsed: MacAddr = mac.to_string().parse().unwrap();
        assert_eq!(mac, parsed);
    }
}
