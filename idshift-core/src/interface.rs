//! Network interface discovery

use crate::{Error, MacAddr};
use std::fmt;

/// Network interface
#[derive(Debug, Clone)]
pub struct Interface {
    /// Interface name (e.g., "eth0", "en0")
    pub name: String,
    /// Interface index
    pub index: u32,
    /// MAC address, if the interface has one
    pub mac_address: Option<MacAddr>,
    /// Is interface up?
    pub is_up: bool,
    /// Is this a loopback interface?
    pub is_loopback: bool,
}

impl Interface {
    /// Get interface by name
    pub fn by_name(name: &str) -> Result<Self, Error> {
        let interfaces = pnet_datalink::interfaces();
        let iface = interfaces
            .into_iter()
            .find(|i| i.name == name)
            .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))?;

        Ok(Self::from_pnet(iface))
    }

    /// List all available interfaces
    pub fn list_all() -> Vec<Self> {
        pnet_datalink::interfaces()
            .into_iter()
            .map(Self::from_pnet)
            .collect()
    }

    fn from_pnet(iface: pnet_datalink::NetworkInterface) -> Self {
        let mac_address = iface
            .mac
            .map(|mac| MacAddr([mac.0, mac.1, mac.2, mac.3, mac.4, mac.5]));

        Self {
            name: iface.name.clone(),
            index: iface.index,
            mac_address,
            is_up: iface.is_up(),
            is_loopback: iface.is_loopback(),
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mac = self
            .mac_address
            .map(|m| m.to_string())
            .unwrap_or_else(|| "no mac".to_string());
        let state = if self.is_up { "up" } else { "down" };
        write!(f, "{} ({}) [{}]", self.name, mac, state)
    }
}
