//! MAC address glue
//!
//! Thin command-shelling around each OS's link-layer tools: read the
//! live MAC of a named interface and install a new one. The read path
//! tries the OS tool first and falls back to interface enumeration, so
//! a broken tool invocation degrades to "absent" instead of an error.

use idshift_core::{Error, Interface, MacAddr, Result};
use tracing::debug;

use crate::cmd;

/// Read the live MAC address of `iface`.
///
/// The primary OS mechanism is tried first; any failure there is caught
/// and the generic enumeration fallback is tried. When the fallback
/// also yields nothing the result is `None`, not an error.
pub fn current_mac(iface: &str) -> Result<Option<MacAddr>> {
    match primary_mac(iface) {
        Ok(Some(mac)) => Ok(Some(mac)),
        Ok(None) => Ok(fallback_mac(iface)),
        Err(err) => {
            debug!(iface, error = %err, "primary MAC read failed, trying enumeration");
            Ok(fallback_mac(iface))
        }
    }
}

/// Install a new MAC address on `iface` through the OS's native tool
pub fn set_mac(iface: &str, mac: MacAddr) -> Result<()> {
    match std::env::consts::OS {
        "linux" => {
            let addr = mac.to_string();
            cmd::run("ip", &["link", "set", "dev", iface, "down"])?;
            let result = cmd::run("ip", &["link", "set", "dev", iface, "address", &addr]);
            // bring the link back up even when the address change failed
            let up = cmd::run("ip", &["link", "set", "dev", iface, "up"]);
            result?;
            up.map(|_| ())
        }
        "macos" => {
            let addr = mac.to_string();
            cmd::run("ifconfig", &[iface, "ether", &addr]).map(|_| ())
        }
        "windows" => {
            let bare: String = mac.to_string().replace(':', "");
            let script = format!(
                "Set-NetAdapterAdvancedProperty -Name '{}' -RegistryKeyword NetworkAddress -RegistryValue '{}'; Restart-NetAdapter -Name '{}'",
                iface, bare, iface
            );
            cmd::run("powershell", &["-NoProfile", "-Command", &script]).map(|_| ())
        }
        other => Err(Error::UnsupportedPlatform(other.to_string())),
    }
}

fn primary_mac(iface: &str) -> Result<Option<MacAddr>> {
    match std::env::consts::OS {
        "linux" => {
            let output = cmd::run("ip", &["-o", "link", "show", "dev", iface])?;
            Ok(parse_ip_link(&output))
        }
        "macos" => {
            let output = cmd::run("ifconfig", &[iface])?;
            Ok(parse_ifconfig(&output))
        }
        "windows" => {
            let output = cmd::run("getmac", &["/v", "/fo", "csv", "/nh"])?;
            Ok(parse_getmac(&output, iface))
        }
        other => Err(Error::UnsupportedPlatform(other.to_string())),
    }
}

fn fallback_mac(iface: &str) -> Option<MacAddr> {
    Interface::by_name(iface).ok().and_then(|i| i.mac_address)
}

/// Extract the `link/ether` address from `ip -o link show` output
fn parse_ip_link(output: &str) -> Option<MacAddr> {
    let mut tokens = output.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "link/ether" {
            return tokens.next()?.parse().ok();
        }
    }
    None
}

/// Extract the `ether` address from `ifconfig` output
fn parse_ifconfig(output: &str) -> Option<MacAddr> {
    for line in output.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() == Some("ether") {
            return tokens.next()?.parse().ok();
        }
    }
    None
}

/// Find `iface`'s physical address in `getmac /v /fo csv /nh` output
fn parse_getmac(output: &str, iface: &str) -> Option<MacAddr> {
    for line in output.lines() {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim_matches('"')).collect();
        if fields.len() >= 3 && fields[0] == iface {
            return fields[2].parse().ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ip_link() {
        let output = "2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc fq_codel state UP mode DEFAULT group default qlen 1000\\    link/ether aa:bb:cc:dd:ee:ff brd ff:ff:ff:ff:ff:ff\n";
        assert_eq!(
            parse_ip_link(output),
            Some("aa:bb:cc:dd:ee:ff".parse().unwrap())
        );
        assert_eq!(parse_ip_link("1: lo: <LOOPBACK> link/loopback 00:00:00:00:00:00"), None);
    }

    #[test]
    fn test_parse_ifconfig() {
        let output = "en0: flags=8863<UP,BROADCAST,SMART,RUNNING,SIMPLEX,MULTICAST> mtu 1500\n\
             \tether f0:18:98:aa:bb:cc\n\
             \tinet6 fe80::1 prefixlen 64\n";
        assert_eq!(
            parse_ifconfig(output),
            Some("f0:18:98:aa:bb:cc".parse().unwrap())
        );
        assert_eq!(parse_ifconfig("lo0: flags=8049<UP,LOOPBACK>\n"), None);
    }

    #[test]
    fn test_parse_getmac() {
        let output = "\"Ethernet\",\"Intel(R) Ethernet Connection\",\"AA-BB-CC-DD-EE-FF\",\"\\Device\\Tcpip_{...}\"\n\
             \"Wi-Fi\",\"Wireless Adapter\",\"11-22-33-44-55-66\",\"Media disconnected\"\n";
        assert_eq!(
            parse_getmac(output, "Wi-Fi"),
            Some("11-22-33-44-55-66".parse().unwrap())
        );
        assert_eq!(parse_getmac(output, "Bluetooth"), None);
    }
}
