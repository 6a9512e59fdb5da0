//! macOS DUID mechanism
//!
//! The DHCP client keeps its DUID in a property list under
//! `/var/db/dhcpclient`. XML plists are parsed directly (the DUID is the
//! base64 body of the `<data>` element); binary plists are converted
//! through `plutil` first. IPv6 is toggled with `networksetup`, which
//! wants the hardware-port name rather than the BSD device name.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use idshift_core::{Error, Result};
use std::fs;
use std::path::PathBuf;

use crate::cmd;
use crate::store::OriginalStore;

use super::{best_effort, DuidAdapter};

/// Paths of the native mechanism; tests point these at a tempdir
#[derive(Debug, Clone)]
pub struct MacOsConfig {
    /// The DHCP client's DUID property list
    pub duid_plist: PathBuf,
    /// Directory of cached DHCPv6 leases
    pub lease_dir: PathBuf,
}

impl Default for MacOsConfig {
    fn default() -> Self {
        Self {
            duid_plist: PathBuf::from("/var/db/dhcpclient/DUID.plist"),
            lease_dir: PathBuf::from("/var/db/dhcpclient/leases"),
        }
    }
}

pub struct MacOsAdapter {
    store: OriginalStore,
    config: MacOsConfig,
}

impl MacOsAdapter {
    pub fn new(store: OriginalStore, config: MacOsConfig) -> Self {
        Self { store, config }
    }

    fn plist_xml(&self) -> Result<String> {
        let raw = fs::read(&self.config.duid_plist).map_err(|e| {
            Error::mechanism(
                "reading current DUID",
                format!("{}: {}", self.config.duid_plist.display(), e),
            )
        })?;

        if raw.starts_with(b"bplist") {
            let path = self.config.duid_plist.to_string_lossy().into_owned();
            return cmd::run("plutil", &["-convert", "xml1", "-o", "-", &path])
                .map_err(|e| Error::mechanism("reading current DUID", e.to_string()));
        }

        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}

impl DuidAdapter for MacOsAdapter {
    fn platform(&self) -> &'static str {
        "macos"
    }

    fn store(&self) -> &OriginalStore {
        &self.store
    }

    fn read_active(&self) -> Result<Option<Vec<u8>>> {
        if !self.config.duid_plist.exists() {
            return Ok(None);
        }
        let xml = self.plist_xml()?;
        match extract_plist_data(&xml) {
            Some(duid) => Ok(Some(duid)),
            None => Err(Error::mechanism(
                "reading current DUID",
                format!(
                    "{}: no <data> payload in plist",
                    self.config.duid_plist.display()
                ),
            )),
        }
    }

    fn write_active(&self, duid: &[u8]) -> Result<()> {
        if let Some(parent) = self.config.duid_plist.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::mechanism("writing new DUID", format!("{}: {}", parent.display(), e))
            })?;
        }

        let body = duid_plist_xml(duid);
        fs::write(&self.config.duid_plist, body).map_err(|e| {
            Error::mechanism(
                "writing new DUID",
                format!("{}: {}", self.config.duid_plist.display(), e),
            )
        })?;

        // configd accepts the XML form; converting back to binary is
        // cosmetic parity with what the OS writes itself
        let path = self.config.duid_plist.to_string_lossy().into_owned();
        best_effort(
            "converting plist to binary",
            cmd::run("plutil", &["-convert", "binary1", &path]).map(|_| ()),
        );

        Ok(())
    }

    fn delete_active(&self) -> Result<()> {
        if !self.config.duid_plist.exists() {
            return Ok(());
        }
        fs::remove_file(&self.config.duid_plist).map_err(|e| {
            Error::mechanism(
                "deleting active DUID",
                format!("{}: {}", self.config.duid_plist.display(), e),
            )
        })
    }

    fn toggle_interface_v6(&self, iface: &str, enable: bool) -> Result<()> {
        // networksetup speaks hardware-port names ("Wi-Fi"), not BSD
        // device names ("en0")
        let listing = cmd::run("networksetup", &["-listallhardwareports"])?;
        let port = hardware_port_for_device(&listing, iface).ok_or_else(|| {
            Error::command(format!("no hardware port found for device '{}'", iface))
        })?;

        let flag = if enable { "-setv6automatic" } else { "-setv6off" };
        cmd::run("networksetup", &[flag, &port]).map(|_| ())
    }

    fn clear_lease_state(&self, _iface: Option<&str>) -> Result<()> {
        if !self.config.lease_dir.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(&self.config.lease_dir)? {
            let entry = entry?;
            if entry.path().is_file() {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}

/// Render the DHCP client's DUID plist with `duid` as the data payload
fn duid_plist_xml(duid: &[u8]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
         <plist version=\"1.0\">\n\
         <dict>\n\
         \t<key>DUID</key>\n\
         \t<data>\n\
         \t{}\n\
         \t</data>\n\
         </dict>\n\
         </plist>\n",
        BASE64.encode(duid)
    )
}

/// Pull the base64 body out of the first `<data>` element of a plist
fn extract_plist_data(xml: &str) -> Option<Vec<u8>> {
    let start = xml.find("<data>")? + "<data>".len();
    let end = xml[start..].find("</data>")? + start;
    let body: String = xml[start..end].chars().filter(|c| !c.is_whitespace()).collect();
    BASE64.decode(body).ok()
}

/// Resolve a BSD device name ("en0") to its hardware-port name ("Wi-Fi")
/// from `networksetup -listallhardwareports` output.
fn hardware_port_for_device(listing: &str, device: &str) -> Option<String> {
    let mut current_port: Option<&str> = None;
    for line in listing.lines() {
        if let Some(port) = line.strip_prefix("Hardware Port:") {
            current_port = Some(port.trim());
        } else if let Some(dev) = line.strip_prefix("Device:") {
            if dev.trim() == device {
                return current_port.map(|p| p.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn adapter_in(dir: &tempfile::TempDir) -> MacOsAdapter {
        let config = MacOsConfig {
            duid_plist: dir.path().join("DUID.plist"),
            lease_dir: dir.path().join("leases"),
        };
        MacOsAdapter::new(OriginalStore::at(dir.path().join("duid_original.json")), config)
    }

    #[test]
    fn test_read_absent_is_none() {
        let dir = tempdir().unwrap();
        let adapter = adapter_in(&dir);
        assert_eq!(adapter.read_active().unwrap(), None);
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = tempdir().unwrap();
        let adapter = adapter_in(&dir);
        let duid = vec![0x00, 0x01, 0x00, 0x01, 0x2A, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];

        adapter.write_active(&duid).unwrap();
        assert_eq!(adapter.read_active().unwrap(), Some(duid));
    }

    #[test]
    fn test_plist_extraction_ignores_whitespace() {
        let xml = "<plist><dict><key>DUID</key><data>\n\tAAEA\nAQ==\t</data></dict></plist>";
        assert_eq!(
            extract_plist_data(xml),
            Some(vec![0x00, 0x01, 0x00, 0x01])
        );
    }

    #[test]
    fn test_plist_without_data_is_rejected() {
        let dir = tempdir().unwrap();
        let adapter = adapter_in(&dir);
        fs::write(dir.path().join("DUID.plist"), "<plist><dict/></plist>").unwrap();
        assert!(adapter.read_active().is_err());
    }

    #[test]
    fn test_clear_lease_state() {
        let dir = tempdir().unwrap();
        let adapter = adapter_in(&dir);
        let lease_dir = dir.path().join("leases");
        fs::create_dir_all(&lease_dir).unwrap();
        fs::write(lease_dir.join("en0-1,2a:11:22:33:44:55"), b"lease").unwrap();

        adapter.clear_lease_state(None).unwrap();
        assert_eq!(fs::read_dir(&lease_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_hardware_port_resolution() {
        let listing = "\n\
            Hardware Port: Thunderbolt Bridge\n\
            Device: bridge0\n\
            Ethernet Address: 36:67:1c:00:11:22\n\
            \n\
            Hardware Port: Wi-Fi\n\
            Device: en0\n\
            Ethernet Address: f0:18:98:aa:bb:cc\n";

        assert_eq!(
            hardware_port_for_device(listing, "en0"),
            Some("Wi-Fi".to_string())
        );
        assert_eq!(hardware_port_for_device(listing, "en9"), None);
    }
}
