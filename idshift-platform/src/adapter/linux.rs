//! Linux DUID mechanism
//!
//! The active DUID lives in dhcpcd's identifier file as colon-separated
//! hex text. Lease state is dropped by removing the DHCPv6 lease files,
//! and IPv6 is toggled per-interface through sysctl.

use idshift_core::{Error, Result};
use idshift_duid::hex;
use std::fs;
use std::path::PathBuf;

use crate::cmd;
use crate::store::OriginalStore;

use super::DuidAdapter;

/// Paths of the native mechanism; tests point these at a tempdir
#[derive(Debug, Clone)]
pub struct LinuxConfig {
    /// dhcpcd's DUID file (colon-hex text)
    pub duid_path: PathBuf,
    /// DHCPv6 lease files to drop when clearing lease state
    pub lease_files: Vec<PathBuf>,
}

impl Default for LinuxConfig {
    fn default() -> Self {
        Self {
            duid_path: PathBuf::from("/etc/dhcpcd.duid"),
            lease_files: vec![
                PathBuf::from("/var/lib/dhcp/dhclient6.leases"),
                PathBuf::from("/var/lib/dhcpcd/dhcpcd.duid.lease6"),
            ],
        }
    }
}

pub struct LinuxAdapter {
    store: OriginalStore,
    config: LinuxConfig,
}

impl LinuxAdapter {
    pub fn new(store: OriginalStore, config: LinuxConfig) -> Self {
        Self { store, config }
    }
}

impl DuidAdapter for LinuxAdapter {
    fn platform(&self) -> &'static str {
        "linux"
    }

    fn store(&self) -> &OriginalStore {
        &self.store
    }

    fn read_active(&self) -> Result<Option<Vec<u8>>> {
        if !self.config.duid_path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.config.duid_path).map_err(|e| {
            Error::mechanism(
                "reading current DUID",
                format!("{}: {}", self.config.duid_path.display(), e),
            )
        })?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let bytes = hex::from_hex(text).map_err(|e| {
            Error::mechanism(
                "reading current DUID",
                format!("{}: {}", self.config.duid_path.display(), e),
            )
        })?;
        Ok(Some(bytes))
    }

    fn write_active(&self, duid: &[u8]) -> Result<()> {
        if let Some(parent) = self.config.duid_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::mechanism(
                    "writing new DUID",
                    format!("{}: {}", parent.display(), e),
                )
            })?;
        }
        // dhcpcd stores its identifier as colon-hex text
        let body = format!("{}\n", hex::colon_hex(duid));
        fs::write(&self.config.duid_path, body).map_err(|e| {
            Error::mechanism(
                "writing new DUID",
                format!("{}: {}", self.config.duid_path.display(), e),
            )
        })
    }

    fn delete_active(&self) -> Result<()> {
        if !self.config.duid_path.exists() {
            return Ok(());
        }
        fs::remove_file(&self.config.duid_path).map_err(|e| {
            Error::mechanism(
                "deleting active DUID",
                format!("{}: {}", self.config.duid_path.display(), e),
            )
        })
    }

    fn toggle_interface_v6(&self, iface: &str, enable: bool) -> Result<()> {
        let knob = format!(
            "net.ipv6.conf.{}.disable_ipv6={}",
            iface,
            if enable { 0 } else { 1 }
        );
        cmd::run("sysctl", &["-w", &knob]).map(|_| ())
    }

    fn clear_lease_state(&self, _iface: Option<&str>) -> Result<()> {
        for path in &self.config.lease_files {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn adapter_in(dir: &tempfile::TempDir) -> LinuxAdapter {
        let config = LinuxConfig {
            duid_path: dir.path().join("dhcpcd.duid"),
            lease_files: vec![dir.path().join("dhclient6.leases")],
        };
        LinuxAdapter::new(OriginalStore::at(dir.path().join("duid_original.json")), config)
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
        let duid = vec![0x00, 0x03, 0x00, 0x01, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];

        adapter.write_active(&duid).unwrap();
        assert_eq!(adapter.read_active().unwrap(), Some(duid));

        // the on-disk form is dhcpcd's colon-hex text
        let text = fs::read_to_string(dir.path().join("dhcpcd.duid")).unwrap();
        assert_eq!(text.trim(), "00:03:00:01:AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_delete_active() {
        let dir = tempdir().unwrap();
        let adapter = adapter_in(&dir);

        adapter.delete_active().unwrap(); // nothing there yet
        adapter.write_active(&[0x00, 0x04, 0x01]).unwrap();
        adapter.delete_active().unwrap();
        assert_eq!(adapter.read_active().unwrap(), None);
    }

    #[test]
    fn test_clear_lease_state_removes_files() {
        let dir = tempdir().unwrap();
        let adapter = adapter_in(&dir);
        let lease = dir.path().join("dhclient6.leases");
        fs::write(&lease, b"lease6 {}\n").unwrap();

        adapter.clear_lease_state(None).unwrap();
        assert!(!lease.exists());
    }

    #[test]
    fn test_set_duid_backs_up_first_value_only() {
        let dir = tempdir().unwrap();
        let adapter = adapter_in(&dir);
        let factory_duid = vec![0x00, 0x01, 0x00, 0x01, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A];
        adapter.write_active(&factory_duid).unwrap();

        adapter.set_duid(&[0x00, 0x03, 0x00, 0x01, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66], None).unwrap();
        adapter.set_duid(&[0x00, 0x03, 0x00, 0x01, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11], None).unwrap();

        // the first-ever value is the one preserved
        assert_eq!(adapter.store().load().unwrap(), Some(factory_duid));
    }

    #[test]
    fn test_restore_cycle() {
        use crate::adapter::RestoreOutcome;

        let dir = tempdir().unwrap();
        let adapter = adapter_in(&dir);

        // nothing captured yet
        assert_eq!(adapter.restore_duid(None).unwrap(), RestoreOutcome::NoOriginal);

        let original = vec![0x00, 0x03, 0x00, 0x01, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
        adapter.write_active(&original).unwrap();
        adapter.set_duid(&[0x00, 0x04, 0xFF], None).unwrap();

        assert_eq!(adapter.restore_duid(None).unwrap(), RestoreOutcome::Restored);
        assert_eq!(adapter.read_active().unwrap(), Some(original));

        // already back to the original: no further write
        assert_eq!(adapter.restore_duid(None).unwrap(), RestoreOutcome::NotSpoofed);
    }

    #[test]
    fn test_reset_leaves_store_untouched() {
        let dir = tempdir().unwrap();
        let adapter = adapter_in(&dir);
        let original = vec![0x00, 0x03, 0x00, 0x01, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
        adapter.write_active(&original).unwrap();
        adapter.set_duid(&[0x00, 0x04, 0x01], None).unwrap();

        let record_before = fs::read(adapter.store().path()).unwrap();
        adapter.reset_duid(None).unwrap();

        assert_eq!(adapter.read_active().unwrap(), None);
        assert_eq!(fs::read(adapter.store().path()).unwrap(), record_before);
    }
}
