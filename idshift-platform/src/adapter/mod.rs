//! Per-OS DUID adapters
//!
//! Each adapter knows how to read, write and delete the DHCPv6 DUID its
//! operating system actually uses, through that OS's native mechanism.
//! The high-level operations (set, restore, reset) are provided by the
//! trait so the ordering invariants hold identically on every platform.

mod linux;
mod macos;
mod windows;

pub use linux::{LinuxAdapter, LinuxConfig};
pub use macos::{MacOsAdapter, MacOsConfig};
pub use windows::{WindowsAdapter, WindowsConfig};

use idshift_core::{Error, Result};
use tracing::debug;

use crate::store::OriginalStore;

/// Result of a restore attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The original DUID was written back
    Restored,
    /// The active DUID already equals the stored original; nothing written
    NotSpoofed,
    /// No original record exists for this host
    NoOriginal,
}

/// Swallow a best-effort step's failure, logging it at debug level.
///
/// Used only for the steps the design marks best-effort (IPv6 toggling,
/// lease clearing); every other failure propagates.
pub fn best_effort<T>(step: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(step, error = %err, "best-effort step failed, continuing");
            None
        }
    }
}

/// A platform's DUID mechanism plus the shared spoof/restore/reset
/// operations built on it.
pub trait DuidAdapter {
    /// OS family name, for record provenance and messages
    fn platform(&self) -> &'static str;

    /// The original-value store backing this adapter
    fn store(&self) -> &OriginalStore;

    /// Read the OS's active DUID. Absent is `Ok(None)`, never an error.
    fn read_active(&self) -> Result<Option<Vec<u8>>>;

    /// Write a new active DUID through the native mechanism
    fn write_active(&self, duid: &[u8]) -> Result<()>;

    /// Remove the active DUID so the OS generates a fresh one on next use
    fn delete_active(&self) -> Result<()>;

    /// Enable or disable the IPv6 stack on an interface (best-effort step)
    fn toggle_interface_v6(&self, iface: &str, enable: bool) -> Result<()>;

    /// Drop cached DHCPv6 lease state (best-effort step)
    fn clear_lease_state(&self, iface: Option<&str>) -> Result<()>;

    /// The active DUID, re-read from the OS on every call
    fn get_current(&self) -> Result<Option<Vec<u8>>> {
        self.read_active()
    }

    /// Capture the current DUID into the store unless a record already
    /// exists. A no-op when the OS has no active DUID yet.
    fn backup_original(&self) -> Result<bool> {
        match self.get_current()? {
            Some(current) => self.store().backup_if_absent(&current),
            None => Ok(false),
        }
    }

    /// Install a new DUID.
    ///
    /// Backs up the original first, unconditionally, before any
    /// destructive change: the very first value ever observed is the one
    /// preserved, no matter how many times this is called afterwards.
    fn set_duid(&self, duid: &[u8], iface: Option<&str>) -> Result<()> {
        self.backup_original()?;
        self.install(duid, iface)
    }

    /// The shared disable → clear leases → write → re-enable sequence.
    ///
    /// The write is the only fatal step; the bracketing steps are
    /// best-effort and their failure never aborts the operation.
    fn install(&self, duid: &[u8], iface: Option<&str>) -> Result<()> {
        let disabled = iface.and_then(|name| {
            best_effort("disabling ipv6", self.toggle_interface_v6(name, false)).map(|_| name)
        });

        best_effort("clearing lease state", self.clear_lease_state(iface));

        let written = self.write_active(duid);

        if let Some(name) = disabled {
            best_effort("re-enabling ipv6", self.toggle_interface_v6(name, true));
        }

        written
    }

    /// Put the original DUID back.
    ///
    /// Idempotent: when the active value already equals the stored
    /// original, nothing is written.
    fn restore_duid(&self, iface: Option<&str>) -> Result<RestoreOutcome> {
        let original = match self.store().load()? {
            Some(bytes) => bytes,
            None => return Ok(RestoreOutcome::NoOriginal),
        };

        if self.get_current()?.as_deref() == Some(original.as_slice()) {
            return Ok(RestoreOutcome::NotSpoofed);
        }

        self.install(&original, iface)?;
        Ok(RestoreOutcome::Restored)
    }

    /// Forget the active DUID so the OS mints a fresh one on next use.
    ///
    /// Distinct from restore: reset discards the current value, restore
    /// goes back to the preserved original. The original-value store is
    /// never touched here.
    fn reset_duid(&self, iface: Option<&str>) -> Result<()> {
        let disabled = iface.and_then(|name| {
            best_effort("disabling ipv6", self.toggle_interface_v6(name, false)).map(|_| name)
        });

        let deleted = self.delete_active();

        best_effort("clearing lease state", self.clear_lease_state(iface));

        if let Some(name) = disabled {
            best_effort("re-enabling ipv6", self.toggle_interface_v6(name, true));
        }

        deleted
    }
}

/// Select the adapter for the OS this process is running on.
///
/// The choice happens once, here; callers hold the trait object.
pub fn adapter_for_host() -> Result<Box<dyn DuidAdapter>> {
    match std::env::consts::OS {
        "linux" => Ok(Box::new(LinuxAdapter::new(
            OriginalStore::default_for_host(),
            LinuxConfig::default(),
        ))),
        "macos" => Ok(Box::new(MacOsAdapter::new(
            OriginalStore::default_for_host(),
            MacOsConfig::default(),
        ))),
        "windows" => Ok(Box::new(WindowsAdapter::new(
            OriginalStore::default_for_host(),
            WindowsConfig::default(),
        ))),
        other => Err(Error::UnsupportedPlatform(other.to_string())),
    }
}
