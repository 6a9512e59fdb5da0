//! The identity controller
//!
//! Platform-independent facade over the DUID codec, the original-value
//! store and the per-OS adapters. The adapter is selected once at
//! construction; every destructive operation funnels through it so the
//! backup-before-write ordering holds no matter which entry point was
//! used.

use idshift_core::{Error, MacAddr, Result};
use idshift_duid::{codec, from_hex, Duid, DuidType, ParsedDuid};
use idshift_platform::{adapter_for_host, mac, DuidAdapter, OriginalStore, RestoreOutcome};
use tracing::info;

type MacLookupFn = fn(&str) -> Result<Option<MacAddr>>;

pub struct IdentityController {
    adapter: Box<dyn DuidAdapter>,
    mac_lookup: MacLookupFn,
}

impl IdentityController {
    /// Build a controller for the OS this process runs on.
    ///
    /// Fails with `UnsupportedPlatform` on anything but the known
    /// families.
    pub fn new() -> Result<Self> {
        Ok(Self {
            adapter: adapter_for_host()?,
            mac_lookup: mac::current_mac,
        })
    }

    /// Build a controller around an explicit adapter (tests inject
    /// fakes here)
    pub fn with_adapter(adapter: Box<dyn DuidAdapter>) -> Self {
        Self {
            adapter,
            mac_lookup: mac::current_mac,
        }
    }

    /// Replace the MAC lookup mechanism (tests)
    pub fn with_mac_lookup(mut self, lookup: MacLookupFn) -> Self {
        self.mac_lookup = lookup;
        self
    }

    /// Generate a DUID. Pure codec delegation: no I/O, no backup.
    pub fn generate(duid_type: DuidType, mac: Option<MacAddr>) -> Duid {
        codec::generate(duid_type, mac)
    }

    /// Decode a DUID. Pure codec delegation.
    pub fn parse(bytes: &[u8]) -> ParsedDuid {
        codec::decode(bytes)
    }

    /// The OS's active DUID, re-read on every call
    pub fn current_duid(&self) -> Result<Option<Vec<u8>>> {
        self.adapter.get_current()
    }

    /// The original-value store behind the selected adapter
    pub fn store(&self) -> &OriginalStore {
        self.adapter.store()
    }

    /// Capture the current DUID as the original, if not yet captured
    pub fn backup(&self) -> Result<bool> {
        self.adapter.backup_original()
    }

    /// Read the live MAC of a named interface.
    ///
    /// An empty name is a caller contract error (`MissingInterface`);
    /// an interface that exists but yields no MAC is `Ok(None)`.
    pub fn current_mac(&self, iface: &str) -> Result<Option<MacAddr>> {
        if iface.is_empty() {
            return Err(Error::MissingInterface);
        }
        (self.mac_lookup)(iface)
    }

    /// Install a new active DUID
    pub fn set_duid(&self, duid: &[u8], iface: Option<&str>) -> Result<()> {
        info!(duid = %idshift_duid::colon_hex(duid), ?iface, "setting DUID");
        self.adapter.set_duid(duid, iface)
    }

    /// Install a new active DUID given as hex text (separators and case
    /// are normalized through the codec first)
    pub fn set_duid_hex(&self, text: &str, iface: Option<&str>) -> Result<Duid> {
        let bytes = from_hex(text)?;
        self.set_duid(&bytes, iface)?;
        Ok(Duid::from_bytes(bytes))
    }

    /// Generate a DUID of the requested type and install it, returning
    /// the generated value
    pub fn randomize(
        &self,
        duid_type: DuidType,
        iface: Option<&str>,
        mac: Option<MacAddr>,
    ) -> Result<Duid> {
        let duid = codec::generate(duid_type, mac);
        self.set_duid(duid.as_bytes(), iface)?;
        Ok(duid)
    }

    /// Generate a DUID seeded with the interface's live MAC and install
    /// it, keeping DUID and MAC identity consistent when both are
    /// spoofed.
    pub fn sync_to_mac(&self, iface: &str, duid_type: DuidType) -> Result<Duid> {
        let mac = self
            .current_mac(iface)?
            .ok_or_else(|| Error::InterfaceMacUnavailable(iface.to_string()))?;
        info!(iface, %mac, duid_type = %duid_type, "syncing DUID to interface MAC");
        let duid = codec::generate(duid_type, Some(mac));
        self.set_duid(duid.as_bytes(), Some(iface))?;
        Ok(duid)
    }

    /// Put the original DUID back; reports sentinels, never hard errors,
    /// for the no-record and already-original cases
    pub fn restore(&self, iface: Option<&str>) -> Result<RestoreOutcome> {
        self.adapter.restore_duid(iface)
    }

    /// Discard the active DUID so the OS generates a fresh one; never
    /// touches the original-value store
    pub fn reset(&self, iface: Option<&str>) -> Result<()> {
        self.adapter.reset_duid(iface)
    }
}
