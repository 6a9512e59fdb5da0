//! Windows DUID mechanism
//!
//! The DHCPv6 client identifier is the `Dhcpv6DUID` REG_BINARY value
//! under the Tcpip6 service parameters, manipulated through `reg`.
//! IPv6 is toggled by unbinding `ms_tcpip6` from the adapter, and lease
//! state is dropped with `ipconfig /release6`.

use idshift_core::{Error, Result};
use idshift_duid::hex;

use crate::cmd;
use crate::store::OriginalStore;

use super::DuidAdapter;

/// Registry coordinates of the native mechanism
#[derive(Debug, Clone)]
pub struct WindowsConfig {
    /// Tcpip6 parameters key
    pub tcpip6_key: String,
    /// Name of the DUID value under that key
    pub value_name: String,
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            tcpip6_key: r"HKLM\SYSTEM\CurrentControlSet\Services\Tcpip6\Parameters".to_string(),
            value_name: "Dhcpv6DUID".to_string(),
        }
    }
}

pub struct WindowsAdapter {
    store: OriginalStore,
    config: WindowsConfig,
}

impl WindowsAdapter {
    pub fn new(store: OriginalStore, config: WindowsConfig) -> Self {
        Self { store, config }
    }
}

impl DuidAdapter for WindowsAdapter {
    fn platform(&self) -> &'static str {
        "windows"
    }

    fn store(&self) -> &OriginalStore {
        &self.store
    }

    fn read_active(&self) -> Result<Option<Vec<u8>>> {
        // reg exits non-zero when the value is missing; that is the
        // "no active DUID" case, not a failure
        let output = match cmd::run_optional(
            "reg",
            &["query", &self.config.tcpip6_key, "/v", &self.config.value_name],
        ) {
            Some(output) => output,
            None => return Ok(None),
        };
        Ok(parse_reg_binary(&output, &self.config.value_name))
    }

    fn write_active(&self, duid: &[u8]) -> Result<()> {
        let data = hex::to_hex(duid);
        cmd::run(
            "reg",
            &[
                "add",
                &self.config.tcpip6_key,
                "/v",
                &self.config.value_name,
                "/t",
                "REG_BINARY",
                "/d",
                &data,
                "/f",
            ],
        )
        .map(|_| ())
        .map_err(|e| Error::mechanism("writing new DUID", e.to_string()))
    }

    fn delete_active(&self) -> Result<()> {
        let result = cmd::run(
            "reg",
            &[
                "delete",
                &self.config.tcpip6_key,
                "/v",
                &self.config.value_name,
                "/f",
            ],
        );

        match result {
            Ok(_) => Ok(()),
            // deleting an already-absent value is a successful reset
            Err(err) => match self.read_active()? {
                None => Ok(()),
                Some(_) => Err(Error::mechanism("deleting active DUID", err.to_string())),
            },
        }
    }

    fn toggle_interface_v6(&self, iface: &str, enable: bool) -> Result<()> {
        let verb = if enable { "Enable" } else { "Disable" };
        let script = format!(
            "{}-NetAdapterBinding -Name '{}' -ComponentID ms_tcpip6",
            verb, iface
        );
        cmd::run("powershell", &["-NoProfile", "-Command", &script]).map(|_| ())
    }

    fn clear_lease_state(&self, iface: Option<&str>) -> Result<()> {
        match iface {
            Some(name) => cmd::run("ipconfig", &["/release6", name]).map(|_| ()),
            None => cmd::run("ipconfig", &["/release6"]).map(|_| ()),
        }
    }
}

/// Pull the REG_BINARY payload for `value_name` out of `reg query`
/// output.
fn parse_reg_binary(output: &str, value_name: &str) -> Option<Vec<u8>> {
    for line in output.lines() {
        let line = line.trim();
        if !line.starts_with(value_name) {
            continue;
        }
        if !line.contains("REG_BINARY") {
            continue;
        }
        let payload = line.split_whitespace().last()?;
        return hex::from_hex(payload).ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUERY_OUTPUT: &str = "\r\n\
        HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Services\\Tcpip6\\Parameters\r\n\
        \x20   Dhcpv6DUID    REG_BINARY    000300012A1122334455\r\n\r\n";

    #[test]
    fn test_parse_reg_binary() {
        assert_eq!(
            parse_reg_binary(QUERY_OUTPUT, "Dhcpv6DUID"),
            Some(vec![0x00, 0x03, 0x00, 0x01, 0x2A, 0x11, 0x22, 0x33, 0x44, 0x55])
        );
    }

    #[test]
    fn test_parse_reg_binary_wrong_value_name() {
        assert_eq!(parse_reg_binary(QUERY_OUTPUT, "Dhcpv6Iaid"), None);
    }

    #[test]
    fn test_parse_reg_binary_garbage() {
        assert_eq!(parse_reg_binary("no such value", "Dhcpv6DUID"), None);
        assert_eq!(
            parse_reg_binary("Dhcpv6DUID REG_BINARY zz", "Dhcpv6DUID"),
            None
        );
    }
}
