//! Original-value store
//!
//! Persists the first DUID ever observed on this host so a spoofed
//! machine can always be returned to its pre-spoofing identity. The
//! record is write-once: once captured, later backup attempts never
//! overwrite it.

use chrono::Utc;
use idshift_core::{Error, Result};
use idshift_duid::hex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the record inside the storage directory
const RECORD_FILE: &str = "duid_original.json";

/// The persisted record: the original DUID plus capture provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginalRecord {
    /// Original DUID as unpunctuated hex
    pub duid: String,
    /// ISO-8601 capture timestamp
    pub stored_at: String,
    /// OS family the capture happened on
    pub platform: String,
    /// Host the capture happened on
    pub hostname: String,
}

/// Store for the host's original DUID record
#[derive(Debug, Clone)]
pub struct OriginalStore {
    path: PathBuf,
}

impl OriginalStore {
    /// Open a store at an explicit path (tests inject temp paths here)
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Open the store at the canonical location for this host.
    ///
    /// A fixed system directory per OS family, falling back to a
    /// per-user dot-directory when the system directory cannot be
    /// created. The result is stable across process runs, so a backup
    /// made by one invocation is found by every later one.
    pub fn default_for_host() -> Self {
        let system = system_data_dir();
        if fs::create_dir_all(&system).is_ok() {
            return Self::at(system.join(RECORD_FILE));
        }

        let user = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".idshift");
        debug!(dir = %user.display(), "system data dir unavailable, using per-user store");
        Self::at(user.join(RECORD_FILE))
    }

    /// The record path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Does a record exist?
    pub fn has(&self) -> bool {
        self.path.exists()
    }

    /// Capture `duid` as the host's original value, unless a record
    /// already exists.
    ///
    /// Returns whether a record was written. An existing record is never
    /// overwritten; callers must not assume backup always mutates
    /// storage.
    pub fn backup_if_absent(&self, duid: &[u8]) -> Result<bool> {
        if self.has() {
            debug!(path = %self.path.display(), "original record already present, keeping it");
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::store(format!("creating {}: {}", parent.display(), e)))?;
        }

        let record = OriginalRecord {
            duid: hex::to_hex(duid),
            stored_at: Utc::now().to_rfc3339(),
            platform: std::env::consts::OS.to_string(),
            hostname: hostname(),
        };
        let body = serde_json::to_string_pretty(&record)
            .map_err(|e| Error::store(format!("encoding record: {}", e)))?;
        fs::write(&self.path, body)
            .map_err(|e| Error::store(format!("writing {}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), duid = %record.duid, "captured original DUID");
        Ok(true)
    }

    /// Load the original DUID bytes, or `None` when no usable record
    /// exists.
    ///
    /// Parse attempts are ordered: the structured JSON record first,
    /// then the legacy format where the file's entire content is the
    /// DUID bytes directly. The first success wins.
    pub fn load(&self) -> Result<Option<Vec<u8>>> {
        if !self.has() {
            return Ok(None);
        }

        let content = fs::read(&self.path)
            .map_err(|e| Error::store(format!("reading {}: {}", self.path.display(), e)))?;

        if let Some(duid) = parse_structured(&content) {
            return Ok(Some(duid));
        }

        // legacy format: the raw file content is the DUID itself
        if content.is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    /// Load the full structured record, when one exists in the
    /// structured format.
    pub fn record(&self) -> Result<Option<OriginalRecord>> {
        if !self.has() {
            return Ok(None);
        }
        let content = fs::read(&self.path)
            .map_err(|e| Error::store(format!("reading {}: {}", self.path.display(), e)))?;
        Ok(serde_json::from_slice(&content).ok())
    }

    /// Delete the record if present; returns whether anything was
    /// deleted.
    ///
    /// This destroys the only escape hatch back to the original
    /// identity; callers gate it behind explicit operator confirmation.
    pub fn clear(&self) -> Result<bool> {
        if !self.has() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .map_err(|e| Error::store(format!("deleting {}: {}", self.path.display(), e)))?;
        Ok(true)
    }
}

fn parse_structured(content: &[u8]) -> Option<Vec<u8>> {
    let record: OriginalRecord = serde_json::from_slice(content).ok()?;
    hex::from_hex(&record.duid).ok()
}

fn system_data_dir() -> PathBuf {
    match std::env::consts::OS {
        "macos" => PathBuf::from("/var/db/idshift"),
        "windows" => {
            let base = std::env::var("ProgramData").unwrap_or_else(|_| "C:\\ProgramData".into());
            Path::new(&base).join("idshift")
        }
        _ => PathBuf::from("/var/lib/idshift"),
    }
}

#[cfg(unix)]
fn hostname() -> String {
    let mut buf = [0u8; 256];
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
    if rc == 0 {
        let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        String::from_utf8_lossy(&buf[..end]).into_owned()
    } else {
        "unknown".to_string()
    }
}

#[cfg(not(unix))]
fn hostname() -> String {
    std::env::var("COMPUTERNAME").unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> OriginalStore {
        OriginalStore::at(dir.path().join("state").join(RECORD_FILE))
    }

    #[test]
    fn test_backup_is_write_once() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let first = vec![0x00, 0x03, 0x00, 0x01, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
        let second = vec![0x00, 0x04, 0x11, 0x22];

        assert!(store.backup_if_absent(&first).unwrap());
        assert!(!store.backup_if_absent(&second).unwrap());
        assert_eq!(store.load().unwrap(), Some(first));
    }

    #[test]
    fn test_load_missing_is_absent() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.has());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_structured_record_fields() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.backup_if_absent(&[0x00, 0x02, 0x7E]).unwrap();

        let record = store.record().unwrap().unwrap();
        assert_eq!(record.duid, "00027E");
        assert_eq!(record.platform, std::env::consts::OS);
        assert!(!record.hostname.is_empty());
        assert!(!record.stored_at.is_empty());
    }

    #[test]
    fn test_legacy_raw_content_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(RECORD_FILE);
        let raw = vec![0x00, 0x03, 0x00, 0x01, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
        fs::write(&path, &raw).unwrap();

        let store = OriginalStore::at(&path);
        assert_eq!(store.load().unwrap(), Some(raw));
    }

    #[test]
    fn test_empty_file_is_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(RECORD_FILE);
        fs::write(&path, b"").unwrap();

        let store = OriginalStore::at(&path);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_clear_then_backup_again() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(!store.clear().unwrap());
        store.backup_if_absent(&[0x00, 0x01]).unwrap();
        assert!(store.clear().unwrap());
        assert!(!store.has());

        // after an explicit clear the next backup captures anew
        assert!(store.backup_if_absent(&[0x00, 0x04]).unwrap());
        assert_eq!(store.load().unwrap(), Some(vec![0x00, 0x04]));
    }
}
