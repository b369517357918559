//! File-backed preference storage
//!
//! One JSON file per storage key under a root directory, by default
//! `~/.config/colprefs/columns/`. Keys are escaped into file names:
//! `columns:sales:u1` → `columns%3Asales%3Au1.json`

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use colprefs_core::{PreferenceStorage, StorageError};

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
    quota: Option<usize>,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            quota: None,
        }
    }

    /// Reject values larger than `limit` bytes
    pub fn with_quota(mut self, limit: Option<usize>) -> Self {
        self.quota = limit;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that holds the value for `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", escape_key(key)))
    }
}

/// Get the default directory for stored column preferences
pub fn default_storage_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("colprefs")
        .join("columns")
}

/// Keep `[A-Za-z0-9._-]`, percent-encode every other byte.
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn io_error(path: &Path, e: std::io::Error) -> StorageError {
    StorageError::Io(format!("{}: {e}", path.display()))
}

impl PreferenceStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    /// Atomic write: temp file, then rename over the target
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    len: value.len(),
                    limit,
                });
            }
        }

        fs::create_dir_all(&self.root).map_err(|e| io_error(&self.root, e))?;

        let path = self.path_for(key);
        let temp = path.with_extension("json.tmp");
        fs::write(&temp, value).map_err(|e| io_error(&temp, e))?;
        fs::rename(&temp, &path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            io_error(&path, e)
        })?;

        log::debug!("Saved column preferences to {}", path.display());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}
