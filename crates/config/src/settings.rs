// Application settings
// Loaded from ~/.config/colprefs/settings.toml

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use colprefs_core::{PersistFailurePolicy, StoreOptions};
use serde::{Deserialize, Serialize};

use crate::file_storage::{default_storage_dir, FileStorage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    Parse(String),
    Io(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where preference files live (None = default config location)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    /// "keep" or "revert" the on-screen change when a save fails
    pub on_persist_failure: PersistFailurePolicy,

    /// Per-file size limit for stored preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value_bytes: Option<usize>,
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("colprefs")
            .join("settings.toml")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`, falling back to defaults.
    ///
    /// A missing file is normal. An unreadable or invalid one is logged and
    /// ignored: settings errors should not block the grid.
    pub fn load_from(path: &Path) -> Self {
        match Self::read(path) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Strict variant of `load_from`: `Ok(None)` when the file does not exist
    pub fn read(path: &Path) -> Result<Option<Self>, SettingsError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&contents).map(Some)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, SettingsError> {
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Save current settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SettingsError::Io(e.to_string()))?;
        }
        let contents =
            toml::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))?;
        fs::write(path, contents).map_err(|e| SettingsError::Io(e.to_string()))
    }

    /// Effective storage directory
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(default_storage_dir)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            on_persist_failure: self.on_persist_failure,
        }
    }

    /// File storage configured from these settings
    pub fn file_storage(&self) -> FileStorage {
        FileStorage::new(self.storage_dir()).with_quota(self.max_value_bytes)
    }
}
