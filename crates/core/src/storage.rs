//! Persistence port
//!
//! The store never touches a concrete medium. It talks to a key-value
//! `PreferenceStorage`, keyed by `columns:<resource>:<user>`.

use std::collections::BTreeMap;

use crate::error::StorageError;

/// Key-value medium holding one preference blob per key.
///
/// - `get` of a missing key is `Ok(None)`, not an error
/// - `set` replaces the whole value
/// - `delete` of a missing key succeeds
pub trait PreferenceStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Namespaced storage key for one user's preferences on one grid.
pub fn storage_key(resource: &str, user_key: &str) -> String {
    format!("columns:{resource}:{user_key}")
}

/// In-memory medium with an optional per-value byte quota.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
    available: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: None,
            available: true,
        }
    }

    /// Reject writes whose value exceeds `limit` bytes
    pub fn with_quota(limit: usize) -> Self {
        Self {
            quota: Some(limit),
            ..Self::new()
        }
    }

    /// Simulate a disabled medium: every operation fails
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Seed a raw value, bypassing quota checks
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.available {
            Ok(())
        } else {
            Err(StorageError::Unavailable("memory storage disabled".to_string()))
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_available()?;
        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    len: value.len(),
                    limit,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_format() {
        assert_eq!(storage_key("sales", "user-42"), "columns:sales:user-42");
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set("k", "v1").unwrap();
        storage.set("k", "v2").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v2"));

        storage.delete("k").unwrap();
        storage.delete("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_storage_quota() {
        let mut storage = MemoryStorage::with_quota(4);
        storage.set("k", "1234").unwrap();
        let err = storage.set("k", "12345").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { len: 5, limit: 4, .. }));
        assert_eq!(storage.raw("k"), Some("1234"));
    }

    #[test]
    fn test_memory_storage_unavailable() {
        let mut storage = MemoryStorage::new();
        storage.insert_raw("k", "v");
        storage.set_available(false);
        assert!(matches!(storage.get("k"), Err(StorageError::Unavailable(_))));
        assert!(storage.delete("k").is_err());
        assert_eq!(storage.len(), 1);
    }
}
