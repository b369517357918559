//! Persisted user overrides
//!
//! Only two fields ever reach storage: the relative sequence of non-locked
//! column ids and the ids the user has hidden. Everything else comes from
//! the schema, which is what lets the schema evolve under stored state.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{MalformedPreferences, StorageError};

/// The narrow, persisted diff between a user's grid and the schema baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserColumnPreferences {
    /// Non-locked column ids in the user's relative sequence
    #[serde(default)]
    pub order: Vec<String>,
    /// Non-locked column ids the user has hidden
    #[serde(default)]
    pub hidden: Vec<String>,
}

impl UserColumnPreferences {
    /// Parse and validate a stored blob.
    ///
    /// Anything that is not an object whose `order`/`hidden` members are
    /// arrays of strings is rejected. Missing members default to empty,
    /// unknown members are ignored, duplicate ids keep their first occurrence.
    pub fn parse(raw: &str) -> Result<Self, MalformedPreferences> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| MalformedPreferences(e.to_string()))?;
        // Derived struct deserialization also accepts sequences; only objects are valid
        if !value.is_object() {
            return Err(MalformedPreferences(format!("expected a JSON object, found {value}")));
        }
        let parsed: UserColumnPreferences =
            serde_json::from_value(value).map_err(|e| MalformedPreferences(e.to_string()))?;
        Ok(Self {
            order: dedup_keep_first(parsed.order),
            hidden: dedup_keep_first(parsed.hidden),
        })
    }

    /// Encode for storage
    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|e| StorageError::Serialize(e.to_string()))
    }
}

fn dedup_keep_first(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
