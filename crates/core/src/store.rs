//! Column preference store
//!
//! One store per grid (`resource`). `load` binds it to a schema and a user;
//! mutations recompute the resolved view and persist the `{order, hidden}`
//! diff through the injected `PreferenceStorage`.

use serde::{Deserialize, Serialize};

use crate::column::ColumnDefinition;
use crate::error::{InvalidOperation, StorageError};
use crate::prefs::UserColumnPreferences;
use crate::reconcile::{baseline, reconcile, ResolvedColumn, ResolvedSchema};
use crate::storage::{storage_key, PreferenceStorage};

/// What happens to the in-memory view when the medium rejects a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistFailurePolicy {
    /// Keep the attempted change for this session (UI stays responsive)
    #[default]
    Keep,
    /// Roll the view back to what it was before the call
    Revert,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    pub on_persist_failure: PersistFailurePolicy,
}

/// Result of a mutation.
///
/// `rejected` is set when the call was ignored; `storage_error` when the
/// change could not be saved. Both leave `resolved` usable for rendering.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub resolved: ResolvedSchema,
    pub rejected: Option<InvalidOperation>,
    pub storage_error: Option<StorageError>,
}

impl Update {
    pub fn is_applied(&self) -> bool {
        self.rejected.is_none()
    }

    pub fn is_persisted(&self) -> bool {
        self.rejected.is_none() && self.storage_error.is_none()
    }
}

#[derive(Debug, Clone)]
struct Session {
    schema: Vec<ColumnDefinition>,
    user_key: String,
    storage_key: String,
}

pub struct ColumnPreferenceStore<S> {
    storage: S,
    resource: String,
    options: StoreOptions,
    session: Option<Session>,
    resolved: ResolvedSchema,
}

impl<S: PreferenceStorage> ColumnPreferenceStore<S> {
    pub fn new(storage: S, resource: impl Into<String>) -> Self {
        Self::with_options(storage, resource, StoreOptions::default())
    }

    pub fn with_options(storage: S, resource: impl Into<String>, options: StoreOptions) -> Self {
        Self {
            storage,
            resource: resource.into(),
            options,
            session: None,
            resolved: ResolvedSchema::default(),
        }
    }

    /// Bind the store to `schema` and `user_key`, merging any stored overrides.
    ///
    /// Never fails: missing, malformed, empty, or unreadable preferences all
    /// resolve to the schema baseline.
    pub fn load(&mut self, schema: &[ColumnDefinition], user_key: &str) -> &ResolvedSchema {
        let key = storage_key(&self.resource, user_key);
        let stored = match self.storage.get(&key) {
            Ok(Some(raw)) => match UserColumnPreferences::parse(&raw) {
                Ok(prefs) => Some(prefs),
                Err(e) => {
                    log::debug!("Ignoring stored preferences for {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("Cannot read column preferences for {}: {}", key, e);
                None
            }
        };

        self.resolved = reconcile(schema, stored.as_ref());
        self.session = Some(Session {
            schema: schema.to_vec(),
            user_key: user_key.to_string(),
            storage_key: key,
        });
        &self.resolved
    }

    /// Flip a non-locked column's visibility.
    pub fn toggle(&mut self, column_id: &str) -> Update {
        let current = self.resolved.get(column_id).map(|c| c.visible);
        self.set_visible(column_id, !current.unwrap_or(false))
    }

    /// Show or hide a non-locked column.
    ///
    /// Setting the current value is not an error: it persists and returns.
    pub fn set_visible(&mut self, column_id: &str, visible: bool) -> Update {
        if self.session.is_none() {
            return self.reject(InvalidOperation::NotLoaded);
        }
        let Some(index) = self.resolved.position(column_id) else {
            return self.reject(InvalidOperation::UnknownColumn(column_id.to_string()));
        };
        if self.resolved.all_columns()[index].locked {
            return self.reject(InvalidOperation::LockedColumn(column_id.to_string()));
        }
        self.apply(|resolved| resolved.set_visible_at(index, visible))
    }

    /// Move the column at `source` to `destination` in the full list.
    ///
    /// Only the moved column's lock state matters: a column may be dropped
    /// next to a locked one, which then shifts passively.
    ///
    /// Only the relative sequence of non-locked columns is stored, so the
    /// shift lasts for this session. On the next `load` locked columns return
    /// to their schema slots: `[a*, b, c]` moved to `[c, a*, b]` reloads as
    /// `[a*, c, b]`.
    pub fn reorder(&mut self, source: usize, destination: usize) -> Update {
        if self.session.is_none() {
            return self.reject(InvalidOperation::NotLoaded);
        }
        let len = self.resolved.len();
        for index in [source, destination] {
            if index >= len {
                return self.reject(InvalidOperation::IndexOutOfBounds { index, len });
            }
        }
        let moved = &self.resolved.all_columns()[source];
        if moved.locked {
            let id = moved.id.clone();
            return self.reject(InvalidOperation::LockedColumn(id));
        }
        self.apply(|resolved| resolved.move_column(source, destination))
    }

    /// Delete stored overrides and return to the schema baseline.
    pub fn reset(&mut self) -> Update {
        let Some(session) = self.session.as_ref() else {
            return self.reject(InvalidOperation::NotLoaded);
        };

        let storage_error = match self.storage.delete(&session.storage_key) {
            Ok(()) => None,
            Err(e) => {
                log::warn!("Cannot delete column preferences for {}: {}", session.storage_key, e);
                Some(e)
            }
        };

        let revert = storage_error.is_some()
            && self.options.on_persist_failure == PersistFailurePolicy::Revert;
        if !revert {
            self.resolved = baseline(&session.schema);
        }

        Update {
            resolved: self.resolved.clone(),
            rejected: None,
            storage_error,
        }
    }

    fn apply(&mut self, mutate: impl FnOnce(&mut ResolvedSchema)) -> Update {
        let Some(session) = self.session.as_ref() else {
            return self.reject(InvalidOperation::NotLoaded);
        };

        let previous = self.resolved.clone();
        mutate(&mut self.resolved);
        self.resolved.mark_customized();

        let written = self
            .resolved
            .preferences()
            .to_json()
            .and_then(|json| self.storage.set(&session.storage_key, &json));

        let storage_error = match written {
            Ok(()) => None,
            Err(e) => {
                log::warn!("Cannot save column preferences for {}: {}", session.storage_key, e);
                if self.options.on_persist_failure == PersistFailurePolicy::Revert {
                    self.resolved = previous;
                }
                Some(e)
            }
        };

        Update {
            resolved: self.resolved.clone(),
            rejected: None,
            storage_error,
        }
    }

    fn reject(&self, reason: InvalidOperation) -> Update {
        log::debug!("Ignored column operation on {}: {}", self.resource, reason);
        Update {
            resolved: self.resolved.clone(),
            rejected: Some(reason),
            storage_error: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn resolved(&self) -> &ResolvedSchema {
        &self.resolved
    }

    pub fn all_columns(&self) -> &[ResolvedColumn] {
        self.resolved.all_columns()
    }

    pub fn visible_columns(&self) -> Vec<&ResolvedColumn> {
        self.resolved.visible_columns()
    }

    pub fn is_customized(&self) -> bool {
        self.resolved.is_customized()
    }

    /// The overrides currently in effect, `None` at baseline
    pub fn preferences(&self) -> Option<UserColumnPreferences> {
        self.resolved
            .is_customized()
            .then(|| self.resolved.preferences())
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn user_key(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_key.as_str())
    }

    pub fn storage_key(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.storage_key.as_str())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
