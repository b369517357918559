//! `colprefs-core`: column preference reconciliation.
//!
//! Merges a build-time column schema with a user's persisted overrides
//! (order + hidden set) and keeps the two consistent across schema changes.
//! No filesystem, CLI, or UI dependencies.

pub mod column;
pub mod error;
pub mod prefs;
pub mod reconcile;
pub mod storage;
pub mod store;

pub use column::{ColumnDefinition, ColumnWidth};
pub use error::{InvalidOperation, MalformedPreferences, StorageError};
pub use prefs::UserColumnPreferences;
pub use reconcile::{baseline, reconcile, ResolvedColumn, ResolvedSchema};
pub use storage::{storage_key, MemoryStorage, PreferenceStorage};
pub use store::{ColumnPreferenceStore, PersistFailurePolicy, StoreOptions, Update};
