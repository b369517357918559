use std::fmt;

/// The persistence medium refused a read, write, or delete.
///
/// Surfaced to callers of mutating store operations so the UI can warn
/// that preferences may not be saved. Never raised by `load`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Value for `key` exceeds the medium's per-value quota.
    QuotaExceeded { key: String, len: usize, limit: usize },
    /// Preferences could not be encoded for writing.
    Serialize(String),
    /// Underlying IO failure (file write, rename, remove).
    Io(String),
    /// Medium is not available at all (read-only mount, disabled storage).
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuotaExceeded { key, len, limit } => {
                write!(f, "quota exceeded for '{key}': {len} bytes (limit {limit})")
            }
            Self::Serialize(msg) => write!(f, "cannot encode preferences: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Why a mutation was ignored. The store reports these as no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidOperation {
    /// No schema has been loaded yet.
    NotLoaded,
    /// Column id is not part of the loaded schema.
    UnknownColumn(String),
    /// Locked columns cannot be hidden or moved.
    LockedColumn(String),
    /// Index outside the full column list.
    IndexOutOfBounds { index: usize, len: usize },
}

impl fmt::Display for InvalidOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoaded => write!(f, "no column schema loaded"),
            Self::UnknownColumn(id) => write!(f, "unknown column '{id}'"),
            Self::LockedColumn(id) => write!(f, "column '{id}' is locked"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for {len} column(s)")
            }
        }
    }
}

impl std::error::Error for InvalidOperation {}

/// A stored preference blob that does not have the `{order, hidden}` shape.
///
/// Recovered locally: the blob is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedPreferences(pub String);

impl fmt::Display for MalformedPreferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed column preferences: {}", self.0)
    }
}

impl std::error::Error for MalformedPreferences {}
