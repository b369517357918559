// Column schema files
// One TOML document per grid: a `resource` name and its `[[columns]]`

use std::fmt;
use std::fs;
use std::path::Path;

use colprefs_core::{ColumnDefinition, ColumnWidth};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// TOML parse / deserialization error.
    Parse(String),
    /// Structurally valid but unusable (no columns, empty id, ...).
    Validation(String),
    /// Schema file could not be read.
    Io(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "schema parse error: {msg}"),
            Self::Validation(msg) => write!(f, "schema validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for SchemaError {}

#[derive(Debug, Deserialize)]
struct RawSchema {
    resource: String,
    #[serde(default)]
    columns: Vec<RawColumn>,
}

/// Column table as written by hand: everything but `id` may be omitted.
#[derive(Debug, Deserialize)]
struct RawColumn {
    id: String,
    label: Option<String>,
    #[serde(default)]
    locked: bool,
    order: Option<i64>,
    visible: Option<bool>,
    #[serde(default)]
    width: ColumnWidth,
}

/// A grid's column schema as shipped with the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFile {
    /// Grid this schema belongs to; namespaces stored preferences
    pub resource: String,
    pub columns: Vec<ColumnDefinition>,
}

impl SchemaFile {
    /// Parse a schema document.
    ///
    /// Defaults: `label` = id, `order` = position in the file,
    /// `visible` = true, `width` = auto, `locked` = false.
    pub fn from_toml(toml_str: &str) -> Result<Self, SchemaError> {
        let raw: RawSchema =
            toml::from_str(toml_str).map_err(|e| SchemaError::Parse(e.to_string()))?;

        let resource = raw.resource.trim().to_string();
        if resource.is_empty() {
            return Err(SchemaError::Validation("resource name is empty".into()));
        }
        if resource.contains(':') {
            return Err(SchemaError::Validation(format!(
                "resource name '{resource}' must not contain ':'"
            )));
        }
        if raw.columns.is_empty() {
            return Err(SchemaError::Validation(format!("resource '{resource}' has no columns")));
        }

        let mut columns = Vec::with_capacity(raw.columns.len());
        for (i, col) in raw.columns.into_iter().enumerate() {
            let id = col.id.trim().to_string();
            if id.is_empty() {
                return Err(SchemaError::Validation(format!("column #{} has an empty id", i + 1)));
            }
            columns.push(ColumnDefinition {
                label: col.label.unwrap_or_else(|| id.clone()),
                id,
                locked: col.locked,
                order: col.order.unwrap_or(i as i64),
                visible: col.visible.unwrap_or(true),
                width: col.width,
            });
        }

        Ok(Self { resource, columns })
    }

    /// Read and parse a schema file from disk
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SchemaError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&contents)
    }
}
