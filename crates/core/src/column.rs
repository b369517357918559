//! Column schema types
//!
//! A `ColumnDefinition` is shipped with the application build and never
//! mutated at runtime. Only relative `order` matters: gaps are allowed.

use serde::{Deserialize, Serialize};

/// Semantic sizing hint for a column.
///
/// # Serialization
/// - `Auto` is the string `"auto"`
/// - `Fixed(n)` is the bare integer `n`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnWidth {
    #[default]
    Auto,
    Fixed(u32),
}

impl std::fmt::Display for ColumnWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Fixed(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for ColumnWidth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            ColumnWidth::Auto => serializer.serialize_str("auto"),
            ColumnWidth::Fixed(n) => serializer.serialize_u32(*n),
        }
    }
}

impl<'de> Deserialize<'de> for ColumnWidth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Fixed(u32),
            Named(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Fixed(n) => Ok(ColumnWidth::Fixed(n)),
            Raw::Named(s) if s.eq_ignore_ascii_case("auto") => Ok(ColumnWidth::Auto),
            Raw::Named(s) => Err(serde::de::Error::custom(format!(
                "invalid column width '{s}' (expected integer or \"auto\")"
            ))),
        }
    }
}

/// One displayable column of a grid, as defined by the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Stable identifier across application versions
    pub id: String,
    /// Display name
    pub label: String,
    /// Always visible, never reorderable
    #[serde(default)]
    pub locked: bool,
    /// Baseline display rank
    #[serde(default)]
    pub order: i64,
    /// Baseline visibility
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub width: ColumnWidth,
}

fn default_visible() -> bool {
    true
}

impl ColumnDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            locked: false,
            order,
            visible: true,
            width: ColumnWidth::Auto,
        }
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Hidden by default (ignored for locked columns)
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_width(mut self, width: ColumnWidth) -> Self {
        self.width = width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_serializes_as_number_or_auto() {
        assert_eq!(serde_json::to_string(&ColumnWidth::Auto).unwrap(), "\"auto\"");
        assert_eq!(serde_json::to_string(&ColumnWidth::Fixed(120)).unwrap(), "120");

        let w: ColumnWidth = serde_json::from_str("\"AUTO\"").unwrap();
        assert_eq!(w, ColumnWidth::Auto);
        let w: ColumnWidth = serde_json::from_str("48").unwrap();
        assert_eq!(w, ColumnWidth::Fixed(48));
        assert!(serde_json::from_str::<ColumnWidth>("\"wide\"").is_err());
    }

    #[test]
    fn test_definition_defaults_from_json() {
        let def: ColumnDefinition =
            serde_json::from_str(r#"{"id": "sku", "label": "SKU"}"#).unwrap();
        assert!(!def.locked);
        assert!(def.visible);
        assert_eq!(def.order, 0);
        assert_eq!(def.width, ColumnWidth::Auto);
    }

    #[test]
    fn test_builders() {
        let def = ColumnDefinition::new("actions", "", 99)
            .locked()
            .with_width(ColumnWidth::Fixed(40));
        assert!(def.locked);
        assert_eq!(def.order, 99);
        assert_eq!(def.width, ColumnWidth::Fixed(40));
        assert!(!ColumnDefinition::new("notes", "Notes", 3).hidden().visible);
    }
}
