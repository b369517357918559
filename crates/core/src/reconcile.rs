//! Resolved columns (runtime truth)
//!
//! ResolvedSchema = ColumnDefinition[] + UserColumnPreferences
//!
//! Merge rules:
//! - Baseline list is the schema stably sorted by `order`
//! - Locked columns keep their baseline slots and are always visible
//! - Non-locked slots are filled by the stored sequence; columns the blob
//!   has never seen are slotted in after their baseline predecessor
//! - Stored hidden > stored order (visible) > schema baseline
//! - Ids the schema no longer knows are dropped

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::column::{ColumnDefinition, ColumnWidth};
use crate::prefs::UserColumnPreferences;

/// A schema column with its effective position and visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    pub id: String,
    pub label: String,
    pub width: ColumnWidth,
    pub locked: bool,
    /// Effective position in the full list (0-based, contiguous)
    pub order: usize,
    pub visible: bool,
}

impl ResolvedColumn {
    fn from_definition(def: &ColumnDefinition, order: usize, visible: bool) -> Self {
        Self {
            id: def.id.clone(),
            label: def.label.clone(),
            width: def.width,
            locked: def.locked,
            order,
            visible: def.locked || visible,
        }
    }
}

/// The merged view a grid renders from.
///
/// Holds every schema column exactly once, sorted by effective order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedSchema {
    columns: Vec<ResolvedColumn>,
    customized: bool,
}

impl ResolvedSchema {
    /// All columns, hidden ones included (for a column-management UI)
    pub fn all_columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }

    /// Visible columns in display order (for the grid itself)
    pub fn visible_columns(&self) -> Vec<&ResolvedColumn> {
        self.columns.iter().filter(|c| c.visible).collect()
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedColumn> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether user overrides are in effect (vs. the schema baseline)
    pub fn is_customized(&self) -> bool {
        self.customized
    }

    /// The diff to persist: non-locked ids in sequence, and those not visible.
    pub fn preferences(&self) -> UserColumnPreferences {
        let movable = self.columns.iter().filter(|c| !c.locked);
        UserColumnPreferences {
            order: movable.clone().map(|c| c.id.clone()).collect(),
            hidden: movable.filter(|c| !c.visible).map(|c| c.id.clone()).collect(),
        }
    }

    pub(crate) fn mark_customized(&mut self) {
        self.customized = true;
    }

    pub(crate) fn set_visible_at(&mut self, index: usize, visible: bool) {
        if let Some(col) = self.columns.get_mut(index) {
            col.visible = col.locked || visible;
        }
    }

    /// Single-element move; caller validates the indices.
    pub(crate) fn move_column(&mut self, from: usize, to: usize) {
        let col = self.columns.remove(from);
        self.columns.insert(to, col);
        self.renumber();
    }

    fn renumber(&mut self) {
        for (i, col) in self.columns.iter_mut().enumerate() {
            col.order = i;
        }
    }
}

/// Remove duplicate ids, keeping the last definition of each.
pub fn dedup_schema(schema: &[ColumnDefinition]) -> Vec<ColumnDefinition> {
    let last: HashMap<&str, usize> = schema
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id.as_str(), i))
        .collect();
    schema
        .iter()
        .enumerate()
        .filter(|(i, c)| last.get(c.id.as_str()) == Some(i))
        .map(|(_, c)| c.clone())
        .collect()
}

/// Schema columns in baseline display order
fn baseline_order(schema: &[ColumnDefinition]) -> Vec<ColumnDefinition> {
    let mut cols = dedup_schema(schema);
    cols.sort_by_key(|c| c.order);
    cols
}

/// The schema with no user overrides applied.
pub fn baseline(schema: &[ColumnDefinition]) -> ResolvedSchema {
    let columns = baseline_order(schema)
        .iter()
        .enumerate()
        .map(|(i, def)| ResolvedColumn::from_definition(def, i, def.visible))
        .collect();
    ResolvedSchema {
        columns,
        customized: false,
    }
}

/// Merge a schema with (optional) stored preferences. Pure, never fails.
pub fn reconcile(
    schema: &[ColumnDefinition],
    stored: Option<&UserColumnPreferences>,
) -> ResolvedSchema {
    let Some(prefs) = stored else {
        return baseline(schema);
    };

    let cols = baseline_order(schema);
    let movable: HashMap<&str, &ColumnDefinition> = cols
        .iter()
        .filter(|c| !c.locked)
        .map(|c| (c.id.as_str(), c))
        .collect();

    let mut seen = HashSet::new();
    let order: Vec<&str> = prefs
        .order
        .iter()
        .map(String::as_str)
        .filter(|id| movable.contains_key(id) && seen.insert(*id))
        .collect();
    let hidden: HashSet<&str> = prefs
        .hidden
        .iter()
        .map(String::as_str)
        .filter(|id| movable.contains_key(id))
        .collect();

    let dropped = prefs.order.len() - order.len() + prefs.hidden.len() - hidden.len();
    if dropped > 0 {
        log::debug!("Dropped {} stale column reference(s) from stored preferences", dropped);
    }

    if order.is_empty() && hidden.is_empty() {
        return baseline(schema);
    }

    let known: HashSet<&str> = order.iter().copied().collect();
    let mut sequence = order;
    let mut prev: Option<&str> = None;
    for col in cols.iter().filter(|c| !c.locked) {
        let id = col.id.as_str();
        if !known.contains(id) {
            let at = prev
                .and_then(|p| sequence.iter().position(|s| *s == p))
                .map_or(0, |i| i + 1);
            sequence.insert(at, id);
        }
        prev = Some(id);
    }

    let mut fill = sequence.into_iter();
    let mut columns = Vec::with_capacity(cols.len());
    for slot in &cols {
        let def = if slot.locked {
            slot
        } else {
            match fill.next().and_then(|id| movable.get(id)) {
                Some(def) => *def,
                None => slot,
            }
        };
        let id = def.id.as_str();
        let visible = if hidden.contains(id) {
            false
        } else if known.contains(id) {
            true
        } else {
            def.visible
        };
        columns.push(ResolvedColumn::from_definition(def, columns.len(), visible));
    }

    ResolvedSchema {
        columns,
        customized: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("a", "A", 0).locked(),
            ColumnDefinition::new("b", "B", 1),
            ColumnDefinition::new("c", "C", 2),
        ]
    }

    fn prefs(order: &[&str], hidden: &[&str]) -> UserColumnPreferences {
        UserColumnPreferences {
            order: order.iter().map(|s| s.to_string()).collect(),
            hidden: hidden.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_baseline_sorts_by_order_with_gaps() {
        let schema = vec![
            ColumnDefinition::new("z", "Z", 30),
            ColumnDefinition::new("x", "X", 10),
            ColumnDefinition::new("y", "Y", 20).hidden(),
        ];
        let resolved = reconcile(&schema, None);
        assert_eq!(resolved.ids(), vec!["x", "y", "z"]);
        assert_eq!(resolved.all_columns()[2].order, 2);
        assert!(!resolved.get("y").unwrap().visible);
        assert!(!resolved.is_customized());
    }

    #[test]
    fn test_baseline_ties_keep_schema_position() {
        let schema = vec![
            ColumnDefinition::new("first", "", 1),
            ColumnDefinition::new("second", "", 1),
            ColumnDefinition::new("zero", "", 0),
        ];
        assert_eq!(baseline(&schema).ids(), vec!["zero", "first", "second"]);
    }

    #[test]
    fn test_duplicate_ids_last_wins() {
        let schema = vec![
            ColumnDefinition::new("a", "Old", 0),
            ColumnDefinition::new("b", "B", 1),
            ColumnDefinition::new("a", "New", 2),
        ];
        let resolved = baseline(&schema);
        assert_eq!(resolved.ids(), vec!["b", "a"]);
        assert_eq!(resolved.get("a").unwrap().label, "New");
    }

    #[test]
    fn test_locked_column_always_visible() {
        let schema = vec![ColumnDefinition::new("sel", "", 0).locked().hidden()];
        assert!(baseline(&schema).get("sel").unwrap().visible);

        let resolved = reconcile(&schema, Some(&prefs(&["sel"], &["sel"])));
        assert!(resolved.get("sel").unwrap().visible);
    }

    #[test]
    fn test_stored_order_and_hidden_applied() {
        let resolved = reconcile(&schema(), Some(&prefs(&["c", "b"], &["b"])));
        assert_eq!(resolved.ids(), vec!["a", "c", "b"]);
        let visible: Vec<_> = resolved.visible_columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(visible, vec!["a", "c"]);
        assert!(resolved.is_customized());
    }

    #[test]
    fn test_stale_ids_dropped() {
        let resolved = reconcile(&schema(), Some(&prefs(&["gone", "c", "b"], &["gone", "a"])));
        assert_eq!(resolved.ids(), vec!["a", "c", "b"]);
        assert!(resolved.get("gone").is_none());
        // locked id in hidden is ignored
        assert!(resolved.get("a").unwrap().visible);
    }

    #[test]
    fn test_only_stale_ids_is_baseline() {
        let resolved = reconcile(&schema(), Some(&prefs(&["x", "y"], &["x"])));
        assert_eq!(resolved, baseline(&schema()));
    }

    #[test]
    fn test_new_column_slotted_after_predecessor() {
        let mut schema = schema();
        schema.push(ColumnDefinition::new("d", "D", 3));
        schema.insert(1, ColumnDefinition::new("new_first", "N", 0));

        // Blob written before `d` and `new_first` existed
        let resolved = reconcile(&schema, Some(&prefs(&["c", "b"], &[])));
        assert_eq!(resolved.ids(), vec!["a", "new_first", "c", "d", "b"]);
    }

    #[test]
    fn test_new_column_keeps_baseline_visibility() {
        let mut schema = schema();
        schema.push(ColumnDefinition::new("notes", "Notes", 5).hidden());
        let resolved = reconcile(&schema, Some(&prefs(&["b", "c"], &["b"])));
        assert!(!resolved.get("notes").unwrap().visible);
        assert!(!resolved.get("b").unwrap().visible);
        assert!(resolved.get("c").unwrap().visible);
    }

    #[test]
    fn test_known_column_hidden_by_default_becomes_visible_when_not_in_hidden() {
        let schema = vec![
            ColumnDefinition::new("b", "B", 1),
            ColumnDefinition::new("c", "C", 2).hidden(),
        ];
        let resolved = reconcile(&schema, Some(&prefs(&["b", "c"], &[])));
        assert!(resolved.get("c").unwrap().visible);
    }

    #[test]
    fn test_locked_columns_keep_slots() {
        let schema = vec![
            ColumnDefinition::new("sel", "", 0).locked(),
            ColumnDefinition::new("b", "B", 1),
            ColumnDefinition::new("c", "C", 2),
            ColumnDefinition::new("actions", "", 3).locked(),
        ];
        let resolved = reconcile(&schema, Some(&prefs(&["c", "b"], &[])));
        assert_eq!(resolved.ids(), vec!["sel", "c", "b", "actions"]);
        let orders: Vec<_> = resolved.all_columns().iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_preferences_extracts_diff() {
        let resolved = reconcile(&schema(), Some(&prefs(&["c", "b"], &["b"])));
        assert_eq!(resolved.preferences(), prefs(&["c", "b"], &["b"]));
        assert_eq!(baseline(&schema()).preferences(), prefs(&["b", "c"], &[]));
    }

    #[test]
    fn test_empty_schema() {
        let resolved = reconcile(&[], Some(&prefs(&["a"], &["a"])));
        assert!(resolved.is_empty());
        assert!(!resolved.is_customized());
    }
}
