// Integration: column preference store persisted through FileStorage.
// Run with: cargo test -p colprefs-config --test store_on_disk

use std::fs;

use colprefs_config::{FileStorage, SchemaFile};
use colprefs_core::{ColumnPreferenceStore, PreferenceStorage};
use tempfile::TempDir;

const V1: &str = r#"
resource = "inventory"

[[columns]]
id = "select"
locked = true

[[columns]]
id = "sku"
label = "SKU"

[[columns]]
id = "name"
label = "Name"

[[columns]]
id = "qty"
label = "Qty"

[[columns]]
id = "supplier"
label = "Supplier"
"#;

// Next release: `supplier` removed, `name` relabeled, `price` added
const V2: &str = r#"
resource = "inventory"

[[columns]]
id = "select"
locked = true

[[columns]]
id = "sku"
label = "SKU"

[[columns]]
id = "name"
label = "Product"

[[columns]]
id = "price"
label = "Price"

[[columns]]
id = "qty"
label = "Qty"
"#;

fn open(dir: &TempDir, schema: &SchemaFile, user: &str) -> ColumnPreferenceStore<FileStorage> {
    let mut store =
        ColumnPreferenceStore::new(FileStorage::new(dir.path()), schema.resource.clone());
    store.load(&schema.columns, user);
    store
}

#[test]
fn preferences_survive_restart() {
    let dir = TempDir::new().unwrap();
    let v1 = SchemaFile::from_toml(V1).unwrap();

    let mut store = open(&dir, &v1, "alice");
    assert!(store.reorder(3, 1).is_persisted());
    assert!(store.toggle("supplier").is_persisted());
    let session = store.resolved().clone();

    let restarted = open(&dir, &v1, "alice");
    assert_eq!(restarted.resolved(), &session);
    assert_eq!(restarted.resolved().ids(), vec!["select", "qty", "sku", "name", "supplier"]);
}

#[test]
fn schema_upgrade_heals_stored_preferences() {
    let dir = TempDir::new().unwrap();
    let v1 = SchemaFile::from_toml(V1).unwrap();
    let v2 = SchemaFile::from_toml(V2).unwrap();

    let mut store = open(&dir, &v1, "alice");
    let _ = store.reorder(4, 1); // supplier first
    let _ = store.toggle("sku");

    let upgraded = open(&dir, &v2, "alice");
    let resolved = upgraded.resolved();
    assert_eq!(resolved.ids(), vec!["select", "sku", "name", "price", "qty"]);
    assert!(resolved.get("supplier").is_none());
    assert!(!resolved.get("sku").unwrap().visible);
    assert_eq!(resolved.get("name").unwrap().label, "Product");
    assert!(resolved.get("price").unwrap().visible);

    // Stale id stays on disk until the next write
    let key = upgraded.storage_key().unwrap().to_string();
    let raw = upgraded.storage().get(&key).unwrap().unwrap();
    assert!(raw.contains("supplier"));

    let mut upgraded = upgraded;
    let _ = upgraded.toggle("sku");
    let raw = upgraded.storage().get(&key).unwrap().unwrap();
    assert!(!raw.contains("supplier"));
    assert_eq!(raw, r#"{"order":["sku","name","price","qty"],"hidden":[]}"#);
}

#[test]
fn corrupt_file_resolves_to_baseline() {
    let dir = TempDir::new().unwrap();
    let v1 = SchemaFile::from_toml(V1).unwrap();

    let storage = FileStorage::new(dir.path());
    fs::write(storage.path_for("columns:inventory:bob"), "\u{0}\u{1}garbage").unwrap();

    let store = open(&dir, &v1, "bob");
    assert!(!store.is_customized());
    assert_eq!(store.resolved().ids(), vec!["select", "sku", "name", "qty", "supplier"]);
}

#[test]
fn reset_removes_file() {
    let dir = TempDir::new().unwrap();
    let v1 = SchemaFile::from_toml(V1).unwrap();

    let mut store = open(&dir, &v1, "carol");
    let _ = store.toggle("qty");
    let path = store.storage().path_for("columns:inventory:carol");
    assert!(path.exists());

    assert!(store.reset().is_persisted());
    assert!(!path.exists());
    assert!(store.reset().is_persisted());
}
