// Configuration loading

pub mod file_storage;
pub mod schema;
pub mod settings;

pub use file_storage::{default_storage_dir, FileStorage};
pub use schema::{SchemaError, SchemaFile};
pub use settings::{Settings, SettingsError};
