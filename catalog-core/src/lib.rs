pub mod models;
pub mod relations;
pub mod schema;
pub mod settings;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use models::{CatalogState, Collection, FieldValue, Record, STATE_VERSION};
pub use relations::{
    collect_many, collect_single, display_name, relation_options, resolve_labels, stored_ids,
    RelationOption,
};
pub use schema::{
    schemas_for, validate_required, FieldDef, FieldType, RelationDef, Schema, ValidationError,
};
pub use settings::{SettingKey, Settings};
pub use storage::Storage;
pub use store::{backup_file_name, CatalogStore};
