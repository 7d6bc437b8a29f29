use anyhow::Result;
use chrono::Local;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::models::{CatalogState, Collection, FieldValue, Record};
use crate::settings::{SettingKey, Settings};
use crate::storage::Storage;

/// The schema-driven entity store over the four catalog collections.
///
/// Owns the persisted blob exclusively; every mutating call runs to
/// completion and rewrites the whole blob synchronously, so each operation
/// is its own unit of work. There is no protection against a second process
/// writing the same file.
pub struct CatalogStore {
    storage: Storage,
    state: CatalogState,
}

impl CatalogStore {
    /// Opens the store at the given path, creating the empty default state
    /// on first run.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = Storage::new(path);
        let state = storage.load()?;
        Ok(Self { storage, state })
    }

    /// Returns the path to the backing blob
    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    /// The live record sequence of a collection, in insertion order
    pub fn get_all(&self, collection: Collection) -> &[Record] {
        self.state.records(collection)
    }

    /// Finds a record by id with a linear scan
    pub fn get(&self, collection: Collection, id: &str) -> Option<&Record> {
        self.state.records(collection).iter().find(|r| r.id == id)
    }

    /// Appends a new record with a fresh id and creation timestamp and
    /// returns the stored record. Required-field validation is the caller's
    /// job (see `schema::validate_required`); the store persists whatever it
    /// is handed.
    pub fn add(
        &mut self,
        collection: Collection,
        values: BTreeMap<String, FieldValue>,
    ) -> Result<Record> {
        let record = Record::new(values);
        self.state.records_mut(collection).push(record.clone());
        self.storage.save(&self.state)?;
        Ok(record)
    }

    /// Merges the given values over an existing record: present keys
    /// overwrite (including to an explicit empty string), absent keys are
    /// preserved. Returns false, writing nothing, when the id is not found.
    pub fn update(
        &mut self,
        collection: Collection,
        id: &str,
        values: BTreeMap<String, FieldValue>,
    ) -> Result<bool> {
        match self
            .state
            .records_mut(collection)
            .iter_mut()
            .find(|r| r.id == id)
        {
            Some(record) => {
                record.merge(values);
                self.storage.save(&self.state)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes the record with the given id; a no-op if it is absent.
    ///
    /// Relations held by other records are not touched, so references to the
    /// deleted record may dangle (see `relations::resolve_labels`).
    pub fn delete(&mut self, collection: Collection, id: &str) -> Result<()> {
        self.state.records_mut(collection).retain(|r| r.id != id);
        self.storage.save(&self.state)
    }

    /// The current settings snapshot
    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    /// Replaces a settings list wholesale and persists.
    /// An unrecognized key is silently ignored, not an error.
    pub fn update_setting_list(&mut self, key: &str, list: Vec<String>) -> Result<()> {
        if let Some(key) = SettingKey::parse(key) {
            self.state.settings.set(key, list);
            self.storage.save(&self.state)?;
        }
        Ok(())
    }

    /// Appends a value to a settings list unless it is already present.
    /// Returns whether the value was added.
    pub fn add_setting_value(&mut self, key: SettingKey, value: &str) -> Result<bool> {
        let added = self.state.settings.add_value(key, value);
        if added {
            self.storage.save(&self.state)?;
        }
        Ok(added)
    }

    /// Removes a value from a settings list by equality.
    /// Returns whether anything was removed.
    pub fn remove_setting_value(&mut self, key: SettingKey, value: &str) -> Result<bool> {
        let removed = self.state.settings.remove_value(key, value);
        if removed {
            self.storage.save(&self.state)?;
        }
        Ok(removed)
    }

    /// Replaces the whole state from a serialized blob. Accepted only if the
    /// blob carries a `services` array; any parse or shape failure returns
    /// false and leaves the current state untouched. All-or-nothing, never a
    /// merge.
    pub fn import_state(&mut self, raw: &str) -> Result<bool> {
        let parsed: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(_) => return Ok(false),
        };

        if !parsed.get("services").map_or(false, Value::is_array) {
            return Ok(false);
        }

        let mut state: CatalogState = match serde_json::from_value(parsed) {
            Ok(state) => state,
            Err(_) => return Ok(false),
        };
        state.migrate();

        self.state = state;
        self.storage.save(&self.state)?;
        Ok(true)
    }

    /// Full-fidelity snapshot of the current state as indented JSON
    pub fn export_state(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.state)?)
    }

    /// Restores the empty default state and persists it
    pub fn reset(&mut self) -> Result<()> {
        self.state = CatalogState::new();
        self.storage.save(&self.state)
    }
}

/// Suggested file name for a backup export, dated with the current day
pub fn backup_file_name() -> String {
    format!("itsm-backup-{}.json", Local::now().format("%Y-%m-%d"))
}
