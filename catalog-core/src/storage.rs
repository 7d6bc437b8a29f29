use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::models::CatalogState;

/// Handles saving and loading the catalog blob on disk.
///
/// The whole state lives under a single file; every save rewrites it.
pub struct Storage {
    file_path: PathBuf,
}

impl Storage {
    /// Creates a new Storage instance
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Returns the path to the storage file
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Loads the catalog state from the JSON blob.
    /// On first run the empty default state is created and written out.
    pub fn load(&self) -> Result<CatalogState> {
        if !self.file_path.exists() {
            let default_state = CatalogState::new();
            self.save(&default_state)?;
            return Ok(default_state);
        }

        let file = File::open(&self.file_path)
            .with_context(|| format!("Failed to open file: {:?}", self.file_path))?;
        let reader = BufReader::new(file);

        let mut state: CatalogState = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse JSON from {:?}", self.file_path))?;

        // Older blobs predate the settings table; write back once migrated
        if state.migrate() {
            self.save(&state)?;
        }

        Ok(state)
    }

    /// Saves the whole catalog state as indented JSON
    pub fn save(&self, state: &CatalogState) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.file_path, json)
            .with_context(|| format!("Failed to write {:?}", self.file_path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::STATE_VERSION;
    use tempfile::TempDir;

    #[test]
    fn test_first_run_creates_default_state() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");

        let storage = Storage::new(&path);
        let state = storage.load().unwrap();

        assert!(path.exists());
        assert!(state.services.is_empty());
        assert_eq!(state.settings, crate::settings::Settings::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(temp_dir.path().join("catalog.json"));

        let mut state = CatalogState::new();
        state.settings.contacts.push("Legal".to_string());
        storage.save(&state).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_blob_without_settings_gets_defaults_injected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");

        // Persisted shape from before the settings table existed
        fs::write(
            &path,
            r#"{"services":[],"components":[],"requests":[],"technical":[]}"#,
        )
        .unwrap();

        let storage = Storage::new(&path);
        let state = storage.load().unwrap();

        assert_eq!(state.settings, crate::settings::Settings::default());
        assert_eq!(state.version, STATE_VERSION);

        // The migration is one-shot: the filled blob was written back
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("criticalities"));
    }
}
