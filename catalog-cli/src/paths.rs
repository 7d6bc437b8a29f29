use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Catalog file name looked up in the working directory
const LOCAL_FILE: &str = "itsm-catalog.json";

/// Determines the catalog data file to use based on the available information
pub fn determine_catalog_path(file_option: Option<PathBuf>) -> Result<PathBuf> {
    // Priority 1: the --file command line option
    if let Some(path) = file_option {
        return Ok(path);
    }

    // Priority 2: the CATALOG_FILE environment variable
    if let Ok(path) = env::var("CATALOG_FILE") {
        return Ok(PathBuf::from(path));
    }

    // Priority 3: a catalog file in the current directory
    let local = PathBuf::from(LOCAL_FILE);
    if local.exists() {
        return Ok(local);
    }

    // Default to ~/.itsm-catalog.json
    let home_dir = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home_dir.join(".itsm-catalog.json"))
}
