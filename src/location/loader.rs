//! File-based gazetteer overrides at ~/.campus-compass/gazetteer.json.
//!
//! The file is a JSON array of `CampusLocation` objects in declaration
//! order. Without an override the compiled-in dataset is used.

use super::gazetteer::Gazetteer;
use super::types::{CampusLocation, LocationError};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".campus-compass";
const GAZETTEER_FILE: &str = "gazetteer.json";

/// Default override location under the user's home directory.
pub fn default_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(GAZETTEER_FILE)
}

/// Load and validate a gazetteer from a JSON file.
pub fn load_gazetteer(path: &Path) -> Result<Gazetteer, LocationError> {
    let data = fs::read_to_string(path)?;
    let locations: Vec<CampusLocation> = serde_json::from_str(&data)?;
    let gazetteer = Gazetteer::new(locations)?;
    tracing::info!(path = %path.display(), locations = gazetteer.len(), "loaded gazetteer override");
    Ok(gazetteer)
}

/// Pick the gazetteer for this process: an explicit path must load, the
/// default path is used only if the file exists, otherwise built-in data.
pub fn load_configured(explicit: Option<&Path>) -> Result<Gazetteer, LocationError> {
    load_configured_from(explicit, &default_path())
}

/// `load_configured` with the default override path supplied by the caller.
pub fn load_configured_from(explicit: Option<&Path>, default: &Path) -> Result<Gazetteer, LocationError> {
    if let Some(path) = explicit {
        return load_gazetteer(path);
    }
    if default.is_file() {
        return load_gazetteer(default);
    }
    Ok(Gazetteer::builtin().clone())
}

/// Write a gazetteer as pretty JSON, creating parent directories.
pub fn export_gazetteer(gazetteer: &Gazetteer, path: &Path) -> Result<(), LocationError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(gazetteer.locations())?;
    fs::write(path, json)?;
    Ok(())
}
