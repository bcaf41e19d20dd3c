//! File helpers for the demo tools.
//!
//! - `load_volume`: read a serialized [`VolumeContext`] from JSON.
//! - `write_json_file`: pretty-print a serializable value to disk.

use crate::context::VolumeContext;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load a volume context (trajectories, hits, space points) from JSON.
pub fn load_volume(path: &Path) -> Result<VolumeContext, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read volume {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse volume {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
