//! Config file migration: bring an existing YAML file up to the current
//! set of keys without touching values the operator already chose.

use super::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys present in the default configuration but absent from `content`.
pub fn missing_keys(content: &str) -> AppResult<Vec<String>> {
    let current: Value = serde_yaml::from_str(content)?;
    let defaults = serde_yaml::to_value(Config::default())?;

    let empty = Mapping::new();
    let current_map = current.as_mapping().unwrap_or(&empty);

    let mut missing = Vec::new();
    if let Some(default_map) = defaults.as_mapping() {
        for key in default_map.keys() {
            if !current_map.contains_key(key)
                && let Some(name) = key.as_str()
            {
                missing.push(name.to_string());
            }
        }
    }
    Ok(missing)
}

/// Add every missing key with its default value.
/// Returns the names of the keys that were added (empty → no change).
pub fn migrate_file(path: &Path) -> AppResult<Vec<String>> {
    if !path.exists() {
        info(format!("No config file at {}: nothing to migrate.", path.display()));
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)?;
    let added = missing_keys(&content)?;
    if added.is_empty() {
        return Ok(added);
    }

    let mut current: Value = serde_yaml::from_str(&content)?;
    if !current.is_mapping() {
        current = Value::Mapping(Mapping::new());
    }
    let defaults = serde_yaml::to_value(Config::default())?;

    if let (Some(map), Some(default_map)) = (current.as_mapping_mut(), defaults.as_mapping()) {
        for name in &added {
            let key = Value::String(name.clone());
            if let Some(v) = default_map.get(&key) {
                map.insert(key, v.clone());
            }
        }
    }

    fs::write(path, serde_yaml::to_string(&current)?)?;
    success(format!("Config migrated: added {}", added.join(", ")));
    Ok(added)
}
