pub mod add;
pub mod backup;
pub mod dedup;
pub mod del;
pub mod edit;
pub mod import;
pub mod log;
pub mod prefetch;
pub mod regenerate;
pub mod tiles;

use serde::Serialize;
use std::path::PathBuf;

/// Outcome of a single-post mutation, as reported by the CLI and the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeResult {
    pub id: i64,
    pub action: String,
    pub file: Option<String>,
}

impl ChangeResult {
    pub fn new(id: i64, action: &str, file: Option<PathBuf>) -> Self {
        Self {
            id,
            action: action.to_string(),
            file: file.map(|p| p.to_string_lossy().to_string()),
        }
    }
}
