// src/export/logic.rs

use crate::db::pool::DbPool;
use crate::db::queries::list_posts;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::models::PostFilter;
use crate::ui::messages::warning;
use std::fs;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export the posts matching `filter` to `file`.
    /// Returns the number of exported posts.
    pub fn export(
        pool: &DbPool,
        format: ExportFormat,
        file: &str,
        filter: &PostFilter,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        ensure_writable(path, force)?;

        let posts = list_posts(&pool.conn, filter)?;
        if posts.is_empty() {
            warning("No posts to export.");
            return Ok(0);
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        match format {
            ExportFormat::Csv => export_csv(&posts, path)?,
            ExportFormat::Json => export_json(&posts, path)?,
        }

        tracing::debug!(format = format.as_str(), count = posts.len(), "export written");
        Ok(posts.len())
    }
}
