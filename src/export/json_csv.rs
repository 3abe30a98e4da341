// src/export/json_csv.rs

use crate::errors::AppResult;
use crate::export::{PostExport, notify_export_success};
use crate::models::Post;
use crate::ui::messages::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Full records, pretty-printed; images stay a JSON array.
pub(crate) fn export_json(posts: &[Post], path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(posts)?;
    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;
    file.write_all(b"\n")?;

    notify_export_success("JSON", posts.len(), path);
    Ok(())
}

/// One row per post, header included via serde.
pub(crate) fn export_csv(posts: &[Post], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)?;
    for post in posts {
        wtr.serialize(PostExport::from(post))?;
    }
    wtr.flush()?;

    notify_export_success("CSV", posts.len(), path);
    Ok(())
}
