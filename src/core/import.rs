//! Bulk import of posts from an Instagram data export or from a directory
//! of front-matter pages. Re-running an import on the same source never
//! creates new records: every candidate goes through the content hash.

use crate::core::dedup;
use crate::db::log::audit_quiet;
use crate::db::queries::{get_post_by_hash, insert_post, update_post};
use crate::errors::{AppError, AppResult};
use crate::models::instagram::{InstagramExport, InstagramPost};
use crate::models::post::is_unknown;
use crate::models::{InsertOutcome, NewPost, Post, PostPatch};
use crate::site::front_matter;
use crate::utils::date::from_timestamp;
use regex::Regex;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// A caption must mention one of these to count as a coffee post.
pub const COFFEE_TERMS: &[&str] = &[
    "coffee",
    "cafe",
    "café",
    "worldcoffeetour",
    "espresso",
    "latte",
    "cappuccino",
    "americano",
    "macchiato",
    "cortado",
    "mocha",
    "barista",
    "roastery",
    "coffeeshop",
    "brew",
];

const MAX_TITLE_CHARS: usize = 200;
const NOTES_MIN_CHARS: usize = 50;

static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x08\x0B-\x1F\x7F]").expect("valid regex"));
static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_.]+)").expect("valid regex"));

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Skip captions without a coffee term.
    pub coffee_only: bool,
    /// On a duplicate, fill fields the stored record is missing.
    pub fill_missing: bool,
    /// Count only, write nothing.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub inserted: usize,
    pub duplicates: usize,
    pub updated: usize,
    pub filtered: usize,
    pub failed: usize,
}

/// Candidates read from a source, before they reach the store.
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub posts: Vec<NewPost>,
    pub filtered: usize,
    pub failed: usize,
}

pub struct ImportLogic;

impl ImportLogic {
    /// Import from `source`: a directory is read as front-matter pages,
    /// a file as an Instagram export.
    pub fn run(conn: &Connection, source: &Path, opts: ImportOptions) -> AppResult<ImportReport> {
        let batch = if source.is_dir() {
            from_posts_dir(source)?
        } else if source.is_file() {
            from_instagram_export(source, opts.coffee_only)?
        } else {
            return Err(AppError::InvalidInput(format!(
                "import source not found: {}",
                source.display()
            )));
        };

        let report = import_records(conn, batch, opts)?;

        if !opts.dry_run {
            audit_quiet(
                conn,
                "import",
                &source.to_string_lossy(),
                &format!(
                    "{} inserted, {} duplicates, {} updated, {} filtered, {} failed",
                    report.inserted,
                    report.duplicates,
                    report.updated,
                    report.filtered,
                    report.failed
                ),
            );
        }
        Ok(report)
    }
}

/// Push a batch through the store inside one transaction.
pub fn import_records(
    conn: &Connection,
    batch: ImportBatch,
    opts: ImportOptions,
) -> AppResult<ImportReport> {
    let mut report = ImportReport {
        filtered: batch.filtered,
        failed: batch.failed,
        ..ImportReport::default()
    };

    if opts.dry_run {
        let mut seen = HashSet::new();
        for post in &batch.posts {
            let hash = dedup::hash_for(post);
            match get_post_by_hash(conn, &hash)? {
                Some(existing) => {
                    report.duplicates += 1;
                    if opts.fill_missing && !missing_fields_patch(&existing, post).is_empty() {
                        report.updated += 1;
                    }
                }
                None if seen.contains(&hash) => report.duplicates += 1,
                None => report.inserted += 1,
            }
            seen.insert(hash);
        }
        return Ok(report);
    }

    let tx = conn.unchecked_transaction()?;
    for post in &batch.posts {
        match insert_post(&tx, post)? {
            InsertOutcome::Inserted(_) => report.inserted += 1,
            InsertOutcome::Duplicate(id) => {
                report.duplicates += 1;
                if opts.fill_missing && fill_missing(&tx, id, post)? {
                    report.updated += 1;
                }
            }
        }
    }
    tx.commit()?;

    tracing::info!(
        inserted = report.inserted,
        duplicates = report.duplicates,
        updated = report.updated,
        "import finished"
    );
    Ok(report)
}

fn blank(v: Option<&str>) -> bool {
    v.is_none_or(|s| s.trim().is_empty())
}

/// Fields that are empty on `existing` but known on `incoming`.
/// Values already present on the stored record are never touched.
pub fn missing_fields_patch(existing: &Post, incoming: &NewPost) -> PostPatch {
    let mut patch = PostPatch::default();

    if is_unknown(Some(&existing.city)) && !is_unknown(incoming.city.as_deref()) {
        patch.city = incoming.city.clone();
    }
    if is_unknown(Some(&existing.country)) && !is_unknown(incoming.country.as_deref()) {
        patch.country = incoming.country.clone();
    }
    if is_unknown(Some(&existing.continent)) && !is_unknown(incoming.continent.as_deref()) {
        patch.continent = incoming.continent.clone();
    }
    if existing.latitude.is_none()
        && existing.longitude.is_none()
        && let (Some(lat), Some(lon)) = (incoming.latitude, incoming.longitude)
    {
        patch.latitude = Some(Some(lat));
        patch.longitude = Some(Some(lon));
    }
    if blank(existing.cafe_name.as_deref()) && !blank(incoming.cafe_name.as_deref()) {
        patch.cafe_name = Some(incoming.cafe_name.clone());
    }
    if existing.rating.is_none() && incoming.rating.is_some() {
        patch.rating = Some(incoming.rating);
    }
    if blank(existing.notes.as_deref()) && !blank(incoming.notes.as_deref()) {
        patch.notes = Some(incoming.notes.clone());
    }
    if existing.images.is_empty() && !incoming.images.is_empty() {
        patch.images = Some(incoming.images.clone());
    }
    if blank(existing.instagram_url.as_deref()) && !blank(incoming.instagram_url.as_deref()) {
        patch.instagram_url = Some(incoming.instagram_url.clone());
    }

    patch
}

fn fill_missing(conn: &Connection, id: i64, incoming: &NewPost) -> AppResult<bool> {
    let Some(existing) = crate::db::queries::get_post(conn, id)? else {
        return Ok(false);
    };

    let patch = missing_fields_patch(&existing, incoming);
    if patch.is_empty() {
        return Ok(false);
    }
    update_post(conn, id, &patch)
}

//
// Instagram export
//

pub fn from_instagram_export(path: &Path, coffee_only: bool) -> AppResult<ImportBatch> {
    let content = fs::read_to_string(path)?;
    from_instagram_json(&content, coffee_only)
}

pub fn from_instagram_json(content: &str, coffee_only: bool) -> AppResult<ImportBatch> {
    let export: InstagramExport = serde_json::from_str(content)?;
    let mut batch = ImportBatch::default();

    for (i, ig) in export.into_posts().iter().enumerate() {
        let caption = ig.caption().map(clean_caption).unwrap_or_default();

        if coffee_only && !is_coffee_related(&caption) {
            batch.filtered += 1;
            continue;
        }

        match instagram_to_post(ig, &caption) {
            Ok(post) => batch.posts.push(post),
            Err(e) => {
                tracing::warn!(index = i, error = %e, "skipping Instagram post");
                batch.failed += 1;
            }
        }
    }

    Ok(batch)
}

pub fn is_coffee_related(caption: &str) -> bool {
    let lower = caption.to_lowercase();
    COFFEE_TERMS.iter().any(|t| lower.contains(t))
}

/// Undo Latin-1 mojibake: text whose chars all fit in one byte and whose
/// bytes form valid UTF-8 is re-read as UTF-8.
pub fn fix_mojibake(s: &str) -> String {
    if !s.chars().any(|c| c as u32 >= 0x80) || s.chars().any(|c| c as u32 > 0xFF) {
        return s.to_string();
    }

    let bytes: Vec<u8> = s.chars().map(|c| c as u32 as u8).collect();
    String::from_utf8(bytes).unwrap_or_else(|_| s.to_string())
}

/// Mojibake repair, control characters stripped (newline and tab kept), trimmed.
pub fn clean_caption(raw: &str) -> String {
    let fixed = fix_mojibake(raw);
    CONTROL_CHARS.replace_all(&fixed, "").trim().to_string()
}

pub fn first_mention(caption: &str) -> Option<String> {
    MENTION
        .captures(caption)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end_matches('.').to_string())
        .filter(|m| !m.is_empty())
}

/// Site path of an exported media file.
pub fn media_url(uri: &str) -> String {
    let uri = uri.trim().trim_start_matches('/');
    match uri.strip_prefix("media/posts/") {
        Some(rest) => format!("/assets/images/posts/{rest}"),
        None => format!("/{uri}"),
    }
}

fn instagram_to_post(ig: &InstagramPost, caption: &str) -> AppResult<NewPost> {
    let ts = ig
        .timestamp()
        .ok_or_else(|| AppError::InvalidInput("post has no creation timestamp".into()))?;
    let date = from_timestamp(ts)
        .ok_or_else(|| AppError::InvalidInput(format!("bad timestamp {ts}")))?
        .format("%Y-%m-%d")
        .to_string();

    let title = caption
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(|l| l.chars().take(MAX_TITLE_CHARS).collect::<String>())
        .unwrap_or_else(|| format!("Instagram post from {date}"));

    let notes = (caption.chars().count() > NOTES_MIN_CHARS).then(|| caption.to_string());

    let uris: Vec<&str> = ig
        .media
        .iter()
        .map(|m| m.uri.as_str())
        .filter(|u| !u.trim().is_empty())
        .collect();

    let mut images: Vec<String> = Vec::new();
    for uri in &uris {
        let url = media_url(uri);
        if !images.contains(&url) {
            images.push(url);
        }
    }

    let mut metadata = Map::new();
    metadata.insert("instagram_timestamp".into(), Value::from(ts));
    metadata.insert("instagram_media_count".into(), Value::from(ig.media.len()));
    metadata.insert(
        "original_media_uris".into(),
        Value::from(uris.iter().map(|u| u.to_string()).collect::<Vec<_>>()),
    );

    let post = NewPost {
        title,
        date,
        cafe_name: first_mention(caption),
        notes,
        images,
        metadata,
        ..NewPost::default()
    };
    post.validate()?;
    Ok(post)
}

//
// Posts directory
//

pub fn from_posts_dir(dir: &Path) -> AppResult<ImportBatch> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "md") {
            files.push(path);
        }
    }
    files.sort();

    let mut batch = ImportBatch::default();
    for path in files {
        match page_to_post(&path) {
            Ok(post) => batch.posts.push(post),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping page");
                batch.failed += 1;
            }
        }
    }
    Ok(batch)
}

fn page_to_post(path: &Path) -> AppResult<NewPost> {
    let content = fs::read_to_string(path)?;
    let (mapping, _body) = front_matter::split(&content)?;

    let mut post = front_matter::to_new_post(&mapping)?;
    post.original_filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string());
    post.validate()?;
    Ok(post)
}
