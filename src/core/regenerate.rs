//! Static page generation: one front-matter file per post record.

use crate::config::Config;
use crate::core::backup::archive_markdown;
use crate::db::log::audit_quiet;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::Post;
use crate::site;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegenReport {
    pub written: usize,
    pub unchanged: usize,
    pub removed: usize,
    pub backup: Option<String>,
}

pub struct Regenerator {
    out_dir: PathBuf,
    backup: bool,
}

impl Regenerator {
    pub fn new(out_dir: impl Into<PathBuf>, backup: bool) -> Self {
        Self {
            out_dir: out_dir.into(),
            backup,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(&cfg.posts_dir, cfg.backup_before_regenerate)
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn path_for(&self, post: &Post) -> PathBuf {
        self.out_dir.join(site::file_name(post))
    }

    /// Every `*.md` currently in the output directory, sorted.
    fn markdown_files(&self) -> AppResult<Vec<PathBuf>> {
        if !self.out_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.out_dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|e| e == "md") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Files previously generated for `id`, whatever title/date they carried.
    ///
    /// The `-<id>.md` suffix only narrows the candidates; a page belongs to
    /// the post when its front matter `post_id` says so. Pages from other
    /// sources that happen to end in `-<digits>.md` are left alone.
    pub fn files_for(&self, id: i64) -> AppResult<Vec<PathBuf>> {
        let mut out = Vec::new();
        for path in self.markdown_files()? {
            let suffix = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(site::id_from_file_name);
            if suffix != Some(id) {
                continue;
            }
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            if site::front_matter::post_id(&content) == Some(id) {
                out.push(path);
            }
        }
        Ok(out)
    }

    /// Write one page. Returns the path and whether bytes on disk changed.
    pub fn write_post(&self, post: &Post) -> AppResult<(PathBuf, bool)> {
        fs::create_dir_all(&self.out_dir)?;

        let path = self.path_for(post);
        let content = site::render(post)?;

        if let Ok(existing) = fs::read(&path)
            && existing == content.as_bytes()
        {
            return Ok((path, false));
        }

        let tmp = path.with_extension("md.tmp");
        fs::write(&tmp, content.as_bytes())?;
        fs::rename(&tmp, &path)?;
        Ok((path, true))
    }

    /// Rebuild the whole output directory from the store.
    ///
    /// Records are read before anything on disk is touched; pages whose
    /// bytes are already current are left alone, and pages no record
    /// produced in this pass are removed.
    pub fn regenerate_all(&self, conn: &Connection) -> AppResult<RegenReport> {
        let posts = queries::all_posts(conn)?;
        let existing = self.markdown_files()?;
        let mut report = RegenReport::default();

        if self.backup && !existing.is_empty() {
            let archive = archive_markdown(&self.out_dir, &existing)?;
            report.backup = Some(archive.to_string_lossy().to_string());
        }

        let mut produced = HashSet::new();
        for post in &posts {
            let (path, changed) = self.write_post(post)?;
            if changed {
                report.written += 1;
            } else {
                report.unchanged += 1;
            }
            produced.insert(path);
        }

        for path in existing {
            if !produced.contains(&path) {
                fs::remove_file(&path)?;
                tracing::debug!(file = %path.display(), "removed stale page");
                report.removed += 1;
            }
        }

        tracing::info!(
            written = report.written,
            unchanged = report.unchanged,
            removed = report.removed,
            "regenerated posts"
        );
        audit_quiet(
            conn,
            "regenerate",
            &self.out_dir.to_string_lossy(),
            &format!(
                "{} written, {} unchanged, {} removed",
                report.written, report.unchanged, report.removed
            ),
        );

        Ok(report)
    }

    /// Rewrite the page of a single post, dropping any page it had under
    /// an older name.
    pub fn regenerate_one(&self, conn: &Connection, id: i64) -> AppResult<PathBuf> {
        let post = queries::require_post(conn, id)?;
        let target = self.path_for(&post);

        for old in self.files_for(id)? {
            if old != target {
                fs::remove_file(&old)?;
            }
        }

        let (path, _) = self.write_post(&post)?;
        Ok(path)
    }

    /// Remove every page generated for `id`. Returns how many were removed.
    pub fn remove_post_file(&self, id: i64) -> AppResult<usize> {
        let files = self.files_for(id)?;
        for f in &files {
            fs::remove_file(f)?;
        }
        Ok(files.len())
    }

    /// Remove pages whose file name does not match any current record.
    pub fn clean_orphans(&self, conn: &Connection) -> AppResult<usize> {
        let expected: HashSet<PathBuf> = queries::all_posts(conn)?
            .iter()
            .map(|p| self.path_for(p))
            .collect();

        let mut removed = 0;
        for path in self.markdown_files()? {
            if !expected.contains(&path) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
