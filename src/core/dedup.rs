//! Content fingerprint used to recognise the same post across imports, and
//! the scan that finds records stored twice under different fingerprints.

use crate::core::del::DeleteLogic;
use crate::core::regenerate::Regenerator;
use crate::db::log::audit_quiet;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::post::is_unknown;
use crate::models::{NewPost, Post};
use rusqlite::Connection;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};

/// Characters of title and caption that take part in the fingerprint.
const PREFIX_CHARS: usize = 50;

/// Trim, collapse whitespace runs and lowercase.
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn prefix(s: &str) -> String {
    normalize_text(s).chars().take(PREFIX_CHARS).collect()
}

/// SHA-256 hex of `title|date|notes[|first image]` after normalization.
pub fn content_hash(
    title: &str,
    date: &str,
    notes: Option<&str>,
    first_image: Option<&str>,
) -> String {
    let mut parts = vec![
        prefix(title),
        normalize_text(date),
        notes.map(prefix).unwrap_or_default(),
    ];
    if let Some(image) = first_image.map(str::trim).filter(|s| !s.is_empty()) {
        parts.push(image.to_string());
    }

    let mut hasher = Sha256::new();
    hasher.update(parts.join("|").as_bytes());
    hex::encode(hasher.finalize())
}

pub fn hash_for(post: &NewPost) -> String {
    content_hash(
        &post.title,
        &post.date,
        post.notes.as_deref(),
        post.images.first().map(String::as_str),
    )
}

/// Stable part of an image URL: the file stem for site-local and Instagram
/// CDN images, the whole URL otherwise.
pub fn image_key(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let stem = |name: &str| name.rsplit_once('.').map_or(name, |(s, _)| s).to_string();

    if url.contains("/assets/images/posts/") {
        return url.rsplit('/').next().filter(|n| !n.is_empty()).map(stem);
    }
    if (url.contains("instagram.com") || url.contains("cdninstagram.com"))
        && let Some(part) = url
            .split(['/', '?'])
            .find(|p| p.contains("_n.") || p.contains("_a."))
    {
        return Some(stem(part));
    }
    Some(url.to_string())
}

/// Shortcode of an `instagram.com/p/<id>/` link.
pub fn instagram_id(url: &str) -> Option<String> {
    if !url.contains("instagram.com") {
        return None;
    }
    let mut parts = url.split('/');
    parts.find(|p| *p == "p")?;
    parts.next().filter(|id| !id.is_empty()).map(str::to_string)
}

/// How much curated information a record carries.
pub fn completeness_score(post: &Post) -> i64 {
    let mut score = 0;
    if let Some(cafe) = post.cafe_name.as_deref()
        && !is_unknown(Some(cafe))
        && !cafe.eq_ignore_ascii_case("none")
    {
        score += 10;
    }
    if !is_unknown(Some(&post.city)) {
        score += 5;
    }
    if !is_unknown(Some(&post.country)) {
        score += 5;
    }
    if post.coordinates().is_some() {
        score += 8;
    }
    if let Some(notes) = &post.notes {
        score += (notes.chars().count() / 100) as i64;
    }
    if post.rating.is_some() {
        score += 3;
    }
    if post.instagram_url.as_deref().is_some_and(|u| !u.trim().is_empty()) {
        score += 2;
    }
    score
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateReason {
    Image,
    Instagram,
    DateLocation,
}

impl DuplicateReason {
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "same image",
            Self::Instagram => "same Instagram post",
            Self::DateLocation => "same date and place",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    pub reason: DuplicateReason,
    pub key: String,
    pub keep: i64,
    pub remove: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DedupScan {
    /// Confirmed duplicates: one record kept, the rest removable.
    pub groups: Vec<DuplicateGroup>,
    /// Same date and place only; reported, never removed.
    pub review: Vec<DuplicateGroup>,
}

fn best_of(posts: &[&Post]) -> i64 {
    posts
        .iter()
        .max_by_key(|p| (completeness_score(p), p.id))
        .map_or(0, |p| p.id)
}

fn to_group(reason: DuplicateReason, key: String, posts: &[&Post]) -> DuplicateGroup {
    let keep = best_of(posts);
    DuplicateGroup {
        reason,
        key,
        keep,
        remove: posts.iter().map(|p| p.id).filter(|id| *id != keep).collect(),
    }
}

/// Group records that describe the same visit.
///
/// Image keys are checked first, then Instagram shortcodes; a record lands
/// in at most one confirmed group. Same date, city and country is only
/// flagged for review, and only when the place is known.
pub fn find_duplicates(posts: &[Post]) -> DedupScan {
    let mut by_image: BTreeMap<String, Vec<&Post>> = BTreeMap::new();
    let mut by_instagram: BTreeMap<String, Vec<&Post>> = BTreeMap::new();
    let mut by_place: BTreeMap<String, Vec<&Post>> = BTreeMap::new();

    for post in posts {
        if let Some(key) = post.images.first().and_then(|u| image_key(u)) {
            by_image.entry(key).or_default().push(post);
        }
        if let Some(key) = post.instagram_url.as_deref().and_then(instagram_id) {
            by_instagram.entry(key).or_default().push(post);
        }
        if let Some(date) = post.date.as_deref().filter(|d| !d.trim().is_empty())
            && !is_unknown(Some(&post.city))
            && !is_unknown(Some(&post.country))
        {
            let key = format!("{date}|{}|{}", post.city, post.country);
            by_place.entry(key).or_default().push(post);
        }
    }

    let mut scan = DedupScan::default();
    let mut claimed: HashSet<i64> = HashSet::new();

    for (reason, map) in [
        (DuplicateReason::Image, by_image),
        (DuplicateReason::Instagram, by_instagram),
    ] {
        for (key, group) in map {
            if group.len() < 2 || group.iter().any(|p| claimed.contains(&p.id)) {
                continue;
            }
            claimed.extend(group.iter().map(|p| p.id));
            scan.groups.push(to_group(reason, key, &group));
        }
    }

    for (key, group) in by_place {
        if group.len() < 2 || group.iter().any(|p| claimed.contains(&p.id)) {
            continue;
        }
        scan.review.push(to_group(DuplicateReason::DateLocation, key, &group));
    }

    scan
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DedupReport {
    pub groups: Vec<DuplicateGroup>,
    pub review: Vec<DuplicateGroup>,
    /// Ids actually deleted; empty on a dry run.
    pub removed: Vec<i64>,
}

pub struct DedupLogic;

impl DedupLogic {
    /// Scan the store and, when `apply` is set, delete every non-kept record
    /// of each confirmed group along with its page.
    pub fn run(
        conn: &Connection,
        regen: Option<&Regenerator>,
        apply: bool,
    ) -> AppResult<DedupReport> {
        let posts = queries::all_posts(conn)?;
        let scan = find_duplicates(&posts);
        let mut report = DedupReport {
            groups: scan.groups,
            review: scan.review,
            removed: Vec::new(),
        };

        tracing::info!(
            groups = report.groups.len(),
            review = report.review.len(),
            apply,
            "duplicate scan finished"
        );

        if !apply {
            return Ok(report);
        }

        for group in &report.groups {
            for id in &group.remove {
                DeleteLogic::apply(conn, regen, *id)?;
                report.removed.push(*id);
            }
        }

        if !report.removed.is_empty() {
            audit_quiet(
                conn,
                "dedup",
                "posts",
                &format!(
                    "Removed {} duplicate(s) in {} group(s)",
                    report.removed.len(),
                    report.groups.len()
                ),
            );
        }

        Ok(report)
    }
}
