//! Output file naming for generated post pages.

use crate::models::Post;
use regex::Regex;
use std::sync::LazyLock;

const MAX_SLUG_CHARS: usize = 50;
const FALLBACK_DATE: &str = "1970-01-01";

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid regex"));
static ID_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(\d+)\.md$").expect("valid regex"));

/// Lowercase, drop punctuation, join words with `-`, cap at 50 chars.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, "");
    let joined = SEPARATORS.replace_all(cleaned.trim(), "-");
    let slug: String = joined.chars().take(MAX_SLUG_CHARS).collect();
    let slug = slug.trim_matches('-').to_string();

    if slug.is_empty() { "untitled".to_string() } else { slug }
}

/// `<date>-<slug>-<id>.md`; the id suffix keeps names unique and findable.
pub fn file_name(post: &Post) -> String {
    let date = post
        .date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(FALLBACK_DATE);
    format!("{}-{}-{}.md", date, slugify(&post.title), post.id)
}

/// Recover the post id from a generated file name.
pub fn id_from_file_name(name: &str) -> Option<i64> {
    ID_SUFFIX
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
