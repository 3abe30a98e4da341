//! Shapes of the Instagram data export (`posts_1.json`).

use serde::Deserialize;

/// The export is either a bare array or an object wrapping a `posts` array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InstagramExport {
    List(Vec<InstagramPost>),
    Wrapped { posts: Vec<InstagramPost> },
}

impl InstagramExport {
    pub fn into_posts(self) -> Vec<InstagramPost> {
        match self {
            InstagramExport::List(p) => p,
            InstagramExport::Wrapped { posts } => posts,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InstagramPost {
    pub title: Option<String>,
    pub creation_timestamp: Option<i64>,
    pub media: Vec<InstagramMedia>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InstagramMedia {
    pub uri: String,
    pub title: Option<String>,
    pub creation_timestamp: Option<i64>,
}

impl InstagramPost {
    /// Single-media posts carry their caption on the media item only.
    pub fn caption(&self) -> Option<&str> {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                self.media
                    .iter()
                    .filter_map(|m| m.title.as_deref())
                    .find(|t| !t.trim().is_empty())
            })
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.creation_timestamp
            .or_else(|| self.media.iter().find_map(|m| m.creation_timestamp))
    }
}
