//! Request bodies and query strings (Deserialize).

use crate::models::PostFilter;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub published: Option<bool>,
    pub continent: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl From<ListQuery> for PostFilter {
    fn from(q: ListQuery) -> Self {
        PostFilter {
            published: q.published,
            continent: q.continent,
            country: q.country,
            city: q.city,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub published: bool,
}
