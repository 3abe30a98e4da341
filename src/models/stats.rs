use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate counts over the post table.
/// Country/city/continent figures never include the "Unknown" placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostStats {
    pub total: i64,
    pub published: i64,
    pub unpublished: i64,
    pub countries: i64,
    pub cities: i64,
    pub by_continent: BTreeMap<String, i64>,
    pub with_images: i64,
    pub with_ratings: i64,
    pub with_location: i64,
    pub with_cafe_names: i64,
}
