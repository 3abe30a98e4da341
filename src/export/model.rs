// src/export/model.rs

use crate::models::Post;
use serde::Serialize;

/// Separator between image URLs in a CSV cell.
pub(crate) const IMAGE_SEPARATOR: &str = " | ";

/// Flat row for CSV export: one scalar per column.
#[derive(Serialize, Clone, Debug)]
pub struct PostExport {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub city: String,
    pub country: String,
    pub continent: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cafe_name: String,
    pub rating: Option<i64>,
    pub notes: String,
    pub images: String,
    pub instagram_url: String,
    pub published: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Post> for PostExport {
    fn from(p: &Post) -> Self {
        Self {
            id: p.id,
            title: p.title.clone(),
            date: p.date.clone().unwrap_or_default(),
            city: p.city.clone(),
            country: p.country.clone(),
            continent: p.continent.clone(),
            latitude: p.latitude,
            longitude: p.longitude,
            cafe_name: p.cafe_name.clone().unwrap_or_default(),
            rating: p.rating,
            notes: p.notes.clone().unwrap_or_default(),
            images: p.images.join(IMAGE_SEPARATOR),
            instagram_url: p.instagram_url.clone().unwrap_or_default(),
            published: p.published,
            created_at: p.created_at.clone(),
            updated_at: p.updated_at.clone(),
        }
    }
}
