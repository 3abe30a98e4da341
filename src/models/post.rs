//! Post record and the input shapes used to create, patch and filter it.

use crate::errors::{AppError, AppResult};
use crate::utils::date;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Placeholder stored when a location component is not known.
pub const UNKNOWN: &str = "Unknown";

/// True when a location component carries no real information.
pub fn is_unknown(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => {
            let v = v.trim();
            v.is_empty() || v.eq_ignore_ascii_case(UNKNOWN)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub hash: String,
    pub title: String,
    pub date: Option<String>,
    pub city: String,
    pub country: String,
    pub continent: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cafe_name: Option<String>,
    pub rating: Option<i64>,
    pub notes: Option<String>,
    pub images: Vec<String>,
    pub instagram_url: Option<String>,
    pub published: bool,
    pub created_at: String,
    pub updated_at: String,
    pub original_filename: Option<String>,
    pub metadata: Map<String, Value>,
}

impl Post {
    /// Both coordinates present, finite and inside the WGS84 range.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if valid_latitude(lat) && valid_longitude(lon) => {
                Some((lat, lon))
            }
            _ => None,
        }
    }
}

/// Input for a new record (API create, importer output).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPost {
    pub title: String,
    pub date: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub continent: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cafe_name: Option<String>,
    pub rating: Option<i64>,
    pub notes: Option<String>,
    pub images: Vec<String>,
    pub instagram_url: Option<String>,
    pub published: bool,
    pub original_filename: Option<String>,
    pub metadata: Map<String, Value>,
}

impl Default for NewPost {
    fn default() -> Self {
        Self {
            title: String::new(),
            date: String::new(),
            city: None,
            country: None,
            continent: None,
            latitude: None,
            longitude: None,
            cafe_name: None,
            rating: None,
            notes: None,
            images: Vec::new(),
            instagram_url: None,
            published: true,
            original_filename: None,
            metadata: Map::new(),
        }
    }
}

impl NewPost {
    /// Reject records missing the required fields or carrying out-of-range values.
    pub fn validate(&self) -> AppResult<()> {
        validate_title(&self.title)?;
        validate_date(&self.date)?;
        validate_optional_ranges(self.rating, self.latitude, self.longitude)
    }

    /// Location components resolved to their stored form ("Unknown" when missing).
    pub fn city_or_unknown(&self) -> String {
        or_unknown(self.city.as_deref())
    }

    pub fn country_or_unknown(&self) -> String {
        or_unknown(self.country.as_deref())
    }

    pub fn continent_or_unknown(&self) -> String {
        or_unknown(self.continent.as_deref())
    }
}

fn or_unknown(value: Option<&str>) -> String {
    if is_unknown(value) {
        UNKNOWN.to_string()
    } else {
        value.unwrap_or(UNKNOWN).trim().to_string()
    }
}

/// Partial update. Nullable columns use `Option<Option<_>>` so that an
/// explicit `null` clears the value while an absent key leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub continent: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub longitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cafe_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub rating: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub instagram_url: Option<Option<String>>,
    #[serde(default)]
    pub published: Option<bool>,
}

fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        *self == PostPatch::default()
    }

    /// Names of the fields this patch touches, in declaration order.
    /// Nullable fields set to null are reported as `<name> cleared`.
    pub fn changed_fields(&self) -> Vec<String> {
        fn set<T>(out: &mut Vec<String>, name: &str, field: &Option<T>) {
            if field.is_some() {
                out.push(name.to_string());
            }
        }
        fn nullable<T>(out: &mut Vec<String>, name: &str, field: &Option<Option<T>>) {
            match field {
                Some(Some(_)) => out.push(name.to_string()),
                Some(None) => out.push(format!("{name} cleared")),
                None => {}
            }
        }

        let mut out = Vec::new();
        set(&mut out, "title", &self.title);
        set(&mut out, "date", &self.date);
        set(&mut out, "city", &self.city);
        set(&mut out, "country", &self.country);
        set(&mut out, "continent", &self.continent);
        nullable(&mut out, "latitude", &self.latitude);
        nullable(&mut out, "longitude", &self.longitude);
        nullable(&mut out, "cafe_name", &self.cafe_name);
        nullable(&mut out, "rating", &self.rating);
        nullable(&mut out, "notes", &self.notes);
        set(&mut out, "images", &self.images);
        nullable(&mut out, "instagram_url", &self.instagram_url);
        set(&mut out, "published", &self.published);
        out
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.is_empty() {
            return Err(AppError::InvalidInput("no fields to update".into()));
        }
        if let Some(t) = &self.title {
            validate_title(t)?;
        }
        if let Some(d) = &self.date {
            validate_date(d)?;
        }
        validate_optional_ranges(
            self.rating.flatten(),
            self.latitude.flatten(),
            self.longitude.flatten(),
        )
    }
}

/// Exact-match filters for `list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFilter {
    pub published: Option<bool>,
    pub continent: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

/// Result of a store insert: a duplicate hash is a no-op carrying the existing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    Duplicate(i64),
}

impl InsertOutcome {
    pub fn id(&self) -> i64 {
        match self {
            InsertOutcome::Inserted(id) | InsertOutcome::Duplicate(id) => *id,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }

    pub fn action(&self) -> &'static str {
        match self {
            InsertOutcome::Inserted(_) => "inserted",
            InsertOutcome::Duplicate(_) => "duplicate",
        }
    }
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::InvalidInput("title is required".into()));
    }
    Ok(())
}

fn validate_date(d: &str) -> AppResult<()> {
    if d.trim().is_empty() {
        return Err(AppError::InvalidInput("date is required".into()));
    }
    date::parse_date(d.trim()).ok_or_else(|| AppError::InvalidDate(d.to_string()))?;
    Ok(())
}

fn validate_optional_ranges(
    rating: Option<i64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> AppResult<()> {
    if let Some(r) = rating
        && !(0..=5).contains(&r)
    {
        return Err(AppError::InvalidInput(format!("rating {r} outside 0..=5")));
    }
    if let Some(lat) = latitude
        && !valid_latitude(lat)
    {
        return Err(AppError::InvalidInput(format!("latitude {lat} outside [-90, 90]")));
    }
    if let Some(lon) = longitude
        && !valid_longitude(lon)
    {
        return Err(AppError::InvalidInput(format!("longitude {lon} outside [-180, 180]")));
    }
    Ok(())
}

pub fn valid_latitude(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

pub fn valid_longitude(lon: f64) -> bool {
    lon.is_finite() && (-180.0..=180.0).contains(&lon)
}
