//! YAML front matter for generated post pages, and the reverse mapping used
//! when a posts directory is imported.

use crate::errors::{AppError, AppResult};
use crate::models::{NewPost, Post};
use crate::utils::date::leading_date;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use serde_yaml::{Mapping, Value as YamlValue};

const DELIMITER: &str = "---";

/// Keys that are never carried into `metadata` on import.
const GENERATED_KEYS: &[&str] = &["layout", "post_id"];

#[derive(Debug, Serialize)]
struct FrontMatter<'a> {
    layout: &'static str,
    post_id: i64,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<&'a str>,
    city: &'a str,
    country: &'a str,
    continent: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cafe_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
    #[serde(skip_serializing_if = "no_images")]
    images: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    instagram_url: Option<&'a str>,
    published: bool,
}

fn no_images(images: &&[String]) -> bool {
    images.is_empty()
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.trim().is_empty())
}

/// Full page text for one post: front matter block and an empty body.
pub fn render(post: &Post) -> AppResult<String> {
    let fm = FrontMatter {
        layout: "post",
        post_id: post.id,
        title: &post.title,
        date: non_blank(post.date.as_deref()),
        city: &post.city,
        country: &post.country,
        continent: &post.continent,
        latitude: post.latitude,
        longitude: post.longitude,
        cafe_name: non_blank(post.cafe_name.as_deref()),
        rating: post.rating,
        notes: non_blank(post.notes.as_deref()),
        images: &post.images,
        instagram_url: non_blank(post.instagram_url.as_deref()),
        published: post.published,
    };

    let yaml = serde_yaml::to_string(&fm)?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n"))
}

/// Split a page into its front matter mapping and body.
pub fn split(content: &str) -> AppResult<(Mapping, String)> {
    let content = content.trim_start_matches('\u{feff}');
    let mut lines = content.split_inclusive('\n');

    match lines.next() {
        Some(first) if first.trim_end() == DELIMITER => {}
        _ => return Err(AppError::InvalidInput("missing front matter".into())),
    }

    let mut yaml = String::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if line.trim_end() == DELIMITER {
            closed = true;
            break;
        }
        yaml.push_str(line);
    }
    if !closed {
        return Err(AppError::InvalidInput("unterminated front matter".into()));
    }

    let body: String = lines.collect();
    let mapping = if yaml.trim().is_empty() {
        Mapping::new()
    } else {
        serde_yaml::from_str::<Mapping>(&yaml)?
    };
    Ok((mapping, body))
}

/// The `post_id` a generated page was written for, if it carries one.
pub fn post_id(content: &str) -> Option<i64> {
    let (mapping, _) = split(content).ok()?;
    mapping.get("post_id").and_then(as_i64)
}

fn as_string(v: &YamlValue) -> Option<String> {
    match v {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
}

fn as_f64(v: &YamlValue) -> Option<f64> {
    match v {
        YamlValue::Number(n) => n.as_f64(),
        YamlValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_i64(v: &YamlValue) -> Option<i64> {
    match v {
        YamlValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        YamlValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_bool(v: &YamlValue) -> Option<bool> {
    match v {
        YamlValue::Bool(b) => Some(*b),
        YamlValue::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_string_list(v: &YamlValue) -> Vec<String> {
    match v {
        YamlValue::Sequence(seq) => seq.iter().filter_map(as_string).collect(),
        other => as_string(other).into_iter().collect(),
    }
}

/// Map a front matter block onto a new record.
///
/// `image_url` is folded into the front of `images`; keys that are not
/// post fields end up in `metadata`.
pub fn to_new_post(mapping: &Mapping) -> AppResult<NewPost> {
    let mut post = NewPost::default();
    let mut image_url: Option<String> = None;
    let mut metadata = Map::new();

    for (key, value) in mapping {
        let Some(key) = key.as_str() else { continue };

        match key {
            "title" => post.title = as_string(value).unwrap_or_default(),
            "date" => {
                let raw = as_string(value).unwrap_or_default();
                post.date = leading_date(&raw).unwrap_or(raw);
            }
            "city" => post.city = as_string(value),
            "country" => post.country = as_string(value),
            "continent" => post.continent = as_string(value),
            "latitude" => post.latitude = as_f64(value),
            "longitude" => post.longitude = as_f64(value),
            "cafe_name" => post.cafe_name = as_string(value),
            "rating" => post.rating = as_i64(value),
            "notes" => post.notes = as_string(value),
            "images" => post.images = as_string_list(value),
            "image_url" => image_url = as_string(value),
            "instagram_url" => post.instagram_url = as_string(value),
            "published" => post.published = as_bool(value).unwrap_or(true),
            k if GENERATED_KEYS.contains(&k) => {}
            other => {
                let json: JsonValue = serde_json::to_value(value)?;
                metadata.insert(other.to_string(), json);
            }
        }
    }

    if let Some(url) = image_url
        && !post.images.contains(&url)
    {
        post.images.insert(0, url);
    }
    post.metadata = metadata;

    Ok(post)
}
