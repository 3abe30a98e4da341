//! Slippy-map tile math and the prefetch plan built from post locations.

use crate::config::Config;
use crate::models::Post;
use crate::models::post::is_unknown;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::f64::consts::PI;

/// Latitude limit of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Minimum padding, in degrees, added around a bounding box.
const MIN_PADDING_DEG: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// Tile containing (`lat`, `lon`) at `zoom`, clamped to the valid index range.
pub fn tile_for(lat: f64, lon: f64, zoom: u8) -> TileCoord {
    let n = 2f64.powi(i32::from(zoom));
    let max_index = n - 1.0;

    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let lon = lon.clamp(-180.0, 180.0);
    let lat_rad = lat.to_radians();

    let x = ((lon + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();

    TileCoord {
        z: zoom,
        x: x.clamp(0.0, max_index) as u32,
        y: y.clamp(0.0, max_index) as u32,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupLevel {
    Continent,
    Country,
    City,
}

impl GroupLevel {
    pub fn zooms(self) -> &'static [u8] {
        match self {
            GroupLevel::Continent => &[3, 4],
            GroupLevel::Country => &[5, 6, 7],
            GroupLevel::City => &[11, 12, 13],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupLevel::Continent => "continent",
            GroupLevel::Country => "country",
            GroupLevel::City => "city",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let (&(lat0, lon0), rest) = points.split_first()?;
        let mut b = Bounds {
            min_lat: lat0,
            max_lat: lat0,
            min_lon: lon0,
            max_lon: lon0,
        };
        for &(lat, lon) in rest {
            b.min_lat = b.min_lat.min(lat);
            b.max_lat = b.max_lat.max(lat);
            b.min_lon = b.min_lon.min(lon);
            b.max_lon = b.max_lon.max(lon);
        }
        Some(b)
    }

    /// Grow each side by `fraction` of the span, never less than 0.01°.
    pub fn padded(&self, fraction: f64) -> Self {
        let pad_lat = ((self.max_lat - self.min_lat) * fraction).max(MIN_PADDING_DEG);
        let pad_lon = ((self.max_lon - self.min_lon) * fraction).max(MIN_PADDING_DEG);
        Bounds {
            min_lat: (self.min_lat - pad_lat).max(-90.0),
            max_lat: (self.max_lat + pad_lat).min(90.0),
            min_lon: (self.min_lon - pad_lon).max(-180.0),
            max_lon: (self.max_lon + pad_lon).min(180.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileGroup {
    pub level: GroupLevel,
    pub name: String,
    pub count: usize,
    pub bounds: Bounds,
}

#[derive(Debug, Clone)]
pub struct PrefetchSettings {
    pub url_template: String,
    pub subdomains: Vec<String>,
    pub delay_ms: u64,
    pub max_per_zoom: usize,
    pub min_group_size: usize,
    pub padding: f64,
    pub user_agent: String,
}

impl PrefetchSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            url_template: cfg.tile_url_template.clone(),
            subdomains: cfg.tile_subdomains.clone(),
            delay_ms: cfg.tile_delay_ms,
            max_per_zoom: cfg.tile_max_per_zoom,
            min_group_size: cfg.tile_min_group_size,
            padding: cfg.tile_padding,
            user_agent: cfg.tile_user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedTile {
    pub level: GroupLevel,
    pub group: String,
    pub coord: TileCoord,
    pub url: String,
}

/// Published posts with usable coordinates, grouped by continent, country
/// and city. Unknown names and groups smaller than `min_group_size` are
/// dropped. Ordered by level, then name.
pub fn group_posts(posts: &[Post], min_group_size: usize) -> Vec<TileGroup> {
    let mut groups: BTreeMap<(GroupLevel, String), Vec<(f64, f64)>> = BTreeMap::new();

    for post in posts.iter().filter(|p| p.published) {
        let Some(point) = post.coordinates() else { continue };

        if !is_unknown(Some(&post.continent)) {
            groups
                .entry((GroupLevel::Continent, post.continent.clone()))
                .or_default()
                .push(point);
        }
        if !is_unknown(Some(&post.country)) {
            groups
                .entry((GroupLevel::Country, post.country.clone()))
                .or_default()
                .push(point);

            // A city is only meaningful together with its country.
            if !is_unknown(Some(&post.city)) {
                groups
                    .entry((GroupLevel::City, format!("{}, {}", post.city, post.country)))
                    .or_default()
                    .push(point);
            }
        }
    }

    groups
        .into_iter()
        .filter(|(_, points)| points.len() >= min_group_size.max(1))
        .filter_map(|((level, name), points)| {
            Bounds::from_points(&points).map(|bounds| TileGroup {
                level,
                name,
                count: points.len(),
                bounds,
            })
        })
        .collect()
}

/// Tiles covering `bounds` at `zoom`, row by row from the north-west
/// corner, at most `cap` of them.
pub fn tiles_in_bounds(bounds: &Bounds, zoom: u8, cap: usize) -> Vec<TileCoord> {
    let top_left = tile_for(bounds.max_lat, bounds.min_lon, zoom);
    let bottom_right = tile_for(bounds.min_lat, bounds.max_lon, zoom);

    let mut out = Vec::new();
    'rows: for y in top_left.y..=bottom_right.y {
        for x in top_left.x..=bottom_right.x {
            if out.len() >= cap {
                break 'rows;
            }
            out.push(TileCoord { z: zoom, x, y });
        }
    }
    out
}

/// Fill the URL template; `{s}` takes the `index`-th subdomain, round-robin.
pub fn tile_url(template: &str, subdomains: &[String], index: usize, coord: TileCoord) -> String {
    let sub = if subdomains.is_empty() {
        ""
    } else {
        subdomains[index % subdomains.len()].as_str()
    };

    template
        .replace("{s}", sub)
        .replace("{z}", &coord.z.to_string())
        .replace("{x}", &coord.x.to_string())
        .replace("{y}", &coord.y.to_string())
}

/// Every tile to request, group by group and zoom-ascending.
/// A tile already planned for an earlier group is not repeated.
pub fn plan(posts: &[Post], settings: &PrefetchSettings) -> Vec<PlannedTile> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for group in group_posts(posts, settings.min_group_size) {
        let bounds = group.bounds.padded(settings.padding);

        for &zoom in group.level.zooms() {
            for coord in tiles_in_bounds(&bounds, zoom, settings.max_per_zoom) {
                if !seen.insert(coord) {
                    continue;
                }
                let url = tile_url(&settings.url_template, &settings.subdomains, out.len(), coord);
                out.push(PlannedTile {
                    level: group.level,
                    group: group.name.clone(),
                    coord,
                    url,
                });
            }
        }
    }
    out
}
