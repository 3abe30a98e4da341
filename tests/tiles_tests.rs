mod common;

use coffeetour::core::tiles::{
    Bounds, GroupLevel, PrefetchSettings, TileCoord, group_posts, plan, tile_for, tile_url,
    tiles_in_bounds,
};
use coffeetour::db::queries;
use coffeetour::models::{NewPost, Post};
use common::{Workspace, bare_post, sample_post};
use std::collections::HashSet;

fn at(z: u8, x: u32, y: u32) -> TileCoord {
    TileCoord { z, x, y }
}

#[test]
fn tile_for_known_coordinates() {
    assert_eq!(tile_for(52.52, 13.405, 10), at(10, 550, 335));
    assert_eq!(tile_for(51.5074, -0.1278, 12), at(12, 2046, 1362));
    assert_eq!(tile_for(38.7223, -9.1393, 11), at(11, 972, 784));
    assert_eq!(tile_for(-33.8688, 151.2093, 8), at(8, 235, 153));
    assert_eq!(tile_for(35.0116, 135.7681, 13), at(13, 7185, 3244));
    assert_eq!(tile_for(0.0, 0.0, 0), at(0, 0, 0));
    assert_eq!(tile_for(0.0, 0.0, 1), at(1, 1, 1));
}

#[test]
fn tile_for_clamps_at_the_edges() {
    assert_eq!(tile_for(90.0, 180.0, 3), at(3, 7, 0));
    assert_eq!(tile_for(-90.0, -180.0, 3), at(3, 0, 7));
}

#[test]
fn padding_has_a_floor_and_stays_on_the_globe() {
    let single = Bounds::from_points(&[(10.0, 20.0)]).unwrap().padded(0.1);
    assert!((single.max_lat - 10.01).abs() < 1e-9);
    assert!((single.min_lon - 19.99).abs() < 1e-9);

    let wide = Bounds::from_points(&[(-89.0, -179.0), (89.0, 179.0)])
        .unwrap()
        .padded(0.5);
    assert_eq!(wide.min_lat, -90.0);
    assert_eq!(wide.max_lat, 90.0);
    assert_eq!(wide.min_lon, -180.0);
    assert_eq!(wide.max_lon, 180.0);

    assert!(Bounds::from_points(&[]).is_none());
}

#[test]
fn tiles_in_bounds_is_row_major_and_capped() {
    let bounds = Bounds {
        min_lat: 0.0,
        max_lat: 60.0,
        min_lon: 0.0,
        max_lon: 100.0,
    };

    let all = tiles_in_bounds(&bounds, 2, 100);
    assert_eq!(all.first(), Some(&at(2, 2, 1)));
    assert_eq!(all.len(), 4);
    assert!(all.windows(2).all(|w| (w[0].y, w[0].x) < (w[1].y, w[1].x)));

    let capped = tiles_in_bounds(&bounds, 2, 2);
    assert_eq!(capped, all[..2].to_vec());
}

#[test]
fn tile_url_rotates_subdomains() {
    let subs: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
    let template = "https://{s}.tile.example.org/{z}/{x}/{y}.png";

    assert_eq!(
        tile_url(template, &subs, 0, at(10, 550, 335)),
        "https://a.tile.example.org/10/550/335.png"
    );
    assert_eq!(
        tile_url(template, &subs, 4, at(1, 0, 1)),
        "https://b.tile.example.org/1/0/1.png"
    );
    assert_eq!(
        tile_url("http://localhost/{z}/{x}/{y}", &[], 7, at(3, 1, 2)),
        "http://localhost/3/1/2"
    );
}

fn stored(posts: &[NewPost]) -> Vec<Post> {
    let ws = Workspace::new();
    let pool = ws.open();
    for p in posts {
        queries::insert_post(&pool.conn, p).unwrap();
    }
    queries::all_posts(&pool.conn).unwrap()
}

fn located(title: &str, city: &str, country: &str, continent: &str, lat: f64, lon: f64) -> NewPost {
    NewPost {
        city: Some(city.into()),
        country: Some(country.into()),
        continent: Some(continent.into()),
        latitude: Some(lat),
        longitude: Some(lon),
        notes: None,
        ..sample_post(title, "2024-03-01")
    }
}

#[test]
fn groups_skip_unknown_drafts_and_small_groups() {
    let posts = stored(&[
        located("One", "Lisbon", "Portugal", "Europe", 38.72, -9.14),
        located("Two", "Lisbon", "Portugal", "Europe", 38.71, -9.13),
        located("Three", "Porto", "Portugal", "Europe", 41.15, -8.63),
        located("Four", "Tokyo", "Japan", "Asia", 35.68, 139.69),
        NewPost {
            published: false,
            ..located("Draft", "Kyoto", "Japan", "Asia", 35.01, 135.77)
        },
        NewPost {
            latitude: Some(1.0),
            longitude: Some(1.0),
            ..bare_post("Nowhere", "2024-03-02")
        },
    ]);

    let groups = group_posts(&posts, 2);
    let keys: Vec<(GroupLevel, &str, usize)> = groups
        .iter()
        .map(|g| (g.level, g.name.as_str(), g.count))
        .collect();

    assert_eq!(
        keys,
        vec![
            (GroupLevel::Continent, "Europe", 3),
            (GroupLevel::Country, "Portugal", 3),
            (GroupLevel::City, "Lisbon, Portugal", 2),
        ]
    );

    let everything = group_posts(&posts, 1);
    assert!(everything.iter().any(|g| g.name == "Tokyo, Japan"));
    assert!(everything.iter().all(|g| g.name != "Kyoto, Japan"));
    assert!(everything.iter().all(|g| !g.name.contains("Unknown")));
}

#[test]
fn plan_has_no_repeats_and_ascending_zooms_per_group() {
    let posts = stored(&[
        located("One", "Lisbon", "Portugal", "Europe", 38.72, -9.14),
        located("Two", "Berlin", "Germany", "Europe", 52.52, 13.40),
        located("Three", "Tokyo", "Japan", "Asia", 35.68, 139.69),
    ]);
    let settings = PrefetchSettings {
        url_template: "http://tiles.test/{z}/{x}/{y}.png".into(),
        subdomains: Vec::new(),
        delay_ms: 0,
        max_per_zoom: 4,
        min_group_size: 1,
        padding: 0.1,
        user_agent: "coffeetour-tests".into(),
    };

    let planned = plan(&posts, &settings);
    assert!(!planned.is_empty());

    let unique: HashSet<TileCoord> = planned.iter().map(|t| t.coord).collect();
    assert_eq!(unique.len(), planned.len());

    for t in &planned {
        assert!(t.level.zooms().contains(&t.coord.z));
        assert_eq!(
            t.url,
            format!("http://tiles.test/{}/{}/{}.png", t.coord.z, t.coord.x, t.coord.y)
        );
    }

    let mut last: Option<(&str, u8)> = None;
    for t in &planned {
        if let Some((group, zoom)) = last
            && group == t.group
        {
            assert!(t.coord.z >= zoom);
        }
        last = Some((t.group.as_str(), t.coord.z));
    }

    let per_zoom = planned
        .iter()
        .filter(|t| t.group == "Europe" && t.coord.z == 4)
        .count();
    assert!(per_zoom <= 4);
}
