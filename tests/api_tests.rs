mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use coffeetour::config::Config;
use coffeetour::core::prefetch::TileFetcher;
use coffeetour::core::tiles::{GroupLevel, PlannedTile, PrefetchSettings, TileCoord};
use coffeetour::http::{AppState, create_router};
use common::{Workspace, snapshot};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(ws: &Workspace) -> Router {
    let cfg = Config {
        database: ws.db(),
        posts_dir: ws.posts_dir_str(),
        backup_before_regenerate: false,
        ..Config::default()
    };
    create_router(AppState::new(ws.open(), cfg))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn flat_white() -> Value {
    json!({
        "title": "Flat white in Lisbon",
        "date": "2024-03-01",
        "city": "Lisbon",
        "country": "Portugal",
        "continent": "Europe",
        "latitude": 38.7223,
        "longitude": -9.1393,
        "cafe_name": "Fabrica",
        "rating": 4,
        "notes": "Beans roasted in house",
        "images": ["/assets/images/posts/a.jpg"]
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let ws = Workspace::new();
    let app = app(&ws);

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_then_duplicate() {
    let ws = Workspace::new();
    let app = app(&ws);

    let (status, body) = send(&app, "POST", "/api/posts", Some(flat_white())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["action"], "inserted");
    let id = body["id"].as_i64().unwrap();
    assert!(body["file"].as_str().unwrap().ends_with(&format!("-{id}.md")));
    assert_eq!(snapshot(&ws.posts_dir()).len(), 1);

    let (status, body) = send(&app, "POST", "/api/posts", Some(flat_white())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "duplicate");
    assert_eq!(body["id"], id);

    let (status, body) = send(&app, "GET", &format!("/api/posts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Flat white in Lisbon");
    assert_eq!(body["cafe_name"], "Fabrica");
    assert_eq!(body["published"], true);
}

#[tokio::test]
async fn malformed_input_is_a_bad_request() {
    let ws = Workspace::new();
    let app = app(&ws);

    let (status, body) =
        send(&app, "POST", "/api/posts", Some(json!({ "date": "2024-03-01" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/api/posts",
        Some(json!({ "title": "Bad date", "date": "2024-02-31" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/api/posts")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let ws = Workspace::new();
    let app = app(&ws);

    let (status, body) = send(&app, "GET", "/api/posts/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("999"));

    let (status, _) = send(&app, "POST", "/api/posts/999/update", Some(json!({ "rating": 3 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/api/posts/999/delete", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_ids_are_bad_requests() {
    let ws = Workspace::new();
    let app = app(&ws);

    let (status, body) = send(&app, "GET", "/api/posts/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "POST", "/api/posts/abc/update", Some(json!({ "rating": 3 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "POST", "/api/posts/1.5/delete", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn update_and_publish() {
    let ws = Workspace::new();
    let app = app(&ws);
    let (_, created) = send(&app, "POST", "/api/posts", Some(flat_white())).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/posts/{id}/update"),
        Some(json!({ "rating": 5, "cafe_name": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "updated");

    let (_, post) = send(&app, "GET", &format!("/api/posts/{id}"), None).await;
    assert_eq!(post["rating"], 5);
    assert!(post["cafe_name"].is_null());
    assert_eq!(post["city"], "Lisbon");

    let (status, _) = send(&app, "POST", &format!("/api/posts/{id}/update"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/posts/{id}"),
        Some(json!({ "published": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "unpublished");

    let (_, drafts) = send(&app, "GET", "/api/posts?published=false", None).await;
    assert_eq!(drafts.as_array().unwrap().len(), 1);
    let (_, live) = send(&app, "GET", "/api/posts?published=true", None).await;
    assert!(live.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_search_and_stats() {
    let ws = Workspace::new();
    let app = app(&ws);
    send(&app, "POST", "/api/posts", Some(flat_white())).await;
    send(
        &app,
        "POST",
        "/api/posts",
        Some(json!({ "title": "Matcha in Kyoto", "date": "2024-04-02", "city": "Kyoto", "country": "Japan", "continent": "Asia" })),
    )
    .await;

    let (_, all) = send(&app, "GET", "/api/posts", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, japan) = send(&app, "GET", "/api/posts?country=Japan", None).await;
    assert_eq!(japan.as_array().unwrap().len(), 1);
    assert_eq!(japan[0]["city"], "Kyoto");

    let (status, found) = send(&app, "GET", "/api/search?q=fabrica", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (status, empty) = send(&app, "GET", "/api/search", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(empty.as_array().unwrap().is_empty());

    let (status, stats) = send(&app, "GET", "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["countries"], 2);
    assert_eq!(stats["by_continent"]["Asia"], 1);
}

#[tokio::test]
async fn regenerate_and_delete() {
    let ws = Workspace::new();
    let app = app(&ws);
    let (_, created) = send(&app, "POST", "/api/posts", Some(flat_white())).await;
    let id = created["id"].as_i64().unwrap();

    let (status, report) = send(&app, "POST", "/api/regenerate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["written"], 0);
    assert_eq!(report["unchanged"], 1);

    let (status, body) = send(&app, "POST", &format!("/api/posts/{id}/delete"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["id"], id);
    assert!(snapshot(&ws.posts_dir()).is_empty());

    let (status, _) = send(&app, "GET", &format!("/api/posts/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn prefetch_counts_failures_without_raising() {
    let tiles_app = Router::new().route("/tiles/{z}/{x}/{y}", get(|| async { "png-bytes" }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, tiles_app).await.unwrap();
    });

    let planned = |url: String, x: u32| PlannedTile {
        level: GroupLevel::City,
        group: "Lisbon, Portugal".into(),
        coord: TileCoord { z: 11, x, y: 784 },
        url,
    };
    let tiles = vec![
        planned(format!("http://{addr}/tiles/11/972/784.png"), 972),
        planned(format!("http://{addr}/missing/11/973/784.png"), 973),
        planned(format!("http://{addr}/tiles/11/974/784.png"), 974),
    ];

    let settings = PrefetchSettings {
        url_template: String::new(),
        subdomains: Vec::new(),
        delay_ms: 0,
        max_per_zoom: 10,
        min_group_size: 1,
        padding: 0.1,
        user_agent: "coffeetour-tests".into(),
    };
    let report = TileFetcher::new(&settings).unwrap().fetch_all(&tiles).await;

    assert_eq!(report.requested, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
}
