use super::AppState;
use super::api_error::ApiError;
use super::blocking::with_store;
use super::query_types::{ListQuery, PublishRequest, SearchQuery};
use crate::core::ChangeResult;
use crate::core::add::AddLogic;
use crate::core::del::DeleteLogic;
use crate::core::edit::EditLogic;
use crate::core::regenerate::{RegenReport, Regenerator};
use crate::db::{queries, stats};
use crate::models::{NewPost, Post, PostFilter, PostPatch, PostStats};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;

type Shared = State<Arc<AppState>>;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

pub async fn list_posts(
    State(state): Shared,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let filter = PostFilter::from(query);
    with_store(&state, move |pool, _| queries::list_posts(&pool.conn, &filter))
        .await
        .map(Json)
}

pub async fn get_post(
    State(state): Shared,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Post>, ApiError> {
    let Path(id) = path?;
    with_store(&state, move |pool, _| queries::require_post(&pool.conn, id))
        .await
        .map(Json)
}

pub async fn create_post(
    State(state): Shared,
    payload: Result<Json<NewPost>, JsonRejection>,
) -> Result<(StatusCode, Json<ChangeResult>), ApiError> {
    let Json(post) = payload?;

    let result = with_store(&state, move |pool, cfg| {
        let regen = Regenerator::from_config(cfg);
        AddLogic::apply(&pool.conn, Some(&regen), &post)
    })
    .await?;

    let status = if result.action == "inserted" {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(result)))
}

pub async fn update_post(
    State(state): Shared,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PostPatch>, JsonRejection>,
) -> Result<Json<ChangeResult>, ApiError> {
    let Path(id) = path?;
    let Json(patch) = payload?;

    with_store(&state, move |pool, cfg| {
        let regen = Regenerator::from_config(cfg);
        EditLogic::apply(&pool.conn, Some(&regen), id, &patch)
    })
    .await
    .map(Json)
}

pub async fn set_published(
    State(state): Shared,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PublishRequest>, JsonRejection>,
) -> Result<Json<ChangeResult>, ApiError> {
    let Path(id) = path?;
    let Json(req) = payload?;

    with_store(&state, move |pool, cfg| {
        let regen = Regenerator::from_config(cfg);
        EditLogic::publish(&pool.conn, Some(&regen), id, req.published)
    })
    .await
    .map(Json)
}

pub async fn delete_post(
    State(state): Shared,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = path?;
    let result = with_store(&state, move |pool, cfg| {
        let regen = Regenerator::from_config(cfg);
        DeleteLogic::apply(&pool.conn, Some(&regen), id)
    })
    .await?;

    Ok(Json(json!({
        "success": true,
        "id": result.id,
        "file": result.file,
    })))
}

pub async fn get_stats(State(state): Shared) -> Result<Json<PostStats>, ApiError> {
    with_store(&state, |pool, _| stats::post_stats(&pool.conn))
        .await
        .map(Json)
}

pub async fn search(
    State(state): Shared,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Post>>, ApiError> {
    with_store(&state, move |pool, _| queries::search_posts(&pool.conn, &query.q))
        .await
        .map(Json)
}

pub async fn regenerate(State(state): Shared) -> Result<Json<RegenReport>, ApiError> {
    with_store(&state, |pool, cfg| {
        Regenerator::from_config(cfg).regenerate_all(&pool.conn)
    })
    .await
    .map(Json)
}
