//! Local admin API over the post store.

pub mod api_error;
mod blocking;
mod handlers;
mod query_types;

use crate::config::Config;
use crate::db::DbPool;
use crate::errors::AppResult;
use axum::Router;
use axum::routing::{get, post};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Requests share one connection; the mutex serializes them.
pub struct AppState {
    pub pool: Mutex<DbPool>,
    pub cfg: Config,
}

impl AppState {
    pub fn new(pool: DbPool, cfg: Config) -> Arc<Self> {
        Arc::new(Self {
            pool: Mutex::new(pool),
            cfg,
        })
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/posts", get(handlers::list_posts).post(handlers::create_post))
        .route(
            "/api/posts/{id}",
            get(handlers::get_post).put(handlers::set_published),
        )
        .route("/api/posts/{id}/update", post(handlers::update_post))
        .route("/api/posts/{id}/delete", post(handlers::delete_post))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/search", get(handlers::search))
        .route("/api/regenerate", post(handlers::regenerate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> AppResult<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "admin API listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
