//! Runs store work off the async runtime, one request at a time.

use super::AppState;
use super::api_error::ApiError;
use crate::config::Config;
use crate::db::DbPool;
use crate::errors::AppResult;
use std::sync::Arc;
use tokio::task::spawn_blocking;

/// Lock the store, run `f` on a blocking thread and map its error.
pub async fn with_store<T, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&DbPool, &Config) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    spawn_blocking(move || {
        let pool = state
            .pool
            .lock()
            .map_err(|_| ApiError::Internal("store lock poisoned".into()))?;
        f(&pool, &state.cfg).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("join error: {e}")))?
}
