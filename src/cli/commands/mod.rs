pub mod add;
pub mod backup;
pub mod config;
pub mod db;
pub mod dedup;
pub mod del;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod log;
pub mod publish;
pub mod regenerate;
pub mod search;
pub mod serve;
pub mod show;
pub mod stats;
pub mod tiles;

use crate::config::Config;
use crate::core::regenerate::Regenerator;
use crate::db::DbPool;
use crate::errors::AppResult;

/// Open the configured database with the schema brought up to date.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    DbPool::open(&cfg.database)
}

/// Page writer for single-post commands; `None` when `--no-regen` was given.
pub(crate) fn regenerator(cfg: &Config, no_regen: bool) -> Option<Regenerator> {
    (!no_regen).then(|| Regenerator::from_config(cfg))
}
