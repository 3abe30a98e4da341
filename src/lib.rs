//! coffeetour library root.
//! Exposes the CLI parser, the high-level `run()` function and the
//! post store, regeneration, import, HTTP and tile modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod http;
pub mod models;
pub mod site;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let cmd = &cli.command;
    match cmd {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(cmd, cfg),
        Commands::Db { .. } => commands::db::handle(cmd, cfg),
        Commands::Log { .. } => commands::log::handle(cmd, cfg),
        Commands::Import { .. } => commands::import::handle(cmd, cfg),
        Commands::List { .. } => commands::list::handle(cmd, cfg),
        Commands::Show { .. } => commands::show::handle(cmd, cfg),
        Commands::Add { .. } => commands::add::handle(cmd, cfg),
        Commands::Edit { .. } => commands::edit::handle(cmd, cfg),
        Commands::Del { .. } => commands::del::handle(cmd, cfg),
        Commands::Dedup { .. } => commands::dedup::handle(cmd, cfg),
        Commands::Publish { .. } => commands::publish::handle(cmd, cfg),
        Commands::Search { .. } => commands::search::handle(cmd, cfg),
        Commands::Stats { .. } => commands::stats::handle(cmd, cfg),
        Commands::Regenerate { .. } => commands::regenerate::handle(cmd, cfg),
        Commands::Backup { .. } => commands::backup::handle(cmd, cfg),
        Commands::Export { .. } => commands::export::handle(cmd, cfg),
        Commands::Serve { .. } => commands::serve::handle(cmd, cfg),
        Commands::Tiles { .. } => commands::tiles::handle(cmd, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Load config once, then apply command-line overrides.
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(dir) = &cli.posts_dir {
        cfg.posts_dir = dir.clone();
    }

    tracing::debug!(database = %cfg.database, posts_dir = %cfg.posts_dir, "configuration loaded");
    dispatch(&cli, &cfg)
}
