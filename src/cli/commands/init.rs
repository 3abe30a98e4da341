use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::DbPool;
use crate::db::initialize::init_db;
use crate::db::log::audit_quiet;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let mut cfg = Config::init_all(cli.db.clone(), cli.test)?;
    if let Some(dir) = &cli.posts_dir {
        cfg.posts_dir = dir.clone();
    }

    println!("⚙️  Initializing coffeetour…");
    println!("🗄️  Database    : {}", cfg.database);
    println!("📝 Posts dir   : {}", cfg.posts_dir);

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    audit_quiet(
        &pool.conn,
        "init",
        "database",
        &format!("Database initialized at {}", cfg.database),
    );

    success(format!("Database initialized at {}", cfg.database));
    Ok(())
}
