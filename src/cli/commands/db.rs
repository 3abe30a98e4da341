use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::audit_quiet;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::queries::count_posts;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{info as note, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;

    if *migrate {
        note("Applying pending schema migrations…");
        run_pending_migrations(&pool.conn)?;
        success(format!("Schema is current ({} post(s) stored).", count_posts(&pool.conn)?));
    }

    if *info {
        stats::print_db_info(&mut pool, &cfg.database)?;
    }

    if *check {
        note("Running PRAGMA integrity_check…");
        let integrity: String = pool
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

        if integrity == "ok" {
            success("Post store integrity check passed.");
        } else {
            warning(format!("Integrity check reported problems: {integrity}"));
        }
    }

    if *vacuum {
        note("Compacting the post store…");
        pool.conn.execute_batch("VACUUM;")?;
        audit_quiet(&pool.conn, "vacuum", "database", "VACUUM completed");
        success("Vacuum completed.");
    }

    Ok(())
}
