use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use rusqlite::{Connection, OptionalExtension};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the `posts` table with the current schema.
fn create_posts_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            hash              TEXT UNIQUE NOT NULL,
            title             TEXT,
            date              TEXT,
            city              TEXT,
            country           TEXT,
            continent         TEXT,
            latitude          REAL,
            longitude         REAL,
            cafe_name         TEXT,
            rating            INTEGER,
            notes             TEXT,
            images            TEXT,
            instagram_url     TEXT,
            published         BOOLEAN DEFAULT 1,
            created_at        TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at        TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            original_filename TEXT,
            metadata          TEXT
        );
        "#,
    )?;
    Ok(())
}

fn ensure_posts_indexes(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_posts_date      ON posts(date);
        CREATE INDEX IF NOT EXISTS idx_posts_continent ON posts(continent);
        CREATE INDEX IF NOT EXISTS idx_posts_country   ON posts(country);
        CREATE INDEX IF NOT EXISTS idx_posts_city      ON posts(city);
        CREATE INDEX IF NOT EXISTS idx_posts_published ON posts(published);
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Legacy `posts` tables predate the JSON `metadata` bag.
fn migrate_add_metadata_column(conn: &Connection) -> AppResult<()> {
    let version = "20250601_0002_add_posts_metadata";
    if is_applied(conn, version)? {
        return Ok(());
    }

    if !table_has_column(conn, "posts", "metadata")? {
        conn.execute("ALTER TABLE posts ADD COLUMN metadata TEXT;", [])
            .map_err(|e| AppError::Migration(format!("Failed to add 'metadata' column: {e}")))?;
        success("Migration applied: added 'metadata' to posts table");
    }

    mark_applied(conn, version, "Added metadata column to posts")
}

/// SQLite refuses non-constant defaults on ALTER TABLE, so backfill from created_at.
fn migrate_add_updated_at_column(conn: &Connection) -> AppResult<()> {
    let version = "20250601_0003_add_posts_updated_at";
    if is_applied(conn, version)? {
        return Ok(());
    }

    if !table_has_column(conn, "posts", "updated_at")? {
        conn.execute_batch(
            r#"
            BEGIN;
            ALTER TABLE posts ADD COLUMN updated_at TIMESTAMP;
            UPDATE posts SET updated_at = COALESCE(created_at, datetime('now'));
            COMMIT;
            "#,
        )
        .map_err(|e| AppError::Migration(format!("Failed to add 'updated_at' column: {e}")))?;
        success("Migration applied: added 'updated_at' to posts table");
    }

    mark_applied(conn, version, "Added updated_at column to posts")
}

fn migrate_add_original_filename_column(conn: &Connection) -> AppResult<()> {
    let version = "20250601_0004_add_posts_original_filename";
    if is_applied(conn, version)? {
        return Ok(());
    }

    if !table_has_column(conn, "posts", "original_filename")? {
        conn.execute("ALTER TABLE posts ADD COLUMN original_filename TEXT;", [])
            .map_err(|e| {
                AppError::Migration(format!("Failed to add 'original_filename' column: {e}"))
            })?;
        success("Migration applied: added 'original_filename' to posts table");
    }

    mark_applied(conn, version, "Added original_filename column to posts")
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db() and every DbPool::open().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    if !table_exists(conn, "posts")? {
        create_posts_table(conn)?;
        tracing::info!("created posts table");
    } else {
        if !table_has_column(conn, "posts", "hash")? {
            warning("Legacy posts table without 'hash' column cannot be migrated in place.");
            return Err(AppError::Migration(
                "posts table has no 'hash' column; re-import into a fresh database".into(),
            ));
        }
        migrate_add_metadata_column(conn)?;
        migrate_add_updated_at_column(conn)?;
        migrate_add_original_filename_column(conn)?;
    }

    ensure_posts_indexes(conn)?;
    Ok(())
}
