use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::PostStats;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::{Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::fs;

/// Placeholder-free predicate for a location column.
fn known(col: &str) -> String {
    format!("{col} IS NOT NULL AND TRIM({col}) != '' AND LOWER({col}) != 'unknown'")
}

fn count(conn: &Connection, sql: &str) -> AppResult<i64> {
    Ok(conn.query_row(sql, [], |row| row.get(0))?)
}

pub fn post_stats(conn: &Connection) -> AppResult<PostStats> {
    let total = count(conn, "SELECT COUNT(*) FROM posts")?;
    let published = count(conn, "SELECT COUNT(*) FROM posts WHERE published = 1")?;

    let countries = count(
        conn,
        &format!("SELECT COUNT(DISTINCT country) FROM posts WHERE {}", known("country")),
    )?;
    // The same city name in two countries is two cities.
    let cities = count(
        conn,
        &format!(
            "SELECT COUNT(*) FROM (SELECT DISTINCT city, country FROM posts WHERE {})",
            known("city")
        ),
    )?;

    let mut by_continent = BTreeMap::new();
    let mut stmt = conn.prepare(&format!(
        "SELECT continent, COUNT(*) FROM posts
         WHERE published = 1 AND {}
         GROUP BY continent ORDER BY continent",
        known("continent")
    ))?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
    for r in rows {
        let (continent, n) = r?;
        by_continent.insert(continent, n);
    }

    Ok(PostStats {
        total,
        published,
        unpublished: total - published,
        countries,
        cities,
        by_continent,
        with_images: count(
            conn,
            "SELECT COUNT(*) FROM posts WHERE images IS NOT NULL AND images NOT IN ('', '[]')",
        )?,
        with_ratings: count(conn, "SELECT COUNT(*) FROM posts WHERE rating IS NOT NULL")?,
        with_location: count(
            conn,
            "SELECT COUNT(*) FROM posts WHERE latitude IS NOT NULL AND longitude IS NOT NULL",
        )?,
        with_cafe_names: count(
            conn,
            "SELECT COUNT(*) FROM posts WHERE cafe_name IS NOT NULL AND TRIM(cafe_name) != ''",
        )?,
    })
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TOTAL POSTS
    //
    let total = count(&pool.conn, "SELECT COUNT(*) FROM posts")?;
    println!("{}• Total posts:{} {}{}{}", CYAN, RESET, GREEN, total, RESET);

    //
    // 3) DATE RANGE
    //
    let first_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM posts WHERE date IS NOT NULL AND date != '' ORDER BY date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM posts WHERE date IS NOT NULL AND date != '' ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_first = first_date.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last_date.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    //
    // 4) AUDIT LOG SIZE
    //
    let log_rows = count(&pool.conn, "SELECT COUNT(*) FROM log")?;
    println!("{}• Audit log rows:{} {}", CYAN, RESET, log_rows);

    println!();
    Ok(())
}
