use crate::core::dedup;
use crate::errors::{AppError, AppResult};
use crate::models::post::is_unknown;
use crate::models::{InsertOutcome, NewPost, Post, PostFilter, PostPatch, UNKNOWN};
use chrono::Utc;
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};
use serde_json::{Map, Value};

const POST_COLUMNS: &str = "id, hash, title, date, city, country, continent, latitude, longitude, \
     cafe_name, rating, notes, images, instagram_url, published, created_at, updated_at, \
     original_filename, metadata";

fn now() -> String {
    Utc::now().to_rfc3339()
}

fn images_to_json(images: &[String]) -> AppResult<String> {
    Ok(serde_json::to_string(images)?)
}

fn metadata_to_json(metadata: &Map<String, Value>) -> AppResult<Option<String>> {
    if metadata.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_string(metadata)?))
    }
}

pub fn map_row(row: &Row) -> Result<Post> {
    let id: i64 = row.get("id")?;

    let images_raw: Option<String> = row.get("images")?;
    let images = match images_raw.as_deref().map(str::trim) {
        None | Some("") => Vec::new(),
        Some(raw) => serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|e| {
            tracing::warn!(post = id, error = %e, "invalid JSON in images column");
            Vec::new()
        }),
    };

    let metadata_raw: Option<String> = row.get("metadata")?;
    let metadata = match metadata_raw.as_deref().map(str::trim) {
        None | Some("") => Map::new(),
        Some(raw) => serde_json::from_str::<Map<String, Value>>(raw).unwrap_or_else(|e| {
            tracing::warn!(post = id, error = %e, "invalid JSON in metadata column");
            Map::new()
        }),
    };

    let location = |col: &str| -> Result<String> {
        let v: Option<String> = row.get(col)?;
        Ok(v.filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string()))
    };

    Ok(Post {
        id,
        hash: row.get("hash")?,
        title: row.get::<_, Option<String>>("title")?.unwrap_or_default(),
        date: row.get("date")?,
        city: location("city")?,
        country: location("country")?,
        continent: location("continent")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        cafe_name: row.get("cafe_name")?,
        rating: row.get("rating")?,
        notes: row.get("notes")?,
        images,
        instagram_url: row.get("instagram_url")?,
        published: row.get::<_, Option<bool>>("published")?.unwrap_or(true),
        created_at: row.get::<_, Option<String>>("created_at")?.unwrap_or_default(),
        updated_at: row.get::<_, Option<String>>("updated_at")?.unwrap_or_default(),
        original_filename: row.get("original_filename")?,
        metadata,
    })
}

/// Insert a record unless its dedup hash is already stored.
/// A duplicate is a no-op that reports the id of the existing row.
pub fn insert_post(conn: &Connection, post: &NewPost) -> AppResult<InsertOutcome> {
    let hash = dedup::hash_for(post);
    let ts = now();

    let changed = conn.execute(
        "INSERT INTO posts (
            hash, title, date, city, country, continent, latitude, longitude,
            cafe_name, rating, notes, images, instagram_url, published,
            created_at, updated_at, original_filename, metadata
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?15, ?16, ?17)
         ON CONFLICT(hash) DO NOTHING",
        params![
            hash,
            post.title.trim(),
            post.date.trim(),
            post.city_or_unknown(),
            post.country_or_unknown(),
            post.continent_or_unknown(),
            post.latitude,
            post.longitude,
            post.cafe_name,
            post.rating,
            post.notes,
            images_to_json(&post.images)?,
            post.instagram_url,
            post.published,
            ts,
            post.original_filename,
            metadata_to_json(&post.metadata)?,
        ],
    )?;

    if changed == 1 {
        return Ok(InsertOutcome::Inserted(conn.last_insert_rowid()));
    }

    let existing = get_post_by_hash(conn, &hash)?
        .ok_or_else(|| AppError::Other(format!("insert of {hash} ignored but no row found")))?;
    Ok(InsertOutcome::Duplicate(existing.id))
}

pub fn get_post(conn: &Connection, id: i64) -> AppResult<Option<Post>> {
    let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_row).optional()?)
}

/// Like [`get_post`] but an unknown id is an error.
pub fn require_post(conn: &Connection, id: i64) -> AppResult<Post> {
    get_post(conn, id)?.ok_or(AppError::PostNotFound(id))
}

pub fn get_post_by_hash(conn: &Connection, hash: &str) -> AppResult<Option<Post>> {
    let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE hash = ?1");
    Ok(conn.query_row(&sql, [hash], map_row).optional()?)
}

/// Partial update; `updated_at` is always refreshed.
/// Returns false when no row has that id.
pub fn update_post(conn: &Connection, id: i64, patch: &PostPatch) -> AppResult<bool> {
    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<SqlValue> = Vec::new();

    fn text(v: Option<&str>) -> SqlValue {
        match v {
            Some(s) => SqlValue::Text(s.to_string()),
            None => SqlValue::Null,
        }
    }
    fn location(v: &str) -> SqlValue {
        if is_unknown(Some(v)) {
            SqlValue::Text(UNKNOWN.to_string())
        } else {
            SqlValue::Text(v.trim().to_string())
        }
    }

    if let Some(t) = &patch.title {
        sets.push("title = ?");
        values.push(SqlValue::Text(t.trim().to_string()));
    }
    if let Some(d) = &patch.date {
        sets.push("date = ?");
        values.push(SqlValue::Text(d.trim().to_string()));
    }
    if let Some(c) = &patch.city {
        sets.push("city = ?");
        values.push(location(c));
    }
    if let Some(c) = &patch.country {
        sets.push("country = ?");
        values.push(location(c));
    }
    if let Some(c) = &patch.continent {
        sets.push("continent = ?");
        values.push(location(c));
    }
    if let Some(lat) = patch.latitude {
        sets.push("latitude = ?");
        values.push(lat.map_or(SqlValue::Null, SqlValue::Real));
    }
    if let Some(lon) = patch.longitude {
        sets.push("longitude = ?");
        values.push(lon.map_or(SqlValue::Null, SqlValue::Real));
    }
    if let Some(cafe) = &patch.cafe_name {
        sets.push("cafe_name = ?");
        values.push(text(cafe.as_deref()));
    }
    if let Some(rating) = patch.rating {
        sets.push("rating = ?");
        values.push(rating.map_or(SqlValue::Null, SqlValue::Integer));
    }
    if let Some(notes) = &patch.notes {
        sets.push("notes = ?");
        values.push(text(notes.as_deref()));
    }
    if let Some(images) = &patch.images {
        sets.push("images = ?");
        values.push(SqlValue::Text(images_to_json(images)?));
    }
    if let Some(url) = &patch.instagram_url {
        sets.push("instagram_url = ?");
        values.push(text(url.as_deref()));
    }
    if let Some(p) = patch.published {
        sets.push("published = ?");
        values.push(SqlValue::Integer(i64::from(p)));
    }

    sets.push("updated_at = ?");
    values.push(SqlValue::Text(now()));
    values.push(SqlValue::Integer(id));

    let sql = format!("UPDATE posts SET {} WHERE id = ?", sets.join(", "));
    let changed = conn.execute(&sql, params_from_iter(values.iter()))?;
    Ok(changed > 0)
}

pub fn set_published(conn: &Connection, id: i64, published: bool) -> AppResult<bool> {
    let changed = conn.execute(
        "UPDATE posts SET published = ?1, updated_at = ?2 WHERE id = ?3",
        params![published, now(), id],
    )?;
    Ok(changed > 0)
}

pub fn delete_post(conn: &Connection, id: i64) -> AppResult<bool> {
    let changed = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
    Ok(changed > 0)
}

/// All records matching `filter`, in id order.
pub fn list_posts(conn: &Connection, filter: &PostFilter) -> AppResult<Vec<Post>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<SqlValue> = Vec::new();

    if let Some(p) = filter.published {
        clauses.push("published = ?");
        values.push(SqlValue::Integer(i64::from(p)));
    }
    if let Some(c) = &filter.continent {
        clauses.push("continent = ?");
        values.push(SqlValue::Text(c.clone()));
    }
    if let Some(c) = &filter.country {
        clauses.push("country = ?");
        values.push(SqlValue::Text(c.clone()));
    }
    if let Some(c) = &filter.city {
        clauses.push("city = ?");
        values.push(SqlValue::Text(c.clone()));
    }

    let mut sql = format!("SELECT {POST_COLUMNS} FROM posts");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn all_posts(conn: &Connection) -> AppResult<Vec<Post>> {
    list_posts(conn, &PostFilter::default())
}

fn escape_like(q: &str) -> String {
    let mut out = String::with_capacity(q.len() + 2);
    out.push('%');
    for c in q.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// Case-insensitive substring match over title, cafe name, city, country and notes.
pub fn search_posts(conn: &Connection, query: &str) -> AppResult<Vec<Post>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT {POST_COLUMNS} FROM posts
         WHERE title     LIKE ?1 ESCAPE '\\'
            OR cafe_name LIKE ?1 ESCAPE '\\'
            OR city      LIKE ?1 ESCAPE '\\'
            OR country   LIKE ?1 ESCAPE '\\'
            OR notes     LIKE ?1 ESCAPE '\\'
         ORDER BY id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([escape_like(query)], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_posts(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?)
}
