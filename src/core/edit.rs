use super::ChangeResult;
use crate::core::regenerate::Regenerator;
use crate::db::log::audit_quiet;
use crate::db::queries::{require_post, set_published, update_post};
use crate::errors::AppResult;
use crate::models::PostPatch;
use rusqlite::Connection;

pub struct EditLogic;

impl EditLogic {
    /// Apply a partial update and refresh the post page.
    pub fn apply(
        conn: &Connection,
        regen: Option<&Regenerator>,
        id: i64,
        patch: &PostPatch,
    ) -> AppResult<ChangeResult> {
        patch.validate()?;
        require_post(conn, id)?;

        update_post(conn, id, patch)?;
        let file = regen.map(|r| r.regenerate_one(conn, id)).transpose()?;

        let fields = patch.changed_fields().join(", ");
        audit_quiet(conn, "edit", &id.to_string(), &format!("Updated {fields}"));

        Ok(ChangeResult::new(id, "updated", file))
    }

    pub fn publish(
        conn: &Connection,
        regen: Option<&Regenerator>,
        id: i64,
        published: bool,
    ) -> AppResult<ChangeResult> {
        require_post(conn, id)?;

        set_published(conn, id, published)?;
        let file = regen.map(|r| r.regenerate_one(conn, id)).transpose()?;

        let action = if published { "published" } else { "unpublished" };
        audit_quiet(conn, "publish", &id.to_string(), action);

        Ok(ChangeResult::new(id, action, file))
    }
}
