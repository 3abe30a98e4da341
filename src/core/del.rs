use super::ChangeResult;
use crate::core::regenerate::Regenerator;
use crate::db::log::audit_quiet;
use crate::db::queries::{delete_post, require_post};
use crate::errors::AppResult;
use rusqlite::Connection;

pub struct DeleteLogic;

impl DeleteLogic {
    /// Remove the page first, then the row, so a failure never leaves a
    /// page behind for a record that is gone.
    pub fn apply(
        conn: &Connection,
        regen: Option<&Regenerator>,
        id: i64,
    ) -> AppResult<ChangeResult> {
        let post = require_post(conn, id)?;

        let file = match regen {
            Some(r) => {
                let path = r.path_for(&post);
                r.remove_post_file(id)?;
                Some(path)
            }
            None => None,
        };

        delete_post(conn, id)?;
        audit_quiet(conn, "del", &id.to_string(), &format!("Deleted \"{}\"", post.title));

        Ok(ChangeResult::new(id, "deleted", file))
    }
}
