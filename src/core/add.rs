use super::ChangeResult;
use crate::core::regenerate::Regenerator;
use crate::db::log::audit_quiet;
use crate::db::queries::insert_post;
use crate::errors::AppResult;
use crate::models::{InsertOutcome, NewPost};
use rusqlite::Connection;

/// High-level business logic for creating a post.
pub struct AddLogic;

impl AddLogic {
    /// Validate and store `post`, then write its page when a regenerator
    /// is given. A post whose content hash is already stored is reported
    /// as a duplicate and nothing changes.
    pub fn apply(
        conn: &Connection,
        regen: Option<&Regenerator>,
        post: &NewPost,
    ) -> AppResult<ChangeResult> {
        post.validate()?;

        let outcome = insert_post(conn, post)?;
        let id = outcome.id();

        let file = match (outcome, regen) {
            (InsertOutcome::Inserted(_), Some(r)) => Some(r.regenerate_one(conn, id)?),
            _ => None,
        };

        if outcome.is_inserted() {
            audit_quiet(conn, "add", &id.to_string(), &format!("Added \"{}\"", post.title.trim()));
        }

        Ok(ChangeResult::new(id, outcome.action(), file))
    }
}
