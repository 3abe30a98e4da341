use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::del::DeleteLogic;
use crate::core::regenerate::Regenerator;
use crate::db::queries::require_post;
use crate::errors::AppResult;
use crate::ui::messages::{confirm, info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id, yes } = cmd {
        let pool = super::open_pool(cfg)?;
        let post = require_post(&pool.conn, *id)?;

        //
        // Confirmation prompt
        //
        let prompt = format!(
            "Delete post #{} \"{}\" and its page? This action is irreversible.",
            post.id, post.title
        );
        if !*yes && !confirm(&prompt) {
            info("Operation cancelled.");
            return Ok(());
        }

        let regen = Regenerator::from_config(cfg);
        let result = DeleteLogic::apply(&pool.conn, Some(&regen), *id)?;

        success(format!("Post #{} has been deleted.", result.id));
    }

    Ok(())
}
