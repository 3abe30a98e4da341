use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::edit::EditLogic;
use crate::core::regenerate::Regenerator;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Publish { id, off } = cmd {
        let pool = super::open_pool(cfg)?;
        let regen = Regenerator::from_config(cfg);

        let result = EditLogic::publish(&pool.conn, Some(&regen), *id, !*off)?;
        success(format!("Post #{} {}.", result.id, result.action));
    }

    Ok(())
}
