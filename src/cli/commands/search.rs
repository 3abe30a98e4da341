use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::queries::search_posts;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Search { query } = cmd {
        let pool = super::open_pool(cfg)?;
        let posts = search_posts(&pool.conn, query)?;
        super::list::print_posts(&posts);
    }

    Ok(())
}
