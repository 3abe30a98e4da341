use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::PostFilter;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        published,
        force,
    } = cmd
    {
        let pool = super::open_pool(cfg)?;
        let filter = PostFilter {
            published: published.then_some(true),
            ..PostFilter::default()
        };
        ExportLogic::export(&pool, *format, file, &filter, *force)?;
    }
    Ok(())
}
