use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::regenerate::Regenerator;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Regenerate {
        id,
        clean,
        no_backup,
    } = cmd
    {
        let pool = super::open_pool(cfg)?;
        let backup = cfg.backup_before_regenerate && !*no_backup;
        let regen = Regenerator::new(&cfg.posts_dir, backup);

        if *clean {
            let removed = regen.clean_orphans(&pool.conn)?;
            success(format!("Removed {removed} orphaned page(s)."));
            return Ok(());
        }

        if let Some(id) = id {
            let path = regen.regenerate_one(&pool.conn, *id)?;
            success(format!("Post #{id} regenerated: {}", path.display()));
            return Ok(());
        }

        warning(format!(
            "Every page in {} is rebuilt from the database; pages without a post are removed.",
            regen.out_dir().display()
        ));
        let report = regen.regenerate_all(&pool.conn)?;

        if let Some(archive) = &report.backup {
            info(format!("Previous pages archived to {archive}"));
        }
        success(format!(
            "{} written, {} unchanged, {} removed",
            report.written, report.unchanged, report.removed
        ));
    }

    Ok(())
}
