use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::{ImportLogic, ImportOptions};
use crate::core::regenerate::Regenerator;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import {
        path,
        all,
        fill_missing,
        dry_run,
        regenerate,
    } = cmd
    {
        let source = expand_tilde(path);
        let opts = ImportOptions {
            coffee_only: !*all,
            fill_missing: *fill_missing,
            dry_run: *dry_run,
        };

        let pool = super::open_pool(cfg)?;
        header(format!("Importing from {}", source.display()));
        let report = ImportLogic::run(&pool.conn, &source, opts)?;

        let prefix = if *dry_run { "[dry run] " } else { "" };
        println!("{prefix}Inserted   : {}", report.inserted);
        println!("{prefix}Duplicates : {}", report.duplicates);
        println!("{prefix}Updated    : {}", report.updated);
        println!("{prefix}Filtered   : {}", report.filtered);
        println!("{prefix}Failed     : {}", report.failed);

        if *dry_run {
            info("Dry run: nothing was written.");
            return Ok(());
        }
        success("Import completed.");

        if *regenerate {
            let regen = Regenerator::from_config(cfg).regenerate_all(&pool.conn)?;
            success(format!(
                "Pages regenerated: {} written, {} unchanged, {} removed",
                regen.written, regen.unchanged, regen.removed
            ));
        }
    }

    Ok(())
}
