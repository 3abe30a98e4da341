use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::dedup::{DedupLogic, DuplicateGroup};
use crate::core::regenerate::Regenerator;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success, warning};

fn print_group(group: &DuplicateGroup) {
    let others = group
        .remove
        .iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "  {:<20} {:<40} keep #{}  drop {}",
        group.reason.label(),
        group.key,
        group.keep,
        others
    );
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Dedup { apply } = cmd {
        let pool = super::open_pool(cfg)?;
        let regen = Regenerator::from_config(cfg);
        let report = DedupLogic::run(&pool.conn, Some(&regen), *apply)?;

        if report.groups.is_empty() {
            success("No duplicate posts found.");
        } else {
            header(format!("{} duplicate group(s)", report.groups.len()));
            report.groups.iter().for_each(print_group);
            println!();
        }

        if !report.review.is_empty() {
            warning(format!(
                "{} group(s) share a date and place; check them by hand:",
                report.review.len()
            ));
            for group in &report.review {
                let mut ids = vec![group.keep];
                ids.extend(&group.remove);
                ids.sort_unstable();
                let ids = ids.iter().map(|id| format!("#{id}")).collect::<Vec<_>>();
                println!("  {:<40} {}", group.key, ids.join(", "));
            }
        }

        if *apply {
            success(format!("Removed {} duplicate post(s).", report.removed.len()));
        } else if !report.groups.is_empty() {
            let pending: usize = report.groups.iter().map(|g| g.remove.len()).sum();
            info(format!("{pending} post(s) would be removed. Run with --apply to delete them."));
        }
    }

    Ok(())
}
