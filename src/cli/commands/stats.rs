use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::stats::post_stats;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats { json } = cmd {
        let pool = super::open_pool(cfg)?;
        let s = post_stats(&pool.conn)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&s)?);
            return Ok(());
        }

        header("Post statistics");
        println!("{CYAN}• Total:{RESET}        {GREEN}{}{RESET}", s.total);
        println!("{CYAN}• Published:{RESET}    {}", s.published);
        println!("{CYAN}• Unpublished:{RESET}  {GREY}{}{RESET}", s.unpublished);
        println!("{CYAN}• Countries:{RESET}    {}", s.countries);
        println!("{CYAN}• Cities:{RESET}       {}", s.cities);
        println!("{CYAN}• With images:{RESET}  {}", s.with_images);
        println!("{CYAN}• With rating:{RESET}  {}", s.with_ratings);
        println!("{CYAN}• With location:{RESET} {}", s.with_location);
        println!("{CYAN}• With cafe:{RESET}    {}", s.with_cafe_names);

        if !s.by_continent.is_empty() {
            println!("\n{CYAN}Published by continent{RESET}");
            for (continent, n) in &s.by_continent {
                println!("  {continent:<16} {n}");
            }
        }
    }

    Ok(())
}
