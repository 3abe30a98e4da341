use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::regenerate::Regenerator;
use crate::db::queries::require_post;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, RESET, colorize_optional, colorize_rating};
use crate::utils::formatting::bold;

const WRAP_WIDTH: usize = 80;

fn field(label: &str, value: impl std::fmt::Display) {
    println!("{CYAN}{label:<14}{RESET} {value}");
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { id } = cmd {
        let pool = super::open_pool(cfg)?;
        let post = require_post(&pool.conn, *id)?;
        let page = Regenerator::from_config(cfg).path_for(&post);

        println!("{}\n", bold(&format!("#{} {}", post.id, post.title)));
        field("Date", colorize_optional(post.date.as_deref()));
        field("City", &post.city);
        field("Country", &post.country);
        field("Continent", &post.continent);
        field(
            "Coordinates",
            match post.coordinates() {
                Some((lat, lon)) => format!("{lat:.5}, {lon:.5}"),
                None => colorize_optional(None),
            },
        );
        field("Cafe", colorize_optional(post.cafe_name.as_deref()));
        field("Rating", colorize_rating(post.rating));
        field("Instagram", colorize_optional(post.instagram_url.as_deref()));
        field("Published", if post.published { "yes" } else { "no" });
        field("Created", &post.created_at);
        field("Updated", &post.updated_at);
        field("Page", page.display());

        if !post.images.is_empty() {
            println!("\n{CYAN}Images{RESET}");
            for img in &post.images {
                println!("  - {img}");
            }
        }

        if let Some(notes) = post.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            println!("\n{CYAN}Notes{RESET}");
            for line in textwrap::wrap(notes, WRAP_WIDTH) {
                println!("  {line}");
            }
        }

        if !post.metadata.is_empty() {
            println!("\n{CYAN}Metadata{RESET}");
            println!("{}", serde_json::to_string_pretty(&post.metadata)?);
        }
    }

    Ok(())
}
