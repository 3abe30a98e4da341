use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::queries::list_posts;
use crate::errors::AppResult;
use crate::models::{Post, PostFilter};
use crate::utils::colors::{RESET, color_for_published};
use crate::utils::formatting::describe_location;
use crate::utils::table::{Column, Table};

/// Shared table layout for `list` and `search`.
pub(crate) fn print_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts found.");
        return;
    }

    let mut table = Table::new(vec![
        Column::new("ID", 6),
        Column::new("DATE", 10),
        Column::new("TITLE", 40),
        Column::new("LOCATION", 28),
        Column::new("CAFE", 24),
        Column::new("RATING", 6),
        Column::new("PUB", 3),
    ]);

    for p in posts {
        table.add_row(vec![
            p.id.to_string(),
            p.date.clone().unwrap_or_else(|| "--".into()),
            p.title.clone(),
            describe_location(&p.city, &p.country),
            p.cafe_name.clone().unwrap_or_default(),
            p.rating.map(|r| format!("{r}/5")).unwrap_or_default(),
            if p.published { "yes".into() } else { "no".into() },
        ]);
    }

    let rendered = table.render();
    let mut lines = rendered.lines();
    // Header and rule
    for l in lines.by_ref().take(2) {
        println!("{l}");
    }
    for (line, post) in lines.zip(posts) {
        println!("{}{}{}", color_for_published(post.published), line, RESET);
    }
    println!("\n{} post(s)", posts.len());
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        published,
        unpublished,
        continent,
        country,
        city,
        json,
    } = cmd
    {
        let filter = PostFilter {
            published: match (*published, *unpublished) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            continent: continent.clone(),
            country: country.clone(),
            city: city.clone(),
        };

        let pool = super::open_pool(cfg)?;
        let posts = list_posts(&pool.conn, &filter)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&posts)?);
        } else {
            print_posts(&posts);
        }
    }

    Ok(())
}
