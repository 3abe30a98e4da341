use crate::cli::parser::{Commands, PostFields};
use crate::config::Config;
use crate::core::add::AddLogic;
use crate::errors::AppResult;
use crate::models::NewPost;
use crate::ui::messages::{success, warning};

fn to_new_post(fields: &PostFields, draft: bool) -> NewPost {
    let f = fields.clone();
    NewPost {
        title: f.title.unwrap_or_default(),
        date: f.date.unwrap_or_default(),
        city: f.city,
        country: f.country,
        continent: f.continent,
        latitude: f.latitude,
        longitude: f.longitude,
        cafe_name: f.cafe_name,
        rating: f.rating,
        notes: f.notes,
        images: f.images,
        instagram_url: f.instagram_url,
        published: !draft,
        ..NewPost::default()
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        fields,
        draft,
        no_regen,
    } = cmd
    {
        let pool = super::open_pool(cfg)?;
        let regen = super::regenerator(cfg, *no_regen);
        let post = to_new_post(fields, *draft);

        let result = AddLogic::apply(&pool.conn, regen.as_ref(), &post)?;

        if result.action == "duplicate" {
            warning(format!("Same content already stored as post #{}", result.id));
        } else {
            success(format!("Post #{} added.", result.id));
            if let Some(file) = &result.file {
                println!("📝 {file}");
            }
        }
    }

    Ok(())
}
