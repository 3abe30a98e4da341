use crate::cli::parser::{Commands, PostFields};
use crate::config::Config;
use crate::core::edit::EditLogic;
use crate::errors::AppResult;
use crate::models::PostPatch;
use crate::ui::messages::success;

fn to_patch(fields: &PostFields) -> PostPatch {
    let f = fields.clone();
    PostPatch {
        title: f.title,
        date: f.date,
        city: f.city,
        country: f.country,
        continent: f.continent,
        latitude: f.latitude.map(Some),
        longitude: f.longitude.map(Some),
        cafe_name: f.cafe_name.map(Some),
        rating: f.rating.map(Some),
        notes: f.notes.map(Some),
        images: (!f.images.is_empty()).then_some(f.images),
        instagram_url: f.instagram_url.map(Some),
        published: None,
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
        fields,
        no_regen,
    } = cmd
    {
        let pool = super::open_pool(cfg)?;
        let regen = super::regenerator(cfg, *no_regen);

        let result = EditLogic::apply(&pool.conn, regen.as_ref(), *id, &to_patch(fields))?;

        success(format!("Post #{} updated.", result.id));
        if let Some(file) = &result.file {
            println!("📝 {file}");
        }
    }

    Ok(())
}
