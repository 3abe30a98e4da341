use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::prefetch::TileFetcher;
use crate::core::tiles::{PrefetchSettings, plan, tile_for};
use crate::db::queries::all_posts;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

fn parse_coordinate(s: &str) -> AppResult<(f64, f64)> {
    let bad = || AppError::InvalidInput(format!("expected LAT,LON, got '{s}'"));
    let (lat, lon) = s.split_once(',').ok_or_else(bad)?;
    let lat: f64 = lat.trim().parse().map_err(|_| bad())?;
    let lon: f64 = lon.trim().parse().map_err(|_| bad())?;
    Ok((lat, lon))
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Tiles {
        plan: show_plan,
        prefetch,
        at,
        zoom,
    } = cmd
    {
        if let (Some(at), Some(zoom)) = (at, zoom) {
            let (lat, lon) = parse_coordinate(at)?;
            let t = tile_for(lat, lon, *zoom);
            println!("{}/{}/{}", t.z, t.x, t.y);
            return Ok(());
        }

        let settings = PrefetchSettings::from_config(cfg);
        let pool = super::open_pool(cfg)?;
        let tiles = plan(&all_posts(&pool.conn)?, &settings);

        if tiles.is_empty() {
            warning("No tiles to request: no group has enough located, published posts.");
            return Ok(());
        }

        if *show_plan || !*prefetch {
            for t in &tiles {
                println!(
                    "{:<9} {:<32} {}/{}/{}",
                    t.level.label(),
                    t.group,
                    t.coord.z,
                    t.coord.x,
                    t.coord.y
                );
            }
            info(format!("{} tile(s) planned", tiles.len()));
        }

        if *prefetch {
            let fetcher = TileFetcher::new(&settings)?;
            let runtime = tokio::runtime::Runtime::new()
                .map_err(|e| AppError::Other(format!("cannot start async runtime: {e}")))?;
            let report = runtime.block_on(fetcher.fetch_all(&tiles));
            success(format!(
                "{} requested, {} fetched, {} failed",
                report.requested, report.succeeded, report.failed
            ));
        }
    }

    Ok(())
}
