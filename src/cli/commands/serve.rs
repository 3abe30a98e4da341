use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::http::{AppState, serve};
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { host, port } = cmd {
        let host = host.clone().unwrap_or_else(|| cfg.server_host.clone());
        let port = port.unwrap_or(cfg.server_port);

        let pool = super::open_pool(cfg)?;
        let state = AppState::new(pool, cfg.clone());

        info(format!("Admin API on http://{host}:{port} (Ctrl-C to stop)"));

        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| AppError::Other(format!("cannot start async runtime: {e}")))?;
        runtime.block_on(serve(state, &host, port))?;
    }

    Ok(())
}
