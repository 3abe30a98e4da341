//! Best-effort tile cache warming. Fetch failures are counted, never raised.

use crate::core::tiles::{PlannedTile, PrefetchSettings};
use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrefetchReport {
    pub requested: usize,
    pub succeeded: usize,
    pub failed: usize,
}

pub struct TileFetcher {
    client: reqwest::Client,
    delay: Duration,
}

impl TileFetcher {
    pub fn new(settings: &PrefetchSettings) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Other(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            delay: Duration::from_millis(settings.delay_ms),
        })
    }

    async fn fetch_one(&self, url: &str) -> Result<usize, reqwest::Error> {
        let resp = self.client.get(url).send().await?.error_for_status()?;
        Ok(resp.bytes().await?.len())
    }

    /// Request the tiles one after another, sleeping between requests.
    pub async fn fetch_all(&self, tiles: &[PlannedTile]) -> PrefetchReport {
        let mut report = PrefetchReport::default();

        for (i, tile) in tiles.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            report.requested += 1;
            match self.fetch_one(&tile.url).await {
                Ok(bytes) => {
                    report.succeeded += 1;
                    tracing::debug!(url = %tile.url, bytes, "tile fetched");
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::debug!(url = %tile.url, error = %e, "tile fetch failed");
                }
            }
        }

        tracing::info!(
            requested = report.requested,
            succeeded = report.succeeded,
            failed = report.failed,
            "tile prefetch finished"
        );
        report
    }
}
