use anyhow::Result;
use chrono::Utc;
use pulse_feed::QuoteSource;
use pulse_series::{Board, Dashboard, DashboardConfig};
use pulse_web::SharedBoard;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// Fetch once, reshape once, and derive every projection from that one series.
pub async fn refresh(source: &dyn QuoteSource, config: &DashboardConfig) -> Result<Dashboard> {
    let samples = source.samples().await?;
    let dashboard = Dashboard::assemble(source.symbol(), &samples, config, Utc::now())?;
    Ok(dashboard)
}

/// One refresh cycle against the shared board. Failures are recorded, never propagated.
pub async fn run_cycle(source: &dyn QuoteSource, config: &DashboardConfig, board: &SharedBoard) {
    let symbol = source.symbol();
    match refresh(source, config).await {
        Ok(dashboard) => {
            info!(
                "[{symbol}] refreshed: {} {:+.2}%, latest {:?}",
                dashboard.delta.indicator,
                dashboard.delta.percent(),
                dashboard.recency.movement
            );
            board.write().await.record_success(dashboard);
        }
        Err(e) => {
            error!("[{symbol}] refresh cycle failed: {e:#}");
            board.write().await.record_failure(Utc::now(), format!("{e:#}"));
        }
    }
}

/// Refresh on a fixed period, forever. Each cycle finishes before the next tick is taken,
/// so cycles never overlap; ticks missed while a cycle ran are skipped.
pub async fn poll<F>(
    source: Arc<dyn QuoteSource>,
    config: DashboardConfig,
    board: SharedBoard,
    period: Duration,
    mut after: F,
) where
    F: FnMut(&Board) + Send,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        debug!("[{}] refresh cycle starting", source.symbol());
        run_cycle(source.as_ref(), &config, &board).await;
        after(&*board.read().await);
    }
}
