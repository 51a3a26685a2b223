use crate::error::Result;
use crate::project::{self, Delta, PriceTable, QuoteLabels, Recency, Sparkline};
use crate::reshape::{reshape_with, MalformedPolicy};
use crate::sample::{Indicator, RawSample};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// Knobs of the projections; fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardConfig {
    pub indicator: Indicator,
    pub policy: MalformedPolicy,
    /// Added above the sparkline's highest value.
    pub headroom: f64,
    /// Distance of the SELL label below the BUY label.
    pub spread: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            indicator: Indicator::High,
            policy: MalformedPolicy::Fail,
            headroom: 0.1,
            spread: 1.0,
        }
    }
}

/// Every data product of one successful refresh cycle.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub symbol: String,
    pub refreshed_at: DateTime<Utc>,
    pub samples: usize,
    /// Samples dropped under [`MalformedPolicy::Skip`], as messages.
    pub skipped: Vec<String>,
    pub delta: Delta,
    pub sparkline: Sparkline,
    pub table: PriceTable,
    pub recency: Recency,
    pub quote: QuoteLabels,
}

impl Dashboard {
    /// Reshape `samples` once and derive every projection from that one series.
    pub fn assemble(
        symbol: &str,
        samples: &[RawSample],
        config: &DashboardConfig,
        refreshed_at: DateTime<Utc>,
    ) -> Result<Self> {
        let reshaped = reshape_with(samples, config.policy)?;
        let points = &reshaped.points;

        let delta = project::delta(points, config.indicator)?;
        let sparkline = project::sparkline(points, config.indicator, config.headroom)?;
        let recency = project::recency(points, config.indicator)?;
        let table = PriceTable::new(points, config.indicator);

        debug!(
            "[{symbol}] dashboard assembled from {} samples: {:+.2}% {:?}",
            samples.len(),
            delta.percent(),
            recency.movement
        );

        Ok(Self {
            symbol: symbol.to_string(),
            refreshed_at,
            samples: samples.len() - reshaped.skipped.len(),
            skipped: reshaped.skipped.iter().map(|e| e.to_string()).collect(),
            delta,
            sparkline,
            table,
            quote: recency.quote(config.spread),
            recency,
        })
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Board: the last good dashboard, across cycles
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CycleFailure {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// What the presentation layer reads.
///
/// A failed cycle never clears the board: the previous dashboard stays up, flagged as stale,
/// next to the error that made it so.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Board {
    pub dashboard: Option<Dashboard>,
    pub stale: bool,
    pub last_error: Option<CycleFailure>,
    pub cycles: u64,
    pub failures: u64,
}

impl Board {
    pub fn record_success(&mut self, dashboard: Dashboard) {
        self.cycles += 1;
        self.dashboard = Some(dashboard);
        self.stale = false;
        self.last_error = None;
    }

    pub fn record_failure(&mut self, at: DateTime<Utc>, message: impl Into<String>) {
        self.cycles += 1;
        self.failures += 1;
        self.stale = self.dashboard.is_some();
        self.last_error = Some(CycleFailure {
            at,
            message: message.into(),
        });
    }

    pub fn current(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }
}
