//! Read-only data products derived from one reshaped series.
//!
//! Every projection takes the full long-form series plus the indicator it reports on, so a
//! refresh cycle can reshape once and hand the same slice to all of them.

pub mod delta;
pub mod recency;
pub mod sparkline;
pub mod table;

pub use delta::{delta, Delta};
pub use recency::{recency, Movement, QuoteLabels, Recency};
pub use sparkline::{sparkline, SparkPoint, Sparkline};
pub use table::{Page, PriceRow, PriceTable, SortKey, SortOrder};

use crate::error::{Result, SeriesError};
use crate::sample::{Indicator, SeriesPoint};
use serde::{Deserialize, Serialize};

/// Display polarity of a move from the earliest to the latest value. A flat move is `Up`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Up,
    Down,
}

impl Polarity {
    pub fn between(earliest: f64, latest: f64) -> Self {
        if latest >= earliest {
            Polarity::Up
        } else {
            Polarity::Down
        }
    }
}

/// The points of a single indicator, in the order they appear in `points`.
pub fn filter(points: &[SeriesPoint], indicator: Indicator) -> Vec<SeriesPoint> {
    points
        .iter()
        .filter(|point| point.indicator == indicator)
        .copied()
        .collect()
}

/// Chronologically first & last points of an indicator, whatever order `points` is in.
pub(crate) fn endpoints(
    points: &[SeriesPoint],
    indicator: Indicator,
) -> Result<(SeriesPoint, SeriesPoint)> {
    let filtered = filter(points, indicator);
    if filtered.len() < 2 {
        return Err(SeriesError::InsufficientData {
            indicator,
            needed: 2,
            found: filtered.len(),
        });
    }

    let first = filtered[0];
    Ok(filtered[1..].iter().fold((first, first), |(earliest, latest), point| {
        (
            if point.timestamp < earliest.timestamp { *point } else { earliest },
            if point.timestamp > latest.timestamp { *point } else { latest },
        )
    }))
}
