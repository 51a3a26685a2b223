use crate::error::{Result, SeriesError};
use crate::sample::{Indicator, SeriesPoint};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How the latest sample moved against the one before it. Exact equality is `Unchanged`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Movement {
    Increased,
    Unchanged,
    Decreased,
}

impl Movement {
    pub fn between(previous: f64, latest: f64) -> Self {
        if latest > previous {
            Movement::Increased
        } else if latest < previous {
            Movement::Decreased
        } else {
            Movement::Unchanged
        }
    }
}

/// Latest vs previous sample of one indicator.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Recency {
    pub indicator: Indicator,
    pub previous_at: NaiveDateTime,
    pub latest_at: NaiveDateTime,
    pub previous: f64,
    pub latest: f64,
    pub movement: Movement,
}

/// The BUY / SELL labels of the card.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct QuoteLabels {
    pub buy: f64,
    pub sell: f64,
    pub movement: Movement,
}

impl Recency {
    /// `buy` is the latest value, `sell` sits `spread` below it.
    pub fn quote(&self, spread: f64) -> QuoteLabels {
        QuoteLabels {
            buy: self.latest,
            sell: self.latest - spread,
            movement: self.movement,
        }
    }
}

/// Compare `indicator` at the two most recent distinct timestamps of the (unfiltered) series.
pub fn recency(points: &[SeriesPoint], indicator: Indicator) -> Result<Recency> {
    let timestamps: BTreeSet<NaiveDateTime> = points.iter().map(|p| p.timestamp).collect();
    let mut recent = timestamps.iter().rev().copied();
    let (latest_at, previous_at) = match (recent.next(), recent.next()) {
        (Some(latest), Some(previous)) => (latest, previous),
        _ => {
            return Err(SeriesError::InsufficientData {
                indicator,
                needed: 2,
                found: timestamps.len(),
            })
        }
    };

    let value_at = |at: NaiveDateTime| {
        points
            .iter()
            .find(|p| p.indicator == indicator && p.timestamp == at)
            .map(|p| p.value)
    };
    let (latest, previous) = match (value_at(latest_at), value_at(previous_at)) {
        (Some(latest), Some(previous)) => (latest, previous),
        (latest, previous) => {
            return Err(SeriesError::InsufficientData {
                indicator,
                needed: 2,
                found: usize::from(latest.is_some()) + usize::from(previous.is_some()),
            })
        }
    };

    Ok(Recency {
        indicator,
        previous_at,
        latest_at,
        previous,
        latest,
        movement: Movement::between(previous, latest),
    })
}
