use super::{endpoints, filter, Polarity};
use crate::error::Result;
use crate::sample::{Indicator, SeriesPoint};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SparkPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// A chronological line of one indicator, with the vertical range it should be drawn in.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Sparkline {
    pub indicator: Indicator,
    pub points: Vec<SparkPoint>,
    pub floor: f64,
    /// Highest value plus the requested headroom.
    pub ceiling: f64,
    pub polarity: Polarity,
}

/// Build the sparkline of `indicator`, oldest point first.
///
/// `headroom` is added above the highest value so the line never touches the top edge.
pub fn sparkline(points: &[SeriesPoint], indicator: Indicator, headroom: f64) -> Result<Sparkline> {
    let (earliest, latest) = endpoints(points, indicator)?;

    let mut line: Vec<SparkPoint> = filter(points, indicator)
        .into_iter()
        .map(|p| SparkPoint {
            timestamp: p.timestamp,
            value: p.value,
        })
        .collect();
    line.sort_by_key(|p| p.timestamp);

    let floor = line.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let ceiling = line.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max) + headroom;

    Ok(Sparkline {
        indicator,
        points: line,
        floor,
        ceiling,
        polarity: Polarity::between(earliest.value, latest.value),
    })
}
