use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Input: one provider sample per timestamp
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// A single intraday sample, as the provider delivered it.
///
/// Any of the numeric fields may be absent in a payload; the reshape step decides what an
/// absent retained field means. `volume` is carried for completeness but never reshaped.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RawSample {
    pub timestamp: NaiveDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawSample {
    /// A sample with every field present.
    pub fn new(
        timestamp: NaiveDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }

    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Open => self.open,
            Indicator::High => self.high,
            Indicator::Low => self.low,
            Indicator::Close => self.close,
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Output: long-form series rows
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// The retained price facets of a sample. Volume is not a variant.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Open,
    High,
    Low,
    Close,
}

impl Indicator {
    /// Every retained indicator, in the order the reshape emits them.
    pub const ALL: [Indicator; 4] = [
        Indicator::Open,
        Indicator::High,
        Indicator::Low,
        Indicator::Close,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Open => "open",
            Indicator::High => "high",
            Indicator::Low => "low",
            Indicator::Close => "close",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown indicator `{0}`; expected one of open, high, low, close")]
pub struct ParseIndicatorError(pub String);

impl FromStr for Indicator {
    type Err = ParseIndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Indicator::Open),
            "high" => Ok(Indicator::High),
            "low" => Ok(Indicator::Low),
            "close" => Ok(Indicator::Close),
            _ => Err(ParseIndicatorError(s.to_string())),
        }
    }
}

/// One `(indicator, timestamp, value)` row of the reshaped series.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub indicator: Indicator,
    pub timestamp: NaiveDateTime,
    pub value: f64,
}
