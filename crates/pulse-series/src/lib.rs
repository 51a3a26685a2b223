pub mod board;
pub mod error;
pub mod project;
pub mod reshape;
pub mod sample;

pub use board::{Board, CycleFailure, Dashboard, DashboardConfig};
pub use error::{Result, SeriesError};
pub use reshape::{reshape, reshape_with, MalformedPolicy, Reshaped};
pub use sample::{Indicator, ParseIndicatorError, RawSample, SeriesPoint};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::sample::RawSample;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    pub fn minute(n: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
            + TimeDelta::minutes(n)
    }

    /// A sample whose four prices all equal `price`.
    pub fn sample(timestamp: NaiveDateTime, price: f64) -> RawSample {
        RawSample::new(timestamp, price, price, price, price, 1_000.0)
    }

    /// Samples in provider order (newest first); `prices` is given oldest first.
    pub fn window(prices: &[f64]) -> Vec<RawSample> {
        prices
            .iter()
            .enumerate()
            .map(|(i, price)| sample(minute(i as i64), *price))
            .rev()
            .collect()
    }
}
