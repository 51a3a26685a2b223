use super::{endpoints, Polarity};
use crate::error::{Result, SeriesError};
use crate::sample::{Indicator, SeriesPoint};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Change of one indicator across the whole window.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    pub indicator: Indicator,
    pub since: NaiveDateTime,
    pub until: NaiveDateTime,
    pub earliest: f64,
    pub latest: f64,
    /// `(latest - earliest) / earliest`, as a signed fraction.
    pub relative: f64,
    pub polarity: Polarity,
}

impl Delta {
    pub fn percent(&self) -> f64 {
        self.relative * 100.0
    }
}

/// Relative delta between the chronologically first & last values of `indicator`.
pub fn delta(points: &[SeriesPoint], indicator: Indicator) -> Result<Delta> {
    let (earliest, latest) = endpoints(points, indicator)?;
    if earliest.value == 0.0 {
        return Err(SeriesError::ZeroBaseline { indicator });
    }

    Ok(Delta {
        indicator,
        since: earliest.timestamp,
        until: latest.timestamp,
        earliest: earliest.value,
        latest: latest.value,
        relative: (latest.value - earliest.value) / earliest.value,
        polarity: Polarity::between(earliest.value, latest.value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reshape;
    use crate::test_support::{minute, sample, window};

    fn high_delta(prices: &[f64]) -> Result<Delta> {
        delta(&reshape(&window(prices)).unwrap(), Indicator::High)
    }

    #[test]
    fn rise() {
        let d = high_delta(&[100.0, 105.0]).unwrap();
        assert!((d.relative - 0.05).abs() < 1e-12);
        assert_eq!(d.polarity, Polarity::Up);
        assert_eq!((d.earliest, d.latest), (100.0, 105.0));
    }

    #[test]
    fn fall() {
        let d = high_delta(&[100.0, 95.0]).unwrap();
        assert!((d.relative + 0.05).abs() < 1e-12);
        assert_eq!(d.polarity, Polarity::Down);
    }

    #[test]
    fn flat_is_up() {
        let d = high_delta(&[100.0, 100.0]).unwrap();
        assert_eq!(d.relative, 0.0);
        assert_eq!(d.polarity, Polarity::Up);
    }

    #[test]
    fn uses_endpoints_not_neighbours() {
        let d = high_delta(&[100.0, 90.0, 130.0, 110.0]).unwrap();
        assert!((d.relative - 0.10).abs() < 1e-12);
        assert_eq!(d.since, minute(0));
        assert_eq!(d.until, minute(3));
    }

    #[test]
    fn one_point_is_insufficient() {
        let err = high_delta(&[100.0]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::InsufficientData {
                indicator: Indicator::High,
                needed: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn zero_baseline() {
        let points = reshape(&[sample(minute(1), 5.0), sample(minute(0), 0.0)]).unwrap();
        assert_eq!(
            delta(&points, Indicator::Low),
            Err(SeriesError::ZeroBaseline {
                indicator: Indicator::Low
            })
        );
    }

    #[test]
    fn percent() {
        let d = high_delta(&[200.0, 201.0]).unwrap();
        assert!((d.percent() - 0.5).abs() < 1e-9);
    }
}
