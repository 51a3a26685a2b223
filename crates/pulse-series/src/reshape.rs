use crate::error::{Result, SeriesError};
use crate::sample::{Indicator, RawSample, SeriesPoint};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// What to do with a sample that lacks one of the retained indicators.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Reject the whole window; no partial output.
    #[default]
    Fail,
    /// Drop the offending samples and report them next to the output.
    Skip,
}

/// Output of [`reshape_with()`]: the long-form series plus any samples that were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Reshaped {
    pub points: Vec<SeriesPoint>,
    pub skipped: Vec<SeriesError>,
}

/// Pivot a window of samples into long-form `(indicator, timestamp, value)` rows,
/// rejecting the window if any sample is malformed.
///
/// ```rust
/// use chrono::NaiveDate;
/// use pulse_series::{reshape, RawSample};
///
/// let at = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(9, 30, 0).unwrap();
/// let samples = vec![RawSample::new(at, 1.0, 2.0, 0.5, 1.5, 100.0)];
/// assert_eq!(reshape(&samples).unwrap().len(), 4);
/// ```
pub fn reshape(samples: &[RawSample]) -> Result<Vec<SeriesPoint>> {
    reshape_with(samples, MalformedPolicy::Fail).map(|reshaped| reshaped.points)
}

/// Pivot a window of samples into long-form rows.
///
/// Rows follow the input order sample by sample, each sample emitting `open`, `high`, `low`,
/// `close` in that order. `volume` is never emitted.
pub fn reshape_with(samples: &[RawSample], policy: MalformedPolicy) -> Result<Reshaped> {
    if samples.is_empty() {
        return Err(SeriesError::EmptyInput);
    }

    let mut points = Vec::with_capacity(samples.len() * Indicator::ALL.len());
    let mut skipped = vec![];
    for sample in samples {
        match pivot(sample) {
            Ok(row) => points.extend(row),
            Err(e) => match policy {
                MalformedPolicy::Fail => return Err(e),
                MalformedPolicy::Skip => {
                    warn!("skipping sample: {e}");
                    skipped.push(e);
                }
            },
        }
    }

    // every sample was skipped
    if points.is_empty() {
        return Err(SeriesError::EmptyInput);
    }

    trace!(
        "reshaped {} samples into {} points ({} skipped)",
        samples.len(),
        points.len(),
        skipped.len()
    );
    Ok(Reshaped { points, skipped })
}

fn pivot(sample: &RawSample) -> Result<[SeriesPoint; 4]> {
    let point = |indicator: Indicator| {
        sample
            .value(indicator)
            .filter(|value| value.is_finite())
            .map(|value| SeriesPoint {
                indicator,
                timestamp: sample.timestamp,
                value,
            })
            .ok_or(SeriesError::MalformedSample {
                timestamp: sample.timestamp,
                field: indicator,
            })
    };

    Ok([
        point(Indicator::Open)?,
        point(Indicator::High)?,
        point(Indicator::Low)?,
        point(Indicator::Close)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{minute, sample, window};

    #[test]
    fn four_points_per_sample() {
        let samples = window(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        let points = reshape(&samples).unwrap();

        assert_eq!(points.len(), 4 * samples.len());
        for indicator in Indicator::ALL {
            let count = points.iter().filter(|p| p.indicator == indicator).count();
            assert_eq!(count, samples.len(), "{indicator}");
        }
    }

    #[test]
    fn follows_input_order() {
        let samples = window(&[10.0, 20.0, 30.0]);
        let points = reshape(&samples).unwrap();

        let timestamps: Vec<_> = points.chunks(4).map(|row| row[0].timestamp).collect();
        let expected: Vec<_> = samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, expected);

        let first_row: Vec<_> = points[..4].iter().map(|p| p.indicator).collect();
        assert_eq!(first_row, Indicator::ALL.to_vec());
    }

    #[test]
    fn deterministic() {
        let samples = window(&[1.5, 2.5, 3.5, 2.0]);
        assert_eq!(reshape(&samples).unwrap(), reshape(&samples).unwrap());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(reshape(&[]), Err(SeriesError::EmptyInput));
        assert_eq!(
            reshape_with(&[], MalformedPolicy::Skip),
            Err(SeriesError::EmptyInput)
        );
    }

    #[test]
    fn missing_close_fails_the_window() {
        let mut samples = window(&[100.0, 101.0, 102.0]);
        samples[1].close = None;

        let err = reshape(&samples).unwrap_err();
        assert_eq!(
            err,
            SeriesError::MalformedSample {
                timestamp: samples[1].timestamp,
                field: Indicator::Close,
            }
        );
    }

    #[test]
    fn missing_close_is_skipped_and_reported() {
        let mut samples = window(&[100.0, 101.0, 102.0]);
        samples[1].close = None;

        let reshaped = reshape_with(&samples, MalformedPolicy::Skip).unwrap();
        assert_eq!(reshaped.points.len(), 8);
        assert_eq!(reshaped.skipped.len(), 1);
        assert!(reshaped
            .points
            .iter()
            .all(|p| p.timestamp != samples[1].timestamp));

        // the surviving rows are exactly what a clean window would produce
        let clean = reshape(&[samples[0].clone(), samples[2].clone()]).unwrap();
        assert_eq!(reshaped.points, clean);
    }

    #[test]
    fn skipping_everything_is_empty_input() {
        let mut only = sample(minute(0), 1.0);
        only.open = None;
        assert_eq!(
            reshape_with(&[only], MalformedPolicy::Skip),
            Err(SeriesError::EmptyInput)
        );
    }

    #[test]
    fn non_finite_values_are_malformed() {
        let mut bad = sample(minute(0), 1.0);
        bad.high = Some(f64::NAN);
        assert!(matches!(
            reshape(&[bad]),
            Err(SeriesError::MalformedSample {
                field: Indicator::High,
                ..
            })
        ));
    }

    #[test]
    fn missing_volume_is_fine() {
        let mut s = sample(minute(0), 1.0);
        s.volume = None;
        assert_eq!(reshape(&[s]).unwrap().len(), 4);
    }
}
