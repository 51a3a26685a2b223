use crate::sample::Indicator;
use chrono::NaiveDateTime;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SeriesError>;

/// Failures of the pure reshape & projection layer.
///
/// None of these involve I/O; a caller that hits one has a sample window that cannot
/// produce the requested data product.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("no samples to reshape")]
    EmptyInput,

    #[error("sample at {timestamp} is missing a usable `{field}` value")]
    MalformedSample {
        timestamp: NaiveDateTime,
        field: Indicator,
    },

    #[error("need at least {needed} `{indicator}` points, found {found}")]
    InsufficientData {
        indicator: Indicator,
        needed: usize,
        found: usize,
    },

    #[error("earliest `{indicator}` value is zero, relative delta is undefined")]
    ZeroBaseline { indicator: Indicator },
}
