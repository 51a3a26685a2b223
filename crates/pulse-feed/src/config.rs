use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// Provider credential. Read once at start-up; `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Sampling interval of the intraday series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interval {
    #[default]
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    SixtyMinutes,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1min",
            Interval::FiveMinutes => "5min",
            Interval::FifteenMinutes => "15min",
            Interval::ThirtyMinutes => "30min",
            Interval::SixtyMinutes => "60min",
        }
    }

    /// Key of the series object in the provider's payload, e.g., `Time Series (1min)`.
    pub fn series_key(&self) -> String {
        format!("Time Series ({})", self.as_str())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1min" => Ok(Interval::OneMinute),
            "5min" => Ok(Interval::FiveMinutes),
            "15min" => Ok(Interval::FifteenMinutes),
            "30min" => Ok(Interval::ThirtyMinutes),
            "60min" => Ok(Interval::SixtyMinutes),
            _ => Err(format!(
                "unknown interval `{s}`; expected 1min, 5min, 15min, 30min or 60min"
            )),
        }
    }
}

/// `compact` returns the latest ~100 samples, `full` the whole trailing month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputSize {
    #[default]
    Compact,
    Full,
}

impl OutputSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

impl FromStr for OutputSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compact" => Ok(OutputSize::Compact),
            "full" => Ok(OutputSize::Full),
            _ => Err(format!("unknown output size `{s}`; expected compact or full")),
        }
    }
}

/// Everything the fetcher needs, fixed at process start.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    pub symbol: String,
    pub interval: Interval,
    pub output_size: OutputSize,
    /// Samples kept from the front of the provider's (newest-first) series.
    pub window: usize,
    pub timeout: Duration,
    pub user_agent: String,
    pub api_key: ApiKey,
    /// Provider ceiling: at most `budget_calls` requests per `budget_period`.
    pub budget_calls: usize,
    pub budget_period: Duration,
}

impl FeedConfig {
    pub fn new(symbol: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            symbol: symbol.into().to_uppercase(),
            interval: Interval::default(),
            output_size: OutputSize::default(),
            window: 50,
            timeout: Duration::from_secs(10),
            user_agent: format!("pulse/{}", env!("CARGO_PKG_VERSION")),
            api_key,
            budget_calls: 5,
            budget_period: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_never_debug_printed() {
        let config = FeedConfig::new("aapl", ApiKey::new("SECRET123"));
        let printed = format!("{config:?}");
        assert!(!printed.contains("SECRET123"));
        assert_eq!(config.symbol, "AAPL");
    }

    #[test]
    fn interval_round_trip() {
        for s in ["1min", "5min", "15min", "30min", "60min"] {
            assert_eq!(s.parse::<Interval>().unwrap().as_str(), s);
        }
        assert!("2min".parse::<Interval>().is_err());
        assert_eq!(Interval::OneMinute.series_key(), "Time Series (1min)");
    }
}
