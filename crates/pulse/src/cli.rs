use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pulse_feed::{Interval, OutputSize};
use pulse_series::{Indicator, MalformedPolicy};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing
    #[arg(long, value_enum, default_value_t = TraceLevel::INFO, ignore_case = true, global = true)]
    pub trace: TraceLevel,

    #[command(flatten)]
    pub feed: FeedArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single refresh cycle and print the card.
    Snapshot,

    /// Redraw the card in the terminal on every refresh cycle.
    Watch,

    /// Refresh on a timer and serve the dashboard as JSON over HTTP.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8080)]
        port: u16,

        /// Rows per page of the price table.
        #[arg(long, default_value_t = 10)]
        page_size: usize,
    },
}

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Equity symbol to follow.
    #[arg(long, default_value = "AAPL", global = true)]
    pub symbol: String,

    /// Sampling interval: 1min, 5min, 15min, 30min or 60min.
    #[arg(long, default_value = "1min", global = true)]
    pub interval: Interval,

    /// Provider output size: compact (~100 samples) or full.
    #[arg(long, default_value = "compact", global = true)]
    pub output_size: OutputSize,

    /// Number of most recent samples kept per cycle.
    #[arg(long, default_value_t = 50, global = true, value_parser = RangedU64ValueParser::<usize>::new().range(2..))]
    pub window: usize,

    /// Indicator the card reports on.
    #[arg(long, default_value = "high", global = true)]
    pub indicator: Indicator,

    /// What to do with a sample missing a price.
    #[arg(long, value_enum, default_value_t = OnMalformed::Fail, global = true)]
    pub on_malformed: OnMalformed,

    /// Seconds between refresh cycles.
    #[arg(long, default_value_t = 20, global = true, value_parser = RangedU64ValueParser::<u64>::new().range(1..))]
    pub period: u64,

    /// Request timeout, in seconds.
    #[arg(long, default_value_t = 10, global = true)]
    pub timeout: u64,

    /// Distance of the SELL label below the BUY label.
    #[arg(long, default_value_t = 1.0, global = true)]
    pub spread: f64,

    /// Space left above the sparkline's highest value.
    #[arg(long, default_value_t = 0.1, global = true)]
    pub headroom: f64,

    /// Provider base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum OnMalformed {
    /// Reject the whole window.
    Fail,
    /// Drop malformed samples and report them.
    Skip,
}

impl From<OnMalformed> for MalformedPolicy {
    fn from(value: OnMalformed) -> Self {
        match value {
            OnMalformed::Fail => MalformedPolicy::Fail,
            OnMalformed::Skip => MalformedPolicy::Skip,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["pulse", "snapshot"]);
        assert_eq!(cli.feed.symbol, "AAPL");
        assert_eq!(cli.feed.interval, Interval::OneMinute);
        assert_eq!(cli.feed.window, 50);
        assert_eq!(cli.feed.indicator, Indicator::High);
        assert_eq!(cli.feed.period, 20);
        assert_eq!(cli.trace, TraceLevel::INFO);
    }

    #[test]
    fn trace_level_ignores_case() {
        let cli = Cli::parse_from(["pulse", "watch", "--trace", "DEBUG"]);
        assert_eq!(cli.trace, TraceLevel::DEBUG);
    }

    #[test]
    fn global_args_after_subcommand() {
        let cli = Cli::parse_from([
            "pulse", "serve", "--port", "9000", "--symbol", "msft", "--indicator", "close",
            "--on-malformed", "skip",
        ]);
        assert!(matches!(cli.command, Commands::Serve { port: 9000, .. }));
        assert_eq!(cli.feed.symbol, "msft");
        assert_eq!(cli.feed.indicator, Indicator::Close);
        assert_eq!(MalformedPolicy::from(cli.feed.on_malformed), MalformedPolicy::Skip);
    }

    #[test]
    fn rejects_tiny_windows_and_volume() {
        assert!(Cli::try_parse_from(["pulse", "snapshot", "--window", "1"]).is_err());
        assert!(Cli::try_parse_from(["pulse", "snapshot", "--indicator", "volume"]).is_err());
    }
}
