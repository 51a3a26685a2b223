use crate::cli::FeedArgs;
use anyhow::{anyhow, Result};
use dotenv::var;
use pulse_feed::{ApiKey, FeedConfig};
use pulse_series::DashboardConfig;
use std::time::Duration;

pub const API_KEY_VAR: &str = "ALPHAVANTAGE_API_KEY";

/// Process-wide configuration; built once in `main` and never mutated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub feed: FeedConfig,
    pub dashboard: DashboardConfig,
    pub period: Duration,
}

impl Settings {
    /// Combine the command line with the environment (`.env` included).
    pub fn load(args: &FeedArgs) -> Result<Self> {
        let key = var(API_KEY_VAR).map_err(|_| anyhow!("{API_KEY_VAR} must be set"))?;
        let user_agent = var("USER_AGENT").ok();
        Self::build(args, ApiKey::new(key), user_agent)
    }

    pub fn build(args: &FeedArgs, api_key: ApiKey, user_agent: Option<String>) -> Result<Self> {
        if api_key.expose().trim().is_empty() {
            return Err(anyhow!("{API_KEY_VAR} is empty"));
        }

        let mut feed = FeedConfig::new(&args.symbol, api_key);
        feed.interval = args.interval;
        feed.output_size = args.output_size;
        feed.window = args.window;
        feed.timeout = Duration::from_secs(args.timeout);
        if let Some(base_url) = &args.base_url {
            feed.base_url = base_url.clone();
        }
        if let Some(user_agent) = user_agent {
            feed.user_agent = user_agent;
        }

        let dashboard = DashboardConfig {
            indicator: args.indicator,
            policy: args.on_malformed.into(),
            headroom: args.headroom,
            spread: args.spread,
        };

        Ok(Self {
            feed,
            dashboard,
            period: Duration::from_secs(args.period),
        })
    }
}
