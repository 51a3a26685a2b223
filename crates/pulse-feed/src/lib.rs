pub mod alpha_vantage;
pub mod api;
pub mod common_de;
pub mod config;
pub mod error;
pub mod rate;

pub use alpha_vantage::AlphaVantage;
pub use api::{Http, QuoteSource};
pub use config::{ApiKey, FeedConfig, Interval, OutputSize};
pub use error::{FeedError, Result};
pub use rate::RateBudget;
