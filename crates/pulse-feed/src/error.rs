use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeedError>;

/// Everything that can go wrong between us & the market-data provider.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("request to provider failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("provider answered with HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("provider rejected the call: {0}")]
    Rejected(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("provider refused the API key: {0}")]
    Unauthorized(String),

    #[error("could not decode provider payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("payload carried no \"{0}\" object")]
    MissingSeries(String),

    #[error("invalid provider URL {0}")]
    InvalidUrl(String),

    #[error("invalid sample timestamp `{0}`")]
    InvalidTimestamp(String),
}
