use crate::error::{FeedError, Result};
use async_trait::async_trait;
use pulse_series::RawSample;
use reqwest::Client as HttpClient;
use std::fmt::Debug;
use tracing::error;

/// Provider framework.
///
/// Split into two parts, to keep the wire format apart from what the rest of the program
/// consumes;
///
/// 1. [`Http`] - how the provider's payload `T` is fetched & decoded.
/// 2. [`QuoteSource`] - how that payload becomes a window of `RawSample`s.
#[async_trait]
pub trait Http<T>: Send + Sync
where
    T: Debug + Send + Sync,
{
    /// How the data type `T` is fetched from the provider.
    async fn fetch(&self, http_client: &HttpClient) -> Result<T>;

    /// Pre-defined GET & JSON decode. `shown_url` is what gets logged, so callers can keep
    /// credentials out of the logs.
    async fn fetch_de<D>(&self, http_client: &HttpClient, url: &str, shown_url: &str) -> Result<D>
    where
        D: serde::de::DeserializeOwned + Send,
    {
        // reqwest errors carry the request URL, key included
        let response = http_client.get(url).send().await.map_err(|e| {
            let e = e.without_url();
            error!("failed fetching response from {shown_url}: {e}");
            e
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("{shown_url} answered with {status}");
            return Err(FeedError::Status(status));
        }

        let bytes = response.bytes().await.map_err(|e| {
            let e = e.without_url();
            error!("failed reading body from {shown_url}: {e}");
            e
        })?;

        let de: D = serde_json::from_slice(&bytes).map_err(|e| {
            error!("failed deserializing from {shown_url}: {e}");
            e
        })?;

        Ok(de)
    }
}

/// One window of samples per call; the refresh cycle only sees this.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    fn symbol(&self) -> &str;

    async fn samples(&self) -> Result<Vec<RawSample>>;
}
