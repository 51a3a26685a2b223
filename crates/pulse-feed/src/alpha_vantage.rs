use crate::api::{Http, QuoteSource};
use crate::common_de::{de_opt_f64, parse_timestamp, InOrder};
use crate::config::FeedConfig;
use crate::error::{FeedError, Result};
use crate::rate::RateBudget;
use async_trait::async_trait;
use pulse_series::RawSample;
use reqwest::{Client as HttpClient, Url};
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Intraday quotes from Alpha Vantage, for a single symbol
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct AlphaVantage {
    http_client: HttpClient,
    config: FeedConfig,
    budget: Mutex<RateBudget>,
}

impl AlphaVantage {
    /// Build the HTTP client once; it is reused for every refresh cycle.
    pub fn new(config: FeedConfig) -> Result<Self> {
        let http_client = reqwest::ClientBuilder::new()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()?;
        Ok(Self::with_client(http_client, config))
    }

    pub fn with_client(http_client: HttpClient, config: FeedConfig) -> Self {
        let budget = RateBudget::new(config.budget_calls, config.budget_period);
        Self {
            http_client,
            config,
            budget: Mutex::new(budget),
        }
    }

    /// Request URL for the configured symbol. Every parameter is form-encoded, so a symbol
    /// cannot add or override query parameters.
    pub fn url(&self) -> Result<Url> {
        self.query_url(self.config.api_key.expose())
    }

    /// Same URL with the key masked; the only form that gets logged.
    pub fn shown_url(&self) -> Result<Url> {
        self.query_url("****")
    }

    fn query_url(&self, api_key: &str) -> Result<Url> {
        let FeedConfig {
            base_url,
            symbol,
            interval,
            output_size,
            ..
        } = &self.config;
        let base = format!("{}/query", base_url.trim_end_matches('/'));
        Url::parse_with_params(
            &base,
            &[
                ("function", "TIME_SERIES_INTRADAY"),
                ("symbol", symbol.as_str()),
                ("interval", interval.as_str()),
                ("outputsize", output_size.as_str()),
                ("apikey", api_key),
            ],
        )
        .map_err(|e| FeedError::InvalidUrl(format!("{base}: {e}")))
    }
}

// -------------------------------------------------------------------------------------------------

#[async_trait]
impl Http<Vec<RawSample>> for AlphaVantage {
    async fn fetch(&self, http_client: &HttpClient) -> Result<Vec<RawSample>> {
        let symbol = &self.config.symbol;

        // spend from the budget before touching the network
        if let Err(wait) = self.budget.lock().await.try_acquire() {
            warn!("[{symbol}] call refused locally, budget frees up in {wait:?}");
            return Err(FeedError::RateLimited(format!(
                "client budget of {} calls per {:?} spent; next call in {:?}",
                self.config.budget_calls, self.config.budget_period, wait
            )));
        }

        let url = self.url()?;
        let shown_url = self.shown_url()?;
        trace!("fetching intraday quotes for [{symbol}] from {shown_url}");
        let envelope: Envelope = self
            .fetch_de(http_client, url.as_str(), shown_url.as_str())
            .await?;

        if let Some(meta) = &envelope.meta {
            if let Some(echoed) = meta.symbol.as_deref().filter(|echoed| *echoed != symbol.as_str()) {
                warn!("[{symbol}] provider answered for \"{echoed}\"");
            }
            if let Some(last_refreshed) = &meta.last_refreshed {
                debug!("[{symbol}] provider last refreshed at {last_refreshed}");
            }
        }

        trace!("transforming intraday quotes for [{symbol}]");
        envelope.into_samples(&self.config.interval.series_key())
    }
}

#[async_trait]
impl QuoteSource for AlphaVantage {
    fn symbol(&self) -> &str {
        &self.config.symbol
    }

    /// The most recent `window` samples, in provider order (newest first).
    async fn samples(&self) -> Result<Vec<RawSample>> {
        let time = std::time::Instant::now();
        let mut samples = self.fetch(&self.http_client).await?;
        samples.truncate(self.config.window);
        debug!(
            "[{}] {} samples fetched. Elapsed time: {} ms",
            self.config.symbol,
            samples.len(),
            time.elapsed().as_millis()
        );
        Ok(samples)
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// Every shape the `TIME_SERIES_INTRADAY` endpoint answers with. The series object's key
/// depends on the interval (`Time Series (1min)`, `Time Series (5min)`, ...).
#[derive(Debug, Default, PartialEq)]
pub struct Envelope {
    pub meta: Option<MetaData>,
    pub series: Option<(String, InOrder<Bar>)>,
    pub error: Option<String>,
    pub note: Option<String>,
    pub information: Option<String>,
}

/// Only logged; a payload with an unusual `Meta Data` block still decodes.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MetaData {
    #[serde(rename = "2. Symbol", default)]
    pub symbol: Option<String>,
    #[serde(rename = "3. Last Refreshed", default)]
    pub last_refreshed: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Bar {
    #[serde(rename = "1. open", default, deserialize_with = "de_opt_f64")]
    pub open: Option<f64>,
    #[serde(rename = "2. high", default, deserialize_with = "de_opt_f64")]
    pub high: Option<f64>,
    #[serde(rename = "3. low", default, deserialize_with = "de_opt_f64")]
    pub low: Option<f64>,
    #[serde(rename = "4. close", default, deserialize_with = "de_opt_f64")]
    pub close: Option<f64>,
    #[serde(rename = "5. volume", default, deserialize_with = "de_opt_f64")]
    pub volume: Option<f64>,
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EnvelopeVisitor;

        impl<'de> Visitor<'de> for EnvelopeVisitor {
            type Value = Envelope;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an Alpha Vantage response object")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Envelope, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut envelope = Envelope::default();
                while let Some(key) = map.next_key::<String>()? {
                    if key.starts_with("Time Series") {
                        let bars: InOrder<Bar> = map.next_value()?;
                        envelope.series = Some((key, bars));
                        continue;
                    }
                    match key.as_str() {
                        "Meta Data" => envelope.meta = Some(map.next_value()?),
                        "Error Message" => envelope.error = Some(map.next_value()?),
                        "Note" => envelope.note = Some(map.next_value()?),
                        "Information" => envelope.information = Some(map.next_value()?),
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(envelope)
            }
        }

        deserializer.deserialize_map(EnvelopeVisitor)
    }
}

impl Envelope {
    /// Turn the payload into samples, or into the error the provider was trying to tell us.
    pub fn into_samples(self, expected_key: &str) -> Result<Vec<RawSample>> {
        if let Some((key, bars)) = self.series {
            if key != expected_key {
                warn!("expected \"{expected_key}\" but the payload carried \"{key}\"");
            }
            return bars
                .0
                .into_iter()
                .map(|(timestamp, bar)| {
                    Ok(RawSample {
                        timestamp: parse_timestamp(&timestamp)?,
                        open: bar.open,
                        high: bar.high,
                        low: bar.low,
                        close: bar.close,
                        volume: bar.volume,
                    })
                })
                .collect();
        }

        if let Some(message) = self.error {
            return Err(classify(message, FeedError::Rejected));
        }
        if let Some(note) = self.note {
            return Err(FeedError::RateLimited(note));
        }
        if let Some(information) = self.information {
            return Err(classify(information, FeedError::RateLimited));
        }
        Err(FeedError::MissingSeries(expected_key.to_string()))
    }
}

/// The provider reports key problems and quota exhaustion through the same fields as
/// everything else. Its quota messages also mention "your API key", so they are matched first.
fn classify(message: String, otherwise: fn(String) -> FeedError) -> FeedError {
    let lower = message.to_lowercase();
    if ["rate limit", "call frequency", "requests per"]
        .iter()
        .any(|phrase| lower.contains(phrase))
    {
        FeedError::RateLimited(message)
    } else if lower.contains("apikey") || lower.contains("api key") {
        FeedError::Unauthorized(message)
    } else {
        otherwise(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;

    const PAYLOAD: &str = r#"{
        "Meta Data": {
            "1. Information": "Intraday (1min) open, high, low, close prices and volume",
            "2. Symbol": "AAPL",
            "3. Last Refreshed": "2024-01-05 19:59:00",
            "4. Interval": "1min",
            "5. Output Size": "Compact",
            "6. Time Zone": "US/Eastern"
        },
        "Time Series (1min)": {
            "2024-01-05 19:59:00": {"1. open": "181.2000", "2. high": "181.3000", "3. low": "181.1000", "4. close": "181.2500", "5. volume": "1520"},
            "2024-01-05 19:58:00": {"1. open": "181.1000", "2. high": "181.2000", "3. low": "181.0000", "4. close": "181.2000", "5. volume": "930"},
            "2024-01-05 19:57:00": {"1. open": "181.0000", "2. high": "181.1500", "3. low": "180.9000", "4. close": "181.1000"}
        }
    }"#;

    #[test]
    fn decodes_in_provider_order() {
        let envelope: Envelope = serde_json::from_str(PAYLOAD).unwrap();
        assert_eq!(envelope.meta.as_ref().unwrap().symbol.as_deref(), Some("AAPL"));

        let samples = envelope.into_samples("Time Series (1min)").unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].timestamp.to_string(), "2024-01-05 19:59:00");
        assert_eq!(samples[2].timestamp.to_string(), "2024-01-05 19:57:00");
        assert_eq!(samples[0].high, Some(181.3));
        assert_eq!(samples[2].volume, None);
    }

    #[test]
    fn missing_close_survives_decoding() {
        let json = r#"{"Time Series (1min)": {"2024-01-05 19:59:00": {"1. open": "1", "2. high": "2", "3. low": "0.5"}}}"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        let samples = envelope.into_samples("Time Series (1min)").unwrap();
        assert_eq!(samples[0].close, None);
    }

    #[test]
    fn provider_messages() {
        let decode = |json: &str| {
            serde_json::from_str::<Envelope>(json)
                .unwrap()
                .into_samples("Time Series (1min)")
                .unwrap_err()
        };

        assert!(matches!(
            decode(r#"{"Error Message": "Invalid API call. Please retry or visit the documentation."}"#),
            FeedError::Rejected(_)
        ));
        assert!(matches!(
            decode(r#"{"Error Message": "the parameter apikey is invalid or missing."}"#),
            FeedError::Unauthorized(_)
        ));
        assert!(matches!(
            decode(r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#),
            FeedError::RateLimited(_)
        ));
        assert!(matches!(
            decode(r#"{"Information": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#),
            FeedError::RateLimited(_)
        ));
        assert!(matches!(
            decode(r#"{"Information": "We have detected your API key as ABC123 and our standard API rate limit is 25 requests per day. Please subscribe to any of the premium plans."}"#),
            FeedError::RateLimited(_)
        ));
        assert!(matches!(
            decode(r#"{"Information": "Please provide a valid API key."}"#),
            FeedError::Unauthorized(_)
        ));
        assert!(matches!(decode(r#"{}"#), FeedError::MissingSeries(_)));
    }

    #[test]
    fn bad_timestamp() {
        let json = r#"{"Time Series (1min)": {"soon": {"1. open": "1"}}}"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert!(matches!(
            envelope.into_samples("Time Series (1min)"),
            Err(FeedError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn url_carries_every_parameter() {
        let mut config = FeedConfig::new("aapl", ApiKey::new("KEY"));
        config.base_url = "http://localhost:8000/".to_string();
        let feed = AlphaVantage::with_client(HttpClient::new(), config);
        assert_eq!(
            feed.url().unwrap().as_str(),
            "http://localhost:8000/query?function=TIME_SERIES_INTRADAY&symbol=AAPL&interval=1min&outputsize=compact&apikey=KEY"
        );
        assert!(!feed.shown_url().unwrap().as_str().contains("KEY"));
    }

    #[test]
    fn symbol_cannot_inject_parameters() {
        let feed = AlphaVantage::with_client(
            HttpClient::new(),
            FeedConfig::new("aapl&apikey=evil#x", ApiKey::new("KEY")),
        );
        let url = feed.url().unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        let values = |name: &str| -> Vec<&str> {
            pairs
                .iter()
                .filter(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
                .collect()
        };
        assert_eq!(values("symbol"), vec!["AAPL&APIKEY=EVIL#X"]);
        assert_eq!(values("apikey"), vec!["KEY"]);
        assert_eq!(values("APIKEY"), Vec::<&str>::new());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn unusual_meta_data_still_decodes() {
        let json = r#"{
            "Meta Data": {"1. Information": "x"},
            "Time Series (1min)": {"2024-01-05 19:59:00": {"1. open": "1", "2. high": "2", "3. low": "0.5", "4. close": "1.5"}}
        }"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.meta, Some(MetaData::default()));
        assert_eq!(envelope.into_samples("Time Series (1min)").unwrap().len(), 1);
    }
}
