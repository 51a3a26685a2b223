use crate::error::{FeedError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::marker::PhantomData;

/// A JSON object read as `(key, value)` pairs in document order.
///
/// The provider keys its series by timestamp and lists them newest first; a `HashMap` or
/// `BTreeMap` would throw that order away.
#[derive(Debug, Clone, PartialEq)]
pub struct InOrder<V>(pub Vec<(String, V)>);

impl<'de, V> Deserialize<'de> for InOrder<V>
where
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct InOrderVisitor<V>(PhantomData<V>);

        impl<'de, V> Visitor<'de> for InOrderVisitor<V>
        where
            V: Deserialize<'de>,
        {
            type Value = InOrder<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(InOrder(entries))
            }
        }

        deserializer.deserialize_map(InOrderVisitor(PhantomData))
    }
}

/// Numbers arrive as strings, e.g., `"181.2000"`:
///
/// ```text
/// "181.2000"  -> Some(181.2)
/// 181.2       -> Some(181.2)
/// "" / null   -> None
/// "n/a"       -> None
/// ```
///
/// Unparseable values are treated as absent, so the reshape step can name the sample &
/// field instead of the whole payload failing to decode.
pub fn de_opt_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Deserialize::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(num)) => num.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Transform a provider timestamp into a `NaiveDateTime`, e.g.,
/// `2024-01-05 19:59:00` -> `2024-01-05T19:59:00`, or a bare date to midnight.
///
/// Timestamps are in the exchange's local time zone, hence naive.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| FeedError::InvalidTimestamp(raw.to_string()))
}
