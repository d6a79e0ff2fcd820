//! Timestamp handling for CRM API payloads. The API emits naive ISO 8601 timestamps that are
//! implicitly UTC (e.g. `2024-03-01T14:05:00.123456`) but RFC 3339 values with an offset are
//! accepted as well.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Milliseconds in a single day
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Parse a timestamp sent by the CRM API. Values without an offset are treated as UTC.
/// # Errors
/// This function will return an error if the value is neither RFC 3339 nor a naive ISO 8601
/// date time
pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Ok(date_time.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Whole days elapsed between `since` and `now`, rounding towards negative infinity. A timestamp
/// in the future therefore yields a negative day count.
pub fn elapsed_days(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - since).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Serde adapter for optional timestamp fields, used with `#[serde(with = "timestamp")]`
pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(date_time) => {
            serializer.serialize_some(&date_time.to_rfc3339_opts(SecondsFormat::Micros, true))
        }
        None => serializer.serialize_none(),
    }
}

/// Serde adapter for optional timestamp fields, used with `#[serde(with = "timestamp")]`. A value
/// that is not a valid timestamp is logged and decoded as [None] so a single bad record does not
/// fail a whole listing.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match parse(&raw) {
        Ok(date_time) => Ok(Some(date_time)),
        Err(error) => {
            log::warn!("Ignoring invalid timestamp `{raw}`. {error}");
            Ok(None)
        }
    }
}
