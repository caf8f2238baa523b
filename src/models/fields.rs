//! Lenient readers for document fields.
//!
//! Listings are written by several clients over time, so a field may hold a
//! number in one document and a numeric string in the next. These readers
//! accept whatever shape is plausible and return `None` for the rest.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Non-blank text, or a number rendered as text
pub(super) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_of(&value))
}

pub(super) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

pub(super) fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(T::from(s)),
        _ => None,
    })
}

/// List of non-blank strings; other entries are dropped
pub(super) fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(text_of).collect(),
        // a single comma separated string, as older listings stored amenities
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

/// RFC 3339 text, epoch seconds, or a `{seconds, nanoseconds}` map
pub(super) fn lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(from_epoch),
        Value::Object(map) => map
            .get("seconds")
            .or_else(|| map.get("_seconds"))
            .and_then(Value::as_i64)
            .and_then(from_epoch),
        _ => None,
    })
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn from_epoch(seconds: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_number")]
        n: Option<f64>,
        #[serde(default, deserialize_with = "lenient_list")]
        list: Vec<String>,
        #[serde(default, deserialize_with = "lenient_timestamp")]
        at: Option<DateTime<Utc>>,
    }

    fn sample(value: Value) -> Sample {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn numbers_from_text() {
        assert_eq!(sample(json!({"n": "1,250"})).n, Some(1250.0));
        assert_eq!(sample(json!({"n": 3.5})).n, Some(3.5));
        assert_eq!(sample(json!({"n": true})).n, None);
        assert_eq!(sample(json!({})).n, None);
    }

    #[test]
    fn comma_separated_amenities() {
        let p = sample(json!({"list": "Gym, Pool, ,Lift"}));
        assert_eq!(p.list, vec!["Gym", "Pool", "Lift"]);
    }

    #[test]
    fn timestamp_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 12, 10, 0, 0).unwrap();
        assert_eq!(sample(json!({"at": "2024-03-12T10:00:00Z"})).at, Some(expected));
        assert_eq!(sample(json!({"at": expected.timestamp()})).at, Some(expected));
        assert_eq!(
            sample(json!({"at": {"seconds": expected.timestamp(), "nanoseconds": 0}})).at,
            Some(expected)
        );
        assert_eq!(sample(json!({"at": "yesterday"})).at, None);
    }
}
