//! INSPIRE API response parsing.

use crate::error::{InspireError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

/// Decoded `/literature` search response.
#[derive(Debug, Clone)]
pub struct LiteratureResponse {
    /// Raw hit objects, in API order.
    pub hits: Vec<Value>,
    /// Total number of matches on the server (may exceed `hits.len()`).
    pub total: u64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    hits: ApiHits,
}

#[derive(Debug, Deserialize)]
struct ApiHits {
    hits: Vec<Value>,
    #[serde(default)]
    total: Option<Value>,
}

/// Parse a literature search body into its hits.
pub fn parse_literature_response(json: &str) -> Result<LiteratureResponse> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| InspireError::Parse(format!("Invalid INSPIRE JSON: {}", e)))?;
    let response: ApiResponse = serde_json::from_value(value).map_err(|e| {
        InspireError::Parse(format!("Response lacks the hits.hits array: {}", e))
    })?;

    let returned = response.hits.hits.len() as u64;
    // Older deployments report `total` as `{"value": n}`.
    let total = response
        .hits
        .total
        .as_ref()
        .and_then(|t| t.as_u64().or_else(|| t["value"].as_u64()))
        .unwrap_or(returned);

    Ok(LiteratureResponse {
        hits: response.hits.hits,
        total,
    })
}

/// The record metadata of a hit.
///
/// Search hits wrap the record in `metadata`; a bare metadata object is passed
/// through unchanged.
pub fn hit_metadata(hit: Value) -> Result<serde_json::Map<String, Value>> {
    match hit {
        Value::Object(mut map) => match map.remove("metadata") {
            Some(Value::Object(metadata)) => Ok(metadata),
            Some(_) => Err(InspireError::Parse(
                "hit metadata is not a JSON object".to_string(),
            )),
            None => Ok(map),
        },
        other => Err(InspireError::Parse(format!(
            "expected a JSON object for a record, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse `YYYY`, `YYYY-MM` or `YYYY-MM-DD`; missing parts default to 1.
pub fn parse_partial_date(date: &str) -> Option<NaiveDate> {
    let mut parts = date.trim().splitn(3, '-');
    let year: i32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = match parts.next() {
        Some(m) => m.trim().parse().ok()?,
        None => 1,
    };
    let day: u32 = match parts.next() {
        Some(d) => d.trim().get(..2).unwrap_or(d.trim()).parse().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Year embedded in a texkey: the four digits after the colon ("Weinberg:1967tq").
pub fn year_from_texkey(texkey: &str) -> Option<i32> {
    let (_, rest) = texkey.split_once(':')?;
    let digits = rest.get(..4)?;
    if digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

/// Custom deserializer for year fields that accepts both string and integer.
pub(crate) fn deserialize_year_option<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct YearVisitor;

    impl<'de> Visitor<'de> for YearVisitor {
        type Value = Option<i32>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, integer, or null")
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(YearValueVisitor)
        }
    }

    struct YearValueVisitor;

    impl<'de> Visitor<'de> for YearValueVisitor {
        type Value = Option<i32>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.trim().parse().ok())
        }

        fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(i32::try_from(v).ok())
        }

        fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(i32::try_from(v).ok())
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_option(YearVisitor)
}
