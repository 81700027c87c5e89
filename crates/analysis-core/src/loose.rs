//! Lenient field decoding for agent-produced JSON.
//!
//! Agents routinely emit `"N/A"`, `""`, numbers wrapped in strings, or the
//! wrong type altogether. A single bad field must not sink the whole record,
//! so these helpers turn anything unusable into `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a JSON value into a finite `f64`.
///
/// Numbers pass through, strings are trimmed and parsed (a trailing `%` or
/// thousands separators are not accepted). NaN and infinities count as
/// missing.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
        .filter(|v| v.is_finite())
}

/// Coerce a JSON value into a string. Numbers and booleans are rendered,
/// arrays, objects and null are missing.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn deserialize_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_f64))
}

pub fn deserialize_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_string))
}

/// Required text field: strings, numbers and booleans are accepted, anything
/// else is an error.
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_string(&value).ok_or_else(|| serde::de::Error::custom("expected text"))
}

/// Decode a nested record leniently: a value of the wrong shape becomes
/// `None` rather than failing the enclosing record.
pub fn deserialize_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Decode a list leniently: a missing or non-array value becomes empty, and
/// elements that fail to decode are skipped.
pub fn deserialize_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
