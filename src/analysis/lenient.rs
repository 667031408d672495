//! Field deserializers that accept whatever JSON type the model produced
//!
//! Every helper succeeds for any input value. A value that cannot be read as
//! the target type falls back to that type's default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

use super::types::NutrientValue;

/// Deserializes a JSON object into `T`, falling back to `T::default()`
pub(crate) fn from_object<T>(value: Value) -> T
where
    T: DeserializeOwned + Default,
{
    match value {
        Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
        _ => T::default(),
    }
}

fn text_of(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_of(Value::deserialize(deserializer)?))
}

/// Numbers, numeric strings ("30", "30/100", " 42.5 ") or the default 0.0
pub(crate) fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => parse_leading_number(&s).unwrap_or_default(),
        _ => 0.0,
    })
}

fn parse_leading_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if let Ok(n) = trimmed.parse::<f64>() {
        return Some(n);
    }
    let end = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && *c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Booleans, "true"/"yes"/"1" style strings, or non-zero numbers
pub(crate) fn boolean<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    })
}

/// Enumerations matched exactly, then case-insensitively, else the default
///
/// The unrecognised-value variant is the default, so a candidate only wins if
/// it decodes to something else.
pub(crate) fn enumeration<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default + PartialEq,
{
    let value = Value::deserialize(deserializer)?;
    let Value::String(s) = value else {
        return Ok(T::default());
    };

    let candidates = [
        s.trim().to_string(),
        s.trim().to_lowercase(),
        s.trim().to_uppercase(),
    ];
    Ok(candidates
        .into_iter()
        .filter_map(|c| serde_json::from_value::<T>(Value::String(c)).ok())
        .find(|v| *v != T::default())
        .unwrap_or_default())
}

/// A list of strings; a lone string becomes a one-element list
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(|v| !v.is_null())
            .map(text_of)
            .collect(),
        Value::Null => Vec::new(),
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        other => vec![text_of(other)],
    })
}

/// A list of records; elements that are not objects are skipped
pub(crate) fn object_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .map(from_object)
            .collect(),
        item @ Value::Object(_) => vec![from_object(item)],
        _ => Vec::new(),
    })
}

pub(crate) fn nutrients<'de, D>(deserializer: D) -> Result<BTreeMap<String, NutrientValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map
            .into_iter()
            .map(|(name, value)| (name, NutrientValue::from(value)))
            .collect(),
        _ => BTreeMap::new(),
    })
}
