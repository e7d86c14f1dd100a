// Response normalization
//
// The whitelist fields come back in two shapes depending on API version:
// a bare array of entry objects, or an object wrapping that array under
// `_items`. Both collapse into the same ordered `Vec`. Anything else, or
// a missing field, is an empty list rather than an error.

use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::models::{MacWhitelistItem, VendorItem};

/// Decode a response body into `T`, keeping the raw body on failure.
///
/// The body must be a JSON object. Derived struct decoding would also
/// accept a sequence and match fields by position.
pub fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    let decode_error = |message: String| {
        let body = String::from_utf8_lossy(bytes).into_owned();
        let preview: String = body.chars().take(200).collect();
        Error::Decode {
            message: format!("{message} (body preview: {preview:?})"),
            body,
        }
    };

    let value: Value = serde_json::from_slice(bytes).map_err(|e| decode_error(e.to_string()))?;
    if !value.is_object() {
        return Err(decode_error(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }
    T::deserialize(value).map_err(|e| decode_error(e.to_string()))
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

/// Resolve the list behind a whitelist-style field.
///
/// Accepts `[...]` or `{"_items": [...]}`; everything else is empty.
pub fn whitelist_items(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("_items") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    }
}

/// Normalize a `MacWhiteList` value into ordered entries.
///
/// Entries that are not objects or have no non-empty `Mac` are skipped.
pub fn normalize_mac_whitelist(value: &Value) -> Vec<MacWhitelistItem> {
    whitelist_items(value)
        .iter()
        .filter_map(Value::as_object)
        .filter_map(normalize_mac_entry)
        .collect()
}

fn normalize_mac_entry(entry: &Map<String, Value>) -> Option<MacWhitelistItem> {
    let mac = entry.get("Mac").and_then(Value::as_str)?;
    if mac.is_empty() {
        return None;
    }

    let description = entry
        .get("Description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    let expiration = entry
        .get("Expiration")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from);

    Some(MacWhitelistItem {
        mac: mac.to_owned(),
        description,
        expiration,
    })
}

/// Normalize a `VendorsWhiteList` value.
///
/// A missing `VendorName` becomes `""`; non-string prefixes are dropped.
pub fn normalize_vendors(value: &Value) -> Vec<VendorItem> {
    whitelist_items(value)
        .iter()
        .filter_map(Value::as_object)
        .map(|vendor| VendorItem {
            vendor_name: vendor
                .get("VendorName")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            vendor_prefixes: vendor
                .get("VendorPrefixes")
                .and_then(Value::as_array)
                .map(|prefixes| {
                    prefixes
                        .iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}

pub(crate) fn deserialize_mac_whitelist<'de, D>(
    deserializer: D,
) -> Result<Vec<MacWhitelistItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_mac_whitelist(&value))
}

pub(crate) fn deserialize_vendors<'de, D>(deserializer: D) -> Result<Vec<VendorItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_vendors(&value))
}
