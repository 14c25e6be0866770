//! Decode-with-default boundary for JSON-encoded text fields.
//!
//! Meeting list fields (participants, organizations, ...) are stored as
//! JSON text. Anything absent, empty or malformed decodes to the default
//! value; nothing past this module ever sees a parse error.

use serde::de::DeserializeOwned;

/// Decode `raw` as JSON into `T`, falling back to `T::default()`.
pub fn decode_or_default<T: DeserializeOwned + Default>(raw: Option<&str>) -> T {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return T::default();
    };
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("Falling back to default for malformed field: {}", e);
            T::default()
        }
    }
}

/// Decode a JSON string array, keeping only string entries.
///
/// Non-string array members (numbers, nulls, objects) are skipped rather than
/// failing the whole list.
pub fn decode_list(raw: Option<&str>) -> Vec<String> {
    let values: Vec<serde_json::Value> = decode_or_default(raw);
    values
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}
