//! Field coercion helpers for reading untrusted persisted records.
//!
//! The storage medium is foreign-written and schema drift across app
//! versions is expected, so every read coerces fields instead of failing.

use serde_json::Value;

use super::money_utils::coerce_amount;

/// String field, trimmed; `default` when absent or not a string.
pub fn str_field(record: &Value, key: &str, default: &str) -> String {
    match record.get(key).and_then(Value::as_str) {
        Some(s) => s.trim().to_string(),
        None => default.to_string(),
    }
}

/// Optional string field; empty strings collapse to `None`.
pub fn opt_str_field(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Integer amount field through the tolerant money parser.
pub fn amount_field(record: &Value, key: &str, fallback: i64) -> i64 {
    record
        .get(key)
        .map(|v| coerce_amount(v, fallback))
        .unwrap_or(fallback)
}

/// Boolean field; accepts JSON booleans and the strings "true"/"false".
pub fn bool_field(record: &Value, key: &str, default: bool) -> bool {
    match record.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => match s.trim() {
            "true" => true,
            "false" => false,
            _ => default,
        },
        _ => default,
    }
}

/// Array field; anything that is not an array reads as empty.
pub fn array_field<'a>(record: &'a Value, key: &str) -> &'a [Value] {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Percentage field clamped into `0..=100`.
pub fn percent_field(record: &Value, key: &str, fallback: u8) -> u8 {
    amount_field(record, key, i64::from(fallback)).clamp(0, 100) as u8
}
