//! Input normalization shared by the services.
//!
//! Strings are trimmed and blank-after-trim counts as absent. Numeric fields
//! accept either a JSON integer or a string holding one, matching what the
//! HTTP surface has always tolerated.

use serde_json::Value;

/// Trim a required text field; `None` when missing or blank.
pub fn required_text(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trim an optional text field, mapping blank to absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Interpret a JSON value as an integer. Floats, booleans, arrays, and
/// non-numeric strings are rejected.
pub fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
