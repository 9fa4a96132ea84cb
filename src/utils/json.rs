//! # JSON helpers
//!
//! Map documents come from JavaScript-era tooling, so numbers follow JS
//! semantics: `10.0` and `10` are the same integer, and anything else
//! (strings, booleans, fractions) is not an integer at all.

use serde_json::{Map, Number, Value};

/// Reads an integer with strict-equality semantics.
///
/// ```
/// use serde_json::json;
/// use sector_edit::utils::json::strict_int;
///
/// assert_eq!(strict_int(&json!(10)), Some(10));
/// assert_eq!(strict_int(&json!(10.0)), Some(10));
/// assert_eq!(strict_int(&json!(10.5)), None);
/// assert_eq!(strict_int(&json!("10")), None);
/// ```
pub fn strict_int(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

pub fn finite_f64(value: &Value) -> Option<f64> {
    value.as_f64().filter(|f| f.is_finite())
}

pub fn field_f64(object: &Map<String, Value>, key: &str) -> Option<f64> {
    object.get(key).and_then(finite_f64)
}

pub fn field_int(object: &Map<String, Value>, key: &str) -> Option<i64> {
    object.get(key).and_then(strict_int)
}

/// Converts a float to a JSON number, writing integral values as integers.
/// Non-finite input becomes `null`.
pub fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// True for string, number, boolean and null values.
pub fn is_primitive(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => true,
        Value::Number(n) => n.as_f64().map_or(true, f64::is_finite),
        Value::Array(_) | Value::Object(_) => false,
    }
}
