//! # VELIXA VALUE TYPES
//!
//! **RAW FORM DATA** as handed over by form-submit handlers. Values are plain
//! JSON so records can come from a page, a file, or a test literal alike.
//! The coercions here reproduce the loose string/number semantics form fields
//! are expected to follow.

use crate::errors::VelixaError;
use serde_json::{Map, Value as JsonValue};

/// **DATA RECORD** - field name to raw value. A missing key means "absent".
pub type DataRecord = Map<String, JsonValue>;

pub const INVALID_RECORD: &str = "VELIXA_VALIDATION_INVALID_RECORD";

/// Unwraps a JSON object into a record.
pub fn record_from_json(value: JsonValue) -> Result<DataRecord, VelixaError> {
    match value {
        JsonValue::Object(map) => Ok(map),
        other => Err(VelixaError::Validation {
            code: INVALID_RECORD.to_string(),
            message: format!("Expected a JSON object for form data, got {}", kind_name(&other)),
        }),
    }
}

pub(crate) fn kind_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Shortest decimal rendering of a number, `5` rather than `5.0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

/// String form of a value, as used by pattern and email checks.
pub fn display_string(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(u)) => u.to_string(),
            _ => format_number(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| match item {
                JsonValue::Null => String::new(),
                other => display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        JsonValue::Object(_) => "[object Object]".to_string(),
    }
}

/// Numeric coercion. Anything that is not a number yields `NaN`.
pub fn to_number(value: &JsonValue) -> f64 {
    match value {
        JsonValue::Null => 0.0,
        JsonValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        JsonValue::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        JsonValue::String(s) => string_to_number(s),
        JsonValue::Array(items) => match items.as_slice() {
            [] => 0.0,
            [JsonValue::Null] => 0.0,
            [single] => string_to_number(&display_string(single)),
            _ => f64::NAN,
        },
        JsonValue::Object(_) => f64::NAN,
    }
}

/// Strips whitespace and the byte-order mark from both ends.
pub fn trim_blank(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

fn string_to_number(raw: &str) -> f64 {
    let trimmed = trim_blank(raw);
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return f64::NAN;
            }
            // Folded into f64 so values past u64 lose precision instead of
            // becoming NaN.
            return digits
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d));
        }
    }

    // Rust's float parser also takes "inf" and "nan"; plain numerals only.
    let numeral = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if numeral {
        trimmed.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Strict equality between a present value and another field's value.
pub fn strict_equals(value: &JsonValue, other: Option<&JsonValue>) -> bool {
    let Some(other) = other else {
        return false;
    };
    match (value, other) {
        (JsonValue::Number(a), JsonValue::Number(b)) => a.as_f64() == b.as_f64(),
        (JsonValue::Null, JsonValue::Null) => true,
        (JsonValue::Bool(a), JsonValue::Bool(b)) => a == b,
        (JsonValue::String(a), JsonValue::String(b)) => a == b,
        (JsonValue::Array(_), JsonValue::Array(_)) | (JsonValue::Object(_), JsonValue::Object(_)) => {
            value == other
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_json_object() {
        let record = record_from_json(json!({"username": "ada"})).unwrap();
        assert_eq!(record.get("username"), Some(&json!("ada")));
    }

    #[test]
    fn test_record_from_json_rejects_array() {
        match record_from_json(json!(["ada"])) {
            Err(VelixaError::Validation { code, message }) => {
                assert_eq!(code, INVALID_RECORD);
                assert!(message.contains("array"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_display_string() {
        assert_eq!(display_string(&json!(42)), "42");
        assert_eq!(display_string(&json!(1.5)), "1.5");
        assert_eq!(display_string(&json!(true)), "true");
        assert_eq!(display_string(&json!(["a", null, 3])), "a,,3");
        assert_eq!(display_string(&json!({"a": 1})), "[object Object]");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&json!(" 42 ")), 42.0);
        assert_eq!(to_number(&json!("0x1F")), 31.0);
        assert_eq!(to_number(&json!("1e3")), 1000.0);
        assert_eq!(to_number(&json!("-Infinity")), f64::NEG_INFINITY);
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!(["7"])), 7.0);
        assert!(to_number(&json!("inf")).is_nan());
        assert!(to_number(&json!("12abc")).is_nan());
        assert!(to_number(&json!([1, 2])).is_nan());
        assert!(to_number(&json!({})).is_nan());
    }

    #[test]
    fn test_to_number_radix_past_u64() {
        let wide = to_number(&json!(format!("0x1{}", "0".repeat(16))));
        assert_eq!(wide, 2f64.powi(64));
        assert!(wide > 1.8e19);

        let bits = to_number(&json!(format!("0b1{}", "0".repeat(70))));
        assert_eq!(bits, 2f64.powi(70));
        assert!(to_number(&json!("0x")).is_nan());
        assert_eq!(to_number(&json!("\u{FEFF}12")), 12.0);
    }

    #[test]
    fn test_strict_equals() {
        assert!(strict_equals(&json!("x"), Some(&json!("x"))));
        assert!(strict_equals(&json!(1), Some(&json!(1.0))));
        assert!(!strict_equals(&json!("1"), Some(&json!(1))));
        assert!(!strict_equals(&json!("x"), None));
    }
}
