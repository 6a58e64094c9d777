//! Forgiving field decoders for tool arguments.
//!
//! A wrong-typed argument must reach the tool body so it can be reported as
//! an error-flagged result. These decoders never fail on a well-formed JSON
//! value: they coerce what they can and map the rest to `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A JSON string. Any other type decodes as absent.
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// A JSON number, or a string holding one.
pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A JSON boolean, a boolean-like string (`"true"`, `"f"`, `"1"`, ...), or a
/// number where non-zero means true.
pub fn boolean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::String(s) => parse_bool(&s),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        _ => None,
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Args {
        #[serde(default, deserialize_with = "super::string")]
        name: Option<String>,
        #[serde(default, deserialize_with = "super::number")]
        count: Option<f64>,
        #[serde(default, deserialize_with = "super::boolean")]
        flag: Option<bool>,
    }

    fn args(value: serde_json::Value) -> Args {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn well_typed_values_pass_through() {
        let a = args(json!({ "name": "basil", "count": 5, "flag": false }));
        assert_eq!(a.name.as_deref(), Some("basil"));
        assert_eq!(a.count, Some(5.0));
        assert_eq!(a.flag, Some(false));
    }

    #[test]
    fn missing_and_null_are_absent() {
        let a = args(json!({ "name": null }));
        assert_eq!(a.name, None);
        assert_eq!(a.count, None);
        assert_eq!(a.flag, None);
    }

    #[test]
    fn wrong_types_decode_as_absent() {
        let a = args(json!({ "name": 42, "count": [1], "flag": "maybe" }));
        assert_eq!(a.name, None);
        assert_eq!(a.count, None);
        assert_eq!(a.flag, None);
    }

    #[test]
    fn numeric_and_boolean_strings_coerce() {
        let a = args(json!({ "count": " 7 ", "flag": "FALSE" }));
        assert_eq!(a.count, Some(7.0));
        assert_eq!(a.flag, Some(false));
        assert_eq!(args(json!({ "flag": "t" })).flag, Some(true));
        assert_eq!(args(json!({ "flag": 0 })).flag, Some(false));
        assert_eq!(args(json!({ "flag": 1 })).flag, Some(true));
    }
}
