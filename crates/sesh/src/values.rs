//! Conversions between command-line input, JSON and session values.

use anyhow::{Context as _, Result, bail};
use clap::ValueEnum;
use sesh_session::Value;

/// How to interpret a value given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueKind {
    /// Plain string
    Str,
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// true or false
    Bool,
    /// Any JSON document (objects become maps, arrays become lists)
    Json,
}

/// Parse `raw` as a session value of the given kind.
pub fn parse_value(raw: &str, kind: ValueKind) -> Result<Value> {
    let value = match kind {
        ValueKind::Str => Value::from(raw),
        ValueKind::Int => Value::Int(
            raw.trim()
                .parse()
                .with_context(|| format!("'{raw}' is not an integer"))?,
        ),
        ValueKind::Float => {
            let f: f64 = raw
                .trim()
                .parse()
                .with_context(|| format!("'{raw}' is not a number"))?;
            if !f.is_finite() {
                bail!("'{raw}' is not a finite number");
            }
            Value::Float(f)
        }
        ValueKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Value::Bool(true),
            "false" | "no" | "0" => Value::Bool(false),
            _ => bail!("'{raw}' is not a boolean"),
        },
        ValueKind::Json => {
            let json: serde_json::Value =
                serde_json::from_str(raw).with_context(|| format!("'{raw}' is not valid JSON"))?;
            from_json(json)
        }
    };
    Ok(value)
}

/// Convert a JSON document into a session value.
pub fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => Value::List(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k, from_json(v)))
                .collect(),
        ),
    }
}

/// Convert a session value into plain JSON for display.
///
/// Bytes become an array of numbers; non-finite floats become null.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(b) => serde_json::Value::from(b.clone()),
        Value::List(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Map(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse_value("hi", ValueKind::Str).unwrap(), Value::from("hi"));
        assert_eq!(parse_value(" 42 ", ValueKind::Int).unwrap(), Value::Int(42));
        assert_eq!(parse_value("2.5", ValueKind::Float).unwrap(), Value::Float(2.5));
        assert_eq!(parse_value("yes", ValueKind::Bool).unwrap(), Value::Bool(true));
        assert_eq!(parse_value("FALSE", ValueKind::Bool).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_value("4x", ValueKind::Int).is_err());
        assert!(parse_value("inf", ValueKind::Float).is_err());
        assert!(parse_value("maybe", ValueKind::Bool).is_err());
        assert!(parse_value("{", ValueKind::Json).is_err());
    }

    #[test]
    fn test_parse_json() {
        let value = parse_value(r#"{"a": [1, 2.5, "x", null], "b": true}"#, ValueKind::Json)
            .unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(
            map["a"],
            Value::List(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::from("x"),
                Value::Null
            ])
        );
        assert_eq!(map["b"], Value::Bool(true));
    }

    #[test]
    fn test_to_json() {
        let value = parse_value(r#"{"a": [1, "x"], "b": {"c": false}}"#, ValueKind::Json)
            .unwrap();
        assert_eq!(
            to_json(&value),
            serde_json::json!({"a": [1, "x"], "b": {"c": false}})
        );
        assert_eq!(to_json(&Value::Bytes(vec![1, 2])), serde_json::json!([1, 2]));
    }
}
