use std::fmt;

use serde::{Deserialize, Serialize};

/// Cell markers read as a missing value.
const MISSING_MARKERS: [&str; 5] = ["", "NA", "NaN", "nan", "null"];

/// A single feature cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Parses a raw CSV cell, `None` if the cell is missing.
    pub fn parse_cell(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if MISSING_MARKERS.contains(&raw) {
            return None;
        }

        if let Ok(i) = raw.parse::<i64>() {
            return Some(Value::Int(i));
        }

        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => Some(Value::Float(f)),
            Ok(_) => None,
            Err(_) => Some(Value::Text(raw.to_string())),
        }
    }

    /// The numeric view of the value, `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(_) => None,
        }
    }

    /// The canonical category this value belongs to.
    ///
    /// Integral floats collapse onto their integer spelling so that a code read
    /// as `7.0` from a CSV and `7` from a JSON payload are the same category.
    pub fn category_key(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                (*f as i64).to_string()
            }
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Int(i) => i.into(),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => s.into(),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cells() {
        assert_eq!(Value::parse_cell("12"), Some(Value::Int(12)));
        assert_eq!(Value::parse_cell(" 7369.5 "), Some(Value::Float(7369.5)));
        assert_eq!(Value::parse_cell("Hotel"), Some(Value::Text("Hotel".into())));
        assert_eq!(Value::parse_cell(""), None);
        assert_eq!(Value::parse_cell("NaN"), None);
        assert_eq!(Value::parse_cell("inf"), None);
    }

    #[test]
    fn integral_floats_share_a_category_with_ints() {
        assert_eq!(Value::Float(7.0).category_key(), Value::Int(7).category_key());
        assert_eq!(Value::Float(2.5).category_key(), "2.5");
        assert_eq!(Value::from("DOWNTOWN").category_key(), "DOWNTOWN");
    }

    #[test]
    fn ints_stay_ints_on_the_wire() {
        let json: serde_json::Value = Value::Int(12).into();
        assert_eq!(json.to_string(), "12");
        let json: serde_json::Value = Value::Float(12.0).into();
        assert_eq!(json.to_string(), "12.0");
    }
}
