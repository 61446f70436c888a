//! Runtime values.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value as Json;
use weft_ir::ValueType;

use crate::errors::{type_mismatch, EvalResult};

/// A value produced by evaluation.
///
/// Attribute text enters the interpreter as `Str`; richer values come from
/// databinding, `<data>`, queries and explicit `type` coercion.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "decimal",
            Value::Str(_) => "string",
            Value::List(_) => "array",
            Value::Map(_) => "object",
        }
    }

    /// Truthiness used by conditions.
    ///
    /// Strings are false when empty, `"0"`, or `"false"` in any case.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")),
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
        }
    }

    /// Numeric view: numbers as-is, strings that parse as numbers.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::Str(s) => Number::parse(s),
            Value::Null | Value::Bool(_) | Value::List(_) | Value::Map(_) => None,
        }
    }

    pub fn as_int(&self) -> EvalResult<i64> {
        match self.as_number() {
            Some(Number::Int(n)) => Ok(n),
            Some(Number::Float(f)) => {
                integral(f).ok_or_else(|| type_mismatch("integer", "decimal"))
            }
            None => Err(type_mismatch("integer", self.type_name())),
        }
    }

    /// Convert to the type named by a `type` attribute.
    pub fn coerce(self, ty: ValueType) -> EvalResult<Value> {
        match ty {
            ValueType::String => Ok(Value::Str(self.to_string())),
            ValueType::Integer => match self {
                Value::Bool(b) => Ok(Value::Int(i64::from(b))),
                other => other.as_int().map(Value::Int),
            },
            ValueType::Decimal => match self.as_number() {
                Some(n) => Ok(Value::Float(n.as_f64())),
                None => Err(type_mismatch("decimal", self.type_name())),
            },
            ValueType::Number => match self.as_number() {
                Some(n) => Ok(n.into()),
                None => Err(type_mismatch("number", self.type_name())),
            },
            ValueType::Boolean => match self {
                Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" | "1" => Ok(Value::Bool(true)),
                    "false" | "no" | "0" | "" => Ok(Value::Bool(false)),
                    _ => Err(type_mismatch("boolean", "string")),
                },
                other => Ok(Value::Bool(other.is_truthy())),
            },
            ValueType::Array => match self {
                Value::List(_) => Ok(self),
                Value::Null => Ok(Value::List(Vec::new())),
                Value::Str(s) => match serde_json::from_str::<Json>(&s) {
                    Ok(json @ Json::Array(_)) => Ok(Value::from_json(json)),
                    _ => Err(type_mismatch("array", "string")),
                },
                other => Err(type_mismatch("array", other.type_name())),
            },
            ValueType::Object => match self {
                Value::Map(_) => Ok(self),
                Value::Null => Ok(Value::Map(BTreeMap::new())),
                Value::Str(s) => match serde_json::from_str::<Json>(&s) {
                    Ok(json @ Json::Object(_)) => Ok(Value::from_json(json)),
                    _ => Err(type_mismatch("object", "string")),
                },
                other => Err(type_mismatch("object", other.type_name())),
            },
        }
    }

    pub fn from_json(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from_json).collect()),
            Json::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> Json {
        serde_json::to_value(self).unwrap_or(Json::Null)
    }

    /// Structural comparison; numbers compare across int/float and with
    /// numeric strings.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.as_f64().partial_cmp(&b.as_f64()),
                _ => None,
            },
        }
    }

    /// Loose equality: `1 == 1.0 == "1"`.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.loose_eq(vb))
            }
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "range and fraction are checked before the cast"
)]
fn integral(f: f64) -> Option<i64> {
    const LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53
    (f.fract() == 0.0 && f.abs() <= LIMIT).then(|| f as i64)
}

/// Rendering used by interpolation: null renders empty, strings raw,
/// collections as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::List(_) | Value::Map(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// A numeric operand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(n) = text.parse::<i64>() {
            return Some(Number::Int(n));
        }
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Number::Float)
    }

    #[expect(clippy::cast_precision_loss, reason = "mixed arithmetic widens to f64")]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Value::Int(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::str("").is_truthy());
        assert!(!Value::str("0").is_truthy());
        assert!(!Value::str("FALSE").is_truthy());
        assert!(Value::str("1").is_truthy());
        assert!(Value::str("no").is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::Float(0.5).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(Value::List(vec![Value::Null]).is_truthy());
    }

    #[test]
    fn test_coerce() {
        assert_eq!(
            Value::str("42").coerce(ValueType::Integer).unwrap(),
            Value::Int(42)
        );
        assert_eq!(
            Value::str("2.5").coerce(ValueType::Number).unwrap(),
            Value::Float(2.5)
        );
        assert_eq!(
            Value::Int(3).coerce(ValueType::String).unwrap(),
            Value::str("3")
        );
        assert_eq!(
            Value::str("yes").coerce(ValueType::Boolean).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Value::str("[1, \"a\"]").coerce(ValueType::Array).unwrap(),
            Value::List(vec![Value::Int(1), Value::str("a")])
        );
        assert!(Value::str("abc").coerce(ValueType::Integer).is_err());
        assert!(Value::str("2.5").coerce(ValueType::Integer).is_err());
    }

    #[test]
    fn test_display_for_interpolation() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        let map = Value::from_json(serde_json::json!({"b": 1, "a": [true]}));
        assert_eq!(map.to_string(), r#"{"a":[true],"b":1}"#);
    }

    #[test]
    fn test_loose_equality() {
        assert!(Value::Int(1).loose_eq(&Value::Float(1.0)));
        assert!(Value::Int(1).loose_eq(&Value::str("1")));
        assert!(!Value::str("a").loose_eq(&Value::str("b")));
        assert!(!Value::Null.loose_eq(&Value::Int(0)));
    }
}
