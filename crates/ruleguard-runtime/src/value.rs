//! Dynamic message instances.

use ruleguard_ir::{DurationValue, FieldType, ScalarKind, TimestampValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A message instance. Fields missing from `fields` are unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageValue {
    pub fields: BTreeMap<String, Value>,
}

/// A field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// An unset message, e.g. a sparse map value.
    Null,
    Bool(bool),
    Int(i64),
    #[serde(rename = "uint")]
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Enum(i32),
    Message(MessageValue),
    /// A set scalar wrapper around its inner value.
    Wrapper(Box<Value>),
    Any { type_url: String, value: Vec<u8> },
    Duration(DurationValue),
    Timestamp(TimestampValue),
    List(Vec<Value>),
    /// Entries in iteration order.
    Map(Vec<(Value, Value)>),
}

impl MessageValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether a field is set. `Null` counts as unset.
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some_and(|v| !matches!(v, Value::Null))
    }
}

impl Value {
    /// The value an unset field reads as, for types with a zero value.
    pub fn zero(ty: &FieldType) -> Option<Value> {
        Some(match ty {
            FieldType::Scalar(kind) => match kind {
                ScalarKind::Bool => Value::Bool(false),
                ScalarKind::String => Value::String(String::new()),
                ScalarKind::Bytes => Value::Bytes(Vec::new()),
                k if k.is_float() => Value::Float(0.0),
                k if k.is_unsigned() => Value::UInt(0),
                _ => Value::Int(0),
            },
            FieldType::Enum(_) => Value::Enum(0),
            FieldType::Repeated(_) => Value::List(Vec::new()),
            FieldType::Map { .. } => Value::Map(Vec::new()),
            FieldType::Message(_) | FieldType::WellKnown(_) => return None,
        })
    }

    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn map<K: Into<Value>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn wrapper(inner: impl Into<Value>) -> Self {
        Value::Wrapper(Box::new(inner.into()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, for type mismatch reasons.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Enum(_) => "enum",
            Value::Message(_) => "message",
            Value::Wrapper(_) => "wrapper",
            Value::Any { .. } => "any",
            Value::Duration(_) => "duration",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

/// Map keys and list indexes as they appear in field paths.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Value::Enum(n) => write!(f, "{n}"),
            Value::Message(m) => write!(f, "{{{} fields}}", m.fields.len()),
            Value::Wrapper(inner) => inner.fmt(f),
            Value::Any { type_url, .. } => f.write_str(type_url),
            Value::Duration(d) => write!(f, "{}.{:09}s", d.seconds, d.nanos),
            Value::Timestamp(t) => write!(f, "{}.{:09}", t.seconds, t.nanos),
            Value::List(items) => write!(f, "[{} items]", items.len()),
            Value::Map(entries) => write!(f, "{{{} pairs}}", entries.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<MessageValue> for Value {
    fn from(v: MessageValue) -> Self {
        Value::Message(v)
    }
}

impl From<DurationValue> for Value {
    fn from(v: DurationValue) -> Self {
        Value::Duration(v)
    }
}

impl From<TimestampValue> for Value {
    fn from(v: TimestampValue) -> Self {
        Value::Timestamp(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values() {
        assert_eq!(Value::zero(&FieldType::Scalar(ScalarKind::UInt32)), Some(Value::UInt(0)));
        assert_eq!(Value::zero(&FieldType::Scalar(ScalarKind::Float)), Some(Value::Float(0.0)));
        assert_eq!(Value::zero(&FieldType::Enum("E".into())), Some(Value::Enum(0)));
        assert_eq!(Value::zero(&FieldType::Message("M".into())), None);
    }

    #[test]
    fn null_is_unset() {
        let m = MessageValue::new().with("a", Value::Null).with("b", 1);
        assert!(!m.has("a"));
        assert!(m.has("b"));
        assert!(!m.has("c"));
    }

    #[test]
    fn serde_shape() {
        let v: MessageValue = serde_json::from_str(
            r#"{"name":{"string":"ab"},"tags":{"list":[{"string":"x"}]}}"#,
        )
        .unwrap();
        assert_eq!(v.get("name"), Some(&Value::String("ab".into())));
        assert_eq!(v.get("tags"), Some(&Value::List(vec![Value::String("x".into())])));
    }
}
