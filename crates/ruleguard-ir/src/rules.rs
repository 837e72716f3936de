//! Declarative validation rules.
//!
//! [`FieldRules`] pairs the generic embedded-message rules with at most one
//! kind-specific [`Rule`]. The JSON shape mirrors the rule names used in
//! schemas, e.g. `{"rule": {"int32": {"gt": 10, "lt": 20}}}`.

use crate::types::ScalarKind;
use serde::{Deserialize, Serialize};

/// Rules attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldRules {
    /// Generic rules for message-typed fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageRules>,
    /// Kind-specific rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<Rule>,
}

/// Rules for embedded messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageRules {
    /// Do not recurse into the embedded message's own validation.
    pub skip: bool,
    /// The field must be set.
    pub required: bool,
}

/// A kind-specific rule: one variant per rule kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Float(NumericRules<f32>),
    Double(NumericRules<f64>),
    Int32(NumericRules<i32>),
    Int64(NumericRules<i64>),
    #[serde(rename = "uint32")]
    UInt32(NumericRules<u32>),
    #[serde(rename = "uint64")]
    UInt64(NumericRules<u64>),
    #[serde(rename = "sint32")]
    SInt32(NumericRules<i32>),
    #[serde(rename = "sint64")]
    SInt64(NumericRules<i64>),
    Fixed32(NumericRules<u32>),
    Fixed64(NumericRules<u64>),
    #[serde(rename = "sfixed32")]
    SFixed32(NumericRules<i32>),
    #[serde(rename = "sfixed64")]
    SFixed64(NumericRules<i64>),
    Bool(BoolRules),
    String(StringRules),
    Bytes(BytesRules),
    Enum(EnumRules),
    Repeated(RepeatedRules),
    Map(MapRules),
    Any(AnyRules),
    Duration(DurationRules),
    Timestamp(TimestampRules),
}

/// Shared shape of the twelve numeric rule kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericRules<T> {
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<T>,
    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_list: Vec<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_in: Vec<T>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoolRules {
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
}

/// Named semantic validators for strings. At most one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringWellKnown {
    Email,
    Hostname,
    /// Hostname or IP address.
    Address,
    Ip,
    Ipv4,
    Ipv6,
    Uri,
    UriRef,
    Uuid,
    /// Replaced by a canonical `pattern` during checking.
    WellKnownRegex(KnownRegex),
}

/// Selector for the well-known regex table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnownRegex {
    #[default]
    Unknown,
    HttpHeaderName,
    HttpHeaderValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringRules {
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<String>,
    /// Exact length in runes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_len: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_len: Option<u64>,
    /// Exact length in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_contains: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_list: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_in: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub well_known: Option<StringWellKnown>,
    /// Strict header validation; unset means strict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BytesWellKnown {
    Ip,
    Ipv4,
    Ipv6,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BytesRules {
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_len: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_len: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<Vec<u8>>,
    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_list: Vec<Vec<u8>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_in: Vec<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub well_known: Option<BytesWellKnown>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumRules {
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<i32>,
    /// Only declared enum numbers are accepted.
    pub defined_only: bool,
    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_list: Vec<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_in: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatedRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    pub unique: bool,
    /// Rules applied to every element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldRules>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_pairs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pairs: Option<u64>,
    /// No value may be the absent message.
    pub no_sparse: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Box<FieldRules>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Box<FieldRules>>,
}

/// Rules for `Any` fields; `in`/`not_in` hold type URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnyRules {
    pub required: bool,
    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_list: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_in: Vec<String>,
}

/// A duration literal as written in a schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationValue {
    pub seconds: i64,
    pub nanos: i32,
}

/// A timestamp literal (seconds and nanos since the Unix epoch).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampValue {
    pub seconds: i64,
    pub nanos: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationRules {
    pub required: bool,
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<DurationValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<DurationValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<DurationValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<DurationValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<DurationValue>,
    #[serde(rename = "in", skip_serializing_if = "Vec::is_empty")]
    pub in_list: Vec<DurationValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_in: Vec<DurationValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampRules {
    pub required: bool,
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub constant: Option<TimestampValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<TimestampValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<TimestampValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<TimestampValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<TimestampValue>,
    /// Must be before the evaluation-time `now`.
    pub lt_now: bool,
    /// Must be after the evaluation-time `now`.
    pub gt_now: bool,
    /// Must be within this duration of `now`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub within: Option<DurationValue>,
}

impl FieldRules {
    pub fn rule(rule: Rule) -> Self {
        Self {
            message: None,
            rule: Some(rule),
        }
    }

    pub fn message(rules: MessageRules) -> Self {
        Self {
            message: Some(rules),
            rule: None,
        }
    }

    pub fn with_message(mut self, rules: MessageRules) -> Self {
        self.message = Some(rules);
        self
    }

    pub fn is_required(&self) -> bool {
        self.message.is_some_and(|m| m.required)
    }

    pub fn is_skipped(&self) -> bool {
        self.message.is_some_and(|m| m.skip)
    }
}

impl Rule {
    /// Schema-language name of the rule kind.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Float(_) => "float",
            Rule::Double(_) => "double",
            Rule::Int32(_) => "int32",
            Rule::Int64(_) => "int64",
            Rule::UInt32(_) => "uint32",
            Rule::UInt64(_) => "uint64",
            Rule::SInt32(_) => "sint32",
            Rule::SInt64(_) => "sint64",
            Rule::Fixed32(_) => "fixed32",
            Rule::Fixed64(_) => "fixed64",
            Rule::SFixed32(_) => "sfixed32",
            Rule::SFixed64(_) => "sfixed64",
            Rule::Bool(_) => "bool",
            Rule::String(_) => "string",
            Rule::Bytes(_) => "bytes",
            Rule::Enum(_) => "enum",
            Rule::Repeated(_) => "repeated",
            Rule::Map(_) => "map",
            Rule::Any(_) => "any",
            Rule::Duration(_) => "duration",
            Rule::Timestamp(_) => "timestamp",
        }
    }

    /// The scalar kind a scalar rule applies to.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        Some(match self {
            Rule::Float(_) => ScalarKind::Float,
            Rule::Double(_) => ScalarKind::Double,
            Rule::Int32(_) => ScalarKind::Int32,
            Rule::Int64(_) => ScalarKind::Int64,
            Rule::UInt32(_) => ScalarKind::UInt32,
            Rule::UInt64(_) => ScalarKind::UInt64,
            Rule::SInt32(_) => ScalarKind::SInt32,
            Rule::SInt64(_) => ScalarKind::SInt64,
            Rule::Fixed32(_) => ScalarKind::Fixed32,
            Rule::Fixed64(_) => ScalarKind::Fixed64,
            Rule::SFixed32(_) => ScalarKind::SFixed32,
            Rule::SFixed64(_) => ScalarKind::SFixed64,
            Rule::Bool(_) => ScalarKind::Bool,
            Rule::String(_) => ScalarKind::String,
            Rule::Bytes(_) => ScalarKind::Bytes,
            _ => return None,
        })
    }
}

impl StringRules {
    /// Strict unless explicitly disabled.
    pub fn is_strict(&self) -> bool {
        self.strict.unwrap_or(true)
    }
}

impl DurationValue {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    pub fn from_secs(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// Signed magnitude in nanoseconds.
    pub fn total_nanos(self) -> i128 {
        self.seconds as i128 * 1_000_000_000 + self.nanos as i128
    }
}

impl TimestampValue {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Nanoseconds since the Unix epoch.
    pub fn total_nanos(self) -> i128 {
        self.seconds as i128 * 1_000_000_000 + self.nanos as i128
    }
}
