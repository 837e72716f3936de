//! Schema, messages, fields and field types.

use crate::rules::FieldRules;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete schema: messages plus the enums they reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Namespace for generated code (e.g. "shop.v1").
    #[serde(default)]
    pub package: String,
    /// Message definitions, in output order.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Enum definitions referenced by `FieldType::Enum`.
    #[serde(default)]
    pub enums: Vec<EnumDef>,
}

/// A message definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message name; nested messages use dotted names (`Outer.Inner`).
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub oneofs: Vec<OneOf>,
    /// Emit a routine that accepts every instance.
    #[serde(default)]
    pub disabled: bool,
    /// Emit no routine at all.
    #[serde(default)]
    pub ignored: bool,
}

/// A named group of mutually exclusive fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OneOf {
    pub name: String,
    /// Names of the member fields.
    pub fields: Vec<String>,
    /// Fail when no member is set.
    #[serde(default)]
    pub required: bool,
}

/// A field in a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<FieldRules>,
    /// Name of the oneof this field belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oneof: Option<String>,
}

/// An enum definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub values: Vec<EnumValue>,
}

/// A declared enum value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

/// Scalar field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Double,
    Float,
    Int32,
    Int64,
    #[serde(rename = "uint32")]
    UInt32,
    #[serde(rename = "uint64")]
    UInt64,
    #[serde(rename = "sint32")]
    SInt32,
    #[serde(rename = "sint64")]
    SInt64,
    Fixed32,
    Fixed64,
    #[serde(rename = "sfixed32")]
    SFixed32,
    #[serde(rename = "sfixed64")]
    SFixed64,
    Bool,
    String,
    Bytes,
}

/// Message types with dedicated rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellKnownType {
    Any,
    Duration,
    Timestamp,
    /// Scalar wrapper message (`google.protobuf.Int32Value` etc.) holding a
    /// single `value` field of the given kind.
    Wrapper(ScalarKind),
}

/// The declared type of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Scalar(ScalarKind),
    /// Reference to an [`EnumDef`] by name.
    Enum(String),
    /// Reference to a [`Message`] by name.
    Message(String),
    WellKnown(WellKnownType),
    Repeated(Box<FieldType>),
    Map {
        key: ScalarKind,
        value: Box<FieldType>,
    },
}

impl Schema {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Default::default()
        }
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn add_enum(&mut self, def: EnumDef) {
        self.enums.push(def);
    }

    /// Look up a message by name.
    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.name == name)
    }

    /// Look up an enum by name.
    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name == name)
    }
}

impl Message {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            ..Default::default()
        }
    }

    pub fn with_oneof(mut self, oneof: OneOf) -> Self {
        self.oneofs.push(oneof);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that do not belong to any oneof, in declaration order.
    pub fn plain_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.oneof.is_none())
    }

    /// Members of a oneof, in declaration order.
    pub fn oneof_fields<'a>(&'a self, oneof: &'a OneOf) -> impl Iterator<Item = &'a Field> {
        self.fields
            .iter()
            .filter(move |f| oneof.fields.iter().any(|n| *n == f.name))
    }

    /// Identifier-safe form of the message name (`Outer.Inner` -> `Outer_Inner`).
    pub fn ident(&self) -> String {
        self.name.replace('.', "_")
    }
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            rules: None,
            oneof: None,
        }
    }

    pub fn with_rules(mut self, rules: FieldRules) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn in_oneof(mut self, oneof: impl Into<String>) -> Self {
        self.oneof = Some(oneof.into());
        self
    }
}

impl EnumDef {
    pub fn new(name: impl Into<String>, values: &[(&str, i32)]) -> Self {
        Self {
            name: name.into(),
            values: values
                .iter()
                .map(|(name, number)| EnumValue {
                    name: name.to_string(),
                    number: *number,
                })
                .collect(),
        }
    }

    pub fn is_defined(&self, number: i32) -> bool {
        self.values.iter().any(|v| v.number == number)
    }

    /// Declared numbers, deduplicated (aliases share a number).
    pub fn numbers(&self) -> Vec<i32> {
        let mut out: Vec<i32> = Vec::with_capacity(self.values.len());
        for v in &self.values {
            if !out.contains(&v.number) {
                out.push(v.number);
            }
        }
        out
    }
}

impl ScalarKind {
    /// Schema-language name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Double => "double",
            ScalarKind::Float => "float",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::UInt32 => "uint32",
            ScalarKind::UInt64 => "uint64",
            ScalarKind::SInt32 => "sint32",
            ScalarKind::SInt64 => "sint64",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::SFixed32 => "sfixed32",
            ScalarKind::SFixed64 => "sfixed64",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
            ScalarKind::Bytes => "bytes",
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, ScalarKind::Double | ScalarKind::Float)
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            ScalarKind::UInt32 | ScalarKind::UInt64 | ScalarKind::Fixed32 | ScalarKind::Fixed64
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl WellKnownType {
    pub fn name(self) -> &'static str {
        match self {
            WellKnownType::Any => "google.protobuf.Any",
            WellKnownType::Duration => "google.protobuf.Duration",
            WellKnownType::Timestamp => "google.protobuf.Timestamp",
            WellKnownType::Wrapper(ScalarKind::Double) => "google.protobuf.DoubleValue",
            WellKnownType::Wrapper(ScalarKind::Float) => "google.protobuf.FloatValue",
            WellKnownType::Wrapper(ScalarKind::Int64) => "google.protobuf.Int64Value",
            WellKnownType::Wrapper(ScalarKind::UInt64) => "google.protobuf.UInt64Value",
            WellKnownType::Wrapper(ScalarKind::Int32) => "google.protobuf.Int32Value",
            WellKnownType::Wrapper(ScalarKind::UInt32) => "google.protobuf.UInt32Value",
            WellKnownType::Wrapper(ScalarKind::Bool) => "google.protobuf.BoolValue",
            WellKnownType::Wrapper(ScalarKind::String) => "google.protobuf.StringValue",
            WellKnownType::Wrapper(ScalarKind::Bytes) => "google.protobuf.BytesValue",
            WellKnownType::Wrapper(_) => "google.protobuf.<unsupported wrapper>",
        }
    }

    /// Wrapper messages exist only for these nine scalar kinds.
    pub fn is_valid_wrapper(kind: ScalarKind) -> bool {
        matches!(
            kind,
            ScalarKind::Double
                | ScalarKind::Float
                | ScalarKind::Int64
                | ScalarKind::UInt64
                | ScalarKind::Int32
                | ScalarKind::UInt32
                | ScalarKind::Bool
                | ScalarKind::String
                | ScalarKind::Bytes
        )
    }
}

impl FieldType {
    pub fn repeated(elem: FieldType) -> Self {
        FieldType::Repeated(Box::new(elem))
    }

    pub fn map(key: ScalarKind, value: FieldType) -> Self {
        FieldType::Map {
            key,
            value: Box::new(value),
        }
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, FieldType::Repeated(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, FieldType::Map { .. })
    }

    /// Message-typed values: user messages and well-known types.
    pub fn is_embed(&self) -> bool {
        matches!(self, FieldType::Message(_) | FieldType::WellKnown(_))
    }

    /// Element type of a repeated field or value type of a map.
    pub fn element(&self) -> Option<&FieldType> {
        match self {
            FieldType::Repeated(elem) => Some(elem),
            FieldType::Map { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The scalar kind a wrapper wraps, if this is a wrapper.
    pub fn wrapped(&self) -> Option<ScalarKind> {
        match self {
            FieldType::WellKnown(WellKnownType::Wrapper(kind)) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(kind) => write!(f, "{kind}"),
            FieldType::Enum(name) => write!(f, "enum {name}"),
            FieldType::Message(name) => write!(f, "message {name}"),
            FieldType::WellKnown(wkt) => f.write_str(wkt.name()),
            FieldType::Repeated(elem) => write!(f, "repeated {elem}"),
            FieldType::Map { key, value } => write!(f, "map<{key}, {value}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_schema_programmatically() {
        let mut schema = Schema::new("shop");
        schema.add_enum(EnumDef::new("Status", &[("UNKNOWN", 0), ("ACTIVE", 1)]));
        schema.add_message(
            Message::new(
                "Order",
                vec![
                    Field::new("id", FieldType::Scalar(ScalarKind::String)),
                    Field::new("status", FieldType::Enum("Status".into())),
                    Field::new("email", FieldType::Scalar(ScalarKind::String)).in_oneof("contact"),
                ],
            )
            .with_oneof(OneOf {
                name: "contact".into(),
                fields: vec!["email".into()],
                required: true,
            }),
        );

        let order = schema.message("Order").unwrap();
        assert_eq!(order.plain_fields().count(), 2);
        assert_eq!(order.oneof_fields(&order.oneofs[0]).count(), 1);
        assert!(schema.enum_def("Status").unwrap().is_defined(1));
    }

    #[test]
    fn enum_numbers_skip_aliases() {
        let def = EnumDef::new("E", &[("A", 0), ("B", 1), ("B_ALIAS", 1)]);
        assert_eq!(def.numbers(), vec![0, 1]);
    }

    #[test]
    fn field_type_display() {
        let ty = FieldType::map(ScalarKind::String, FieldType::repeated(FieldType::Scalar(ScalarKind::Int32)));
        assert_eq!(ty.to_string(), "map<string, repeated int32>");
    }

    #[test]
    fn nested_message_ident() {
        assert_eq!(Message::new("Outer.Inner", vec![]).ident(), "Outer_Inner");
    }

    #[test]
    fn field_type_serde_shape() {
        let ty: FieldType = serde_json::from_str(r#"{"map":{"key":"string","value":{"message":"Item"}}}"#).unwrap();
        assert_eq!(ty, FieldType::map(ScalarKind::String, FieldType::Message("Item".into())));
        let wkt: FieldType = serde_json::from_str(r#"{"well_known":{"wrapper":"uint32"}}"#).unwrap();
        assert_eq!(wkt.wrapped(), Some(ScalarKind::UInt32));
    }
}
