//! Schema errors reported by the checker.

use std::fmt;

/// Category of a fatal schema error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaErrorKind {
    /// Rule kind does not fit the field's (effective) type.
    TypeMismatch,
    /// Two rules on the same node cannot be combined.
    ConflictingRules,
    /// A literal or bound is outside what the rule allows.
    OutOfRangeConstraint,
    /// A `pattern` does not compile.
    InvalidRegex,
    /// `defined_only` conflicts with an undeclared enum number.
    UndefinedEnumValue,
    /// Generic message rules used where a well-known type needs its own kind.
    InvalidWellKnownCombination,
}

/// The first invariant violation found in a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {message}")]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    /// `Message.field` plus `items`/`keys`/`values` segments for nested rules.
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchemaErrorKind::TypeMismatch => "type mismatch",
            SchemaErrorKind::ConflictingRules => "conflicting rules",
            SchemaErrorKind::OutOfRangeConstraint => "out of range constraint",
            SchemaErrorKind::InvalidRegex => "invalid regex",
            SchemaErrorKind::UndefinedEnumValue => "undefined enum value",
            SchemaErrorKind::InvalidWellKnownCombination => "invalid well-known combination",
        })
    }
}
