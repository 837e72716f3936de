//! Intermediate representation for annotated schemas.
//!
//! A [`Schema`] is a set of messages whose fields optionally carry
//! declarative [`FieldRules`]. The IR has no behavior of its own: it is read
//! by the checker (`ruleguard-check`), the code generators
//! (`ruleguard-codegen`) and the reference evaluator (`ruleguard-runtime`).
//!
//! ```text
//! Schema ─┬─ Message ─┬─ Field ── FieldType
//!         │           │     └──── FieldRules ── message: MessageRules
//!         │           │                    └─── rule:    Rule (tagged union)
//!         │           └─ OneOf
//!         └─ EnumDef
//! ```
//!
//! # Example
//!
//! ```
//! use ruleguard_ir::{Field, FieldRules, FieldType, Message, NumericRules, Rule, ScalarKind, Schema};
//!
//! let mut schema = Schema::new("shop");
//! schema.add_message(Message::new(
//!     "Order",
//!     vec![Field::new("quantity", FieldType::Scalar(ScalarKind::Int32)).with_rules(
//!         FieldRules::rule(Rule::Int32(NumericRules {
//!             gt: Some(0),
//!             ..Default::default()
//!         })),
//!     )],
//! ));
//!
//! assert!(schema.message("Order").is_some());
//! ```

pub mod rules;
pub mod types;

pub use rules::{
    AnyRules, BoolRules, BytesRules, BytesWellKnown, DurationRules, DurationValue, EnumRules,
    FieldRules, KnownRegex, MapRules, MessageRules, NumericRules, RepeatedRules, Rule,
    StringRules, StringWellKnown, TimestampRules, TimestampValue,
};
pub use types::{
    EnumDef, EnumValue, Field, FieldType, Message, OneOf, ScalarKind, Schema, WellKnownType,
};
