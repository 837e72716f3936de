//! Reference evaluator for checked rule schemas.
//!
//! `ruleguard-runtime` applies the rules of a [`CheckedSchema`](ruleguard_check::CheckedSchema)
//! to dynamic [`MessageValue`]s. It plans checks with the same code the
//! generators use, so it reports the first violation with the path and reason
//! a generated routine would report.
//!
//! # Example
//!
//! ```
//! use ruleguard_ir::{Field, FieldRules, FieldType, Message, Rule, ScalarKind, Schema, StringRules};
//! use ruleguard_runtime::{MessageValue, Validator};
//!
//! let mut schema = Schema::new("demo.v1");
//! schema.add_message(Message::new(
//!     "User",
//!     vec![Field::new("name", FieldType::Scalar(ScalarKind::String)).with_rules(
//!         FieldRules::rule(Rule::String(StringRules {
//!             min_len: Some(3),
//!             ..Default::default()
//!         })),
//!     )],
//! ));
//! let validator = Validator::new(&ruleguard_check::check(&schema).unwrap()).unwrap();
//!
//! let err = validator
//!     .validate("User", &MessageValue::new().with("name", "ab"))
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "invalid name: value length must be at least 3 runes");
//! ```

pub mod error;
pub mod formats;
pub mod validator;
pub mod value;
pub mod violation;

pub use error::RuntimeError;
pub use validator::Validator;
pub use value::{MessageValue, Value};
pub use violation::Violation;
