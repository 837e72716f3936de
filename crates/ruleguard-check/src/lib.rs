//! Static consistency checking for validation rules.
//!
//! [`check`] walks every enabled message and fails on the first rule
//! combination that is contradictory, mistyped or unsatisfiable. On success
//! it returns a [`CheckedSchema`]: a copy of the input where well-known regex
//! selectors have been replaced by their canonical `pattern`. Renderers only
//! accept checked schemas.
//!
//! ```
//! use ruleguard_check::check;
//! use ruleguard_ir::{Field, FieldRules, FieldType, Message, NumericRules, Rule, ScalarKind, Schema};
//!
//! let mut schema = Schema::new("demo");
//! schema.add_message(Message::new(
//!     "Point",
//!     vec![Field::new("x", FieldType::Scalar(ScalarKind::Int32)).with_rules(FieldRules::rule(
//!         Rule::Int32(NumericRules { lt: Some(5), lte: Some(6), ..Default::default() }),
//!     ))],
//! ));
//!
//! let err = check(&schema).unwrap_err();
//! assert_eq!(err.path, "Point.x");
//! ```

mod checker;
pub mod error;
pub mod literals;
pub mod regex_table;

pub use error::{SchemaError, SchemaErrorKind};
pub use regex_table::WellKnownPattern;

use ruleguard_ir::{FieldRules, KnownRegex, Message, Rule, Schema, StringWellKnown};

/// A schema that passed [`check`].
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedSchema(Schema);

impl CheckedSchema {
    pub fn schema(&self) -> &Schema {
        &self.0
    }

    /// Messages that get a validation routine (everything not ignored).
    pub fn emitted_messages(&self) -> impl Iterator<Item = &Message> {
        self.0.messages.iter().filter(|m| !m.ignored)
    }

    pub fn into_inner(self) -> Schema {
        self.0
    }
}

/// Check a schema and resolve well-known regex selectors.
///
/// The input is left untouched; checking the returned schema again yields
/// the same schema.
pub fn check(schema: &Schema) -> Result<CheckedSchema, SchemaError> {
    checker::Checker::new(schema).check_schema()?;

    let mut resolved = schema.clone();
    for message in &mut resolved.messages {
        for field in &mut message.fields {
            if let Some(rules) = &mut field.rules {
                resolve_rules(rules);
            }
        }
    }
    tracing::debug!(messages = resolved.messages.len(), "schema checked");
    Ok(CheckedSchema(resolved))
}

fn resolve_rules(rules: &mut FieldRules) {
    match &mut rules.rule {
        Some(Rule::String(r)) => {
            if let Some(StringWellKnown::WellKnownRegex(selector)) = r.well_known {
                if selector != KnownRegex::Unknown {
                    r.pattern = Some(WellKnownPattern::select(selector, r.is_strict()).pattern().to_string());
                }
                r.well_known = None;
                r.strict = None;
            }
        }
        Some(Rule::Repeated(r)) => {
            if let Some(items) = &mut r.items {
                resolve_rules(items);
            }
        }
        Some(Rule::Map(r)) => {
            for nested in [&mut r.keys, &mut r.values].into_iter().flatten() {
                resolve_rules(nested);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruleguard_ir::{
        BytesRules, DurationRules, DurationValue, EnumDef, EnumRules, Field, FieldType, MapRules,
        MessageRules, NumericRules, OneOf, RepeatedRules, ScalarKind, StringRules, TimestampRules,
        TimestampValue, WellKnownType,
    };

    fn one_field(ty: FieldType, rules: FieldRules) -> Schema {
        let mut schema = Schema::new("test");
        schema.add_enum(EnumDef::new("Color", &[("RED", 0), ("GREEN", 1)]));
        schema.add_message(Message::new("Item", vec![]));
        schema.add_message(Message::new("M", vec![Field::new("f", ty).with_rules(rules)]));
        schema
    }

    fn int32(rules: NumericRules<i32>) -> SchemaError {
        check(&one_field(FieldType::Scalar(ScalarKind::Int32), FieldRules::rule(Rule::Int32(rules))))
            .unwrap_err()
    }

    fn string(rules: StringRules) -> Result<CheckedSchema, SchemaError> {
        check(&one_field(FieldType::Scalar(ScalarKind::String), FieldRules::rule(Rule::String(rules))))
    }

    fn kind_of(result: Result<CheckedSchema, SchemaError>) -> SchemaErrorKind {
        result.unwrap_err().kind
    }

    #[test]
    fn accepts_inverted_range() {
        let schema = one_field(
            FieldType::Scalar(ScalarKind::Int32),
            FieldRules::rule(Rule::Int32(NumericRules {
                gt: Some(10),
                lt: Some(5),
                ..Default::default()
            })),
        );
        assert!(check(&schema).is_ok());
    }

    #[test]
    fn const_must_be_alone() {
        let err = int32(NumericRules {
            constant: Some(1),
            gt: Some(0),
            ..Default::default()
        });
        insta::assert_snapshot!(err, @"M.f: `const` can be the only rule on a field");
        assert_eq!(err.kind, SchemaErrorKind::ConflictingRules);
    }

    #[test]
    fn in_with_range_conflicts() {
        let err = int32(NumericRules {
            in_list: vec![1, 2],
            lt: Some(3),
            ..Default::default()
        });
        assert_eq!(err.message, "cannot have both `in` and range constraint rules on the same field");
    }

    #[test]
    fn not_in_with_range_is_allowed() {
        let schema = one_field(
            FieldType::Scalar(ScalarKind::Int32),
            FieldRules::rule(Rule::Int32(NumericRules {
                not_in: vec![4],
                lt: Some(10),
                ..Default::default()
            })),
        );
        assert!(check(&schema).is_ok());
    }

    #[test]
    fn in_and_not_in_conflict() {
        let err = int32(NumericRules {
            in_list: vec![1],
            not_in: vec![2],
            ..Default::default()
        });
        insta::assert_snapshot!(err, @"M.f: cannot have both `in` and `not_in` rules on the same field");
    }

    #[test]
    fn lt_and_lte_conflict() {
        let err = int32(NumericRules {
            lt: Some(5),
            lte: Some(6),
            ..Default::default()
        });
        assert_eq!(err.message, "cannot have both `lt` and `lte` rules on the same field");
    }

    #[test]
    fn equal_bounds() {
        let err = int32(NumericRules {
            gt: Some(5),
            lt: Some(5),
            ..Default::default()
        });
        assert_eq!(err.message, "cannot have equal `gt` and `lt` rules on the same field");

        let err = int32(NumericRules {
            gte: Some(5),
            lte: Some(5),
            ..Default::default()
        });
        assert_eq!(err.message, "use `const` instead of equal `lte` and `gte` rules");
    }

    #[test]
    fn float_equal_bounds() {
        let schema = one_field(
            FieldType::Scalar(ScalarKind::Double),
            FieldRules::rule(Rule::Double(NumericRules {
                gt: Some(1.5),
                lte: Some(1.5),
                ..Default::default()
            })),
        );
        assert_eq!(
            check(&schema).unwrap_err().message,
            "cannot have equal `gt` and `lte` rules on the same field"
        );
    }

    #[test]
    fn min_greater_than_max() {
        let err = string(StringRules {
            min_len: Some(5),
            max_len: Some(2),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::OutOfRangeConstraint);
        assert_eq!(err.message, "`min` value is greater than `max` value");
    }

    #[test]
    fn len_with_bounds() {
        let err = string(StringRules {
            len: Some(3),
            max_len: Some(4),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.message, "cannot have both `len` and `max_len` rules on the same field");

        let err = string(StringRules {
            len_bytes: Some(3),
            min_bytes: Some(1),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.message, "cannot have both `len_bytes` and `min_bytes` rules on the same field");
    }

    #[test]
    fn affix_longer_than_max_len() {
        let err = string(StringRules {
            prefix: Some("abcdef".into()),
            max_len: Some(3),
            ..Default::default()
        })
        .unwrap_err();
        insta::assert_snapshot!(err, @"M.f: `prefix` length exceeds the `max_len`");
    }

    #[test]
    fn affix_counts_runes_for_max_len() {
        // three runes, six bytes
        let ok = string(StringRules {
            contains: Some("äöü".into()),
            max_len: Some(3),
            max_bytes: Some(6),
            ..Default::default()
        });
        assert!(ok.is_ok());

        let err = string(StringRules {
            suffix: Some("äöü".into()),
            max_bytes: Some(5),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.message, "`suffix` length exceeds the `max_bytes`");
    }

    #[test]
    fn max_len_over_max_bytes() {
        let err = string(StringRules {
            max_len: Some(10),
            max_bytes: Some(4),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.message, "`max_len` cannot exceed `max_bytes`");
    }

    #[test]
    fn invalid_pattern_reports_pattern_text() {
        let err = string(StringRules {
            pattern: Some("([a-z]".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::InvalidRegex);
        assert!(err.message.contains("([a-z]"));
    }

    #[test]
    fn pattern_with_in() {
        let err = string(StringRules {
            pattern: Some("^a$".into()),
            in_list: vec!["a".into()],
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.message, "regex `pattern` and `in` rules are incompatible");
    }

    #[test]
    fn well_known_regex_with_pattern() {
        let result = string(StringRules {
            pattern: Some("^a$".into()),
            well_known: Some(StringWellKnown::WellKnownRegex(KnownRegex::HttpHeaderName)),
            ..Default::default()
        });
        assert_eq!(kind_of(result), SchemaErrorKind::ConflictingRules);
    }

    #[test]
    fn well_known_regex_resolves_to_pattern() {
        let checked = string(StringRules {
            well_known: Some(StringWellKnown::WellKnownRegex(KnownRegex::HttpHeaderValue)),
            strict: Some(false),
            ..Default::default()
        })
        .unwrap();

        let field = &checked.schema().message("M").unwrap().fields[0];
        let Some(Rule::String(r)) = field.rules.as_ref().and_then(|r| r.rule.as_ref()) else {
            panic!("expected string rule");
        };
        assert_eq!(r.pattern.as_deref(), Some(WellKnownPattern::HeaderString.pattern()));
        assert!(r.well_known.is_none());

        // checking again changes nothing
        let again = check(checked.schema()).unwrap();
        assert_eq!(again, checked);
    }

    #[test]
    fn unknown_well_known_regex_adds_nothing() {
        let checked = string(StringRules {
            well_known: Some(StringWellKnown::WellKnownRegex(KnownRegex::Unknown)),
            ..Default::default()
        })
        .unwrap();
        let field = &checked.schema().message("M").unwrap().fields[0];
        let Some(Rule::String(r)) = field.rules.as_ref().and_then(|r| r.rule.as_ref()) else {
            panic!("expected string rule");
        };
        assert!(r.pattern.is_none());
        assert!(r.well_known.is_none());
    }

    #[test]
    fn bytes_affix_over_max_len() {
        let schema = one_field(
            FieldType::Scalar(ScalarKind::Bytes),
            FieldRules::rule(Rule::Bytes(BytesRules {
                prefix: Some(vec![1, 2, 3]),
                max_len: Some(2),
                ..Default::default()
            })),
        );
        assert_eq!(kind_of(check(&schema)), SchemaErrorKind::OutOfRangeConstraint);
    }

    #[test]
    fn rule_kind_must_match_type() {
        let schema = one_field(
            FieldType::Scalar(ScalarKind::String),
            FieldRules::rule(Rule::Int32(NumericRules::default())),
        );
        let err = check(&schema).unwrap_err();
        insta::assert_snapshot!(err, @"M.f: expected rules for string but got int32");
    }

    #[test]
    fn scalar_rule_on_repeated_field() {
        let schema = one_field(
            FieldType::repeated(FieldType::Scalar(ScalarKind::Int32)),
            FieldRules::rule(Rule::Int32(NumericRules::default())),
        );
        assert_eq!(
            check(&schema).unwrap_err().message,
            "repeated rule should be used for repeated fields"
        );
    }

    #[test]
    fn wrapper_accepts_inner_scalar_rule() {
        let schema = one_field(
            FieldType::WellKnown(WellKnownType::Wrapper(ScalarKind::UInt32)),
            FieldRules::rule(Rule::UInt32(NumericRules {
                gt: Some(3),
                ..Default::default()
            })),
        );
        assert!(check(&schema).is_ok());
    }

    #[test]
    fn skip_with_wrapper_rule() {
        let schema = one_field(
            FieldType::WellKnown(WellKnownType::Wrapper(ScalarKind::String)),
            FieldRules::rule(Rule::String(StringRules::default())).with_message(MessageRules {
                skip: true,
                required: false,
            }),
        );
        let err = check(&schema).unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::InvalidWellKnownCombination);
        assert_eq!(err.message, "Skip should not be used with WKT scalar rules");
    }

    #[test]
    fn message_rules_on_duration() {
        let schema = one_field(
            FieldType::WellKnown(WellKnownType::Duration),
            FieldRules::message(MessageRules {
                skip: false,
                required: true,
            }),
        );
        let err = check(&schema).unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::InvalidWellKnownCombination);
        assert_eq!(err.message, "Duration rules should be used for Duration fields");
    }

    #[test]
    fn message_rules_on_scalar() {
        let schema = one_field(
            FieldType::Scalar(ScalarKind::Int64),
            FieldRules::message(MessageRules::default()),
        );
        assert_eq!(
            check(&schema).unwrap_err().message,
            "field is not embedded but got message rules"
        );
    }

    #[test]
    fn unique_on_messages() {
        let schema = one_field(
            FieldType::repeated(FieldType::Message("Item".into())),
            FieldRules::rule(Rule::Repeated(RepeatedRules {
                unique: true,
                ..Default::default()
            })),
        );
        let err = check(&schema).unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::TypeMismatch);
        assert_eq!(err.message, "unique rule is only applicable for scalar types");
    }

    #[test]
    fn nested_item_errors_carry_path() {
        let schema = one_field(
            FieldType::repeated(FieldType::Scalar(ScalarKind::Int32)),
            FieldRules::rule(Rule::Repeated(RepeatedRules {
                items: Some(Box::new(FieldRules::rule(Rule::Int32(NumericRules {
                    lt: Some(1),
                    lte: Some(1),
                    ..Default::default()
                })))),
                ..Default::default()
            })),
        );
        assert_eq!(check(&schema).unwrap_err().path, "M.f.items");
    }

    #[test]
    fn repeated_rules_on_scalar() {
        let schema = one_field(
            FieldType::Scalar(ScalarKind::Int32),
            FieldRules::rule(Rule::Repeated(RepeatedRules::default())),
        );
        assert_eq!(
            check(&schema).unwrap_err().message,
            "field is not repeated but got repeated rules"
        );
    }

    #[test]
    fn no_sparse_requires_message_values() {
        let schema = one_field(
            FieldType::map(ScalarKind::String, FieldType::Scalar(ScalarKind::Int32)),
            FieldRules::rule(Rule::Map(MapRules {
                no_sparse: true,
                ..Default::default()
            })),
        );
        assert_eq!(
            check(&schema).unwrap_err().message,
            "no_sparse rule is only applicable for embedded message types"
        );
    }

    #[test]
    fn map_key_rules_checked_against_key_kind() {
        let schema = one_field(
            FieldType::map(ScalarKind::String, FieldType::Message("Item".into())),
            FieldRules::rule(Rule::Map(MapRules {
                keys: Some(Box::new(FieldRules::rule(Rule::Int64(NumericRules::default())))),
                ..Default::default()
            })),
        );
        let err = check(&schema).unwrap_err();
        assert_eq!(err.path, "M.f.keys");
        assert_eq!(err.kind, SchemaErrorKind::TypeMismatch);
    }

    #[test]
    fn defined_only_with_undefined_in() {
        let schema = one_field(
            FieldType::Enum("Color".into()),
            FieldRules::rule(Rule::Enum(EnumRules {
                defined_only: true,
                in_list: vec![0, 7],
                ..Default::default()
            })),
        );
        let err = check(&schema).unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::UndefinedEnumValue);
        insta::assert_snapshot!(err, @"M.f: undefined `in` value (7) conflicts with `defined_only` rule");
    }

    #[test]
    fn timestamp_now_mixing() {
        let schema = one_field(
            FieldType::WellKnown(WellKnownType::Timestamp),
            FieldRules::rule(Rule::Timestamp(TimestampRules {
                lt_now: true,
                gt: Some(TimestampValue::new(0, 0)),
                ..Default::default()
            })),
        );
        assert_eq!(
            check(&schema).unwrap_err().message,
            "`now` rules cannot be mixed with absolute `lt/gt` rules"
        );

        let schema = one_field(
            FieldType::WellKnown(WellKnownType::Timestamp),
            FieldRules::rule(Rule::Timestamp(TimestampRules {
                lt_now: true,
                gt_now: true,
                ..Default::default()
            })),
        );
        assert_eq!(kind_of(check(&schema)), SchemaErrorKind::ConflictingRules);
    }

    #[test]
    fn within_must_be_positive() {
        let schema = one_field(
            FieldType::WellKnown(WellKnownType::Timestamp),
            FieldRules::rule(Rule::Timestamp(TimestampRules {
                within: Some(DurationValue::new(0, 0)),
                ..Default::default()
            })),
        );
        assert_eq!(
            check(&schema).unwrap_err().message,
            "`within` rule must be positive and non-zero"
        );
    }

    #[test]
    fn malformed_duration_literal() {
        let schema = one_field(
            FieldType::WellKnown(WellKnownType::Duration),
            FieldRules::rule(Rule::Duration(DurationRules {
                gt: Some(DurationValue::new(1, -1)),
                ..Default::default()
            })),
        );
        assert_eq!(kind_of(check(&schema)), SchemaErrorKind::OutOfRangeConstraint);
    }

    #[test]
    fn duration_lt_lte_conflict() {
        let schema = one_field(
            FieldType::WellKnown(WellKnownType::Duration),
            FieldRules::rule(Rule::Duration(DurationRules {
                lt: Some(DurationValue::from_secs(1)),
                lte: Some(DurationValue::from_secs(2)),
                ..Default::default()
            })),
        );
        assert_eq!(kind_of(check(&schema)), SchemaErrorKind::ConflictingRules);
    }

    #[test]
    fn undefined_message_reference() {
        let schema = one_field(FieldType::Message("Missing".into()), FieldRules::default());
        assert_eq!(kind_of(check(&schema)), SchemaErrorKind::TypeMismatch);
    }

    #[test]
    fn disabled_messages_are_not_checked() {
        let mut schema = Schema::new("test");
        schema.add_message(
            Message::new(
                "M",
                vec![Field::new("f", FieldType::Scalar(ScalarKind::Int32)).with_rules(
                    FieldRules::rule(Rule::Int32(NumericRules {
                        lt: Some(1),
                        lte: Some(1),
                        ..Default::default()
                    })),
                )],
            )
            .disabled(),
        );
        assert!(check(&schema).is_ok());
    }

    #[test]
    fn oneof_members_must_exist() {
        let mut schema = Schema::new("test");
        schema.add_message(
            Message::new("M", vec![Field::new("a", FieldType::Scalar(ScalarKind::Int32)).in_oneof("choice")])
                .with_oneof(OneOf {
                    name: "choice".into(),
                    fields: vec!["a".into(), "b".into()],
                    required: true,
                }),
        );
        assert_eq!(kind_of(check(&schema)), SchemaErrorKind::TypeMismatch);
    }

    #[test]
    fn ignored_messages_are_not_emitted() {
        let mut schema = Schema::new("test");
        schema.add_message(Message::new("A", vec![]));
        schema.add_message(Message::new("B", vec![]).ignored());
        let checked = check(&schema).unwrap();
        let names: Vec<_> = checked.emitted_messages().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["A"]);
    }
}
