//! Rule evaluation against dynamic messages.
//!
//! The walk mirrors a generated routine: plain fields in declaration order,
//! then oneof groups, each field dispatched on the same [`Target`] the code
//! generators resolve. Checks come from the shared plans, so order and
//! reasons match the generated code exactly.

use crate::error::RuntimeError;
use crate::formats;
use crate::value::{MessageValue, Value};
use crate::violation::Violation;
use chrono::{DateTime, Utc};
use ruleguard_check::CheckedSchema;
use ruleguard_codegen::context::{RenderContext, Target};
use ruleguard_codegen::lookup::{self, TableValues};
use ruleguard_codegen::plan::{
    self, ComparablePlan, Format, Instant, Nanos, Number, SetCheck, TextCheck, TextLiteral,
    TimestampPlan, count_checks,
};
use ruleguard_codegen::{RenderError, reason};
use ruleguard_ir::{
    AnyRules, DurationRules, EnumRules, FieldType, MapRules, Message, OneOf, RepeatedRules, Rule,
    ScalarKind, Schema, TimestampRules,
};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// Suffix keying precomputed duration and timestamp plans.
const PLAN: &str = "Plan";

type Outcome = Result<(), Violation>;

enum Lookup {
    Strings(HashSet<String>),
    Bytes(HashSet<Vec<u8>>),
    Enums(HashSet<i32>),
}

enum Probe<'a> {
    Str(&'a str),
    Bytes(&'a [u8]),
    Enum(i32),
}

enum Pattern {
    Text(regex::Regex),
    Bytes(regex::bytes::Regex),
}

impl Lookup {
    fn contains(&self, probe: Probe<'_>) -> bool {
        match (self, probe) {
            (Lookup::Strings(set), Probe::Str(s)) => set.contains(s),
            (Lookup::Bytes(set), Probe::Bytes(b)) => set.contains(b),
            (Lookup::Enums(set), Probe::Enum(n)) => set.contains(&n),
            _ => false,
        }
    }
}

/// Applies a checked schema to message instances.
///
/// Patterns, lookup sets and time plans are built once in [`Validator::new`];
/// validation itself only reads them, so a validator can be shared across
/// threads.
pub struct Validator {
    schema: Schema,
    lookups: HashMap<String, Lookup>,
    patterns: HashMap<String, Pattern>,
    durations: HashMap<String, ComparablePlan<Nanos>>,
    timestamps: HashMap<String, TimestampPlan>,
}

impl Validator {
    pub fn new(checked: &CheckedSchema) -> Result<Self, RuntimeError> {
        let tables = lookup::collect_tables(checked)?;

        let mut lookups = HashMap::new();
        for table in tables.lookups {
            let set = match table.values {
                TableValues::Strings(v) | TableValues::TypeUrls(v) => Lookup::Strings(v.into_iter().collect()),
                TableValues::Bytes(v) => Lookup::Bytes(v.into_iter().collect()),
                TableValues::Enums(v) => Lookup::Enums(v.into_iter().collect()),
                // compared through their plans
                TableValues::Numbers(_) | TableValues::Durations(_) => continue,
            };
            lookups.insert(table.name, set);
        }

        let mut patterns = HashMap::new();
        for table in tables.patterns {
            let compiled = if table.bytes {
                regex::bytes::RegexBuilder::new(&table.pattern)
                    .unicode(false)
                    .build()
                    .map(Pattern::Bytes)
            } else {
                regex::Regex::new(&table.pattern).map(Pattern::Text)
            };
            let compiled = compiled.map_err(|source| RuntimeError::InvalidPattern {
                name: table.name.clone(),
                source,
            })?;
            patterns.insert(table.name, compiled);
        }

        let schema = checked.schema();
        let mut durations = HashMap::new();
        let mut timestamps = HashMap::new();
        for message in checked.emitted_messages().filter(|m| !m.disabled) {
            for field in &message.fields {
                let ctx = RenderContext::for_field(schema, message, field);
                lookup::visit_rules(&ctx, &mut |ctx, rule| {
                    match rule {
                        Rule::Duration(r) => {
                            durations.insert(ctx.table_name(PLAN), plan::duration_plan(r)?);
                        }
                        Rule::Timestamp(r) => {
                            timestamps.insert(ctx.table_name(PLAN), plan::timestamp_plan(r)?);
                        }
                        _ => {}
                    }
                    Ok(())
                })?;
            }
        }

        tracing::debug!(
            lookups = lookups.len(),
            patterns = patterns.len(),
            "validator prepared"
        );
        Ok(Self {
            schema: schema.clone(),
            lookups,
            patterns,
            durations,
            timestamps,
        })
    }

    /// Validate an instance of `message`, reading the clock once.
    pub fn validate(&self, message: &str, value: &MessageValue) -> Result<(), Violation> {
        self.validate_at(message, value, Utc::now())
    }

    /// Validate with an explicit `now` for timestamp rules.
    ///
    /// Messages without a routine (unknown or ignored) accept every instance,
    /// as do disabled ones.
    pub fn validate_at(&self, message: &str, value: &MessageValue, now: DateTime<Utc>) -> Result<(), Violation> {
        let Some(def) = self.schema.message(message).filter(|m| !m.ignored) else {
            tracing::debug!(name = message, "no validation routine");
            return Ok(());
        };
        let eval = Eval {
            v: self,
            now: instant(now),
        };
        eval.message(def, value)
    }
}

fn instant(t: DateTime<Utc>) -> Instant {
    Instant(i128::from(t.timestamp()) * 1_000_000_000 + i128::from(t.timestamp_subsec_nanos()))
}

/// One validation call.
struct Eval<'v> {
    v: &'v Validator,
    now: Instant,
}

impl Eval<'_> {
    fn message(&self, message: &Message, value: &MessageValue) -> Outcome {
        if message.disabled {
            return Ok(());
        }
        for field in message.plain_fields() {
            let ctx = RenderContext::for_field(&self.v.schema, message, field);
            self.field(&ctx, value.get(&field.name).filter(|v| !v.is_null()))?;
        }
        for oneof in &message.oneofs {
            self.oneof(message, oneof, value)?;
        }
        Ok(())
    }

    /// Only the member that is set is validated.
    fn oneof(&self, message: &Message, oneof: &OneOf, value: &MessageValue) -> Outcome {
        match message.oneof_fields(oneof).find(|f| value.has(&f.name)) {
            Some(field) => {
                let ctx = RenderContext::for_field(&self.v.schema, message, field);
                self.field(&ctx, value.get(&field.name))
            }
            None if oneof.required => Err(Violation::new(&oneof.name, reason::REQUIRED)),
            None => Ok(()),
        }
    }

    fn field(&self, ctx: &RenderContext<'_>, value: Option<&Value>) -> Outcome {
        match ctx.target {
            Target::None => self.required(ctx, ctx.is_required(), value),
            Target::Embedded(message) => self.embedded(ctx, message, value),
            Target::Wrapper { .. } => self.wrapper(ctx, value),
            Target::Repeated(rules) => self.repeated(ctx, rules, value),
            Target::Map(rules) => self.map(ctx, rules, value),
            Target::Rule(rule) => self.rule(ctx, rule, value),
        }
    }

    fn path(ctx: &RenderContext<'_>) -> String {
        match &ctx.index {
            Some(index) => format!("{}[{index}]", ctx.field.name),
            None => ctx.field.name.clone(),
        }
    }

    fn fail(&self, ctx: &RenderContext<'_>, reason: impl Into<String>) -> Violation {
        Violation::new(Self::path(ctx), reason).on_key(ctx.on_key)
    }

    fn wrong_type(&self, ctx: &RenderContext<'_>, value: &Value) -> Violation {
        self.fail(ctx, format!("value has type {}, expected {}", value.kind(), ctx.ty))
    }

    /// Context operations only fail on a schema the checker would reject.
    fn internal(&self, ctx: &RenderContext<'_>, err: RenderError) -> Violation {
        self.fail(ctx, err.to_string())
    }

    fn required(&self, ctx: &RenderContext<'_>, required: bool, value: Option<&Value>) -> Outcome {
        if required && ctx.is_root() && value.is_none() {
            return Err(self.fail(ctx, reason::REQUIRED));
        }
        Ok(())
    }

    fn embedded(&self, ctx: &RenderContext<'_>, message: &Message, value: Option<&Value>) -> Outcome {
        self.required(ctx, ctx.is_required(), value)?;
        match value {
            None | Some(Value::Null) => Ok(()),
            Some(Value::Message(inner)) => self
                .message(message, inner)
                .map_err(|cause| self.fail(ctx, reason::EMBEDDED).caused_by(cause)),
            Some(other) => Err(self.wrong_type(ctx, other)),
        }
    }

    fn wrapper(&self, ctx: &RenderContext<'_>, value: Option<&Value>) -> Outcome {
        self.required(ctx, ctx.is_required(), value)?;
        match value {
            None | Some(Value::Null) => Ok(()),
            Some(Value::Wrapper(inner)) => {
                let inner_ctx = ctx.unwrap("value").map_err(|e| self.internal(ctx, e))?;
                self.field(&inner_ctx, Some(inner))
            }
            Some(other) => Err(self.wrong_type(ctx, other)),
        }
    }

    fn repeated(&self, ctx: &RenderContext<'_>, rules: &RepeatedRules, value: Option<&Value>) -> Outcome {
        let items: &[Value] = match value {
            None => &[],
            Some(Value::List(items)) => items,
            Some(other) => return Err(self.wrong_type(ctx, other)),
        };
        for check in count_checks(rules.min_items, rules.max_items) {
            if !check.accepts(items.len() as u64) {
                return Err(self.fail(ctx, check.reason("item")));
            }
        }
        let mut seen: Vec<&Value> = Vec::new();
        for (idx, item) in items.iter().enumerate() {
            let elem = ctx.elem("item", idx.to_string()).map_err(|e| self.internal(ctx, e))?;
            if rules.unique {
                if seen.contains(&item) {
                    return Err(self.fail(&elem, reason::UNIQUE));
                }
                seen.push(item);
            }
            self.field(&elem, Some(item))?;
        }
        Ok(())
    }

    fn map(&self, ctx: &RenderContext<'_>, rules: &MapRules, value: Option<&Value>) -> Outcome {
        let entries: &[(Value, Value)] = match value {
            None => &[],
            Some(Value::Map(entries)) => entries,
            Some(other) => return Err(self.wrong_type(ctx, other)),
        };
        for check in count_checks(rules.min_pairs, rules.max_pairs) {
            if !check.accepts(entries.len() as u64) {
                return Err(self.fail(ctx, check.reason("pair")));
            }
        }
        for (key, val) in entries {
            let index = key.to_string();
            let key_ctx = ctx.key("key", index.clone()).map_err(|e| self.internal(ctx, e))?;
            let val_ctx = ctx.elem("value", index).map_err(|e| self.internal(ctx, e))?;
            if rules.no_sparse && val_ctx.ty.is_embed() && val.is_null() {
                return Err(self.fail(&val_ctx, reason::NO_SPARSE));
            }
            self.field(&key_ctx, Some(key))?;
            self.field(&val_ctx, Some(val))?;
        }
        Ok(())
    }

    fn rule(&self, ctx: &RenderContext<'_>, rule: &Rule, value: Option<&Value>) -> Outcome {
        match rule {
            Rule::Any(rules) => return self.any(ctx, rules, value),
            Rule::Duration(rules) => return self.duration(ctx, rules, value),
            Rule::Timestamp(rules) => return self.timestamp(ctx, rules, value),
            Rule::Repeated(rules) => return self.repeated(ctx, rules, value),
            Rule::Map(rules) => return self.map(ctx, rules, value),
            _ => {}
        }
        // unset scalars read as their zero value
        let value: Cow<'_, Value> = match value {
            Some(v) => Cow::Borrowed(v),
            None => match Value::zero(&ctx.ty) {
                Some(zero) => Cow::Owned(zero),
                None => return Ok(()),
            },
        };
        let value = &*value;

        if let Some(plan) = plan::numeric_plan(rule) {
            let FieldType::Scalar(kind) = &ctx.ty else {
                return Err(self.wrong_type(ctx, value));
            };
            let n = number(*kind, value).ok_or_else(|| self.wrong_type(ctx, value))?;
            return plan.check(n).map_err(|r| self.fail(ctx, r));
        }
        match (rule, value) {
            (Rule::Bool(rules), Value::Bool(b)) => match rules.constant {
                Some(expected) if *b != expected => Err(self.fail(ctx, reason::equal(expected))),
                _ => Ok(()),
            },
            (Rule::String(rules), Value::String(s)) => self.text(ctx, &plan::string_checks(rules), s),
            (Rule::Bytes(rules), Value::Bytes(b)) => self.text(ctx, &plan::bytes_checks(rules), b),
            (Rule::Enum(rules), Value::Enum(n)) => self.enumeration(ctx, rules, *n),
            (_, other) => Err(self.wrong_type(ctx, other)),
        }
    }

    /// Whether a probe is in the table for `suffix`, falling back to the
    /// literal values when no table was collected.
    fn member(&self, ctx: &RenderContext<'_>, suffix: &str, probe: Probe<'_>, fallback: impl FnOnce() -> bool) -> bool {
        match self.v.lookups.get(&ctx.table_name(suffix)) {
            Some(table) => table.contains(probe),
            None => fallback(),
        }
    }

    fn set_accepts<T: PartialEq>(&self, ctx: &RenderContext<'_>, set: &SetCheck<T>, value: &T, probe: Probe<'_>) -> bool {
        match set {
            SetCheck::In(values) => self.member(ctx, lookup::IN_LOOKUP, probe, || values.contains(value)),
            SetCheck::NotIn(values) => !self.member(ctx, lookup::NOT_IN_LOOKUP, probe, || values.contains(value)),
        }
    }

    fn text<L: Text>(&self, ctx: &RenderContext<'_>, checks: &[TextCheck<L>], v: &L) -> Outcome {
        for check in checks {
            let ok = match check {
                TextCheck::Const(c) => v == c,
                TextCheck::Len(n) => (v.units() as u64) == *n,
                TextCheck::MinLen(n) => (v.units() as u64) >= *n,
                TextCheck::MaxLen(n) => (v.units() as u64) <= *n,
                TextCheck::LenBytes(n) => (v.byte_len() as u64) == *n,
                TextCheck::MinBytes(n) => (v.byte_len() as u64) >= *n,
                TextCheck::MaxBytes(n) => (v.byte_len() as u64) <= *n,
                TextCheck::In(values) => self.member(ctx, lookup::IN_LOOKUP, v.probe(), || values.contains(v)),
                TextCheck::NotIn(values) => {
                    !self.member(ctx, lookup::NOT_IN_LOOKUP, v.probe(), || values.contains(v))
                }
                TextCheck::Pattern(_) => self
                    .v
                    .patterns
                    .get(&ctx.table_name(lookup::PATTERN))
                    .is_none_or(|p| v.matches(p)),
                TextCheck::Prefix(p) => v.has_prefix(p),
                TextCheck::Suffix(s) => v.has_suffix(s),
                TextCheck::Contains(c) => v.contains_text(c),
                TextCheck::NotContains(c) => !v.contains_text(c),
                TextCheck::Format(format) => v.has_format(*format),
            };
            if !ok {
                return Err(self.fail(ctx, check.reason()));
            }
        }
        Ok(())
    }

    fn enumeration(&self, ctx: &RenderContext<'_>, rules: &EnumRules, n: i32) -> Outcome {
        if let Some(constant) = rules.constant {
            if n != constant {
                return Err(self.fail(ctx, reason::equal(constant)));
            }
        }
        if rules.defined_only {
            let defined = match &ctx.ty {
                FieldType::Enum(name) => self.v.schema.enum_def(name).is_some_and(|def| def.is_defined(n)),
                _ => false,
            };
            if !defined {
                return Err(self.fail(ctx, reason::DEFINED_ONLY));
            }
        }
        if let Some(set) = lookup::enum_set(&rules.in_list, &rules.not_in) {
            if !self.set_accepts(ctx, &set, &n, Probe::Enum(n)) {
                return Err(self.fail(ctx, set.reason()));
            }
        }
        Ok(())
    }

    fn any(&self, ctx: &RenderContext<'_>, rules: &AnyRules, value: Option<&Value>) -> Outcome {
        self.required(ctx, rules.required || ctx.is_required(), value)?;
        let type_url = match value {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Any { type_url, .. }) => type_url,
            Some(other) => return Err(self.wrong_type(ctx, other)),
        };
        let Some(set) = lookup::enum_set(&rules.in_list, &rules.not_in) else {
            return Ok(());
        };
        if self.set_accepts(ctx, &set, type_url, Probe::Str(type_url)) {
            return Ok(());
        }
        let why = match &set {
            SetCheck::In(urls) => reason::type_url_in(urls),
            SetCheck::NotIn(urls) => reason::type_url_not_in(urls),
        };
        Err(self.fail(ctx, why))
    }

    fn duration(&self, ctx: &RenderContext<'_>, rules: &DurationRules, value: Option<&Value>) -> Outcome {
        self.required(ctx, rules.required || ctx.is_required(), value)?;
        let d = match value {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Duration(d)) => d,
            Some(other) => return Err(self.wrong_type(ctx, other)),
        };
        match self.v.durations.get(&ctx.table_name(PLAN)) {
            Some(plan) => plan.check(Nanos(d.total_nanos())).map_err(|r| self.fail(ctx, r)),
            None => Ok(()),
        }
    }

    fn timestamp(&self, ctx: &RenderContext<'_>, rules: &TimestampRules, value: Option<&Value>) -> Outcome {
        self.required(ctx, rules.required || ctx.is_required(), value)?;
        let t = match value {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Timestamp(t)) => t,
            Some(other) => return Err(self.wrong_type(ctx, other)),
        };
        match self.v.timestamps.get(&ctx.table_name(PLAN)) {
            Some(plan) => plan
                .check(Instant(t.total_nanos()), self.now)
                .map_err(|r| self.fail(ctx, r)),
            None => Ok(()),
        }
    }
}

/// A dynamic number in the representation rules of `kind` are planned in.
fn number(kind: ScalarKind, value: &Value) -> Option<Number> {
    match (kind, value) {
        (ScalarKind::Float, Value::Float(f)) => Some(Number::F32(*f as f32)),
        (ScalarKind::Double, Value::Float(f)) => Some(Number::F64(*f)),
        (ScalarKind::Float, Value::Int(i)) => Some(Number::F32(*i as f32)),
        (ScalarKind::Double, Value::Int(i)) => Some(Number::F64(*i as f64)),
        (k, _) if k.is_float() => None,
        (k, Value::UInt(u)) if k.is_unsigned() => Some(Number::UInt(*u)),
        (k, Value::Int(i)) if k.is_unsigned() => u64::try_from(*i).ok().map(Number::UInt),
        (_, Value::Int(i)) => Some(Number::Int(*i)),
        (_, Value::UInt(u)) => i64::try_from(*u).ok().map(Number::Int),
        _ => None,
    }
}

/// String and bytes values under text checks.
trait Text: TextLiteral {
    /// Units counted by `len`/`min_len`/`max_len`: runes or bytes.
    fn units(&self) -> usize;
    fn byte_len(&self) -> usize;
    fn probe(&self) -> Probe<'_>;
    fn matches(&self, pattern: &Pattern) -> bool;
    fn has_prefix(&self, prefix: &Self) -> bool;
    fn has_suffix(&self, suffix: &Self) -> bool;
    fn contains_text(&self, needle: &Self) -> bool;
    fn has_format(&self, format: Format) -> bool;
}

impl Text for String {
    fn units(&self) -> usize {
        self.chars().count()
    }

    fn byte_len(&self) -> usize {
        self.len()
    }

    fn probe(&self) -> Probe<'_> {
        Probe::Str(self)
    }

    fn matches(&self, pattern: &Pattern) -> bool {
        match pattern {
            Pattern::Text(re) => re.is_match(self),
            Pattern::Bytes(re) => re.is_match(self.as_bytes()),
        }
    }

    fn has_prefix(&self, prefix: &Self) -> bool {
        self.starts_with(prefix.as_str())
    }

    fn has_suffix(&self, suffix: &Self) -> bool {
        self.ends_with(suffix.as_str())
    }

    fn contains_text(&self, needle: &Self) -> bool {
        self.contains(needle.as_str())
    }

    fn has_format(&self, format: Format) -> bool {
        formats::check_str(format, self)
    }
}

impl Text for Vec<u8> {
    fn units(&self) -> usize {
        self.len()
    }

    fn byte_len(&self) -> usize {
        self.len()
    }

    fn probe(&self) -> Probe<'_> {
        Probe::Bytes(self)
    }

    fn matches(&self, pattern: &Pattern) -> bool {
        match pattern {
            Pattern::Bytes(re) => re.is_match(self),
            Pattern::Text(re) => std::str::from_utf8(self).is_ok_and(|s| re.is_match(s)),
        }
    }

    fn has_prefix(&self, prefix: &Self) -> bool {
        self.starts_with(prefix)
    }

    fn has_suffix(&self, suffix: &Self) -> bool {
        self.ends_with(suffix)
    }

    fn contains_text(&self, needle: &Self) -> bool {
        needle.is_empty() || self.windows(needle.len()).any(|w| w == needle.as_slice())
    }

    fn has_format(&self, format: Format) -> bool {
        formats::check_bytes(format, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ruleguard_ir::{
        EnumDef, Field, FieldRules, MessageRules, NumericRules, StringRules, TimestampValue,
        WellKnownType,
    };

    fn validator(schema: &Schema) -> Validator {
        Validator::new(&ruleguard_check::check(schema).unwrap()).unwrap()
    }

    fn string_field(rules: StringRules) -> Schema {
        let mut schema = Schema::new("t");
        schema.add_message(Message::new(
            "M",
            vec![Field::new("s", FieldType::Scalar(ScalarKind::String))
                .with_rules(FieldRules::rule(Rule::String(rules)))],
        ));
        schema
    }

    #[test]
    fn unset_scalars_read_as_zero() {
        let v = validator(&string_field(StringRules {
            min_len: Some(1),
            ..Default::default()
        }));
        let err = v.validate("M", &MessageValue::new()).unwrap_err();
        assert_eq!(err, Violation::new("s", "value length must be at least 1 runes"));
    }

    #[test]
    fn string_sets_use_lookup_tables() {
        let v = validator(&string_field(StringRules {
            not_in: vec!["root".into(), "admin".into()],
            ..Default::default()
        }));
        assert!(v.lookups.contains_key("_M_s_NotInLookup"));
        assert!(v.validate("M", &MessageValue::new().with("s", "alice")).is_ok());
        let err = v.validate("M", &MessageValue::new().with("s", "root")).unwrap_err();
        assert_eq!(err.reason, "value must not be in list [root admin]");
    }

    #[test]
    fn wrong_value_type() {
        let v = validator(&string_field(StringRules::default()));
        let err = v.validate("M", &MessageValue::new().with("s", 3)).unwrap_err();
        insta::assert_snapshot!(err, @"invalid s: value has type int, expected string");
    }

    #[test]
    fn unsigned_fields_accept_non_negative_ints() {
        assert_eq!(number(ScalarKind::UInt32, &Value::Int(3)), Some(Number::UInt(3)));
        assert_eq!(number(ScalarKind::UInt32, &Value::Int(-3)), None);
        assert_eq!(number(ScalarKind::Int64, &Value::UInt(3)), Some(Number::Int(3)));
        assert_eq!(number(ScalarKind::Float, &Value::Float(0.5)), Some(Number::F32(0.5)));
        assert_eq!(number(ScalarKind::Int32, &Value::Float(0.5)), None);
    }

    #[test]
    fn defined_only_enums() {
        let mut schema = Schema::new("t");
        schema.add_enum(EnumDef::new("Color", &[("RED", 0), ("GREEN", 1)]));
        schema.add_message(Message::new(
            "M",
            vec![Field::new("c", FieldType::Enum("Color".into())).with_rules(FieldRules::rule(
                Rule::Enum(EnumRules {
                    defined_only: true,
                    ..Default::default()
                }),
            ))],
        ));
        let v = validator(&schema);
        assert!(v.validate("M", &MessageValue::new().with("c", Value::Enum(1))).is_ok());
        let err = v.validate("M", &MessageValue::new().with("c", Value::Enum(5))).unwrap_err();
        assert_eq!(err.reason, reason::DEFINED_ONLY);
    }

    #[test]
    fn timestamps_compare_against_the_given_now() {
        let mut schema = Schema::new("t");
        schema.add_message(Message::new(
            "M",
            vec![Field::new("at", FieldType::WellKnown(WellKnownType::Timestamp)).with_rules(
                FieldRules::rule(Rule::Timestamp(TimestampRules {
                    lt_now: true,
                    ..Default::default()
                })),
            )],
        ));
        let v = validator(&schema);
        let now = Utc.timestamp_opt(1_000, 0).unwrap();
        let past = MessageValue::new().with("at", TimestampValue::new(999, 0));
        let future = MessageValue::new().with("at", TimestampValue::new(1_000, 1));
        assert!(v.validate_at("M", &past, now).is_ok());
        assert_eq!(
            v.validate_at("M", &future, now).unwrap_err().reason,
            "value must be less than now"
        );
        // unset and not required
        assert!(v.validate_at("M", &MessageValue::new(), now).is_ok());
    }

    #[test]
    fn skipped_embedded_messages_are_not_recursed() {
        let mut schema = Schema::new("t");
        schema.add_message(Message::new(
            "Inner",
            vec![Field::new("n", FieldType::Scalar(ScalarKind::Int32)).with_rules(FieldRules::rule(
                Rule::Int32(NumericRules {
                    gt: Some(0),
                    ..Default::default()
                }),
            ))],
        ));
        schema.add_message(Message::new(
            "Outer",
            vec![
                Field::new("a", FieldType::Message("Inner".into())),
                Field::new("b", FieldType::Message("Inner".into())).with_rules(FieldRules::message(
                    MessageRules {
                        skip: true,
                        required: false,
                    },
                )),
            ],
        ));
        let v = validator(&schema);
        let bad = MessageValue::new().with("n", 0);
        assert!(v.validate("Outer", &MessageValue::new().with("b", bad.clone())).is_ok());
        let err = v.validate("Outer", &MessageValue::new().with("a", bad)).unwrap_err();
        assert_eq!(err.full_path(), "a.n");
        assert_eq!(err.reason, reason::EMBEDDED);
    }

    #[test]
    fn unknown_messages_accept_everything() {
        let v = validator(&string_field(StringRules::default()));
        assert!(v.validate("Nope", &MessageValue::new()).is_ok());
    }
}
