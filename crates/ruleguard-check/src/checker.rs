//! Depth-first consistency walk over messages, fields and rule trees.

use crate::error::{SchemaError, SchemaErrorKind};
use crate::literals::{resolve_duration, resolve_timestamp};
use crate::regex_table::WellKnownPattern;
use ruleguard_ir::{
    AnyRules, BytesRules, DurationRules, DurationValue, EnumRules, FieldRules, FieldType,
    KnownRegex, MapRules, Message, MessageRules, NumericRules, RepeatedRules, Rule, ScalarKind, Schema,
    StringRules, StringWellKnown, TimestampRules, TimestampValue, WellKnownType,
};

type Result<T> = std::result::Result<T, SchemaError>;

const LEN_RULES: [&str; 3] = ["len", "min_len", "max_len"];

use SchemaErrorKind::{
    ConflictingRules, InvalidRegex, InvalidWellKnownCombination, OutOfRangeConstraint,
    TypeMismatch, UndefinedEnumValue,
};

pub(crate) struct Checker<'a> {
    schema: &'a Schema,
    path: Vec<String>,
}

impl<'a> Checker<'a> {
    pub(crate) fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            path: Vec::new(),
        }
    }

    pub(crate) fn check_schema(&mut self) -> Result<()> {
        let schema = self.schema;
        for message in &schema.messages {
            self.scoped(&message.name, |c| c.check_message(message))?;
        }
        Ok(())
    }

    fn check_message(&mut self, message: &Message) -> Result<()> {
        if message.disabled || message.ignored {
            tracing::debug!(message = %message.name, "validation disabled, skipping checks");
            return Ok(());
        }
        tracing::debug!(message = %message.name, fields = message.fields.len(), "checking message");

        for oneof in &message.oneofs {
            for member in &oneof.fields {
                let field = message.field(member).ok_or_else(|| {
                    self.fail(
                        TypeMismatch,
                        format!("oneof `{}` references undefined field `{member}`", oneof.name),
                    )
                })?;
                if field.oneof.as_deref() != Some(oneof.name.as_str()) {
                    return Err(self.fail(
                        TypeMismatch,
                        format!("field `{member}` is not declared as a member of oneof `{}`", oneof.name),
                    ));
                }
            }
        }

        for field in &message.fields {
            self.scoped(&field.name, |c| {
                c.check_type_refs(&field.ty)?;
                match &field.rules {
                    Some(rules) => c.check_field_rules(&field.ty, rules),
                    None => Ok(()),
                }
            })?;
        }
        Ok(())
    }

    /// Every referenced enum, message and wrapper must exist.
    fn check_type_refs(&self, ty: &FieldType) -> Result<()> {
        match ty {
            FieldType::Scalar(_) => Ok(()),
            FieldType::Enum(name) => match self.schema.enum_def(name) {
                Some(_) => Ok(()),
                None => Err(self.fail(TypeMismatch, format!("undefined enum type `{name}`"))),
            },
            FieldType::Message(name) => match self.schema.message(name) {
                Some(_) => Ok(()),
                None => Err(self.fail(TypeMismatch, format!("undefined message type `{name}`"))),
            },
            FieldType::WellKnown(WellKnownType::Wrapper(kind)) => {
                self.assert(
                    WellKnownType::is_valid_wrapper(*kind),
                    TypeMismatch,
                    format!("no wrapper type exists for {kind}"),
                )
            }
            FieldType::WellKnown(_) => Ok(()),
            FieldType::Repeated(elem) => {
                self.assert(
                    !elem.is_repeated() && !elem.is_map(),
                    TypeMismatch,
                    "repeated elements cannot themselves be repeated or maps",
                )?;
                self.check_type_refs(elem)
            }
            FieldType::Map { key, value } => {
                self.assert(
                    !key.is_float() && *key != ScalarKind::Bytes,
                    TypeMismatch,
                    format!("map keys must be integral, bool or string, got {key}"),
                )?;
                self.assert(
                    !value.is_repeated() && !value.is_map(),
                    TypeMismatch,
                    "map values cannot be repeated or maps",
                )?;
                self.check_type_refs(value)
            }
        }
    }

    fn check_field_rules(&mut self, ty: &FieldType, rules: &FieldRules) -> Result<()> {
        if let Some(message_rules) = rules.message {
            self.check_message_rules(ty, message_rules, rules.rule.is_some())?;
        }
        match &rules.rule {
            Some(rule) => self.check_rule(ty, rule),
            None => Ok(()),
        }
    }

    fn check_message_rules(&self, ty: &FieldType, rules: MessageRules, has_rule: bool) -> Result<()> {
        self.assert(ty.is_embed(), TypeMismatch, "field is not embedded but got message rules")?;

        if let FieldType::WellKnown(wkt) = ty {
            match wkt {
                WellKnownType::Any => {
                    return Err(self.fail(
                        InvalidWellKnownCombination,
                        "Any rules should be used for Any fields",
                    ));
                }
                WellKnownType::Duration => {
                    return Err(self.fail(
                        InvalidWellKnownCombination,
                        "Duration rules should be used for Duration fields",
                    ));
                }
                WellKnownType::Timestamp => {
                    return Err(self.fail(
                        InvalidWellKnownCombination,
                        "Timestamp rules should be used for Timestamp fields",
                    ));
                }
                WellKnownType::Wrapper(_) => {}
            }
        }

        self.assert(
            !(has_rule && rules.skip),
            InvalidWellKnownCombination,
            "Skip should not be used with WKT scalar rules",
        )
    }

    fn check_rule(&mut self, ty: &FieldType, rule: &Rule) -> Result<()> {
        match rule {
            Rule::Float(r) => {
                self.must_type(ty, rule)?;
                self.check_numeric(r)
            }
            Rule::Double(r) => {
                self.must_type(ty, rule)?;
                self.check_numeric(r)
            }
            Rule::Int32(r) | Rule::SInt32(r) | Rule::SFixed32(r) => {
                self.must_type(ty, rule)?;
                self.check_numeric(r)
            }
            Rule::Int64(r) | Rule::SInt64(r) | Rule::SFixed64(r) => {
                self.must_type(ty, rule)?;
                self.check_numeric(r)
            }
            Rule::UInt32(r) | Rule::Fixed32(r) => {
                self.must_type(ty, rule)?;
                self.check_numeric(r)
            }
            Rule::UInt64(r) | Rule::Fixed64(r) => {
                self.must_type(ty, rule)?;
                self.check_numeric(r)
            }
            Rule::Bool(_) => self.must_type(ty, rule),
            Rule::String(r) => {
                self.must_type(ty, rule)?;
                self.check_string(r)
            }
            Rule::Bytes(r) => {
                self.must_type(ty, rule)?;
                self.check_bytes(r)
            }
            Rule::Enum(r) => {
                self.must_type(ty, rule)?;
                self.check_enum(ty, r)
            }
            Rule::Repeated(r) => self.check_repeated(ty, r),
            Rule::Map(r) => self.check_map(ty, r),
            Rule::Any(r) => {
                self.must_type(ty, rule)?;
                self.check_any(r)
            }
            Rule::Duration(r) => {
                self.must_type(ty, rule)?;
                self.check_duration(r)
            }
            Rule::Timestamp(r) => {
                self.must_type(ty, rule)?;
                self.check_timestamp(r)
            }
        }
    }

    /// Assert a non-container rule matches the field type, looking through
    /// one scalar wrapper.
    fn must_type(&self, ty: &FieldType, rule: &Rule) -> Result<()> {
        if let (Some(inner), Some(_)) = (ty.wrapped(), rule.scalar_kind()) {
            return self.must_type(&FieldType::Scalar(inner), rule);
        }

        self.assert(
            !ty.is_repeated() && !ty.is_map(),
            TypeMismatch,
            "repeated rule should be used for repeated fields",
        )?;

        let matches = match (rule, ty) {
            (Rule::Enum(_), FieldType::Enum(_)) => true,
            (Rule::Any(_), FieldType::WellKnown(WellKnownType::Any)) => true,
            (Rule::Duration(_), FieldType::WellKnown(WellKnownType::Duration)) => true,
            (Rule::Timestamp(_), FieldType::WellKnown(WellKnownType::Timestamp)) => true,
            (_, FieldType::Scalar(kind)) => rule.scalar_kind() == Some(*kind),
            _ => false,
        };
        self.assert(
            matches,
            TypeMismatch,
            format!("expected rules for {ty} but got {}", rule.name()),
        )
    }

    fn check_numeric<T: PartialEq + Copy>(&self, r: &NumericRules<T>) -> Result<()> {
        self.check_nums(
            r.in_list.len(),
            r.not_in.len(),
            r.constant,
            r.lt,
            r.lte,
            r.gt,
            r.gte,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn check_nums<T: PartialEq>(
        &self,
        in_len: usize,
        not_in_len: usize,
        constant: Option<T>,
        lt: Option<T>,
        lte: Option<T>,
        gt: Option<T>,
        gte: Option<T>,
    ) -> Result<()> {
        self.check_ins(in_len, not_in_len)?;

        let has_range = lt.is_some() || lte.is_some() || gt.is_some() || gte.is_some();

        self.assert(
            constant.is_none() || (in_len == 0 && not_in_len == 0 && !has_range),
            ConflictingRules,
            "`const` can be the only rule on a field",
        )?;
        self.assert(
            in_len == 0 || !has_range,
            ConflictingRules,
            "cannot have both `in` and range constraint rules on the same field",
        )?;
        self.assert(
            lt.is_none() || lte.is_none(),
            ConflictingRules,
            "cannot have both `lt` and `lte` rules on the same field",
        )?;
        self.assert(
            gt.is_none() || gte.is_none(),
            ConflictingRules,
            "cannot have both `gt` and `gte` rules on the same field",
        )?;

        if let Some(lt) = &lt {
            self.assert(
                gt.as_ref() != Some(lt),
                ConflictingRules,
                "cannot have equal `gt` and `lt` rules on the same field",
            )?;
            self.assert(
                gte.as_ref() != Some(lt),
                ConflictingRules,
                "cannot have equal `gte` and `lt` rules on the same field",
            )?;
        } else if let Some(lte) = &lte {
            self.assert(
                gt.as_ref() != Some(lte),
                ConflictingRules,
                "cannot have equal `gt` and `lte` rules on the same field",
            )?;
            self.assert(
                gte.as_ref() != Some(lte),
                ConflictingRules,
                "use `const` instead of equal `lte` and `gte` rules",
            )?;
        }
        Ok(())
    }

    fn check_ins(&self, in_len: usize, not_in_len: usize) -> Result<()> {
        self.assert(
            in_len == 0 || not_in_len == 0,
            ConflictingRules,
            "cannot have both `in` and `not_in` rules on the same field",
        )
    }

    fn check_min_max(&self, min: Option<u64>, max: Option<u64>) -> Result<()> {
        match (min, max) {
            (Some(min), Some(max)) => self.assert(
                min <= max,
                OutOfRangeConstraint,
                "`min` value is greater than `max` value",
            ),
            _ => Ok(()),
        }
    }

    /// `names` are the exact, min and max rule names.
    fn check_len(&self, names: [&str; 3], len: Option<u64>, min: Option<u64>, max: Option<u64>) -> Result<()> {
        let [exact, min_name, max_name] = names;
        if len.is_none() {
            return Ok(());
        }
        self.assert(
            min.is_none(),
            ConflictingRules,
            format!("cannot have both `{exact}` and `{min_name}` rules on the same field"),
        )?;
        self.assert(
            max.is_none(),
            ConflictingRules,
            format!("cannot have both `{exact}` and `{max_name}` rules on the same field"),
        )
    }

    fn check_string(&self, r: &StringRules) -> Result<()> {
        self.check_len(LEN_RULES, r.len, r.min_len, r.max_len)?;
        self.check_len(["len_bytes", "min_bytes", "max_bytes"], r.len_bytes, r.min_bytes, r.max_bytes)?;
        self.check_min_max(r.min_len, r.max_len)?;
        self.check_min_max(r.min_bytes, r.max_bytes)?;
        self.check_ins(r.in_list.len(), r.not_in.len())?;

        let pattern = match r.well_known {
            Some(StringWellKnown::WellKnownRegex(selector)) if selector != KnownRegex::Unknown => {
                self.assert(
                    r.pattern.is_none(),
                    ConflictingRules,
                    "regex `well_known_regex` and regex `pattern` are incompatible",
                )?;
                Some(WellKnownPattern::select(selector, r.is_strict()).pattern().to_string())
            }
            _ => r.pattern.clone(),
        };
        if let Some(pattern) = &pattern {
            self.check_pattern(pattern, r.in_list.len(), false)?;
        }

        if let Some(max) = r.max_len {
            for (name, affix) in [("prefix", &r.prefix), ("suffix", &r.suffix), ("contains", &r.contains)] {
                let runes = affix.as_deref().map_or(0, |s| s.chars().count()) as u64;
                self.assert(
                    runes <= max,
                    OutOfRangeConstraint,
                    format!("`{name}` length exceeds the `max_len`"),
                )?;
            }
            self.assert(
                r.max_bytes.is_none_or(|max_bytes| max_bytes >= max),
                OutOfRangeConstraint,
                "`max_len` cannot exceed `max_bytes`",
            )?;
        }

        if let Some(max) = r.max_bytes {
            for (name, affix) in [("prefix", &r.prefix), ("suffix", &r.suffix), ("contains", &r.contains)] {
                let bytes = affix.as_deref().map_or(0, str::len) as u64;
                self.assert(
                    bytes <= max,
                    OutOfRangeConstraint,
                    format!("`{name}` length exceeds the `max_bytes`"),
                )?;
            }
        }
        Ok(())
    }

    fn check_bytes(&self, r: &BytesRules) -> Result<()> {
        self.check_len(LEN_RULES, r.len, r.min_len, r.max_len)?;
        self.check_min_max(r.min_len, r.max_len)?;
        self.check_ins(r.in_list.len(), r.not_in.len())?;
        if let Some(pattern) = &r.pattern {
            self.check_pattern(pattern, r.in_list.len(), true)?;
        }

        if let Some(max) = r.max_len {
            for (name, affix) in [("prefix", &r.prefix), ("suffix", &r.suffix), ("contains", &r.contains)] {
                let len = affix.as_ref().map_or(0, Vec::len) as u64;
                self.assert(
                    len <= max,
                    OutOfRangeConstraint,
                    format!("`{name}` length exceeds the `max_len`"),
                )?;
            }
        }
        Ok(())
    }

    fn check_pattern(&self, pattern: &str, in_len: usize, bytes: bool) -> Result<()> {
        self.assert(
            in_len == 0,
            ConflictingRules,
            "regex `pattern` and `in` rules are incompatible",
        )?;
        let compiled = if bytes {
            regex::bytes::Regex::new(pattern).map(|_| ())
        } else {
            regex::Regex::new(pattern).map(|_| ())
        };
        compiled.map_err(|e| {
            self.fail(
                InvalidRegex,
                format!("unable to parse regex `pattern` {pattern:?}: {e}"),
            )
        })
    }

    fn check_enum(&self, ty: &FieldType, r: &EnumRules) -> Result<()> {
        self.check_ins(r.in_list.len(), r.not_in.len())?;
        self.assert(
            r.constant.is_none() || (r.in_list.is_empty() && r.not_in.is_empty()),
            ConflictingRules,
            "`const` can be the only rule on a field",
        )?;

        if !r.defined_only {
            return Ok(());
        }
        let FieldType::Enum(name) = ty else {
            return Err(self.fail(TypeMismatch, format!("unexpected field type ({ty})")));
        };
        let Some(def) = self.schema.enum_def(name) else {
            return Err(self.fail(TypeMismatch, format!("undefined enum type `{name}`")));
        };
        for value in &r.in_list {
            self.assert(
                def.is_defined(*value),
                UndefinedEnumValue,
                format!("undefined `in` value ({value}) conflicts with `defined_only` rule"),
            )?;
        }
        if let Some(value) = r.constant {
            self.assert(
                def.is_defined(value),
                UndefinedEnumValue,
                format!("undefined `const` value ({value}) conflicts with `defined_only` rule"),
            )?;
        }
        Ok(())
    }

    fn check_repeated(&mut self, ty: &FieldType, r: &RepeatedRules) -> Result<()> {
        let FieldType::Repeated(elem) = ty else {
            return Err(self.fail(TypeMismatch, "field is not repeated but got repeated rules"));
        };
        self.check_min_max(r.min_items, r.max_items)?;
        if r.unique {
            self.assert(
                !elem.is_embed(),
                TypeMismatch,
                "unique rule is only applicable for scalar types",
            )?;
        }
        match &r.items {
            Some(items) => self.scoped("items", |c| c.check_field_rules(elem, items)),
            None => Ok(()),
        }
    }

    fn check_map(&mut self, ty: &FieldType, r: &MapRules) -> Result<()> {
        let FieldType::Map { key, value } = ty else {
            return Err(self.fail(TypeMismatch, "field is not a map but got map rules"));
        };
        self.check_min_max(r.min_pairs, r.max_pairs)?;
        if r.no_sparse {
            self.assert(
                value.is_embed(),
                TypeMismatch,
                "no_sparse rule is only applicable for embedded message types",
            )?;
        }
        if let Some(keys) = &r.keys {
            let key_ty = FieldType::Scalar(*key);
            self.scoped("keys", |c| c.check_field_rules(&key_ty, keys))?;
        }
        if let Some(values) = &r.values {
            self.scoped("values", |c| c.check_field_rules(value, values))?;
        }
        Ok(())
    }

    fn check_any(&self, r: &AnyRules) -> Result<()> {
        self.check_ins(r.in_list.len(), r.not_in.len())
    }

    fn check_duration(&self, r: &DurationRules) -> Result<()> {
        let dur = |d: Option<DurationValue>| d.map(|d| self.check_dur(d)).transpose();
        self.check_nums(
            r.in_list.len(),
            r.not_in.len(),
            dur(r.constant)?,
            dur(r.lt)?,
            dur(r.lte)?,
            dur(r.gt)?,
            dur(r.gte)?,
        )?;
        for value in r.in_list.iter().chain(&r.not_in) {
            self.check_dur(*value)?;
        }
        Ok(())
    }

    fn check_timestamp(&self, r: &TimestampRules) -> Result<()> {
        let ts = |t: Option<TimestampValue>| t.map(|t| self.check_ts(t)).transpose();
        self.check_nums(
            0,
            0,
            ts(r.constant)?,
            ts(r.lt)?,
            ts(r.lte)?,
            ts(r.gt)?,
            ts(r.gte)?,
        )?;

        let absolute = r.lt.is_some() || r.lte.is_some() || r.gt.is_some() || r.gte.is_some();
        self.assert(
            !(r.lt_now || r.gt_now) || !absolute,
            ConflictingRules,
            "`now` rules cannot be mixed with absolute `lt/gt` rules",
        )?;
        self.assert(
            r.within.is_none() || !absolute,
            ConflictingRules,
            "`within` rules cannot be mixed with absolute `lt/gt` rules",
        )?;
        self.assert(
            !(r.lt_now && r.gt_now),
            ConflictingRules,
            "both `now` rules cannot be used together",
        )?;
        self.assert(
            r.constant.is_none() || !(r.lt_now || r.gt_now || r.within.is_some()),
            ConflictingRules,
            "`const` can be the only rule on a field",
        )?;

        if let Some(within) = r.within {
            let nanos = self.check_dur(within)?;
            self.assert(
                nanos > 0,
                OutOfRangeConstraint,
                "`within` rule must be positive and non-zero",
            )?;
        }
        Ok(())
    }

    fn check_dur(&self, d: DurationValue) -> Result<i128> {
        resolve_duration(d)
            .map_err(|e| self.fail(OutOfRangeConstraint, format!("could not resolve duration: {e}")))
    }

    fn check_ts(&self, ts: TimestampValue) -> Result<i128> {
        resolve_timestamp(ts)
            .map_err(|e| self.fail(OutOfRangeConstraint, format!("could not resolve timestamp: {e}")))
    }

    fn scoped<T>(&mut self, segment: &str, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.path.push(segment.to_string());
        let out = f(self);
        self.path.pop();
        out
    }

    fn assert(&self, cond: bool, kind: SchemaErrorKind, message: impl Into<String>) -> Result<()> {
        if cond { Ok(()) } else { Err(self.fail(kind, message)) }
    }

    fn fail(&self, kind: SchemaErrorKind, message: impl Into<String>) -> SchemaError {
        SchemaError {
            kind,
            path: self.path.join("."),
            message: message.into(),
        }
    }
}
