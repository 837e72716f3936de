//! Go validator generation.
//!
//! Emits a `Validate() error` method on every message type produced by
//! protoc-gen-go, plus a `<Message>ValidationError` type carrying the field
//! path, reason and cause of the first violation.

use crate::context::{RenderContext, Target};
use crate::error::RenderError;
use crate::lookup::{self, LookupTable, PatternTable, TableValues, Tables};
use crate::plan::{
    ComparablePlan, CountCheck, Format, Instant, Nanos, NowCheck, Number, Op, SetCheck, TextCheck,
    TextLiteral, TimestampPlan, count_checks,
};
use crate::reason;
use crate::render::{self, RenderResult, RuleRenderer, upper_camel};
use crate::traits::{Backend, Convention, GenerateOptions, GoOptions};
use crate::writer::CodeWriter;
use ruleguard_check::CheckedSchema;
use ruleguard_ir::{
    AnyRules, BoolRules, DurationRules, EnumDef, EnumRules, FieldType, MapRules, Message, OneOf,
    RepeatedRules, ScalarKind, Schema, TimestampRules, WellKnownType,
};
use std::collections::BTreeSet;

/// Static instance of the Go backend for registry.
pub static GO_BACKEND: GoBackend = GoBackend;

/// Go backend implementing the Backend trait.
pub struct GoBackend;

impl Backend for GoBackend {
    fn name(&self) -> &'static str {
        "go"
    }

    fn language(&self) -> &'static str {
        "go"
    }

    fn extension(&self) -> &'static str {
        "go"
    }

    fn convention(&self) -> Convention {
        Convention::ErrorValue
    }

    fn generate(&self, schema: &CheckedSchema, options: &GenerateOptions) -> Result<String, RenderError> {
        generate_go(schema, &options.go)
    }
}

const IMPORTS: &[(&str, &str)] = &[
    ("bytes", "bytes.MinRead"),
    ("fmt", "fmt.Sprintf"),
    ("math", "math.Inf"),
    ("net", "net.IPv4len"),
    ("regexp", "regexp.MustCompile"),
    ("strings", "strings.HasPrefix"),
    ("time", "time.Duration(0)"),
    ("unicode", "unicode.IsSpace"),
    ("unicode/utf8", "utf8.UTFMax"),
];

/// Generate a Go file of `Validate` methods for a checked schema.
pub fn generate_go(checked: &CheckedSchema, options: &GoOptions) -> Result<String, RenderError> {
    let schema = checked.schema();
    let tables = lookup::collect_tables(checked)?;
    let mut r = GoRenderer {
        w: CodeWriter::new("\t"),
        error_type: String::new(),
    };
    r.header(schema, options);
    r.tables(&tables);
    for message in checked.emitted_messages() {
        r.routine(schema, message)?;
    }
    tracing::debug!(package = %schema.package, "generated go validators");
    Ok(r.w.finish())
}

/// Package clause for a schema package such as `shop.v1`.
pub fn package_name(schema_package: &str) -> String {
    let last = schema_package.rsplit('.').next().unwrap_or_default();
    let name: String = last
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() { "validation".to_string() } else { name }
}

struct GoRenderer {
    w: CodeWriter,
    /// Error type of the routine being rendered.
    error_type: String,
}

impl GoRenderer {
    fn header(&mut self, schema: &Schema, options: &GoOptions) {
        let package = options
            .package
            .clone()
            .unwrap_or_else(|| package_name(&schema.package));
        self.w.line("// Code generated by ruleguard. DO NOT EDIT.");
        self.w.line(format!("// package: {}", schema.package));
        self.w.blank();
        self.w.line(format!("package {package}"));
        self.w.blank();
        self.w.open("import (");
        for (path, _) in IMPORTS {
            self.w.line(format!("\"{path}\""));
        }
        self.w.close(Some(")"));
        self.w.blank();
        self.w.line("// ensure the imports are used");
        self.w.open("var (");
        for (_, symbol) in IMPORTS {
            self.w.line(format!("_ = {symbol}"));
        }
        self.w.close(Some(")"));
    }

    fn tables(&mut self, tables: &Tables) {
        if tables.is_empty() {
            return;
        }
        self.w.blank();
        for LookupTable { name, ty, values } in &tables.lookups {
            let entries: Vec<String> = match values {
                TableValues::Numbers(v) => v.iter().map(|n| go_number(*n)).collect(),
                TableValues::Strings(v) | TableValues::TypeUrls(v) => v.iter().map(|s| reason::quote(s)).collect(),
                TableValues::Bytes(v) => v.iter().map(|b| reason::quote_bytes(b)).collect(),
                TableValues::Enums(v) => v.iter().map(ToString::to_string).collect(),
                TableValues::Durations(v) => v.iter().map(|d| go_duration(*d)).collect(),
            };
            self.w.open(format!("var {name} = map[{}]struct{{}}{{", table_key_type(ty)));
            for entry in entries {
                self.w.line(format!("{entry}: {{}},"));
            }
            self.w.close(Some("}"));
        }
        for PatternTable { name, pattern, .. } in &tables.patterns {
            self.w.line(format!("var {name} = regexp.MustCompile({})", reason::quote(pattern)));
        }
    }

    fn routine(&mut self, schema: &Schema, message: &Message) -> RenderResult {
        let ident = message.ident();
        self.error_type = format!("{ident}ValidationError");
        self.w.blank();
        self.w.line(format!(
            "// Validate checks the field values on {} with the rules defined in the",
            message.name
        ));
        self.w.line("// schema and returns the first violation, or nil if there is none.");
        self.w.open(format!("func (m *{ident}) Validate() error {{"));
        if !message.disabled {
            self.w.open("if m == nil {");
            self.w.line("return nil");
            self.w.close(Some("}"));
            if lookup::uses_now(schema, message)? {
                self.w.line("now := time.Now()");
            }
            for field in message.plain_fields() {
                render::render_field(self, &RenderContext::for_field(schema, message, field))?;
            }
            for oneof in &message.oneofs {
                self.oneof(schema, message, oneof)?;
            }
        }
        self.w.line("return nil");
        self.w.close(Some("}"));
        self.error_struct(message);
        self.format_helpers(&ident, &lookup::formats_used(schema, message)?);
        Ok(())
    }

    fn oneof(&mut self, schema: &Schema, message: &Message, oneof: &OneOf) -> RenderResult {
        let members: Vec<RenderContext<'_>> = message
            .oneof_fields(oneof)
            .map(|f| RenderContext::for_field(schema, message, f))
            .filter(|ctx| !matches!(ctx.target, Target::None) || ctx.is_required())
            .collect();
        if members.is_empty() && !oneof.required {
            return Ok(());
        }
        self.w.line(format!("switch m.{}.(type) {{", upper_camel(&oneof.name)));
        for ctx in &members {
            self.w.open(format!(
                "case *{}_{}:",
                message.ident(),
                upper_camel(&ctx.field.name)
            ));
            render::render_field(self, ctx)?;
            self.w.close(None);
        }
        if oneof.required {
            self.w.open("case nil:");
            self.w.line(format!(
                "return {}{{field: {}, reason: {}}}",
                self.error_type,
                reason::quote(&oneof.name),
                reason::quote(reason::REQUIRED)
            ));
            self.w.close(None);
        }
        self.w.line("}");
        Ok(())
    }

    fn error_struct(&mut self, message: &Message) {
        let ty = self.error_type.clone();
        let lines = [
            String::new(),
            format!("// {ty} is the validation error returned by {}.Validate.", message.ident()),
            format!("type {ty} struct {{"),
            "\tfield  string".into(),
            "\treason string".into(),
            "\tcause  error".into(),
            "\tkey    bool".into(),
            "}".into(),
            String::new(),
            "// Field function returns field value.".into(),
            format!("func (e {ty}) Field() string {{ return e.field }}"),
            String::new(),
            "// Reason function returns reason value.".into(),
            format!("func (e {ty}) Reason() string {{ return e.reason }}"),
            String::new(),
            "// Cause function returns cause value.".into(),
            format!("func (e {ty}) Cause() error {{ return e.cause }}"),
            String::new(),
            "// Key function returns key value.".into(),
            format!("func (e {ty}) Key() bool {{ return e.key }}"),
            String::new(),
            "// Error satisfies the builtin error interface".into(),
            format!("func (e {ty}) Error() string {{"),
            "\tcause := \"\"".into(),
            "\tif e.cause != nil {".into(),
            "\t\tcause = fmt.Sprintf(\" | caused by: %v\", e.cause)".into(),
            "\t}".into(),
            "\tkey := \"\"".into(),
            "\tif e.key {".into(),
            "\t\tkey = \"key for \"".into(),
            "\t}".into(),
            format!(
                "\treturn fmt.Sprintf(\"invalid %s{}.%s: %s%s\", key, e.field, e.reason, cause)",
                message.name
            ),
            "}".into(),
        ];
        for line in lines {
            self.w.line(line);
        }
    }

    fn format_helpers(&mut self, ident: &str, formats: &BTreeSet<Format>) {
        let needs = |f: &[Format]| f.iter().any(|f| formats.contains(f));
        let hostname = needs(&[Format::Hostname, Format::Email, Format::Address]);
        let ip = needs(&[Format::Ip, Format::Ipv4, Format::Ipv6, Format::Address]);
        let uri_ref = needs(&[Format::Uri, Format::UriRef]);
        let helpers: [(bool, &str); 7] = [
            (hostname, GO_HOSTNAME),
            (needs(&[Format::Email]), GO_EMAIL),
            (ip, GO_IP),
            (needs(&[Format::Address]), GO_ADDRESS),
            (uri_ref, GO_URI_REF),
            (needs(&[Format::Uri]), GO_URI),
            (needs(&[Format::Uuid]), GO_UUID),
        ];
        for (wanted, body) in helpers {
            if wanted {
                self.w.blank();
                for line in body.replace("{MSG}", ident).lines() {
                    self.w.line(line);
                }
            }
        }
    }

    fn value(ctx: &RenderContext<'_>) -> String {
        ctx.accessor
            .clone()
            .unwrap_or_else(|| format!("m.Get{}()", upper_camel(&ctx.field.name)))
    }

    fn path(ctx: &RenderContext<'_>) -> String {
        match &ctx.index {
            Some(index) => format!("fmt.Sprintf(\"{}[%v]\", {index})", ctx.field.name),
            None => reason::quote(&ctx.field.name),
        }
    }

    fn error(&self, ctx: &RenderContext<'_>, reason: &str, cause: Option<&str>) -> String {
        let mut fields = format!("field: {}, reason: {}", Self::path(ctx), reason::quote(reason));
        if let Some(cause) = cause {
            fields.push_str(&format!(", cause: {cause}"));
        }
        if ctx.on_key {
            fields.push_str(", key: true");
        }
        format!("{}{{{fields}}}", self.error_type)
    }

    fn check(&mut self, ctx: &RenderContext<'_>, cond: &str, reason: &str) {
        let error = self.error(ctx, reason, None);
        self.w.open(format!("if {cond} {{"));
        self.w.line(format!("return {error}"));
        self.w.close(Some("}"));
    }

    fn required(&mut self, ctx: &RenderContext<'_>, required: bool) {
        if required && ctx.is_root() {
            let cond = format!("{} == nil", Self::value(ctx));
            self.check(ctx, &cond, reason::REQUIRED);
        }
    }

    /// Bind a non-nil message value to `var` for the duration of `body`.
    fn when_present(
        &mut self,
        ctx: &RenderContext<'_>,
        var: &str,
        body: impl FnOnce(&mut Self) -> RenderResult,
    ) -> RenderResult {
        self.w.open(format!("if {var} := {}; {var} != nil {{", Self::value(ctx)));
        body(self)?;
        self.w.close(Some("}"));
        Ok(())
    }

    fn set_check<T>(&mut self, ctx: &RenderContext<'_>, probe: &str, set: &SetCheck<T>, reason: &str) {
        let table = lookup::set_table_name(ctx, set);
        let cond = match set {
            SetCheck::In(_) => format!("_, ok := {table}[{probe}]; !ok"),
            SetCheck::NotIn(_) => format!("_, ok := {table}[{probe}]; ok"),
        };
        self.check(ctx, &cond, reason);
    }

    fn counts(&mut self, ctx: &RenderContext<'_>, value: &str, checks: &[CountCheck], noun: &str) {
        for check in checks {
            let (op, n) = check.failure();
            self.check(ctx, &format!("len({value}) {} {n}", op.symbol()), &check.reason(noun));
        }
    }

    fn comparable<T: Copy + PartialOrd + std::fmt::Display>(
        &mut self,
        ctx: &RenderContext<'_>,
        probe: &str,
        plan: &ComparablePlan<T>,
        compare: impl Fn(Op, &T) -> String,
    ) {
        for (cond, reason) in render::comparisons(plan, "&&", "||", &compare) {
            self.check(ctx, &cond, &reason);
        }
        if let Some(set) = &plan.set {
            self.set_check(ctx, probe, set, &set.reason());
        }
    }

    fn text<L: TextLiteral>(
        &mut self,
        ctx: &RenderContext<'_>,
        checks: &[TextCheck<L>],
        literal: impl Fn(&L) -> String,
        bytes: bool,
    ) {
        let v = Self::value(ctx);
        let (pkg, probe) = if bytes {
            ("bytes", format!("string({v})"))
        } else {
            ("strings", v.clone())
        };
        for check in checks {
            let cond = match check {
                TextCheck::Const(c) if bytes => format!("!bytes.Equal({v}, {})", literal(c)),
                TextCheck::Const(c) => format!("{v} != {}", literal(c)),
                TextCheck::Len(n) if !bytes => format!("utf8.RuneCountInString({v}) != {n}"),
                TextCheck::MinLen(n) if !bytes => format!("utf8.RuneCountInString({v}) < {n}"),
                TextCheck::MaxLen(n) if !bytes => format!("utf8.RuneCountInString({v}) > {n}"),
                TextCheck::Len(n) | TextCheck::LenBytes(n) => format!("len({v}) != {n}"),
                TextCheck::MinLen(n) | TextCheck::MinBytes(n) => format!("len({v}) < {n}"),
                TextCheck::MaxLen(n) | TextCheck::MaxBytes(n) => format!("len({v}) > {n}"),
                TextCheck::In(values) => {
                    let table = lookup::set_table_name(ctx, &SetCheck::In(values.clone()));
                    format!("_, ok := {table}[{probe}]; !ok")
                }
                TextCheck::NotIn(values) => {
                    let table = lookup::set_table_name(ctx, &SetCheck::NotIn(values.clone()));
                    format!("_, ok := {table}[{probe}]; ok")
                }
                TextCheck::Pattern(_) => {
                    let method = if bytes { "Match" } else { "MatchString" };
                    format!("!{}.{method}({v})", ctx.table_name(lookup::PATTERN))
                }
                TextCheck::Prefix(p) => format!("!{pkg}.HasPrefix({v}, {})", literal(p)),
                TextCheck::Suffix(s) => format!("!{pkg}.HasSuffix({v}, {})", literal(s)),
                TextCheck::Contains(c) => format!("!{pkg}.Contains({v}, {})", literal(c)),
                TextCheck::NotContains(c) => format!("{pkg}.Contains({v}, {})", literal(c)),
                TextCheck::Format(format) if bytes => match format {
                    Format::Ipv4 => format!("len({v}) != 4"),
                    Format::Ipv6 => format!("len({v}) != 16"),
                    _ => format!("len({v}) != 4 && len({v}) != 16"),
                },
                TextCheck::Format(format) => format!("!{}", format_call(*format, &v)),
            };
            self.check(ctx, &cond, &check.reason());
        }
    }
}

impl RuleRenderer for GoRenderer {
    fn presence(&mut self, ctx: &RenderContext<'_>) -> RenderResult {
        self.required(ctx, ctx.is_required());
        Ok(())
    }

    fn embedded(&mut self, ctx: &RenderContext<'_>, _message: &Message) -> RenderResult {
        self.required(ctx, ctx.is_required());
        let error = self.error(ctx, reason::EMBEDDED, Some("err"));
        self.w.open(format!(
            "if v, ok := interface{{}}({}).(interface{{ Validate() error }}); ok {{",
            Self::value(ctx)
        ));
        self.w.open("if err := v.Validate(); err != nil {");
        self.w.line(format!("return {error}"));
        self.w.close(Some("}"));
        self.w.close(Some("}"));
        Ok(())
    }

    fn wrapper(&mut self, ctx: &RenderContext<'_>) -> RenderResult {
        self.required(ctx, ctx.is_required());
        let inner = ctx.unwrap("w.GetValue()")?;
        self.when_present(ctx, "w", |r| render::render_field(r, &inner))
    }

    fn numeric(&mut self, ctx: &RenderContext<'_>, plan: &ComparablePlan<Number>) -> RenderResult {
        let value = Self::value(ctx);
        self.comparable(ctx, &value, plan, |op, n| {
            format!("{value} {} {}", op.symbol(), go_number(*n))
        });
        Ok(())
    }

    fn boolean(&mut self, ctx: &RenderContext<'_>, rules: &BoolRules) -> RenderResult {
        if let Some(expected) = rules.constant {
            let cond = format!("{} != {expected}", Self::value(ctx));
            self.check(ctx, &cond, &reason::equal(expected));
        }
        Ok(())
    }

    fn string(&mut self, ctx: &RenderContext<'_>, checks: &[TextCheck<String>]) -> RenderResult {
        self.text(ctx, checks, |s| reason::quote(s), false);
        Ok(())
    }

    fn bytes(&mut self, ctx: &RenderContext<'_>, checks: &[TextCheck<Vec<u8>>]) -> RenderResult {
        self.text(ctx, checks, |b| format!("[]byte({})", reason::quote_bytes(b)), true);
        Ok(())
    }

    fn enumeration(&mut self, ctx: &RenderContext<'_>, rules: &EnumRules, def: &EnumDef) -> RenderResult {
        let value = Self::value(ctx);
        if let Some(constant) = rules.constant {
            self.check(ctx, &format!("{value} != {constant}"), &reason::equal(constant));
        }
        if rules.defined_only {
            let names = format!("{}_name", def.name.replace('.', "_"));
            self.check(ctx, &format!("_, ok := {names}[int32({value})]; !ok"), reason::DEFINED_ONLY);
        }
        if let Some(set) = lookup::enum_set(&rules.in_list, &rules.not_in) {
            self.set_check(ctx, &format!("int32({value})"), &set, &set.reason());
        }
        Ok(())
    }

    fn repeated(&mut self, ctx: &RenderContext<'_>, rules: &RepeatedRules) -> RenderResult {
        let value = Self::value(ctx);
        self.counts(ctx, &value, &count_checks(rules.min_items, rules.max_items), "item");
        let elem = ctx.elem("item", "idx")?;
        if !rules.unique && matches!(elem.target, Target::None) {
            return Ok(());
        }
        let seen = format!("_{}_seen", ctx.field.name);
        if rules.unique {
            self.w.line(format!(
                "{seen} := make(map[{}]struct{{}}, len({value}))",
                table_key_type(&elem.ty)
            ));
        }
        self.w.open(format!("for idx, item := range {value} {{"));
        self.w.line("_, _ = idx, item");
        if rules.unique {
            let probe = table_probe(&elem.ty, "item");
            self.w.open(format!("if _, exists := {seen}[{probe}]; exists {{"));
            let error = self.error(&elem, reason::UNIQUE, None);
            self.w.line(format!("return {error}"));
            self.w.close(Some("}"));
            self.w.line(format!("{seen}[{probe}] = struct{{}}{{}}"));
        }
        render::render_field(self, &elem)?;
        self.w.close(Some("}"));
        Ok(())
    }

    fn map(&mut self, ctx: &RenderContext<'_>, rules: &MapRules) -> RenderResult {
        let value = Self::value(ctx);
        self.counts(ctx, &value, &count_checks(rules.min_pairs, rules.max_pairs), "pair");
        let key = ctx.key("key", "key")?;
        let val = ctx.elem("val", "key")?;
        let sparse = rules.no_sparse && val.ty.is_embed();
        if !sparse && matches!(key.target, Target::None) && matches!(val.target, Target::None) {
            return Ok(());
        }
        self.w.open(format!("for key, val := range {value} {{"));
        self.w.line("_, _ = key, val");
        if sparse {
            self.check(&val, "val == nil", reason::NO_SPARSE);
        }
        render::render_field(self, &key)?;
        render::render_field(self, &val)?;
        self.w.close(Some("}"));
        Ok(())
    }

    fn any(&mut self, ctx: &RenderContext<'_>, rules: &AnyRules) -> RenderResult {
        self.required(ctx, rules.required || ctx.is_required());
        let Some(set) = lookup::enum_set(&rules.in_list, &rules.not_in) else {
            return Ok(());
        };
        let why = match &set {
            SetCheck::In(urls) => reason::type_url_in(urls),
            SetCheck::NotIn(urls) => reason::type_url_not_in(urls),
        };
        self.when_present(ctx, "a", |r| {
            r.set_check(ctx, "a.GetTypeUrl()", &set, &why);
            Ok(())
        })
    }

    fn duration(
        &mut self,
        ctx: &RenderContext<'_>,
        rules: &DurationRules,
        plan: &ComparablePlan<Nanos>,
    ) -> RenderResult {
        self.required(ctx, rules.required || ctx.is_required());
        if plan.is_empty() {
            return Ok(());
        }
        self.when_present(ctx, "d", |r| {
            r.w.line("dur := d.AsDuration()");
            r.comparable(ctx, "dur", plan, |op, d| {
                format!("dur {} {}", op.symbol(), go_duration(*d))
            });
            Ok(())
        })
    }

    fn timestamp(
        &mut self,
        ctx: &RenderContext<'_>,
        rules: &TimestampRules,
        plan: &TimestampPlan,
    ) -> RenderResult {
        self.required(ctx, rules.required || ctx.is_required());
        if plan.comparable.is_empty() && plan.now.is_none() {
            return Ok(());
        }
        self.when_present(ctx, "t", |r| {
            r.w.line("ts := t.AsTime()");
            r.comparable(ctx, "ts", &plan.comparable, |op, t| time_compare("ts", op, &go_instant(*t)));
            if let Some(now) = plan.now {
                let cond = match now {
                    NowCheck::Before => "!ts.Before(now)".to_string(),
                    NowCheck::After => "!ts.After(now)".to_string(),
                    NowCheck::Within(w) => {
                        let w = go_duration(w);
                        format!("ts.Sub(now) > {w} || now.Sub(ts) > {w}")
                    }
                    NowCheck::BeforeWithin(w) => {
                        format!("!ts.Before(now) || ts.Before(now.Add(-{}))", go_duration(w))
                    }
                    NowCheck::AfterWithin(w) => {
                        format!("!ts.After(now) || ts.After(now.Add({}))", go_duration(w))
                    }
                };
                r.check(ctx, &cond, &now.reason());
            }
            Ok(())
        })
    }
}

/// Spell `value <op> bound` for `time.Time` values.
fn time_compare(value: &str, op: Op, bound: &str) -> String {
    match op {
        Op::Lt => format!("{value}.Before({bound})"),
        Op::Le => format!("!{value}.After({bound})"),
        Op::Gt => format!("{value}.After({bound})"),
        Op::Ge => format!("!{value}.Before({bound})"),
        Op::Eq => format!("{value}.Equal({bound})"),
        Op::Ne => format!("!{value}.Equal({bound})"),
    }
}

fn format_call(format: Format, value: &str) -> String {
    match format {
        Format::Email => format!("m._isEmail({value})"),
        Format::Hostname => format!("m._isHostname({value})"),
        Format::Address => format!("m._isAddress({value})"),
        Format::Ip => format!("m._isIP({value}, 0)"),
        Format::Ipv4 => format!("m._isIP({value}, 4)"),
        Format::Ipv6 => format!("m._isIP({value}, 6)"),
        Format::Uri => format!("m._isURI({value})"),
        Format::UriRef => format!("m._isURIRef({value})"),
        Format::Uuid => format!("m._isUUID({value})"),
    }
}

/// Key type of a lookup table or uniqueness set for values of `ty`.
fn table_key_type(ty: &FieldType) -> &'static str {
    match ty {
        FieldType::Scalar(kind) => scalar_type(*kind),
        FieldType::Enum(_) => "int32",
        FieldType::WellKnown(WellKnownType::Duration) => "time.Duration",
        FieldType::WellKnown(WellKnownType::Wrapper(kind)) => scalar_type(*kind),
        _ => "string",
    }
}

/// Expression used to probe a table with a value of `ty`.
fn table_probe(ty: &FieldType, value: &str) -> String {
    match ty {
        FieldType::Scalar(ScalarKind::Bytes) => format!("string({value})"),
        FieldType::Enum(_) => format!("int32({value})"),
        _ => value.to_string(),
    }
}

fn scalar_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Double => "float64",
        ScalarKind::Float => "float32",
        ScalarKind::Int32 | ScalarKind::SInt32 | ScalarKind::SFixed32 => "int32",
        ScalarKind::Int64 | ScalarKind::SInt64 | ScalarKind::SFixed64 => "int64",
        ScalarKind::UInt32 | ScalarKind::Fixed32 => "uint32",
        ScalarKind::UInt64 | ScalarKind::Fixed64 => "uint64",
        ScalarKind::Bool => "bool",
        ScalarKind::String | ScalarKind::Bytes => "string",
    }
}

fn go_number(n: Number) -> String {
    let float = match n {
        Number::F32(f) => Some(f64::from(f)),
        Number::F64(f) => Some(f),
        Number::Int(_) | Number::UInt(_) => None,
    };
    match float {
        Some(f) if f.is_infinite() && f > 0.0 => "math.Inf(1)".to_string(),
        Some(f) if f.is_infinite() => "math.Inf(-1)".to_string(),
        _ => n.to_string(),
    }
}

fn go_duration(d: Nanos) -> String {
    format!("time.Duration({})", d.0)
}

fn go_instant(t: Instant) -> String {
    let (seconds, nanos) = t.parts();
    format!("time.Unix({seconds}, {nanos})")
}

const GO_HOSTNAME: &str = r#"func (m *{MSG}) _isHostname(host string) bool {
	host = strings.TrimSuffix(host, ".")
	if len(host) == 0 || len(host) > 253 {
		return false
	}
	for _, part := range strings.Split(host, ".") {
		if len(part) == 0 || len(part) > 63 || part[0] == '-' || part[len(part)-1] == '-' {
			return false
		}
		for _, r := range part {
			if (r < 'a' || r > 'z') && (r < 'A' || r > 'Z') && (r < '0' || r > '9') && r != '-' {
				return false
			}
		}
	}
	return true
}"#;

const GO_EMAIL: &str = r#"func (m *{MSG}) _isEmail(addr string) bool {
	if len(addr) > 254 {
		return false
	}
	at := strings.LastIndex(addr, "@")
	if at <= 0 || at > 64 {
		return false
	}
	return m._isHostname(addr[at+1:])
}"#;

const GO_IP: &str = r#"func (m *{MSG}) _isIP(addr string, version int) bool {
	if net.ParseIP(addr) == nil {
		return false
	}
	v6 := strings.Contains(addr, ":")
	switch version {
	case 4:
		return !v6
	case 6:
		return v6
	}
	return true
}"#;

const GO_ADDRESS: &str = r#"func (m *{MSG}) _isAddress(addr string) bool {
	return m._isHostname(addr) || m._isIP(addr, 0)
}"#;

const GO_URI_REF: &str = r#"func (m *{MSG}) _isURIRef(uri string) bool {
	for _, r := range uri {
		if unicode.IsSpace(r) || r < 0x20 || r == 0x7f {
			return false
		}
	}
	return true
}"#;

const GO_URI: &str = r#"func (m *{MSG}) _isURI(uri string) bool {
	colon := strings.Index(uri, ":")
	if colon < 1 {
		return false
	}
	for i, r := range uri[:colon] {
		alpha := (r >= 'a' && r <= 'z') || (r >= 'A' && r <= 'Z')
		other := (r >= '0' && r <= '9') || r == '+' || r == '-' || r == '.'
		if !alpha && (i == 0 || !other) {
			return false
		}
	}
	return m._isURIRef(uri)
}"#;

const GO_UUID: &str = r#"func (m *{MSG}) _isUUID(s string) bool {
	if len(s) != 36 {
		return false
	}
	for i := 0; i < len(s); i++ {
		c := s[i]
		switch i {
		case 8, 13, 18, 23:
			if c != '-' {
				return false
			}
		default:
			if !('0' <= c && c <= '9' || 'a' <= c && c <= 'f' || 'A' <= c && c <= 'F') {
				return false
			}
		}
	}
	return true
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use ruleguard_ir::{Field, FieldRules, Rule, StringRules, StringWellKnown};

    #[test]
    fn package_from_schema() {
        assert_eq!(package_name("shop.v1"), "v1");
        assert_eq!(package_name("acme"), "acme");
        assert_eq!(package_name(""), "validation");
    }

    #[test]
    fn helpers_only_for_used_formats() {
        let mut schema = Schema::new("shop.v1");
        schema.add_message(Message::new(
            "Contact",
            vec![Field::new("email", FieldType::Scalar(ScalarKind::String)).with_rules(
                FieldRules::rule(Rule::String(StringRules {
                    well_known: Some(StringWellKnown::Email),
                    ..Default::default()
                })),
            )],
        ));
        let checked = ruleguard_check::check(&schema).unwrap();
        let out = generate_go(&checked, &GoOptions::default()).unwrap();
        assert!(out.contains("package v1"));
        assert!(out.contains("func (m *Contact) _isEmail(addr string) bool {"));
        assert!(out.contains("func (m *Contact) _isHostname(host string) bool {"));
        assert!(!out.contains("_isUUID"));
        assert!(out.contains("if !m._isEmail(m.GetEmail()) {"));
        assert!(out.contains(
            "return ContactValidationError{field: \"email\", reason: \"value must be a valid email address\"}"
        ));
    }

    #[test]
    fn timestamp_comparisons_use_time_methods() {
        assert_eq!(time_compare("ts", Op::Ge, "now"), "!ts.Before(now)");
        assert_eq!(go_instant(Instant(1_500_000_000)), "time.Unix(1, 500000000)");
        assert_eq!(go_instant(Instant(-1)), "time.Unix(-1, 999999999)");
    }
}
