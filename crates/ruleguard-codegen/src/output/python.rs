//! Python validator generation.
//!
//! Emits one `validate_<Message>(m)` function per message. Functions take
//! protobuf message objects and raise `ValidationFailed` for the first
//! violation; a message without violations returns `None`.

use crate::context::{RenderContext, Target};
use crate::error::RenderError;
use crate::lookup::{self, LookupTable, PatternTable, TableValues, Tables};
use crate::plan::{
    ComparablePlan, CountCheck, Format, Nanos, NowCheck, Number, Op, SetCheck, TextCheck,
    TextLiteral, TimestampPlan, count_checks,
};
use crate::reason;
use crate::render::{self, RenderResult, RuleRenderer};
use crate::traits::{Backend, Convention, GenerateOptions, PythonOptions};
use crate::writer::CodeWriter;
use ruleguard_check::CheckedSchema;
use ruleguard_ir::{
    AnyRules, BoolRules, DurationRules, EnumDef, EnumRules, MapRules, Message, OneOf,
    RepeatedRules, Schema, TimestampRules,
};

/// Static instance of the Python backend for registry.
pub static PYTHON_BACKEND: PythonBackend = PythonBackend;

/// Python backend implementing the Backend trait.
pub struct PythonBackend;

impl Backend for PythonBackend {
    fn name(&self) -> &'static str {
        "python"
    }

    fn language(&self) -> &'static str {
        "python"
    }

    fn extension(&self) -> &'static str {
        "py"
    }

    fn convention(&self) -> Convention {
        Convention::Exception
    }

    fn generate(&self, schema: &CheckedSchema, options: &GenerateOptions) -> Result<String, RenderError> {
        generate_python(schema, &options.python)
    }
}

const EXCEPTION_CLASS: &str = r#"class ValidationFailed(Exception):
    """First rule violation found in a message."""

    def __init__(self, field, reason, cause=None, key=False):
        self.field = field
        self.reason = reason
        self.cause = cause
        self.key = key
        message = f"invalid {'key for ' if key else ''}{field}: {reason}"
        if cause is not None:
            message += f" | caused by: {cause}"
        super().__init__(message)
"#;

const FORMAT_HELPERS: &str = r#"_UUID = re.compile(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
_URI_SCHEME = re.compile(r"^[A-Za-z][A-Za-z0-9+.-]*:")


def _is_hostname(host):
    if host.endswith("."):
        host = host[:-1]
    if not host or len(host) > 253:
        return False
    for part in host.split("."):
        if not 0 < len(part) <= 63 or part[0] == "-" or part[-1] == "-":
            return False
        if not all(c.isascii() and (c.isalnum() or c == "-") for c in part):
            return False
    return True


def _is_email(addr):
    if len(addr) > 254:
        return False
    local, sep, domain = addr.rpartition("@")
    if not sep or not local or len(local) > 64:
        return False
    return _is_hostname(domain)


def _is_ip(addr, version=None):
    try:
        ip = ipaddress.ip_address(addr)
    except ValueError:
        return False
    return version is None or ip.version == version


def _is_address(addr):
    return _is_hostname(addr) or _is_ip(addr)


def _is_uri_ref(uri):
    return not any(c.isspace() or ord(c) < 0x20 or ord(c) == 0x7F for c in uri)


def _is_uri(uri):
    return _URI_SCHEME.match(uri) is not None and _is_uri_ref(uri)


def _is_uuid(value):
    return _UUID.fullmatch(value) is not None


def _is_ip_bytes(value, version=None):
    if version == 4:
        return len(value) == 4
    if version == 6:
        return len(value) == 16
    return len(value) in (4, 16)
"#;

/// Generate a Python module of validators for a checked schema.
pub fn generate_python(checked: &CheckedSchema, options: &PythonOptions) -> Result<String, RenderError> {
    let schema = checked.schema();
    let tables = lookup::collect_tables(checked)?;
    let mut r = PythonRenderer {
        w: CodeWriter::new("    "),
    };
    r.header(schema, options);
    r.tables(&tables);
    for message in checked.emitted_messages() {
        r.routine(schema, message)?;
    }
    tracing::debug!(package = %schema.package, "generated python validators");
    Ok(r.w.finish())
}

struct PythonRenderer {
    w: CodeWriter,
}

impl PythonRenderer {
    fn header(&mut self, schema: &Schema, options: &PythonOptions) {
        self.w.line("# Code generated by ruleguard. DO NOT EDIT.");
        self.w.line(format!("# package: {}", schema.package));
        self.w.blank();
        self.w.line("import ipaddress");
        self.w.line("import re");
        self.w.line("import time");
        self.w.blank();
        match &options.runtime_module {
            Some(module) => self.w.line(format!("from {module} import ValidationFailed")),
            None => {
                self.w.blank();
                self.raw(EXCEPTION_CLASS);
            }
        }
        self.w.blank();
        self.raw(FORMAT_HELPERS);
    }

    fn raw(&mut self, text: &str) {
        for line in text.lines() {
            self.w.line(line);
        }
    }

    fn tables(&mut self, tables: &Tables) {
        if tables.is_empty() {
            return;
        }
        self.w.blank();
        for LookupTable { name, values, .. } in &tables.lookups {
            let items: Vec<String> = match values {
                TableValues::Numbers(v) => v.iter().map(|n| py_number(*n)).collect(),
                TableValues::Strings(v) | TableValues::TypeUrls(v) => v.iter().map(|s| reason::quote(s)).collect(),
                TableValues::Bytes(v) => v.iter().map(|b| py_bytes(b)).collect(),
                TableValues::Enums(v) => v.iter().map(ToString::to_string).collect(),
                TableValues::Durations(v) => v.iter().map(|d| d.0.to_string()).collect(),
            };
            self.w.line(format!("{name} = frozenset({{{}}})", items.join(", ")));
        }
        for PatternTable { name, pattern, bytes } in &tables.patterns {
            let literal = if *bytes {
                py_bytes(pattern.as_bytes())
            } else {
                reason::quote(pattern)
            };
            self.w.line(format!("{name} = re.compile({literal})"));
        }
    }

    fn routine(&mut self, schema: &Schema, message: &Message) -> RenderResult {
        self.w.blank();
        self.w.blank();
        self.w.open(format!("def validate_{}(m):", message.ident()));
        self.w.line(format!(
            "\"\"\"Validate {}, raising ValidationFailed on the first violation.\"\"\"",
            message.name
        ));
        if !message.disabled {
            self.w.open("if m is None:");
            self.w.line("return None");
            self.w.close(None);
            if lookup::uses_now(schema, message)? {
                self.w.line("_now = time.time_ns()");
            }
            for field in message.plain_fields() {
                render::render_field(self, &RenderContext::for_field(schema, message, field))?;
            }
            for oneof in &message.oneofs {
                self.oneof(schema, message, oneof)?;
            }
        }
        self.w.line("return None");
        self.w.close(None);
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
        self.w.line(format!("_which = m.WhichOneof({})", reason::quote(&oneof.name)));
        let mut keyword = "if";
        for ctx in &members {
            self.block(format!("{keyword} _which == {}:", reason::quote(&ctx.field.name)), |r| {
                render::render_field(r, ctx)
            })?;
            keyword = "elif";
        }
        if oneof.required {
            let cond = if members.is_empty() { "if _which is None:" } else { "elif _which is None:" };
            self.w.open(cond);
            self.w.line(format!(
                "raise ValidationFailed({}, {})",
                reason::quote(&oneof.name),
                reason::quote(reason::REQUIRED)
            ));
            self.w.close(None);
        }
        Ok(())
    }

    /// Open an indented block, falling back to `pass` when nothing was written.
    fn block(&mut self, header: String, body: impl FnOnce(&mut Self) -> RenderResult) -> RenderResult {
        self.w.open(header);
        let mark = self.w.mark();
        body(self)?;
        if !self.w.written_since(mark) {
            self.w.line("pass");
        }
        self.w.close(None);
        Ok(())
    }

    fn value(ctx: &RenderContext<'_>) -> String {
        ctx.accessor
            .clone()
            .unwrap_or_else(|| format!("m.{}", ctx.field.name))
    }

    fn path(ctx: &RenderContext<'_>) -> String {
        match &ctx.index {
            Some(index) => format!("f\"{}[{{{index}}}]\"", ctx.field.name),
            None => reason::quote(&ctx.field.name),
        }
    }

    fn fail(&mut self, ctx: &RenderContext<'_>, reason: &str) {
        let key = if ctx.on_key { ", key=True" } else { "" };
        self.w.line(format!(
            "raise ValidationFailed({}, {}{key})",
            Self::path(ctx),
            reason::quote(reason)
        ));
    }

    fn check(&mut self, ctx: &RenderContext<'_>, cond: &str, reason: &str) {
        self.w.open(format!("if {cond}:"));
        self.fail(ctx, reason);
        self.w.close(None);
    }

    fn required(&mut self, ctx: &RenderContext<'_>, required: bool) {
        if required && ctx.is_root() {
            let cond = format!("not m.HasField({})", reason::quote(&ctx.field.name));
            self.check(ctx, &cond, reason::REQUIRED);
        }
    }

    /// Run `body` only when the field is set. Nested values are always set.
    fn when_present(&mut self, ctx: &RenderContext<'_>, body: impl FnOnce(&mut Self) -> RenderResult) -> RenderResult {
        if ctx.is_root() {
            self.block(format!("if m.HasField({}):", reason::quote(&ctx.field.name)), body)
        } else {
            body(self)
        }
    }

    fn set_check<T: PartialEq + std::fmt::Display>(
        &mut self,
        ctx: &RenderContext<'_>,
        probe: &str,
        set: &SetCheck<T>,
        reason: String,
    ) {
        let table = lookup::set_table_name(ctx, set);
        let cond = match set {
            SetCheck::In(_) => format!("{probe} not in {table}"),
            SetCheck::NotIn(_) => format!("{probe} in {table}"),
        };
        self.check(ctx, &cond, &reason);
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
        value: &str,
        plan: &ComparablePlan<T>,
        literal: impl Fn(&T) -> String,
    ) {
        for (cond, reason) in render::comparisons(plan, "and", "or", |op, bound| {
            format!("{value} {} {}", op.symbol(), literal(bound))
        }) {
            self.check(ctx, &cond, &reason);
        }
        if let Some(set) = &plan.set {
            self.set_check(ctx, value, set, set.reason());
        }
    }

    fn text<L>(
        &mut self,
        ctx: &RenderContext<'_>,
        checks: &[TextCheck<L>],
        literal: impl Fn(&L) -> String,
        bytes: bool,
    ) where
        L: TextLiteral,
    {
        let v = Self::value(ctx);
        let utf8_len = format!("len({v}.encode(\"utf-8\"))");
        for check in checks {
            let cond = match check {
                TextCheck::Const(c) => format!("{v} != {}", literal(c)),
                TextCheck::Len(n) => format!("len({v}) != {n}"),
                TextCheck::MinLen(n) => format!("len({v}) < {n}"),
                TextCheck::MaxLen(n) => format!("len({v}) > {n}"),
                TextCheck::LenBytes(n) => format!("{utf8_len} != {n}"),
                TextCheck::MinBytes(n) => format!("{utf8_len} < {n}"),
                TextCheck::MaxBytes(n) => format!("{utf8_len} > {n}"),
                TextCheck::In(values) => {
                    let set = SetCheck::In(values.clone());
                    format!("{v} not in {}", lookup::set_table_name(ctx, &set))
                }
                TextCheck::NotIn(values) => {
                    let set = SetCheck::NotIn(values.clone());
                    format!("{v} in {}", lookup::set_table_name(ctx, &set))
                }
                TextCheck::Pattern(_) => {
                    format!("{}.search({v}) is None", ctx.table_name(lookup::PATTERN))
                }
                TextCheck::Prefix(p) => format!("not {v}.startswith({})", literal(p)),
                TextCheck::Suffix(s) => format!("not {v}.endswith({})", literal(s)),
                TextCheck::Contains(c) => format!("{} not in {v}", literal(c)),
                TextCheck::NotContains(c) => format!("{} in {v}", literal(c)),
                TextCheck::Format(format) if bytes => match format {
                    Format::Ipv4 => format!("not _is_ip_bytes({v}, 4)"),
                    Format::Ipv6 => format!("not _is_ip_bytes({v}, 6)"),
                    _ => format!("not _is_ip_bytes({v})"),
                },
                TextCheck::Format(format) => format!("not {}", format_call(*format, &v)),
            };
            self.check(ctx, &cond, &check.reason());
        }
    }
}

impl RuleRenderer for PythonRenderer {
    fn presence(&mut self, ctx: &RenderContext<'_>) -> RenderResult {
        self.required(ctx, ctx.is_required());
        Ok(())
    }

    fn embedded(&mut self, ctx: &RenderContext<'_>, message: &Message) -> RenderResult {
        self.required(ctx, ctx.is_required());
        let value = Self::value(ctx);
        let call = format!("validate_{}({value})", message.ident());
        let path = Self::path(ctx);
        self.when_present(ctx, |r| {
            r.w.open("try:");
            r.w.line(call);
            r.w.close(None);
            r.w.open("except ValidationFailed as e:");
            r.w.line(format!(
                "raise ValidationFailed({path}, {}, cause=e) from e",
                reason::quote(reason::EMBEDDED)
            ));
            r.w.close(None);
            Ok(())
        })
    }

    fn wrapper(&mut self, ctx: &RenderContext<'_>) -> RenderResult {
        self.required(ctx, ctx.is_required());
        let inner = ctx.unwrap(format!("{}.value", Self::value(ctx)))?;
        self.when_present(ctx, |r| render::render_field(r, &inner))
    }

    fn numeric(&mut self, ctx: &RenderContext<'_>, plan: &ComparablePlan<Number>) -> RenderResult {
        let value = Self::value(ctx);
        self.comparable(ctx, &value, plan, |n| py_number(*n));
        Ok(())
    }

    fn boolean(&mut self, ctx: &RenderContext<'_>, rules: &BoolRules) -> RenderResult {
        if let Some(expected) = rules.constant {
            let literal = if expected { "True" } else { "False" };
            let cond = format!("{} != {literal}", Self::value(ctx));
            self.check(ctx, &cond, &reason::equal(expected));
        }
        Ok(())
    }

    fn string(&mut self, ctx: &RenderContext<'_>, checks: &[TextCheck<String>]) -> RenderResult {
        self.text(ctx, checks, |s| reason::quote(s), false);
        Ok(())
    }

    fn bytes(&mut self, ctx: &RenderContext<'_>, checks: &[TextCheck<Vec<u8>>]) -> RenderResult {
        self.text(ctx, checks, |b| py_bytes(b), true);
        Ok(())
    }

    fn enumeration(&mut self, ctx: &RenderContext<'_>, rules: &EnumRules, def: &EnumDef) -> RenderResult {
        let value = Self::value(ctx);
        if let Some(constant) = rules.constant {
            self.check(ctx, &format!("{value} != {constant}"), &reason::equal(constant));
        }
        if rules.defined_only {
            let numbers: Vec<String> = def.numbers().iter().map(ToString::to_string).collect();
            let tuple = match numbers.as_slice() {
                [one] => format!("({one},)"),
                _ => format!("({})", numbers.join(", ")),
            };
            self.check(ctx, &format!("{value} not in {tuple}"), reason::DEFINED_ONLY);
        }
        if let Some(set) = lookup::enum_set(&rules.in_list, &rules.not_in) {
            self.set_check(ctx, &value, &set, set.reason());
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
        if rules.unique {
            self.w.line("_seen = set()");
        }
        self.block(format!("for idx, item in enumerate({value}):"), |r| {
            if rules.unique {
                r.check(&elem, "item in _seen", reason::UNIQUE);
                r.w.line("_seen.add(item)");
            }
            render::render_field(r, &elem)
        })
    }

    fn map(&mut self, ctx: &RenderContext<'_>, rules: &MapRules) -> RenderResult {
        let value = Self::value(ctx);
        self.counts(ctx, &value, &count_checks(rules.min_pairs, rules.max_pairs), "pair");
        let key = ctx.key("key", "key")?;
        let val = ctx.elem("value", "key")?;
        let sparse = rules.no_sparse && val.ty.is_embed();
        if !sparse && matches!(key.target, Target::None) && matches!(val.target, Target::None) {
            return Ok(());
        }
        self.block(format!("for key, value in {value}.items():"), |r| {
            if sparse {
                r.check(&val, "value is None", reason::NO_SPARSE);
            }
            render::render_field(r, &key)?;
            render::render_field(r, &val)
        })
    }

    fn any(&mut self, ctx: &RenderContext<'_>, rules: &AnyRules) -> RenderResult {
        self.required(ctx, rules.required || ctx.is_required());
        let Some(set) = lookup::enum_set(&rules.in_list, &rules.not_in) else {
            return Ok(());
        };
        let probe = format!("{}.type_url", Self::value(ctx));
        let why = match &set {
            SetCheck::In(urls) => reason::type_url_in(urls),
            SetCheck::NotIn(urls) => reason::type_url_not_in(urls),
        };
        self.when_present(ctx, |r| {
            r.set_check(ctx, &probe, &set, why);
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
        let value = Self::value(ctx);
        self.when_present(ctx, |r| {
            r.w.line(format!("_dur = {value}.seconds * 1000000000 + {value}.nanos"));
            r.comparable(ctx, "_dur", plan, |d| d.0.to_string());
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
        let value = Self::value(ctx);
        self.when_present(ctx, |r| {
            r.w.line(format!("_ts = {value}.seconds * 1000000000 + {value}.nanos"));
            r.comparable(ctx, "_ts", &plan.comparable, |t| t.0.to_string());
            if let Some(now) = plan.now {
                let cond = match now {
                    NowCheck::Before => format!("_ts {} _now", Op::Ge.symbol()),
                    NowCheck::After => format!("_ts {} _now", Op::Le.symbol()),
                    NowCheck::Within(w) => format!("abs(_ts - _now) > {}", w.0),
                    NowCheck::BeforeWithin(w) => format!("_ts >= _now or _ts < _now - {}", w.0),
                    NowCheck::AfterWithin(w) => format!("_ts <= _now or _ts > _now + {}", w.0),
                };
                r.check(ctx, &cond, &now.reason());
            }
            Ok(())
        })
    }
}

fn format_call(format: Format, value: &str) -> String {
    match format {
        Format::Email => format!("_is_email({value})"),
        Format::Hostname => format!("_is_hostname({value})"),
        Format::Address => format!("_is_address({value})"),
        Format::Ip => format!("_is_ip({value})"),
        Format::Ipv4 => format!("_is_ip({value}, 4)"),
        Format::Ipv6 => format!("_is_ip({value}, 6)"),
        Format::Uri => format!("_is_uri({value})"),
        Format::UriRef => format!("_is_uri_ref({value})"),
        Format::Uuid => format!("_is_uuid({value})"),
    }
}

/// Python floats are doubles, so `float` literals are widened first: a stored
/// `float` field reads back as the widened value, not the shortest f32 text.
fn py_number(n: Number) -> String {
    let f = match n {
        Number::F32(f) => f64::from(f),
        Number::F64(f) => f,
        Number::Int(_) | Number::UInt(_) => return n.to_string(),
    };
    if f.is_nan() {
        "float(\"nan\")".to_string()
    } else if f.is_infinite() && f > 0.0 {
        "float(\"inf\")".to_string()
    } else if f.is_infinite() {
        "float(\"-inf\")".to_string()
    } else {
        // shortest round-trip form, always with a `.` or exponent
        format!("{f:?}")
    }
}

fn py_bytes(bytes: &[u8]) -> String {
    format!("b{}", reason::quote_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruleguard_ir::{
        Field, FieldRules, FieldType, NumericRules, Rule, ScalarKind, StringRules,
    };

    fn generate(schema: &Schema) -> String {
        let checked = ruleguard_check::check(schema).unwrap();
        generate_python(&checked, &PythonOptions::default()).unwrap()
    }

    #[test]
    fn string_length_checks() {
        let mut schema = Schema::new("demo.v1");
        schema.add_message(Message::new(
            "User",
            vec![Field::new("name", FieldType::Scalar(ScalarKind::String)).with_rules(
                FieldRules::rule(Rule::String(StringRules {
                    min_len: Some(3),
                    max_len: Some(5),
                    ..Default::default()
                })),
            )],
        ));
        let out = generate(&schema);
        assert!(out.contains("def validate_User(m):"));
        assert!(out.contains("    if len(m.name) < 3:\n        raise ValidationFailed(\"name\", \"value length must be at least 3 runes\")"));
        assert!(out.contains("    if len(m.name) > 5:"));
    }

    #[test]
    fn exclusive_range_uses_and() {
        let mut schema = Schema::new("demo.v1");
        schema.add_message(Message::new(
            "M",
            vec![Field::new("n", FieldType::Scalar(ScalarKind::Int32)).with_rules(FieldRules::rule(
                Rule::Int32(NumericRules {
                    gt: Some(10),
                    lt: Some(5),
                    ..Default::default()
                }),
            ))],
        ));
        let out = generate(&schema);
        assert!(out.contains("if m.n >= 5 and m.n <= 10:"));
        assert!(out.contains("value must be outside range [5, 10]"));
    }

    #[test]
    fn runtime_module_replaces_exception_class() {
        let schema = Schema::new("demo.v1");
        let checked = ruleguard_check::check(&schema).unwrap();
        let out = generate_python(
            &checked,
            &PythonOptions {
                runtime_module: Some("app.validation".into()),
            },
        )
        .unwrap();
        assert!(out.contains("from app.validation import ValidationFailed"));
        assert!(!out.contains("class ValidationFailed"));
    }

    #[test]
    fn disabled_message_returns_immediately() {
        let mut schema = Schema::new("demo.v1");
        schema.add_message(
            Message::new(
                "Off",
                vec![Field::new("n", FieldType::Scalar(ScalarKind::Int32)).with_rules(FieldRules::rule(
                    Rule::Int32(NumericRules {
                        gt: Some(0),
                        ..Default::default()
                    }),
                ))],
            )
            .disabled(),
        );
        let out = generate(&schema);
        let body = out.split("def validate_Off(m):").nth(1).unwrap();
        let lines: Vec<&str> = body.lines().skip(2).take(1).collect();
        assert_eq!(lines, vec!["    return None"]);
    }

    #[test]
    fn float_literals() {
        assert_eq!(py_number(Number::F64(f64::INFINITY)), "float(\"inf\")");
        assert_eq!(py_number(Number::F64(1.5)), "1.5");
        assert_eq!(py_number(Number::Int(-3)), "-3");
        assert_eq!(py_number(Number::F64(2.0)), "2.0");
        assert_eq!(py_number(Number::F32(0.1)), "0.10000000149011612");
    }

    #[test]
    fn float_fields_compare_against_widened_literals() {
        let float = |name: &str, rules: NumericRules<f32>| {
            Field::new(name, FieldType::Scalar(ScalarKind::Float))
                .with_rules(FieldRules::rule(Rule::Float(rules)))
        };
        let mut schema = Schema::new("demo.v1");
        schema.add_message(Message::new(
            "M",
            vec![
                float("x", NumericRules {
                    constant: Some(0.1),
                    ..Default::default()
                }),
                float("y", NumericRules {
                    in_list: vec![0.1, 0.5],
                    ..Default::default()
                }),
            ],
        ));
        let out = generate(&schema);
        assert!(out.contains("    if m.x != 0.10000000149011612:\n        raise ValidationFailed(\"x\", \"value must equal 0.1\")"));
        assert!(out.contains("_M_y_InLookup = frozenset({0.10000000149011612, 0.5})"));
        assert!(out.contains("    if m.y not in _M_y_InLookup:"));
    }
}
