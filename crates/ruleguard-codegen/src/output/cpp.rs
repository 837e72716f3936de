//! C++ validator generation.
//!
//! Emits a header of `bool Validate(const Msg&, pgv::ValidationMsg*)`
//! overloads in the namespace of the protobuf message classes. A failing
//! routine writes `invalid <Message>.<path>: <reason>` to the out-parameter
//! and returns `false`.

use crate::context::{RenderContext, Target};
use crate::error::RenderError;
use crate::lookup::{self, LookupTable, PatternTable, TableValues, Tables};
use crate::plan::{
    ComparablePlan, CountCheck, Format, Instant, Nanos, NowCheck, Number, SetCheck, TextCheck,
    TextLiteral, TimestampPlan, count_checks,
};
use crate::reason;
use crate::render::{self, RenderResult, RuleRenderer, upper_camel};
use crate::traits::{Backend, Convention, CppOptions, GenerateOptions};
use crate::writer::CodeWriter;
use ruleguard_check::CheckedSchema;
use ruleguard_ir::{
    AnyRules, BoolRules, DurationRules, EnumDef, EnumRules, FieldType, MapRules, Message, OneOf,
    RepeatedRules, ScalarKind, Schema, TimestampRules, WellKnownType,
};

/// Static instance of the C++ backend for registry.
pub static CPP_BACKEND: CppBackend = CppBackend;

/// C++ backend implementing the Backend trait.
pub struct CppBackend;

impl Backend for CppBackend {
    fn name(&self) -> &'static str {
        "cpp"
    }

    fn language(&self) -> &'static str {
        "cpp"
    }

    fn extension(&self) -> &'static str {
        "h"
    }

    fn convention(&self) -> Convention {
        Convention::OutParam
    }

    fn generate(&self, schema: &CheckedSchema, options: &GenerateOptions) -> Result<String, RenderError> {
        generate_cpp(schema, &options.cpp)
    }
}

const INCLUDES: &str = r#"#pragma once

#include <arpa/inet.h>

#include <cstdint>
#include <limits>
#include <sstream>
#include <string>
#include <unordered_set>

#include "google/protobuf/util/time_util.h"
#include "re2/re2.h"
#include "validate/validate.h""#;

const HELPERS: &str = r#"#ifndef RULEGUARD_INTERNAL_HELPERS
#define RULEGUARD_INTERNAL_HELPERS
namespace ruleguard_internal {

inline size_t Utf8Len(const std::string& s) {
  size_t n = 0;
  for (unsigned char c : s) {
    if ((c & 0xC0) != 0x80) {
      n++;
    }
  }
  return n;
}

inline bool HasPrefix(const std::string& s, const std::string& p) {
  return s.size() >= p.size() && s.compare(0, p.size(), p) == 0;
}

inline bool HasSuffix(const std::string& s, const std::string& p) {
  return s.size() >= p.size() && s.compare(s.size() - p.size(), p.size(), p) == 0;
}

inline bool Contains(const std::string& s, const std::string& p) {
  return s.find(p) != std::string::npos;
}

inline bool IsHostname(std::string host) {
  if (!host.empty() && host.back() == '.') {
    host.pop_back();
  }
  if (host.empty() || host.size() > 253) {
    return false;
  }
  size_t start = 0;
  while (true) {
    size_t end = host.find('.', start);
    std::string part = host.substr(start, end == std::string::npos ? std::string::npos : end - start);
    if (part.empty() || part.size() > 63 || part.front() == '-' || part.back() == '-') {
      return false;
    }
    for (char c : part) {
      bool alnum = (c >= 'a' && c <= 'z') || (c >= 'A' && c <= 'Z') || (c >= '0' && c <= '9');
      if (!alnum && c != '-') {
        return false;
      }
    }
    if (end == std::string::npos) {
      return true;
    }
    start = end + 1;
  }
}

inline bool IsEmail(const std::string& addr) {
  if (addr.size() > 254) {
    return false;
  }
  size_t at = addr.rfind('@');
  if (at == std::string::npos || at == 0 || at > 64) {
    return false;
  }
  return IsHostname(addr.substr(at + 1));
}

inline bool IsIp(const std::string& addr, int version) {
  unsigned char buf[16];
  bool v4 = inet_pton(AF_INET, addr.c_str(), buf) == 1;
  bool v6 = !v4 && inet_pton(AF_INET6, addr.c_str(), buf) == 1;
  if (version == 4) {
    return v4;
  }
  if (version == 6) {
    return v6;
  }
  return v4 || v6;
}

inline bool IsAddress(const std::string& addr) {
  return IsHostname(addr) || IsIp(addr, 0);
}

inline bool IsUriRef(const std::string& uri) {
  for (unsigned char c : uri) {
    if (c <= 0x20 || c == 0x7f) {
      return false;
    }
  }
  return true;
}

inline bool IsUri(const std::string& uri) {
  size_t colon = uri.find(':');
  if (colon == std::string::npos || colon == 0) {
    return false;
  }
  for (size_t i = 0; i < colon; i++) {
    char c = uri[i];
    bool alpha = (c >= 'a' && c <= 'z') || (c >= 'A' && c <= 'Z');
    bool other = (c >= '0' && c <= '9') || c == '+' || c == '-' || c == '.';
    if (!alpha && (i == 0 || !other)) {
      return false;
    }
  }
  return IsUriRef(uri);
}

inline bool IsUuid(const std::string& s) {
  if (s.size() != 36) {
    return false;
  }
  for (size_t i = 0; i < s.size(); i++) {
    char c = s[i];
    if (i == 8 || i == 13 || i == 18 || i == 23) {
      if (c != '-') {
        return false;
      }
    } else if (!((c >= '0' && c <= '9') || (c >= 'a' && c <= 'f') || (c >= 'A' && c <= 'F'))) {
      return false;
    }
  }
  return true;
}

inline ::google::protobuf::Duration MakeDuration(int64_t seconds, int32_t nanos) {
  ::google::protobuf::Duration d;
  d.set_seconds(seconds);
  d.set_nanos(nanos);
  return d;
}

inline ::google::protobuf::Timestamp MakeTimestamp(int64_t seconds, int32_t nanos) {
  ::google::protobuf::Timestamp t;
  t.set_seconds(seconds);
  t.set_nanos(nanos);
  return t;
}

}  // namespace ruleguard_internal
#endif  // RULEGUARD_INTERNAL_HELPERS"#;

const TIME_UTIL: &str = "::google::protobuf::util::TimeUtil";

/// Generate a C++ header of validators for a checked schema.
pub fn generate_cpp(checked: &CheckedSchema, options: &CppOptions) -> Result<String, RenderError> {
    let schema = checked.schema();
    let namespace = options
        .namespace
        .clone()
        .unwrap_or_else(|| schema.package.replace('.', "::"));
    let tables = lookup::collect_tables(checked)?;
    let mut r = CppRenderer {
        w: CodeWriter::new("  "),
        namespace,
        message_name: String::new(),
    };
    r.w.line("// Code generated by ruleguard. DO NOT EDIT.");
    r.w.line(format!("// package: {}", schema.package));
    r.w.blank();
    r.raw(INCLUDES);
    r.w.blank();
    r.raw(HELPERS);
    r.w.blank();
    let scoped = !r.namespace.is_empty();
    if scoped {
        r.w.line(format!("namespace {} {{", r.namespace));
        r.w.blank();
    }
    for message in checked.emitted_messages() {
        let declaration = format!("{};", r.signature(message));
        r.w.line(declaration);
    }
    r.tables(&tables);
    for message in checked.emitted_messages() {
        r.routine(schema, message)?;
    }
    if scoped {
        r.w.blank();
        r.w.line(format!("}}  // namespace {}", r.namespace));
    }
    tracing::debug!(package = %schema.package, "generated c++ validators");
    Ok(r.w.finish())
}

struct CppRenderer {
    w: CodeWriter,
    namespace: String,
    /// Name of the message being rendered, for error messages.
    message_name: String,
}

impl CppRenderer {
    fn raw(&mut self, text: &str) {
        for line in text.lines() {
            self.w.line(line);
        }
    }

    fn qualified(&self, ident: &str) -> String {
        if self.namespace.is_empty() {
            format!("::{ident}")
        } else {
            format!("::{}::{ident}", self.namespace)
        }
    }

    fn signature(&self, message: &Message) -> String {
        format!(
            "inline bool Validate(const {}& m, pgv::ValidationMsg* err)",
            self.qualified(&message.ident())
        )
    }

    fn tables(&mut self, tables: &Tables) {
        if tables.is_empty() {
            return;
        }
        self.w.blank();
        for LookupTable { name, ty, values } in &tables.lookups {
            let items: Vec<String> = match values {
                TableValues::Numbers(v) => v.iter().map(|n| cpp_number(*n)).collect(),
                TableValues::Strings(v) | TableValues::TypeUrls(v) => {
                    v.iter().map(|s| cpp_string(s.as_bytes())).collect()
                }
                TableValues::Bytes(v) => v.iter().map(|b| cpp_string(b)).collect(),
                TableValues::Enums(v) => v.iter().map(ToString::to_string).collect(),
                TableValues::Durations(v) => v.iter().map(|d| format!("{}LL", d.0)).collect(),
            };
            self.w.line(format!(
                "inline const std::unordered_set<{}> {name} = {{{}}};",
                cpp_type(ty),
                items.join(", ")
            ));
        }
        for PatternTable { name, pattern, bytes } in &tables.patterns {
            let options = if *bytes { ", re2::RE2::Latin1" } else { "" };
            self.w.line(format!(
                "inline const re2::RE2 {name}({}{options});",
                cpp_string(pattern.as_bytes())
            ));
        }
    }

    fn routine(&mut self, schema: &Schema, message: &Message) -> RenderResult {
        self.message_name = message.name.clone();
        let signature = self.signature(message);
        self.w.blank();
        self.w.open(format!("{signature} {{"));
        if !message.disabled {
            self.w.line("(void)m;");
            self.w.line("(void)err;");
            if lookup::uses_now(schema, message)? {
                self.w.line(format!("const auto now = {TIME_UTIL}::GetCurrentTime();"));
            }
            for field in message.plain_fields() {
                render::render_field(self, &RenderContext::for_field(schema, message, field))?;
            }
            for oneof in &message.oneofs {
                self.oneof(schema, message, oneof)?;
            }
        }
        self.w.line("return true;");
        self.w.close(Some("}"));
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
        let class = self.qualified(&message.ident());
        self.w.open(format!("switch (m.{}_case()) {{", oneof.name));
        for ctx in &members {
            self.w.open(format!("case {class}::k{}: {{", upper_camel(&ctx.field.name)));
            render::render_field(self, ctx)?;
            self.w.line("break;");
            self.w.close(Some("}"));
        }
        if oneof.required {
            self.w.open(format!(
                "case {class}::{}_NOT_SET: {{",
                oneof.name.to_uppercase()
            ));
            let text = format!("invalid {}.{}: {}", self.message_name, oneof.name, reason::REQUIRED);
            self.report(&[cpp_string(text.as_bytes())]);
            self.w.close(Some("}"));
        }
        self.w.open("default:");
        self.w.line("break;");
        self.w.close(None);
        self.w.close(Some("}"));
        Ok(())
    }

    fn value(ctx: &RenderContext<'_>) -> String {
        ctx.accessor
            .clone()
            .unwrap_or_else(|| format!("m.{}()", ctx.field.name))
    }

    /// Stream operands composing `invalid <Message>.<path>: <reason>`.
    fn message_parts(&self, ctx: &RenderContext<'_>, reason: &str) -> Vec<String> {
        let key = if ctx.on_key { "key for " } else { "" };
        let head = format!("invalid {key}{}.{}", self.message_name, ctx.field.name);
        match &ctx.index {
            Some(index) => vec![
                cpp_string(format!("{head}[").as_bytes()),
                index.clone(),
                cpp_string(format!("]: {reason}").as_bytes()),
            ],
            None => vec![cpp_string(format!("{head}: {reason}").as_bytes())],
        }
    }

    fn report(&mut self, parts: &[String]) {
        self.w.line("std::ostringstream msg;");
        self.w.line(format!("msg << {};", parts.join(" << ")));
        self.w.line("*err = msg.str();");
        self.w.line("return false;");
    }

    fn check(&mut self, ctx: &RenderContext<'_>, cond: &str, reason: &str) {
        let parts = self.message_parts(ctx, reason);
        self.w.open(format!("if ({cond}) {{"));
        self.report(&parts);
        self.w.close(Some("}"));
    }

    fn required(&mut self, ctx: &RenderContext<'_>, required: bool) {
        if required && ctx.is_root() {
            let cond = format!("!m.has_{}()", ctx.field.name);
            self.check(ctx, &cond, reason::REQUIRED);
        }
    }

    /// Run `body` only when the field is set. Nested values are always set.
    fn when_present(&mut self, ctx: &RenderContext<'_>, body: impl FnOnce(&mut Self) -> RenderResult) -> RenderResult {
        if ctx.is_root() {
            self.w.open(format!("if (m.has_{}()) {{", ctx.field.name));
        } else {
            self.w.open("{");
        }
        body(self)?;
        self.w.close(Some("}"));
        Ok(())
    }

    fn set_check<T>(&mut self, ctx: &RenderContext<'_>, probe: &str, set: &SetCheck<T>, reason: &str) {
        let table = lookup::set_table_name(ctx, set);
        let cond = match set {
            SetCheck::In(_) => format!("{table}.find({probe}) == {table}.end()"),
            SetCheck::NotIn(_) => format!("{table}.find({probe}) != {table}.end()"),
        };
        self.check(ctx, &cond, reason);
    }

    fn counts(&mut self, ctx: &RenderContext<'_>, size: &str, checks: &[CountCheck], noun: &str) {
        for check in checks {
            let (op, n) = check.failure();
            self.check(ctx, &format!("{size} {} {n}", op.symbol()), &check.reason(noun));
        }
    }

    fn comparable<T: Copy + PartialOrd + std::fmt::Display>(
        &mut self,
        ctx: &RenderContext<'_>,
        value: &str,
        probe: &str,
        plan: &ComparablePlan<T>,
        literal: impl Fn(&T) -> String,
    ) {
        for (cond, reason) in render::comparisons(plan, "&&", "||", |op, bound| {
            format!("{value} {} {}", op.symbol(), literal(bound))
        }) {
            self.check(ctx, &cond, &reason);
        }
        if let Some(set) = &plan.set {
            self.set_check(ctx, probe, set, &set.reason());
        }
    }

    fn text<L: TextLiteral + AsRef<[u8]>>(&mut self, ctx: &RenderContext<'_>, checks: &[TextCheck<L>], bytes: bool) {
        let v = Self::value(ctx);
        let lit = |l: &L| cpp_string(l.as_ref());
        let runes = format!("ruleguard_internal::Utf8Len({v})");
        let size = format!("{v}.size()");
        for check in checks {
            let cond = match check {
                TextCheck::Const(c) => format!("{v} != {}", lit(c)),
                TextCheck::Len(n) if !bytes => format!("{runes} != {n}"),
                TextCheck::MinLen(n) if !bytes => format!("{runes} < {n}"),
                TextCheck::MaxLen(n) if !bytes => format!("{runes} > {n}"),
                TextCheck::Len(n) | TextCheck::LenBytes(n) => format!("{size} != {n}"),
                TextCheck::MinLen(n) | TextCheck::MinBytes(n) => format!("{size} < {n}"),
                TextCheck::MaxLen(n) | TextCheck::MaxBytes(n) => format!("{size} > {n}"),
                TextCheck::In(values) => {
                    let table = lookup::set_table_name(ctx, &SetCheck::In(values.clone()));
                    format!("{table}.find({v}) == {table}.end()")
                }
                TextCheck::NotIn(values) => {
                    let table = lookup::set_table_name(ctx, &SetCheck::NotIn(values.clone()));
                    format!("{table}.find({v}) != {table}.end()")
                }
                TextCheck::Pattern(_) => format!(
                    "!re2::RE2::PartialMatch({v}, {})",
                    ctx.table_name(lookup::PATTERN)
                ),
                TextCheck::Prefix(p) => format!("!ruleguard_internal::HasPrefix({v}, {})", lit(p)),
                TextCheck::Suffix(s) => format!("!ruleguard_internal::HasSuffix({v}, {})", lit(s)),
                TextCheck::Contains(c) => format!("!ruleguard_internal::Contains({v}, {})", lit(c)),
                TextCheck::NotContains(c) => format!("ruleguard_internal::Contains({v}, {})", lit(c)),
                TextCheck::Format(format) if bytes => match format {
                    Format::Ipv4 => format!("{size} != 4"),
                    Format::Ipv6 => format!("{size} != 16"),
                    _ => format!("{size} != 4 && {size} != 16"),
                },
                TextCheck::Format(format) => format!("!{}", format_call(*format, &v)),
            };
            self.check(ctx, &cond, &check.reason());
        }
    }
}

impl RuleRenderer for CppRenderer {
    fn presence(&mut self, ctx: &RenderContext<'_>) -> RenderResult {
        self.required(ctx, ctx.is_required());
        Ok(())
    }

    fn embedded(&mut self, ctx: &RenderContext<'_>, _message: &Message) -> RenderResult {
        self.required(ctx, ctx.is_required());
        let value = Self::value(ctx);
        let mut parts = self.message_parts(ctx, reason::EMBEDDED);
        parts.push(cpp_string(b" | caused by: "));
        parts.push("inner".to_string());
        self.when_present(ctx, |r| {
            r.w.line("pgv::ValidationMsg inner;");
            r.w.open(format!("if (!Validate({value}, &inner)) {{"));
            r.report(&parts);
            r.w.close(Some("}"));
            Ok(())
        })
    }

    fn wrapper(&mut self, ctx: &RenderContext<'_>) -> RenderResult {
        self.required(ctx, ctx.is_required());
        let inner = ctx.unwrap(format!("{}.value()", Self::value(ctx)))?;
        self.when_present(ctx, |r| render::render_field(r, &inner))
    }

    fn numeric(&mut self, ctx: &RenderContext<'_>, plan: &ComparablePlan<Number>) -> RenderResult {
        let value = Self::value(ctx);
        self.comparable(ctx, &value, &value, plan, |n| cpp_number(*n));
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
        self.text(ctx, checks, false);
        Ok(())
    }

    fn bytes(&mut self, ctx: &RenderContext<'_>, checks: &[TextCheck<Vec<u8>>]) -> RenderResult {
        self.text(ctx, checks, true);
        Ok(())
    }

    fn enumeration(&mut self, ctx: &RenderContext<'_>, rules: &EnumRules, def: &EnumDef) -> RenderResult {
        let value = Self::value(ctx);
        if let Some(constant) = rules.constant {
            self.check(ctx, &format!("{value} != {constant}"), &reason::equal(constant));
        }
        if rules.defined_only {
            let is_valid = self.qualified(&format!("{}_IsValid", def.name.replace('.', "_")));
            self.check(ctx, &format!("!{is_valid}({value})"), reason::DEFINED_ONLY);
        }
        if let Some(set) = lookup::enum_set(&rules.in_list, &rules.not_in) {
            self.set_check(ctx, &format!("static_cast<int>({value})"), &set, &set.reason());
        }
        Ok(())
    }

    fn repeated(&mut self, ctx: &RenderContext<'_>, rules: &RepeatedRules) -> RenderResult {
        let field = &ctx.field.name;
        self.counts(
            ctx,
            &format!("m.{field}_size()"),
            &count_checks(rules.min_items, rules.max_items),
            "item",
        );
        let elem = ctx.elem("item", "i")?;
        if !rules.unique && matches!(elem.target, Target::None) {
            return Ok(());
        }
        let seen = format!("seen_{field}");
        if rules.unique {
            self.w.line(format!("std::unordered_set<{}> {seen};", cpp_type(&elem.ty)));
        }
        self.w.open(format!("for (int i = 0; i < m.{field}_size(); i++) {{"));
        self.w.line(format!("const auto& item = m.{field}(i);"));
        if rules.unique {
            self.check(&elem, &format!("!{seen}.insert(item).second"), reason::UNIQUE);
        }
        render::render_field(self, &elem)?;
        self.w.close(Some("}"));
        Ok(())
    }

    fn map(&mut self, ctx: &RenderContext<'_>, rules: &MapRules) -> RenderResult {
        let value = Self::value(ctx);
        self.counts(
            ctx,
            &format!("{value}.size()"),
            &count_checks(rules.min_pairs, rules.max_pairs),
            "pair",
        );
        let key = ctx.key("key", "key")?;
        let val = ctx.elem("val", "key")?;
        // message values of a protobuf map are never null, so no_sparse has no check here
        if matches!(key.target, Target::None) && matches!(val.target, Target::None) {
            return Ok(());
        }
        self.w.open(format!("for (const auto& kv : {value}) {{"));
        self.w.line("const auto& key = kv.first;");
        self.w.line("const auto& val = kv.second;");
        self.w.line("(void)key;");
        self.w.line("(void)val;");
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
        let probe = format!("{}.type_url()", Self::value(ctx));
        let why = match &set {
            SetCheck::In(urls) => reason::type_url_in(urls),
            SetCheck::NotIn(urls) => reason::type_url_not_in(urls),
        };
        self.when_present(ctx, |r| {
            r.set_check(ctx, &probe, &set, &why);
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
            r.w.line(format!("const auto& d = {value};"));
            let probe = format!("{TIME_UTIL}::DurationToNanoseconds(d)");
            r.comparable(ctx, "d", &probe, plan, |d| cpp_duration(*d));
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
            r.w.line(format!("const auto& ts = {value};"));
            r.comparable(ctx, "ts", "ts", &plan.comparable, |t| cpp_instant(*t));
            if let Some(now) = plan.now {
                let cond = match now {
                    NowCheck::Before => "ts >= now".to_string(),
                    NowCheck::After => "ts <= now".to_string(),
                    NowCheck::Within(w) => {
                        let w = cpp_duration(w);
                        format!("ts - now > {w} || now - ts > {w}")
                    }
                    NowCheck::BeforeWithin(w) => format!("ts >= now || ts < now - {}", cpp_duration(w)),
                    NowCheck::AfterWithin(w) => format!("ts <= now || ts > now + {}", cpp_duration(w)),
                };
                r.check(ctx, &cond, &now.reason());
            }
            Ok(())
        })
    }
}

fn format_call(format: Format, value: &str) -> String {
    let call = |f: &str| format!("ruleguard_internal::{f}({value})");
    match format {
        Format::Email => call("IsEmail"),
        Format::Hostname => call("IsHostname"),
        Format::Address => call("IsAddress"),
        Format::Ip => format!("ruleguard_internal::IsIp({value}, 0)"),
        Format::Ipv4 => format!("ruleguard_internal::IsIp({value}, 4)"),
        Format::Ipv6 => format!("ruleguard_internal::IsIp({value}, 6)"),
        Format::Uri => call("IsUri"),
        Format::UriRef => call("IsUriRef"),
        Format::Uuid => call("IsUuid"),
    }
}

fn cpp_type(ty: &FieldType) -> &'static str {
    match ty {
        FieldType::Scalar(kind) | FieldType::WellKnown(WellKnownType::Wrapper(kind)) => match kind {
            ScalarKind::Double => "double",
            ScalarKind::Float => "float",
            ScalarKind::Int32 | ScalarKind::SInt32 | ScalarKind::SFixed32 => "int32_t",
            ScalarKind::Int64 | ScalarKind::SInt64 | ScalarKind::SFixed64 => "int64_t",
            ScalarKind::UInt32 | ScalarKind::Fixed32 => "uint32_t",
            ScalarKind::UInt64 | ScalarKind::Fixed64 => "uint64_t",
            ScalarKind::Bool => "bool",
            ScalarKind::String | ScalarKind::Bytes => "std::string",
        },
        FieldType::Enum(_) => "int",
        FieldType::WellKnown(WellKnownType::Duration) => "int64_t",
        _ => "std::string",
    }
}

fn cpp_number(n: Number) -> String {
    match n {
        Number::Int(i64::MIN) => "(-9223372036854775807LL - 1)".to_string(),
        Number::Int(i) => format!("{i}LL"),
        Number::UInt(u) => format!("{u}ULL"),
        Number::F32(f) => cpp_float(f64::from(f)),
        Number::F64(f) => cpp_float(f),
    }
}

fn cpp_float(f: f64) -> String {
    if f.is_infinite() {
        let sign = if f > 0.0 { "" } else { "-" };
        format!("{sign}std::numeric_limits<double>::infinity()")
    } else {
        let text = f.to_string();
        if text.contains(['.', 'e', 'E']) { text } else { format!("{text}.0") }
    }
}

fn cpp_duration(d: Nanos) -> String {
    let (seconds, nanos) = d.parts();
    format!("ruleguard_internal::MakeDuration({seconds}, {nanos})")
}

fn cpp_instant(t: Instant) -> String {
    let (seconds, nanos) = t.parts();
    format!("ruleguard_internal::MakeTimestamp({seconds}, {nanos})")
}

/// `std::string` literal holding exactly `bytes`, embedded NULs included.
///
/// Non-printable bytes use three-digit octal escapes, which cannot run into a
/// following digit the way `\x` escapes do.
fn cpp_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 20);
    out.push_str("std::string(\"");
    for &b in bytes {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'?' => out.push_str("\\?"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\{b:03o}")),
        }
    }
    out.push_str(&format!("\", {})", bytes.len()));
    out
}
