//! File-level lookup tables and compiled patterns.
//!
//! Set checks and regexes are materialised once per generated file rather
//! than rebuilt on every call. [`collect_tables`] walks the schema with the
//! same contexts the renderers use, so a table's name here always matches the
//! name a routine refers to.

use crate::context::{RenderContext, Target};
use crate::error::RenderError;
use crate::plan::{self, Format, Nanos, Number, SetCheck, TextCheck};
use ruleguard_check::CheckedSchema;
use ruleguard_ir::{FieldType, Message, Rule, Schema};
use std::collections::BTreeSet;

pub const IN_LOOKUP: &str = "InLookup";
pub const NOT_IN_LOOKUP: &str = "NotInLookup";
pub const PATTERN: &str = "Pattern";

#[derive(Debug, Clone, PartialEq)]
pub enum TableValues {
    Numbers(Vec<Number>),
    Strings(Vec<String>),
    Bytes(Vec<Vec<u8>>),
    Enums(Vec<i32>),
    Durations(Vec<Nanos>),
    TypeUrls(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    pub name: String,
    /// Type of the values the table is probed with.
    pub ty: FieldType,
    pub values: TableValues,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTable {
    pub name: String,
    pub pattern: String,
    /// Matched against raw bytes rather than text.
    pub bytes: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub lookups: Vec<LookupTable>,
    pub patterns: Vec<PatternTable>,
}

impl Tables {
    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty() && self.patterns.is_empty()
    }
}

/// Collect every table referenced by the routines of a checked schema.
pub fn collect_tables(checked: &CheckedSchema) -> Result<Tables, RenderError> {
    let schema = checked.schema();
    let mut tables = Tables::default();
    for message in checked.emitted_messages().filter(|m| !m.disabled) {
        for field in &message.fields {
            let ctx = RenderContext::for_field(schema, message, field);
            visit_rules(&ctx, &mut |ctx, rule| add_rule(&mut tables, ctx, rule))?;
        }
    }
    Ok(tables)
}

/// Semantic formats checked anywhere in a message, in a stable order.
pub fn formats_used(schema: &Schema, message: &Message) -> Result<BTreeSet<Format>, RenderError> {
    let mut formats = BTreeSet::new();
    for field in &message.fields {
        let ctx = RenderContext::for_field(schema, message, field);
        visit_rules(&ctx, &mut |_, rule| {
            match rule {
                Rule::String(r) => formats.extend(plan::string_checks(r).iter().filter_map(format_of)),
                Rule::Bytes(r) => formats.extend(plan::bytes_checks(r).iter().filter_map(format_of)),
                _ => {}
            }
            Ok(())
        })?;
    }
    Ok(formats)
}

/// Whether any timestamp rule in a message compares against `now`.
pub fn uses_now(schema: &Schema, message: &Message) -> Result<bool, RenderError> {
    let mut found = false;
    for field in &message.fields {
        let ctx = RenderContext::for_field(schema, message, field);
        visit_rules(&ctx, &mut |_, rule| {
            if let Rule::Timestamp(r) = rule {
                found |= r.lt_now || r.gt_now || r.within.is_some();
            }
            Ok(())
        })?;
    }
    Ok(found)
}

fn format_of<L>(check: &TextCheck<L>) -> Option<Format> {
    match check {
        TextCheck::Format(f) => Some(*f),
        _ => None,
    }
}

/// Call `f` for every concrete rule reachable from a field context, in
/// rendering order.
pub fn visit_rules<'a>(
    ctx: &RenderContext<'a>,
    f: &mut dyn FnMut(&RenderContext<'a>, &'a Rule) -> Result<(), RenderError>,
) -> Result<(), RenderError> {
    match ctx.target {
        Target::Rule(rule) => f(ctx, rule),
        Target::Wrapper { .. } => visit_rules(&ctx.unwrap("value")?, f),
        Target::Repeated(_) => visit_rules(&ctx.elem("item", "idx")?, f),
        Target::Map(_) => {
            visit_rules(&ctx.key("key", "key")?, f)?;
            visit_rules(&ctx.elem("value", "key")?, f)
        }
        Target::None | Target::Embedded(_) => Ok(()),
    }
}

fn add_rule(tables: &mut Tables, ctx: &RenderContext<'_>, rule: &Rule) -> Result<(), RenderError> {
    if let Some(set) = plan::numeric_plan(rule).and_then(|p| p.set) {
        push_set(tables, ctx, set, TableValues::Numbers);
        return Ok(());
    }
    match rule {
        Rule::String(r) => {
            for check in plan::string_checks(r) {
                match check {
                    TextCheck::In(values) => push_set(tables, ctx, SetCheck::In(values), TableValues::Strings),
                    TextCheck::NotIn(values) => {
                        push_set(tables, ctx, SetCheck::NotIn(values), TableValues::Strings)
                    }
                    TextCheck::Pattern(pattern) => push_pattern(tables, ctx, pattern, false),
                    _ => {}
                }
            }
        }
        Rule::Bytes(r) => {
            for check in plan::bytes_checks(r) {
                match check {
                    TextCheck::In(values) => push_set(tables, ctx, SetCheck::In(values), TableValues::Bytes),
                    TextCheck::NotIn(values) => {
                        push_set(tables, ctx, SetCheck::NotIn(values), TableValues::Bytes)
                    }
                    TextCheck::Pattern(pattern) => push_pattern(tables, ctx, pattern, true),
                    _ => {}
                }
            }
        }
        Rule::Enum(r) => {
            if let Some(set) = enum_set(&r.in_list, &r.not_in) {
                push_set(tables, ctx, set, TableValues::Enums);
            }
        }
        Rule::Any(r) => {
            if let Some(set) = enum_set(&r.in_list, &r.not_in) {
                push_set(tables, ctx, set, TableValues::TypeUrls);
            }
        }
        Rule::Duration(r) => {
            if let Some(set) = plan::duration_plan(r)?.set {
                push_set(tables, ctx, set, TableValues::Durations);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Deduplicated `in` or `not_in` set, `in` taking precedence.
pub fn enum_set<T: PartialEq + Clone>(in_list: &[T], not_in: &[T]) -> Option<SetCheck<T>> {
    if !in_list.is_empty() {
        Some(SetCheck::In(plan::dedup(in_list)))
    } else if !not_in.is_empty() {
        Some(SetCheck::NotIn(plan::dedup(not_in)))
    } else {
        None
    }
}

/// Table name for a set check in this context.
pub fn set_table_name<T>(ctx: &RenderContext<'_>, set: &SetCheck<T>) -> String {
    match set {
        SetCheck::In(_) => ctx.table_name(IN_LOOKUP),
        SetCheck::NotIn(_) => ctx.table_name(NOT_IN_LOOKUP),
    }
}

fn push_set<T>(
    tables: &mut Tables,
    ctx: &RenderContext<'_>,
    set: SetCheck<T>,
    wrap: fn(Vec<T>) -> TableValues,
) {
    let name = set_table_name(ctx, &set);
    let values = match set {
        SetCheck::In(values) | SetCheck::NotIn(values) => values,
    };
    tables.lookups.push(LookupTable {
        name,
        ty: ctx.ty.clone(),
        values: wrap(values),
    });
}

fn push_pattern(tables: &mut Tables, ctx: &RenderContext<'_>, pattern: String, bytes: bool) {
    tables.patterns.push(PatternTable {
        name: ctx.table_name(PATTERN),
        pattern,
        bytes,
    });
}
