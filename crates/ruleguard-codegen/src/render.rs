//! The rule renderer contract.
//!
//! Backends implement [`RuleRenderer`] with one method per rule kind and call
//! [`render_field`] to dispatch on a context's resolved target. The plans from
//! [`crate::plan`] fix the order and reasons of every check, so a backend only
//! decides how a check is spelled.

use crate::context::{RenderContext, Target};
use crate::error::RenderError;
use crate::plan::{
    self, ComparablePlan, Condition, Nanos, Number, Op, TextCheck, TimestampPlan,
};
use ruleguard_ir::{
    AnyRules, BoolRules, DurationRules, EnumDef, EnumRules, FieldType, MapRules, Message,
    RepeatedRules, Rule, TimestampRules,
};

pub type RenderResult = Result<(), RenderError>;

pub trait RuleRenderer {
    /// A field without value checks; only a `required` message rule can apply.
    fn presence(&mut self, ctx: &RenderContext<'_>) -> RenderResult;

    /// Recurse into an embedded message's routine.
    fn embedded(&mut self, ctx: &RenderContext<'_>, message: &Message) -> RenderResult;

    /// Check presence of a scalar wrapper and apply its rule to the inner
    /// value, typically through [`RenderContext::unwrap`].
    fn wrapper(&mut self, ctx: &RenderContext<'_>) -> RenderResult;

    fn numeric(&mut self, ctx: &RenderContext<'_>, plan: &ComparablePlan<Number>) -> RenderResult;

    fn boolean(&mut self, ctx: &RenderContext<'_>, rules: &BoolRules) -> RenderResult;

    fn string(&mut self, ctx: &RenderContext<'_>, checks: &[TextCheck<String>]) -> RenderResult;

    fn bytes(&mut self, ctx: &RenderContext<'_>, checks: &[TextCheck<Vec<u8>>]) -> RenderResult;

    fn enumeration(&mut self, ctx: &RenderContext<'_>, rules: &EnumRules, def: &EnumDef) -> RenderResult;

    fn repeated(&mut self, ctx: &RenderContext<'_>, rules: &RepeatedRules) -> RenderResult;

    fn map(&mut self, ctx: &RenderContext<'_>, rules: &MapRules) -> RenderResult;

    fn any(&mut self, ctx: &RenderContext<'_>, rules: &AnyRules) -> RenderResult;

    fn duration(
        &mut self,
        ctx: &RenderContext<'_>,
        rules: &DurationRules,
        plan: &ComparablePlan<Nanos>,
    ) -> RenderResult;

    fn timestamp(
        &mut self,
        ctx: &RenderContext<'_>,
        rules: &TimestampRules,
        plan: &TimestampPlan,
    ) -> RenderResult;
}

/// Dispatch a context to the renderer method for its target.
pub fn render_field<R: RuleRenderer + ?Sized>(r: &mut R, ctx: &RenderContext<'_>) -> RenderResult {
    match ctx.target {
        Target::None => r.presence(ctx),
        Target::Embedded(message) => r.embedded(ctx, message),
        Target::Wrapper { .. } => r.wrapper(ctx),
        Target::Repeated(rules) => r.repeated(ctx, rules),
        Target::Map(rules) => r.map(ctx, rules),
        Target::Rule(rule) => render_rule(r, ctx, rule),
    }
}

fn render_rule<R: RuleRenderer + ?Sized>(r: &mut R, ctx: &RenderContext<'_>, rule: &Rule) -> RenderResult {
    match rule {
        Rule::Float(_)
        | Rule::Double(_)
        | Rule::Int32(_)
        | Rule::Int64(_)
        | Rule::UInt32(_)
        | Rule::UInt64(_)
        | Rule::SInt32(_)
        | Rule::SInt64(_)
        | Rule::Fixed32(_)
        | Rule::Fixed64(_)
        | Rule::SFixed32(_)
        | Rule::SFixed64(_) => {
            let plan = plan::numeric_plan(rule).ok_or(RenderError::Unplanned(rule.name()))?;
            r.numeric(ctx, &plan)
        }
        Rule::Bool(rules) => r.boolean(ctx, rules),
        Rule::String(rules) => r.string(ctx, &plan::string_checks(rules)),
        Rule::Bytes(rules) => r.bytes(ctx, &plan::bytes_checks(rules)),
        Rule::Enum(rules) => {
            let FieldType::Enum(name) = &ctx.ty else {
                return Err(RenderError::UnknownEnum(ctx.ty.to_string()));
            };
            let def = ctx
                .schema
                .enum_def(name)
                .ok_or_else(|| RenderError::UnknownEnum(name.clone()))?;
            r.enumeration(ctx, rules, def)
        }
        Rule::Repeated(rules) => r.repeated(ctx, rules),
        Rule::Map(rules) => r.map(ctx, rules),
        Rule::Any(rules) => r.any(ctx, rules),
        Rule::Duration(rules) => r.duration(ctx, rules, &plan::duration_plan(rules)?),
        Rule::Timestamp(rules) => r.timestamp(ctx, rules, &plan::timestamp_plan(rules)?),
    }
}

/// Spell a failure condition with backend-specific comparisons.
pub fn spell_condition<T>(
    condition: &Condition<T>,
    and: &str,
    or: &str,
    mut compare: impl FnMut(Op, &T) -> String,
) -> String {
    let joiner = if condition.all { and } else { or };
    condition
        .terms
        .iter()
        .map(|(op, bound)| compare(*op, bound))
        .collect::<Vec<_>>()
        .join(&format!(" {joiner} "))
}

/// `(condition, reason)` pairs for the `const` and range checks of a plan.
///
/// Set checks go through lookup tables and are left to the backend.
pub fn comparisons<T: Copy + PartialOrd + std::fmt::Display>(
    plan: &ComparablePlan<T>,
    and: &str,
    or: &str,
    mut compare: impl FnMut(Op, &T) -> String,
) -> Vec<(String, String)> {
    let mut out = Vec::new();
    if let Some(constant) = &plan.constant {
        out.push((compare(Op::Ne, constant), crate::reason::equal(constant)));
    }
    if let Some(range) = &plan.range {
        out.push((spell_condition(&range.failure(), and, or, &mut compare), range.reason()));
    }
    out
}

/// `snake_case` to `UpperCamelCase`, the way protobuf code generators name
/// accessors and oneof wrapper types.
pub fn upper_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Bounds;

    #[test]
    fn every_numeric_kind_has_a_plan() {
        let numeric = [
            Rule::Float(Default::default()),
            Rule::Double(Default::default()),
            Rule::Int32(Default::default()),
            Rule::Int64(Default::default()),
            Rule::UInt32(Default::default()),
            Rule::UInt64(Default::default()),
            Rule::SInt32(Default::default()),
            Rule::SInt64(Default::default()),
            Rule::Fixed32(Default::default()),
            Rule::Fixed64(Default::default()),
            Rule::SFixed32(Default::default()),
            Rule::SFixed64(Default::default()),
        ];
        for rule in &numeric {
            assert!(plan::numeric_plan(rule).is_some(), "{}", rule.name());
        }
        assert!(plan::numeric_plan(&Rule::Bool(BoolRules::default())).is_none());
    }

    #[test]
    fn spells_range_failures() {
        let plan = ComparablePlan::new(
            None,
            Bounds {
                lt: Some(Number::Int(5)),
                lte: None,
                gt: Some(Number::Int(10)),
                gte: None,
            },
            &[],
            &[],
        );
        let spelled = comparisons(&plan, "and", "or", |op, v| format!("x {} {v}", op.symbol()));
        assert_eq!(
            spelled,
            vec![(
                "x >= 5 and x <= 10".to_string(),
                "value must be outside range [5, 10]".to_string()
            )]
        );
    }

    #[test]
    fn const_is_spelled_as_inequality() {
        let plan = ComparablePlan::new(
            Some(Number::UInt(3)),
            Bounds {
                lt: None,
                lte: None,
                gt: None,
                gte: None,
            },
            &[],
            &[],
        );
        let spelled = comparisons(&plan, "&&", "||", |op, v| format!("v {} {v}", op.symbol()));
        assert_eq!(spelled[0].0, "v != 3");
        assert_eq!(spelled[0].1, "value must equal 3");
    }

    #[test]
    fn camel_case_names() {
        assert_eq!(upper_camel("created_at"), "CreatedAt");
        assert_eq!(upper_camel("id"), "Id");
        assert_eq!(upper_camel("ipv4_addr"), "Ipv4Addr");
    }
}
