//! Backend-agnostic comparison planning.
//!
//! A plan says which checks a rule needs, in which order, and with which
//! reason. Backends turn each check into a condition in their language; the
//! runtime evaluates the same plan directly, which is how generated code and
//! the reference evaluator stay in agreement.
//!
//! Range rules with both bounds follow one tie-break: when the upper bound
//! (`lt`/`lte`) is greater than the lower bound (`gt`/`gte`) the value must
//! lie between them. Otherwise the stated region is excluded and the value
//! must lie outside it.

use crate::error::RenderError;
use crate::reason;
use chrono::{DateTime, SecondsFormat};
use ruleguard_check::literals::{resolve_duration, resolve_timestamp};
use ruleguard_ir::{
    BytesRules, BytesWellKnown, DurationRules, NumericRules, Rule, StringRules, StringWellKnown,
    TimestampRules,
};
use std::fmt;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// A numeric literal in the width it was declared with.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Number {
    Int(i64),
    UInt(u64),
    F32(f32),
    F64(f64),
}

/// Signed duration magnitude in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nanos(pub i128);

/// Nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(pub i128);

/// Comparison operators used in failure conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// One side of a range, as written in the rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint<T> {
    pub value: T,
    /// `lte`/`gte` rather than `lt`/`gt`.
    pub inclusive: bool,
}

/// The range family of a comparable rule.
///
/// `upper` always comes from `lt`/`lte` and `lower` from `gt`/`gte`, even for
/// [`RangeCheck::Outside`] where `upper` is the smaller value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeCheck<T> {
    Below(Endpoint<T>),
    Above(Endpoint<T>),
    Within { lower: Endpoint<T>, upper: Endpoint<T> },
    Outside { lower: Endpoint<T>, upper: Endpoint<T> },
}

/// Comparisons against the value, joined by `&&` when `all` and `||` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition<T> {
    pub all: bool,
    pub terms: Vec<(Op, T)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetCheck<T> {
    In(Vec<T>),
    NotIn(Vec<T>),
}

/// Checks for numbers, durations and timestamps: `const`, then range, then set.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparablePlan<T> {
    pub constant: Option<T>,
    pub range: Option<RangeCheck<T>>,
    pub set: Option<SetCheck<T>>,
}

/// Raw range rules before planning.
#[derive(Debug, Clone, Copy)]
pub struct Bounds<T> {
    pub lt: Option<T>,
    pub lte: Option<T>,
    pub gt: Option<T>,
    pub gte: Option<T>,
}

/// Timestamp checks relative to the evaluation-time `now`.
///
/// A `within` window is closed: a timestamp exactly `within` away from `now`
/// is accepted. `lt_now`/`gt_now` stay strict, so `now` itself is outside the
/// one-sided windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NowCheck {
    Before,
    After,
    Within(Nanos),
    BeforeWithin(Nanos),
    AfterWithin(Nanos),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimestampPlan {
    pub comparable: ComparablePlan<Instant>,
    pub now: Option<NowCheck>,
}

/// Semantic string formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Format {
    Email,
    Hostname,
    Address,
    Ip,
    Ipv4,
    Ipv6,
    Uri,
    UriRef,
    Uuid,
}

/// String and bytes literals.
pub trait TextLiteral: Clone + PartialEq {
    /// Unit of `len`/`min_len`/`max_len`.
    const UNIT: &'static str;

    /// Quoted form used in reasons.
    fn describe(&self) -> String;

    /// Unquoted form used in list reasons.
    fn plain(&self) -> String;
}

/// One check on a string or bytes value, in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub enum TextCheck<L> {
    Const(L),
    Len(u64),
    MinLen(u64),
    MaxLen(u64),
    LenBytes(u64),
    MinBytes(u64),
    MaxBytes(u64),
    In(Vec<L>),
    NotIn(Vec<L>),
    Pattern(String),
    Prefix(L),
    Suffix(L),
    Contains(L),
    NotContains(L),
    Format(Format),
}

/// Element-count checks for repeated fields and maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountCheck {
    Min(u64),
    Max(u64),
    Exact(u64),
}

impl Op {
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Eq => "==",
            Op::Ne => "!=",
        }
    }

    pub fn holds<T: PartialOrd>(self, a: &T, b: &T) -> bool {
        match self {
            Op::Lt => a < b,
            Op::Le => a <= b,
            Op::Gt => a > b,
            Op::Ge => a >= b,
            Op::Eq => a == b,
            Op::Ne => a != b,
        }
    }
}

impl<T: Copy + PartialOrd + fmt::Display> Endpoint<T> {
    fn exclusive(value: T) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }

    fn inclusive(value: T) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    /// The comparison that fails an upper bound.
    fn over(self) -> (Op, T) {
        (if self.inclusive { Op::Gt } else { Op::Ge }, self.value)
    }

    /// The comparison that fails a lower bound.
    fn under(self) -> (Op, T) {
        (if self.inclusive { Op::Lt } else { Op::Le }, self.value)
    }
}

impl<T: Copy + PartialOrd + fmt::Display> RangeCheck<T> {
    pub fn from_bounds(bounds: Bounds<T>) -> Option<Self> {
        let upper = bounds
            .lt
            .map(Endpoint::exclusive)
            .or(bounds.lte.map(Endpoint::inclusive));
        let lower = bounds
            .gt
            .map(Endpoint::exclusive)
            .or(bounds.gte.map(Endpoint::inclusive));
        match (lower, upper) {
            (Some(lower), Some(upper)) if upper.value > lower.value => {
                Some(RangeCheck::Within { lower, upper })
            }
            (Some(lower), Some(upper)) => Some(RangeCheck::Outside { lower, upper }),
            (Some(lower), None) => Some(RangeCheck::Above(lower)),
            (None, Some(upper)) => Some(RangeCheck::Below(upper)),
            (None, None) => None,
        }
    }

    /// The condition under which a value violates the range.
    pub fn failure(&self) -> Condition<T> {
        match *self {
            RangeCheck::Below(upper) => Condition {
                all: false,
                terms: vec![upper.over()],
            },
            RangeCheck::Above(lower) => Condition {
                all: false,
                terms: vec![lower.under()],
            },
            RangeCheck::Within { lower, upper } => Condition {
                all: false,
                terms: vec![lower.under(), upper.over()],
            },
            RangeCheck::Outside { lower, upper } => Condition {
                all: true,
                terms: vec![upper.over(), lower.under()],
            },
        }
    }

    pub fn accepts(&self, value: T) -> bool {
        !self.failure().holds(&value)
    }

    pub fn reason(&self) -> String {
        match *self {
            RangeCheck::Below(upper) => reason::less_than(upper.value, upper.inclusive),
            RangeCheck::Above(lower) => reason::greater_than(lower.value, lower.inclusive),
            RangeCheck::Within { lower, upper } => reason::inside_range(
                if lower.inclusive { '[' } else { '(' },
                lower.value,
                upper.value,
                if upper.inclusive { ']' } else { ')' },
            ),
            RangeCheck::Outside { lower, upper } => reason::outside_range(
                if upper.inclusive { '(' } else { '[' },
                upper.value,
                lower.value,
                if lower.inclusive { ')' } else { ']' },
            ),
        }
    }
}

impl<T: PartialOrd> Condition<T> {
    pub fn holds(&self, value: &T) -> bool {
        let mut terms = self.terms.iter().map(|(op, bound)| op.holds(value, bound));
        if self.all {
            terms.all(|t| t)
        } else {
            terms.any(|t| t)
        }
    }
}

impl<T: PartialEq> SetCheck<T> {
    pub fn values(&self) -> &[T] {
        match self {
            SetCheck::In(values) | SetCheck::NotIn(values) => values,
        }
    }

    pub fn accepts(&self, value: &T) -> bool {
        match self {
            SetCheck::In(values) => values.contains(value),
            SetCheck::NotIn(values) => !values.contains(value),
        }
    }
}

impl<T: fmt::Display> SetCheck<T> {
    pub fn reason(&self) -> String {
        match self {
            SetCheck::In(values) => reason::in_list(values),
            SetCheck::NotIn(values) => reason::not_in_list(values),
        }
    }
}

impl<T: Copy + PartialOrd + fmt::Display> ComparablePlan<T> {
    pub fn new(constant: Option<T>, bounds: Bounds<T>, in_list: &[T], not_in: &[T]) -> Self {
        let set = if !in_list.is_empty() {
            Some(SetCheck::In(dedup(in_list)))
        } else if !not_in.is_empty() {
            Some(SetCheck::NotIn(dedup(not_in)))
        } else {
            None
        };
        Self {
            constant,
            range: RangeCheck::from_bounds(bounds),
            set,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.constant.is_none() && self.range.is_none() && self.set.is_none()
    }

    /// Evaluate every check in order, returning the first failure reason.
    pub fn check(&self, value: T) -> Result<(), String> {
        if let Some(constant) = self.constant {
            if value != constant {
                return Err(reason::equal(constant));
            }
        }
        if let Some(range) = &self.range {
            if !range.accepts(value) {
                return Err(range.reason());
            }
        }
        if let Some(set) = &self.set {
            if !set.accepts(&value) {
                return Err(set.reason());
            }
        }
        Ok(())
    }
}

/// Plan for any of the twelve numeric rule kinds; `None` for other kinds.
pub fn numeric_plan(rule: &Rule) -> Option<ComparablePlan<Number>> {
    Some(match rule {
        Rule::Float(r) => from_numeric(r),
        Rule::Double(r) => from_numeric(r),
        Rule::Int32(r) | Rule::SInt32(r) | Rule::SFixed32(r) => from_numeric(r),
        Rule::Int64(r) | Rule::SInt64(r) | Rule::SFixed64(r) => from_numeric(r),
        Rule::UInt32(r) | Rule::Fixed32(r) => from_numeric(r),
        Rule::UInt64(r) | Rule::Fixed64(r) => from_numeric(r),
        _ => return None,
    })
}

fn from_numeric<T: Copy + Into<Number>>(r: &NumericRules<T>) -> ComparablePlan<Number> {
    let convert = |v: Option<T>| v.map(Into::into);
    let in_list: Vec<Number> = r.in_list.iter().map(|v| (*v).into()).collect();
    let not_in: Vec<Number> = r.not_in.iter().map(|v| (*v).into()).collect();
    ComparablePlan::new(
        convert(r.constant),
        Bounds {
            lt: convert(r.lt),
            lte: convert(r.lte),
            gt: convert(r.gt),
            gte: convert(r.gte),
        },
        &in_list,
        &not_in,
    )
}

pub fn duration_plan(r: &DurationRules) -> Result<ComparablePlan<Nanos>, RenderError> {
    let resolve = |d| resolve_duration(d).map(Nanos).map_err(RenderError::InvalidLiteral);
    let opt = |d: Option<_>| d.map(resolve).transpose();
    let in_list = r.in_list.iter().copied().map(resolve).collect::<Result<Vec<_>, _>>()?;
    let not_in = r.not_in.iter().copied().map(resolve).collect::<Result<Vec<_>, _>>()?;
    Ok(ComparablePlan::new(
        opt(r.constant)?,
        Bounds {
            lt: opt(r.lt)?,
            lte: opt(r.lte)?,
            gt: opt(r.gt)?,
            gte: opt(r.gte)?,
        },
        &in_list,
        &not_in,
    ))
}

pub fn timestamp_plan(r: &TimestampRules) -> Result<TimestampPlan, RenderError> {
    let resolve = |t| resolve_timestamp(t).map(Instant).map_err(RenderError::InvalidLiteral);
    let opt = |t: Option<_>| t.map(resolve).transpose();
    let within = r
        .within
        .map(|d| resolve_duration(d).map(Nanos).map_err(RenderError::InvalidLiteral))
        .transpose()?;
    Ok(TimestampPlan {
        comparable: ComparablePlan::new(
            opt(r.constant)?,
            Bounds {
                lt: opt(r.lt)?,
                lte: opt(r.lte)?,
                gt: opt(r.gt)?,
                gte: opt(r.gte)?,
            },
            &[],
            &[],
        ),
        now: NowCheck::from_rules(r.lt_now, r.gt_now, within),
    })
}

impl TimestampPlan {
    pub fn check(&self, ts: Instant, now: Instant) -> Result<(), String> {
        self.comparable.check(ts)?;
        match self.now {
            Some(check) if !check.accepts(ts, now) => Err(check.reason()),
            _ => Ok(()),
        }
    }
}

impl NowCheck {
    pub fn from_rules(lt_now: bool, gt_now: bool, within: Option<Nanos>) -> Option<Self> {
        match (lt_now, gt_now, within) {
            (true, _, Some(w)) => Some(NowCheck::BeforeWithin(w)),
            (_, true, Some(w)) => Some(NowCheck::AfterWithin(w)),
            (true, _, None) => Some(NowCheck::Before),
            (_, true, None) => Some(NowCheck::After),
            (false, false, Some(w)) => Some(NowCheck::Within(w)),
            (false, false, None) => None,
        }
    }

    pub fn accepts(self, ts: Instant, now: Instant) -> bool {
        let (ts, now) = (ts.0, now.0);
        match self {
            NowCheck::Before => ts < now,
            NowCheck::After => ts > now,
            NowCheck::Within(w) => (ts - now).abs() <= w.0,
            NowCheck::BeforeWithin(w) => ts < now && ts >= now - w.0,
            NowCheck::AfterWithin(w) => ts > now && ts <= now + w.0,
        }
    }

    pub fn reason(self) -> String {
        match self {
            NowCheck::Before => reason::less_than_now(),
            NowCheck::After => reason::greater_than_now(),
            NowCheck::Within(w) => reason::within_of_now(w),
            NowCheck::BeforeWithin(w) => reason::less_than_now_within(w),
            NowCheck::AfterWithin(w) => reason::greater_than_now_within(w),
        }
    }
}

impl Format {
    pub fn reason(self) -> &'static str {
        match self {
            Format::Email => "value must be a valid email address",
            Format::Hostname => "value must be a valid hostname",
            Format::Address => "value must be a valid hostname, or ip address",
            Format::Ip => "value must be a valid IP address",
            Format::Ipv4 => "value must be a valid IPv4 address",
            Format::Ipv6 => "value must be a valid IPv6 address",
            Format::Uri => "value must be a valid URI",
            Format::UriRef => "value must be a valid URI reference",
            Format::Uuid => "value must be a valid UUID",
        }
    }
}

impl TextLiteral for String {
    const UNIT: &'static str = "runes";

    fn describe(&self) -> String {
        reason::quote(self)
    }

    fn plain(&self) -> String {
        self.clone()
    }
}

impl TextLiteral for Vec<u8> {
    const UNIT: &'static str = "bytes";

    fn describe(&self) -> String {
        reason::quote_bytes(self)
    }

    fn plain(&self) -> String {
        String::from_utf8_lossy(self).into_owned()
    }
}

impl<L: TextLiteral> TextCheck<L> {
    pub fn reason(&self) -> String {
        match self {
            TextCheck::Const(v) => reason::equal(v.describe()),
            TextCheck::Len(n) => reason::length_exactly(*n, L::UNIT),
            TextCheck::MinLen(n) => reason::length_at_least(*n, L::UNIT),
            TextCheck::MaxLen(n) => reason::length_at_most(*n, L::UNIT),
            TextCheck::LenBytes(n) => reason::length_exactly(*n, "bytes"),
            TextCheck::MinBytes(n) => reason::length_at_least(*n, "bytes"),
            TextCheck::MaxBytes(n) => reason::length_at_most(*n, "bytes"),
            TextCheck::In(values) => reason::in_list(&plains(values)),
            TextCheck::NotIn(values) => reason::not_in_list(&plains(values)),
            TextCheck::Pattern(p) => reason::pattern(p),
            TextCheck::Prefix(v) => reason::prefix(&v.describe()),
            TextCheck::Suffix(v) => reason::suffix(&v.describe()),
            TextCheck::Contains(v) => reason::contains(&v.describe()),
            TextCheck::NotContains(v) => reason::not_contains(&v.describe()),
            TextCheck::Format(f) => f.reason().to_string(),
        }
    }
}

fn plains<L: TextLiteral>(values: &[L]) -> Vec<String> {
    values.iter().map(TextLiteral::plain).collect()
}

pub fn string_checks(r: &StringRules) -> Vec<TextCheck<String>> {
    let mut checks = Vec::new();
    if let Some(c) = &r.constant {
        checks.push(TextCheck::Const(c.clone()));
    }
    push_lengths(&mut checks, r.len, r.min_len, r.max_len, [TextCheck::Len, TextCheck::MinLen, TextCheck::MaxLen]);
    push_lengths(
        &mut checks,
        r.len_bytes,
        r.min_bytes,
        r.max_bytes,
        [TextCheck::LenBytes, TextCheck::MinBytes, TextCheck::MaxBytes],
    );
    push_sets(&mut checks, &r.in_list, &r.not_in);
    if let Some(p) = &r.pattern {
        checks.push(TextCheck::Pattern(p.clone()));
    }
    push_affixes(&mut checks, &r.prefix, &r.suffix, &r.contains, &r.not_contains);
    let format = match r.well_known {
        Some(StringWellKnown::Email) => Some(Format::Email),
        Some(StringWellKnown::Hostname) => Some(Format::Hostname),
        Some(StringWellKnown::Address) => Some(Format::Address),
        Some(StringWellKnown::Ip) => Some(Format::Ip),
        Some(StringWellKnown::Ipv4) => Some(Format::Ipv4),
        Some(StringWellKnown::Ipv6) => Some(Format::Ipv6),
        Some(StringWellKnown::Uri) => Some(Format::Uri),
        Some(StringWellKnown::UriRef) => Some(Format::UriRef),
        Some(StringWellKnown::Uuid) => Some(Format::Uuid),
        // resolved to `pattern` by the checker
        Some(StringWellKnown::WellKnownRegex(_)) | None => None,
    };
    checks.extend(format.map(TextCheck::Format));
    checks
}

pub fn bytes_checks(r: &BytesRules) -> Vec<TextCheck<Vec<u8>>> {
    let mut checks = Vec::new();
    if let Some(c) = &r.constant {
        checks.push(TextCheck::Const(c.clone()));
    }
    push_lengths(&mut checks, r.len, r.min_len, r.max_len, [TextCheck::Len, TextCheck::MinLen, TextCheck::MaxLen]);
    push_sets(&mut checks, &r.in_list, &r.not_in);
    if let Some(p) = &r.pattern {
        checks.push(TextCheck::Pattern(p.clone()));
    }
    push_affixes(&mut checks, &r.prefix, &r.suffix, &r.contains, &None);
    let format = r.well_known.map(|wk| match wk {
        BytesWellKnown::Ip => Format::Ip,
        BytesWellKnown::Ipv4 => Format::Ipv4,
        BytesWellKnown::Ipv6 => Format::Ipv6,
    });
    checks.extend(format.map(TextCheck::Format));
    checks
}

type LengthCtor<L> = fn(u64) -> TextCheck<L>;

fn push_lengths<L>(
    checks: &mut Vec<TextCheck<L>>,
    exact: Option<u64>,
    min: Option<u64>,
    max: Option<u64>,
    [exact_ctor, min_ctor, max_ctor]: [LengthCtor<L>; 3],
) {
    match (exact, min, max) {
        (Some(n), _, _) => checks.push(exact_ctor(n)),
        (None, Some(lo), Some(hi)) if lo == hi => checks.push(exact_ctor(lo)),
        (None, lo, hi) => {
            checks.extend(lo.map(min_ctor));
            checks.extend(hi.map(max_ctor));
        }
    }
}

fn push_sets<L: TextLiteral>(checks: &mut Vec<TextCheck<L>>, in_list: &[L], not_in: &[L]) {
    if !in_list.is_empty() {
        checks.push(TextCheck::In(dedup(in_list)));
    } else if !not_in.is_empty() {
        checks.push(TextCheck::NotIn(dedup(not_in)));
    }
}

fn push_affixes<L: Clone>(
    checks: &mut Vec<TextCheck<L>>,
    prefix: &Option<L>,
    suffix: &Option<L>,
    contains: &Option<L>,
    not_contains: &Option<L>,
) {
    checks.extend(prefix.clone().map(TextCheck::Prefix));
    checks.extend(suffix.clone().map(TextCheck::Suffix));
    checks.extend(contains.clone().map(TextCheck::Contains));
    checks.extend(not_contains.clone().map(TextCheck::NotContains));
}

impl CountCheck {
    /// Comparison of the element count that signals a violation.
    pub fn failure(self) -> (Op, u64) {
        match self {
            CountCheck::Min(n) => (Op::Lt, n),
            CountCheck::Max(n) => (Op::Gt, n),
            CountCheck::Exact(n) => (Op::Ne, n),
        }
    }

    pub fn accepts(self, len: u64) -> bool {
        match self {
            CountCheck::Min(n) => len >= n,
            CountCheck::Max(n) => len <= n,
            CountCheck::Exact(n) => len == n,
        }
    }

    /// `noun` is "item" or "pair".
    pub fn reason(self, noun: &str) -> String {
        match self {
            CountCheck::Min(n) => reason::count_at_least(n, noun),
            CountCheck::Max(n) => reason::count_at_most(n, noun),
            CountCheck::Exact(n) => reason::count_exactly(n, noun),
        }
    }
}

pub fn count_checks(min: Option<u64>, max: Option<u64>) -> Vec<CountCheck> {
    match (min, max) {
        (Some(lo), Some(hi)) if lo == hi => vec![CountCheck::Exact(lo)],
        _ => min
            .map(CountCheck::Min)
            .into_iter()
            .chain(max.map(CountCheck::Max))
            .collect(),
    }
}

/// Remove duplicates, keeping first-seen order.
pub fn dedup<T: PartialEq + Clone>(values: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(values.len());
    for v in values {
        if !out.contains(v) {
            out.push(v.clone());
        }
    }
    out
}

macro_rules! number_from {
    ($($ty:ty => $variant:ident as $wide:ty),* $(,)?) => {
        $(impl From<$ty> for Number {
            fn from(v: $ty) -> Self {
                Number::$variant(v as $wide)
            }
        })*
    };
}

number_from!(i32 => Int as i64, i64 => Int as i64, u32 => UInt as u64, u64 => UInt as u64, f32 => F32 as f32, f64 => F64 as f64);

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::UInt(v) => write!(f, "{v}"),
            Number::F32(v) => write!(f, "{v}"),
            Number::F64(v) => write!(f, "{v}"),
        }
    }
}

impl Nanos {
    /// Seconds and nanos with matching signs.
    pub fn parts(self) -> (i64, i32) {
        ((self.0 / NANOS_PER_SECOND) as i64, (self.0 % NANOS_PER_SECOND) as i32)
    }
}

impl Instant {
    /// Seconds and non-negative nanos.
    pub fn parts(self) -> (i64, i32) {
        (
            self.0.div_euclid(NANOS_PER_SECOND) as i64,
            self.0.rem_euclid(NANOS_PER_SECOND) as i32,
        )
    }
}

impl fmt::Display for Nanos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let secs = abs / NANOS_PER_SECOND as u128;
        let frac = abs % NANOS_PER_SECOND as u128;
        if frac == 0 {
            write!(f, "{sign}{secs}s")
        } else {
            let digits = format!("{frac:09}");
            write!(f, "{sign}{secs}.{}s", digits.trim_end_matches('0'))
        }
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (secs, nanos) = self.parts();
        match DateTime::from_timestamp(secs, nanos as u32) {
            Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => write!(f, "{secs}.{nanos:09}s"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ruleguard_ir::{DurationValue, TimestampValue};

    fn int_plan(gt: Option<i32>, lt: Option<i32>) -> ComparablePlan<Number> {
        numeric_plan(&Rule::Int32(NumericRules {
            gt,
            lt,
            ..Default::default()
        }))
        .unwrap()
    }

    #[test]
    fn inverted_bounds_exclude_the_gap() {
        let plan = int_plan(Some(10), Some(5));
        assert!(plan.check(Number::Int(3)).is_ok());
        assert!(plan.check(Number::Int(12)).is_ok());
        assert_eq!(
            plan.check(Number::Int(7)),
            Err("value must be outside range [5, 10]".to_string())
        );
        // both ends belong to the excluded region
        assert!(plan.check(Number::Int(5)).is_err());
        assert!(plan.check(Number::Int(10)).is_err());
    }

    #[test]
    fn ordered_bounds_accept_the_gap() {
        let plan = int_plan(Some(5), Some(10));
        assert!(plan.check(Number::Int(7)).is_ok());
        assert_eq!(
            plan.check(Number::Int(10)),
            Err("value must be inside range (5, 10)".to_string())
        );
    }

    #[test]
    fn inclusive_brackets() {
        let plan = numeric_plan(&Rule::UInt64(NumericRules {
            gte: Some(5),
            lte: Some(10),
            ..Default::default()
        }))
        .unwrap();
        assert!(plan.check(Number::UInt(5)).is_ok());
        assert!(plan.check(Number::UInt(10)).is_ok());
        assert_eq!(plan.check(Number::UInt(11)).unwrap_err(), "value must be inside range [5, 10]");

        let plan = numeric_plan(&Rule::UInt64(NumericRules {
            gte: Some(10),
            lte: Some(5),
            ..Default::default()
        }))
        .unwrap();
        assert!(plan.check(Number::UInt(5)).is_ok());
        assert!(plan.check(Number::UInt(10)).is_ok());
        assert_eq!(plan.check(Number::UInt(7)).unwrap_err(), "value must be outside range (5, 10)");
    }

    #[test]
    fn const_comes_first() {
        let plan = numeric_plan(&Rule::Double(NumericRules {
            constant: Some(1.5),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(plan.check(Number::F64(2.0)).unwrap_err(), "value must equal 1.5");
    }

    #[test]
    fn sets_are_deduplicated() {
        let plan = numeric_plan(&Rule::Int64(NumericRules {
            in_list: vec![3, 1, 3, 2, 1],
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(
            plan.set,
            Some(SetCheck::In(vec![Number::Int(3), Number::Int(1), Number::Int(2)]))
        );
        assert_eq!(plan.check(Number::Int(4)).unwrap_err(), "value must be in list [3 1 2]");
    }

    #[test]
    fn failure_conditions() {
        let within = RangeCheck::from_bounds(Bounds {
            lt: Some(10),
            lte: None,
            gt: None,
            gte: Some(0),
        })
        .unwrap();
        assert_eq!(
            within.failure(),
            Condition {
                all: false,
                terms: vec![(Op::Lt, 0), (Op::Ge, 10)],
            }
        );

        let outside = RangeCheck::from_bounds(Bounds {
            lt: None,
            lte: Some(0),
            gt: Some(10),
            gte: None,
        })
        .unwrap();
        assert_eq!(
            outside.failure(),
            Condition {
                all: true,
                terms: vec![(Op::Gt, 0), (Op::Le, 10)],
            }
        );
    }

    #[test]
    fn duration_literals() {
        let plan = duration_plan(&DurationRules {
            gt: Some(DurationValue::new(1, 500_000_000)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            plan.check(Nanos(1_000_000_000)).unwrap_err(),
            "value must be greater than 1.5s"
        );
        assert!(plan.check(Nanos(2_000_000_000)).is_ok());
    }

    #[test]
    fn timestamp_literals_render_as_rfc3339() {
        let plan = timestamp_plan(&TimestampRules {
            lt: Some(TimestampValue::new(86_400, 0)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            plan.check(Instant(86_400 * NANOS_PER_SECOND), Instant(0)).unwrap_err(),
            "value must be less than 1970-01-02T00:00:00Z"
        );
    }

    #[test]
    fn now_checks() {
        let now = Instant(100 * NANOS_PER_SECOND);
        let w = Nanos(10 * NANOS_PER_SECOND);
        let at = |s: i128| Instant(s * NANOS_PER_SECOND);

        assert!(NowCheck::Before.accepts(at(99), now));
        assert!(!NowCheck::Before.accepts(at(100), now));
        assert!(NowCheck::Within(w).accepts(at(110), now));
        assert!(!NowCheck::Within(w).accepts(at(111), now));
        assert!(NowCheck::BeforeWithin(w).accepts(at(90), now));
        assert!(!NowCheck::BeforeWithin(w).accepts(at(89), now));
        assert!(NowCheck::AfterWithin(w).accepts(at(101), now));
        assert!(!NowCheck::AfterWithin(w).accepts(at(100), now));
        assert_eq!(NowCheck::AfterWithin(w).reason(), "value must be greater than now within 10s");
        assert_eq!(NowCheck::from_rules(false, false, Some(w)), Some(NowCheck::Within(w)));
    }

    #[test]
    fn within_window_is_closed() {
        let now = Instant(100 * NANOS_PER_SECOND);
        let w = Nanos(10 * NANOS_PER_SECOND);
        let edge = |n: i128| Instant(n);
        let lower = now.0 - w.0;
        let upper = now.0 + w.0;

        assert!(NowCheck::Within(w).accepts(edge(lower), now));
        assert!(NowCheck::Within(w).accepts(edge(upper), now));
        assert!(!NowCheck::Within(w).accepts(edge(lower - 1), now));
        assert!(!NowCheck::Within(w).accepts(edge(upper + 1), now));
        assert!(NowCheck::BeforeWithin(w).accepts(edge(lower), now));
        assert!(!NowCheck::BeforeWithin(w).accepts(edge(lower - 1), now));
        assert!(NowCheck::AfterWithin(w).accepts(edge(upper), now));
        assert!(!NowCheck::AfterWithin(w).accepts(edge(upper + 1), now));
    }

    #[test]
    fn string_check_order() {
        let checks = string_checks(&StringRules {
            min_len: Some(3),
            max_len: Some(5),
            prefix: Some("ab".into()),
            well_known: Some(StringWellKnown::Email),
            ..Default::default()
        });
        let reasons: Vec<String> = checks.iter().map(TextCheck::reason).collect();
        assert_eq!(
            reasons,
            [
                "value length must be at least 3 runes",
                "value length must be at most 5 runes",
                "value does not have prefix \"ab\"",
                "value must be a valid email address",
            ]
        );
    }

    #[test]
    fn equal_min_max_collapse_to_exact() {
        assert_eq!(count_checks(Some(2), Some(2)), vec![CountCheck::Exact(2)]);
        let checks = bytes_checks(&BytesRules {
            min_len: Some(4),
            max_len: Some(4),
            ..Default::default()
        });
        assert_eq!(checks, vec![TextCheck::Len(4)]);
        assert_eq!(checks[0].reason(), "value length must be 4 bytes");
    }

    #[test]
    fn duration_display() {
        assert_eq!(Nanos(0).to_string(), "0s");
        assert_eq!(Nanos(-1_250_000_000).to_string(), "-1.25s");
        assert_eq!(Nanos(5).to_string(), "0.000000005s");
        assert_eq!(Nanos(-1_000_000_005).parts(), (-1, -5));
        assert_eq!(Instant(-1).parts(), (-1, 999_999_999));
    }

    proptest! {
        #[test]
        fn range_matches_direct_comparison(
            lower in -100i64..100,
            upper in -100i64..100,
            lower_inclusive: bool,
            upper_inclusive: bool,
            v in -150i64..150,
        ) {
            let bounds = Bounds {
                lt: (!upper_inclusive).then_some(upper),
                lte: upper_inclusive.then_some(upper),
                gt: (!lower_inclusive).then_some(lower),
                gte: lower_inclusive.then_some(lower),
            };
            let range = RangeCheck::from_bounds(bounds).unwrap();
            let below = if upper_inclusive { v <= upper } else { v < upper };
            let above = if lower_inclusive { v >= lower } else { v > lower };
            let expected = if upper > lower { below && above } else { below || above };
            prop_assert_eq!(range.accepts(v), expected);
        }

        #[test]
        fn set_membership(values in proptest::collection::vec(0i64..20, 1..8), v in 0i64..20) {
            let numbers: Vec<Number> = values.iter().map(|n| Number::Int(*n)).collect();
            let plan = ComparablePlan::new(None, Bounds { lt: None, lte: None, gt: None, gte: None }, &numbers, &[]);
            prop_assert_eq!(plan.check(Number::Int(v)).is_ok(), values.contains(&v));
        }
    }
}
