//! Per-field rendering context.
//!
//! A [`RenderContext`] is created once for each field and then narrowed as
//! rendering descends into repeated elements, map keys and values, and scalar
//! wrappers. Every level resolves what it validates up front as a [`Target`],
//! so renderers dispatch with a single `match`.

use crate::error::RenderError;
use ruleguard_ir::{
    Field, FieldRules, FieldType, MapRules, Message, MessageRules, RepeatedRules, Rule, ScalarKind,
    Schema,
};

static NO_REPEATED_RULES: RepeatedRules = RepeatedRules {
    min_items: None,
    max_items: None,
    unique: false,
    items: None,
};

static NO_MAP_RULES: MapRules = MapRules {
    min_pairs: None,
    max_pairs: None,
    no_sparse: false,
    keys: None,
    values: None,
};

/// What a context validates.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// No value checks; a `required` message rule may still apply.
    None,
    /// Recurse into a message's own validation routine.
    Embedded(&'a Message),
    /// Scalar wrapper carrying the rule for its inner value.
    Wrapper { kind: ScalarKind, rule: &'a Rule },
    Repeated(&'a RepeatedRules),
    Map(&'a MapRules),
    Rule(&'a Rule),
}

#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub schema: &'a Schema,
    pub message: &'a Message,
    pub field: &'a Field,
    /// Type of the value at this level (element type inside a repeated field).
    pub ty: FieldType,
    pub rules: Option<&'a FieldRules>,
    pub target: Target<'a>,
    /// Expression reading the value, when it is not the field itself.
    pub accessor: Option<String>,
    /// Loop variable that qualifies the error path (`field[index]`).
    pub index: Option<String>,
    /// Failures describe a map key rather than a value.
    pub on_key: bool,
    /// Distinguishes tables of nested rules (`""`, `"_Items"`, `"_Keys"`, `"_Values"`).
    scope: &'static str,
}

impl<'a> RenderContext<'a> {
    pub fn for_field(schema: &'a Schema, message: &'a Message, field: &'a Field) -> Self {
        let rules = field.rules.as_ref();
        Self {
            schema,
            message,
            field,
            ty: field.ty.clone(),
            rules,
            target: resolve(schema, &field.ty, rules),
            accessor: None,
            index: None,
            on_key: false,
            scope: "",
        }
    }

    /// Context for a repeated element or a map value.
    pub fn elem(&self, accessor: impl Into<String>, index: impl Into<String>) -> Result<Self, RenderError> {
        let (ty, rules, scope) = match (self.target, &self.ty) {
            (Target::Repeated(r), FieldType::Repeated(elem)) => (elem.as_ref(), r.items.as_deref(), "_Items"),
            (Target::Map(r), FieldType::Map { value, .. }) => (value.as_ref(), r.values.as_deref(), "_Values"),
            _ => return Err(RenderError::NotAContainer(self.field.name.clone())),
        };
        Ok(self.nested(ty.clone(), rules, scope, accessor.into(), index.into(), false))
    }

    /// Context for a map key.
    pub fn key(&self, accessor: impl Into<String>, index: impl Into<String>) -> Result<Self, RenderError> {
        let (Target::Map(r), FieldType::Map { key, .. }) = (self.target, &self.ty) else {
            return Err(RenderError::NotAContainer(self.field.name.clone()));
        };
        Ok(self.nested(
            FieldType::Scalar(*key),
            r.keys.as_deref(),
            "_Keys",
            accessor.into(),
            index.into(),
            true,
        ))
    }

    /// Context reading through a scalar wrapper to its inner value.
    pub fn unwrap(&self, accessor: impl Into<String>) -> Result<Self, RenderError> {
        let Target::Wrapper { kind, rule } = self.target else {
            return Err(RenderError::NotAWrapper(self.field.name.clone()));
        };
        Ok(Self {
            ty: FieldType::Scalar(kind),
            target: Target::Rule(rule),
            accessor: Some(accessor.into()),
            ..self.clone()
        })
    }

    fn nested(
        &self,
        ty: FieldType,
        rules: Option<&'a FieldRules>,
        scope: &'static str,
        accessor: String,
        index: String,
        on_key: bool,
    ) -> Self {
        Self {
            schema: self.schema,
            message: self.message,
            field: self.field,
            target: resolve(self.schema, &ty, rules),
            ty,
            rules,
            accessor: Some(accessor),
            index: Some(index),
            on_key,
            scope,
        }
    }

    pub fn message_rules(&self) -> MessageRules {
        self.rules.and_then(|r| r.message).unwrap_or_default()
    }

    pub fn is_required(&self) -> bool {
        self.message_rules().required
    }

    /// Whether this context is the field itself rather than a nested value.
    pub fn is_root(&self) -> bool {
        self.accessor.is_none()
    }

    /// File-level identifier of a lookup table or compiled pattern.
    pub fn table_name(&self, suffix: &str) -> String {
        format!("_{}_{}{}_{}", self.message.ident(), self.field.name, self.scope, suffix)
    }
}

fn resolve<'a>(schema: &'a Schema, ty: &FieldType, rules: Option<&'a FieldRules>) -> Target<'a> {
    match rules.and_then(|r| r.rule.as_ref()) {
        Some(Rule::Repeated(r)) => Target::Repeated(r),
        Some(Rule::Map(r)) => Target::Map(r),
        Some(rule) => match ty.wrapped() {
            Some(kind) if rule.scalar_kind().is_some() => Target::Wrapper { kind, rule },
            _ => Target::Rule(rule),
        },
        None if rules.is_some_and(FieldRules::is_skipped) => Target::None,
        None => match ty {
            FieldType::Message(_) => embedded(schema, ty).map_or(Target::None, Target::Embedded),
            FieldType::Repeated(elem) if embedded(schema, elem).is_some() => {
                Target::Repeated(&NO_REPEATED_RULES)
            }
            FieldType::Map { value, .. } if embedded(schema, value).is_some() => {
                Target::Map(&NO_MAP_RULES)
            }
            _ => Target::None,
        },
    }
}

/// The message a value of this type is validated with, if it has a routine.
fn embedded<'a>(schema: &'a Schema, ty: &FieldType) -> Option<&'a Message> {
    match ty {
        FieldType::Message(name) => schema.message(name).filter(|m| !m.ignored),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruleguard_ir::{NumericRules, StringRules, WellKnownType};

    fn schema() -> Schema {
        let mut schema = Schema::new("t");
        schema.add_message(Message::new("Item", vec![]));
        schema.add_message(Message::new("Hidden", vec![]).ignored());
        schema.add_message(Message::new(
            "M",
            vec![
                Field::new("items", FieldType::repeated(FieldType::Message("Item".into()))),
                Field::new("hidden", FieldType::Message("Hidden".into())),
                Field::new("count", FieldType::WellKnown(WellKnownType::Wrapper(ScalarKind::Int32)))
                    .with_rules(FieldRules::rule(Rule::Int32(NumericRules {
                        gt: Some(0),
                        ..Default::default()
                    }))),
                Field::new("labels", FieldType::map(ScalarKind::String, FieldType::Scalar(ScalarKind::String)))
                    .with_rules(FieldRules::rule(Rule::Map(MapRules {
                        keys: Some(Box::new(FieldRules::rule(Rule::String(StringRules {
                            min_len: Some(1),
                            ..Default::default()
                        })))),
                        ..Default::default()
                    }))),
            ],
        ));
        schema
    }

    #[test]
    fn repeated_messages_are_walked_without_rules() {
        let schema = schema();
        let m = schema.message("M").unwrap();
        let ctx = RenderContext::for_field(&schema, m, &m.fields[0]);
        assert!(matches!(ctx.target, Target::Repeated(_)));

        let elem = ctx.elem("item", "idx").unwrap();
        assert!(matches!(elem.target, Target::Embedded(msg) if msg.name == "Item"));
        assert_eq!(elem.index.as_deref(), Some("idx"));
        assert!(!elem.is_root());
    }

    #[test]
    fn ignored_messages_are_not_embedded() {
        let schema = schema();
        let m = schema.message("M").unwrap();
        let ctx = RenderContext::for_field(&schema, m, &m.fields[1]);
        assert!(matches!(ctx.target, Target::None));
    }

    #[test]
    fn wrapper_unwraps_to_inner_rule() {
        let schema = schema();
        let m = schema.message("M").unwrap();
        let ctx = RenderContext::for_field(&schema, m, &m.fields[2]);
        assert!(matches!(ctx.target, Target::Wrapper { kind: ScalarKind::Int32, .. }));

        let inner = ctx.unwrap("m.count.value").unwrap();
        assert!(matches!(inner.target, Target::Rule(Rule::Int32(_))));
        assert_eq!(inner.ty, FieldType::Scalar(ScalarKind::Int32));
        assert!(inner.unwrap("x").is_err());
    }

    #[test]
    fn map_keys_and_table_names() {
        let schema = schema();
        let m = schema.message("M").unwrap();
        let ctx = RenderContext::for_field(&schema, m, &m.fields[3]);
        assert_eq!(ctx.table_name("InLookup"), "_M_labels_InLookup");

        let key = ctx.key("key", "key").unwrap();
        assert!(key.on_key);
        assert!(matches!(key.target, Target::Rule(Rule::String(_))));
        assert_eq!(key.table_name("Pattern"), "_M_labels_Keys_Pattern");

        let value = ctx.elem("value", "key").unwrap();
        assert!(matches!(value.target, Target::None));
        assert!(ctx.elem("a", "b").unwrap().key("c", "d").is_err());
    }
}
