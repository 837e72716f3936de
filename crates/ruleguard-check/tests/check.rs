//! Integration tests for ruleguard-check.

use ruleguard_check::{SchemaErrorKind, WellKnownPattern, check};
use ruleguard_ir::{Rule, Schema};

fn load_fixture(name: &str) -> Schema {
    let path = format!("tests/fixtures/{}.json", name);
    let content =
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("fixture {} not found", name));
    serde_json::from_str(&content).expect("invalid JSON")
}

fn string_pattern(schema: &Schema, message: &str, field: &str) -> Option<String> {
    let field = schema.message(message)?.field(field)?;
    match field.rules.as_ref()?.rule.as_ref()? {
        Rule::String(r) => r.pattern.clone(),
        _ => None,
    }
}

#[test]
fn header_selectors_resolve_to_patterns() {
    let schema = load_fixture("headers");
    let checked = check(&schema).unwrap();

    assert_eq!(
        string_pattern(checked.schema(), "Header", "name").as_deref(),
        Some(WellKnownPattern::HttpHeaderName.pattern())
    );
    // non-strict selectors use the lenient pattern
    assert_eq!(
        string_pattern(checked.schema(), "Header", "value").as_deref(),
        Some(WellKnownPattern::HeaderString.pattern())
    );
    // input is untouched
    assert_eq!(string_pattern(&schema, "Header", "name"), None);
}

#[test]
fn checking_is_idempotent() {
    let checked = check(&load_fixture("headers")).unwrap();
    let again = check(checked.schema()).unwrap();
    assert_eq!(checked, again);
}

#[test]
fn checked_schema_round_trips_through_json() {
    let checked = check(&load_fixture("headers")).unwrap();
    let json = serde_json::to_string(checked.schema()).unwrap();
    let reloaded: Schema = serde_json::from_str(&json).unwrap();
    assert_eq!(check(&reloaded).unwrap(), checked);
}

#[test]
fn errors_name_the_nested_field() {
    let mut schema = load_fixture("headers");
    let timeout = schema.messages[1].fields.iter_mut().find(|f| f.name == "timeout").unwrap();
    let Some(Rule::Duration(r)) = timeout.rules.as_mut().and_then(|r| r.rule.as_mut()) else {
        panic!("expected duration rule");
    };
    r.lt = r.lte;

    let err = check(&schema).unwrap_err();
    assert_eq!(err.kind, SchemaErrorKind::ConflictingRules);
    assert_eq!(err.path, "Request.timeout");
}
