//! End-to-end tests for synchronous validation runs.

use nebula_rules::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn validator(input: Value, rules: RawRules) -> Validator {
    Validator::with_context(Arc::new(RuleContext::new()), input, rules).unwrap()
}

// ============================================================================
// PASS / FAIL
// ============================================================================

#[test]
fn underage_fails_between_only() {
    let v = validator(
        json!({"age": 15}),
        RawRules::new().rule("age", "required|integer|between:18,99"),
    );
    assert!(!v.check().unwrap());

    let errors = v.errors();
    assert_eq!(errors.count(), 1);
    assert_eq!(
        errors.get("age"),
        ["The age field must be between 18 and 99.".to_owned()]
    );
}

#[test]
fn absent_optional_field_passes() {
    let v = validator(json!({}), RawRules::new().rule("name", "min:3"));
    assert!(v.check().unwrap());
    assert!(v.errors().is_empty());
}

#[test]
fn required_still_runs_on_absent_field() {
    let v = validator(json!({}), RawRules::new().rule("name", "required|min:3"));
    assert!(v.fails().unwrap());
    assert_eq!(v.errors().first("name"), Some("The name field is required."));
    assert_eq!(v.errors().count(), 1);
}

#[rstest]
#[case(json!({"title": "Hello", "status": "draft"}), true)]
#[case(json!({"title": "Hi", "status": "draft"}), false)]
#[case(json!({"title": "Hello", "status": "gone"}), false)]
#[case(json!({"status": "draft"}), false)]
fn article_rules(#[case] input: Value, #[case] expected: bool) {
    let v = validator(
        input,
        RawRules::new()
            .rule("title", "required|string|min:3|max:120")
            .rule("status", ["required", "in:draft,published"]),
    );
    assert_eq!(v.passes().unwrap(), expected);
}

#[test]
fn rules_from_json_object() {
    let v = Validator::with_context(
        Arc::new(RuleContext::new()),
        json!({"tags": ["a", "b", "c"], "when": "2024-02-01"}),
        RawRules::from_json(&json!({
            "tags": "array|max:2",
            "when": ["date", "after:2024-01-01"],
        }))
        .unwrap(),
    )
    .unwrap();
    assert!(v.fails().unwrap());
    assert_eq!(
        v.errors().first("tags"),
        Some("The tags may not have more than 2 items.")
    );
    assert!(!v.errors().has("when"));
}

#[test]
fn malformed_rules_are_invalid_input() {
    let err = RawRules::from_json(&json!({"name": 3})).unwrap_err();
    assert_eq!(err.code(), "RULES_INVALID_INPUT");
    let err = RawRules::from_json(&json!("required")).unwrap_err();
    assert_eq!(err.code(), "RULES_INVALID_INPUT");
}

#[test]
fn errors_keep_attribute_and_rule_order() {
    let v = validator(
        json!({"b": "x", "a": "y"}),
        RawRules::new()
            .rule("b", "numeric|min:5")
            .rule("a", "integer"),
    );
    assert!(v.fails().unwrap());
    let attributes: Vec<_> = v.errors().iter().map(|(attribute, _)| attribute.to_owned()).collect();
    assert_eq!(attributes, ["b", "a"]);
    assert_eq!(
        v.errors().get("b"),
        [
            "The b must be a number.".to_owned(),
            "The b must be at least 5 characters.".to_owned(),
        ]
    );
}

// ============================================================================
// MESSAGES
// ============================================================================

#[test]
fn custom_messages_and_attribute_names() {
    let v = validator(
        json!({"first_name": "", "dob": "soon"}),
        RawRules::new()
            .rule("first_name", "required")
            .rule("dob", "date"),
    );
    v.set_custom_messages([("required", ":attribute is missing")]);
    v.set_attribute_names([("dob", "date of birth")]);

    assert!(v.fails().unwrap());
    let errors = v.errors();
    assert_eq!(errors.first("first_name"), Some("first name is missing"));
    assert_eq!(
        errors.first("dob"),
        Some("The date of birth is not a valid date format.")
    );
}

#[test]
fn attribute_formatter_applies_to_other_fields() {
    let v = validator(
        json!({"password": "a", "password_again": "b"}),
        RawRules::new().rule("password", "same:password_again"),
    );
    v.set_attribute_formatter(|attribute| attribute.replace('_', "-"));
    assert!(v.fails().unwrap());
    assert_eq!(
        v.errors().first("password"),
        Some("The password and password-again fields must match.")
    );
}

#[test]
fn translated_language_with_english_fallback() {
    let context = Arc::new(RuleContext::new());
    context.add_language("ru", [("required", "Поле :attribute обязательно.")]);
    let v = Validator::with_context(
        context,
        json!({"email": "bad"}),
        RawRules::new()
            .rule("name", "required")
            .rule("email", "email"),
    )
    .unwrap();
    v.set_language("ru");

    assert!(v.fails().unwrap());
    assert_eq!(v.errors().first("name"), Some("Поле name обязательно."));
    assert_eq!(v.errors().first("email"), Some("The email format is invalid."));
}

#[test]
fn error_bag_serializes_in_order() {
    let v = validator(
        json!({"age": "x"}),
        RawRules::new().rule("age", "integer").rule("name", "required"),
    );
    assert!(v.fails().unwrap());
    assert_eq!(
        serde_json::to_value(v.errors()).unwrap(),
        json!({
            "age": ["The age must be an integer."],
            "name": ["The name field is required."],
        })
    );
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn whitespace_counts_as_present_when_trimming_is_off() {
    let rules = || RawRules::new().rule("note", "required");
    let trimming = validator(json!({"note": "   "}), rules());
    assert!(trimming.fails().unwrap());

    let context = Arc::new(RuleContext::with_config(
        RulesConfig::new().with_trim_strings_for_required(false),
    ));
    let keeping = Validator::with_context(context, json!({"note": "   "}), rules()).unwrap();
    assert!(keeping.passes().unwrap());
}

#[test]
fn rules_registered_after_construction_are_seen() {
    let context = Arc::new(RuleContext::new());
    let v = Validator::with_context(
        Arc::clone(&context),
        json!({"code": "abc"}),
        RawRules::new().rule("code", "min:2"),
    )
    .unwrap();
    assert!(v.passes().unwrap());

    context.register("min", |_| false, "The :attribute is never long enough.");
    assert!(v.fails().unwrap());
    assert_eq!(
        v.errors().first("code"),
        Some("The code is never long enough.")
    );
}

#[test]
fn unregistered_rule_is_reported_at_run_time() {
    let context = Arc::new(RuleContext::new());
    context.register("slug", |input| input.value.is_string(), "bad slug");
    let v = Validator::with_context(
        Arc::clone(&context),
        json!({"s": "x"}),
        RawRules::new().rule("s", "slug"),
    )
    .unwrap();
    context.registry_mut().unregister("slug");
    assert_eq!(v.check().unwrap_err(), RuleError::unknown_rule("slug"));
}
