//! Presence rules
//!
//! These are the implicit rules: they run even when the value is absent,
//! because deciding about absence is their whole job.

use crate::foundation::RuleInput;
use crate::foundation::value::{as_text, is_present};
use serde_json::Value;

pub(super) fn required(input: &RuleInput<'_>) -> bool {
    is_present(input.value, input.trim)
}

fn other_equals(input: &RuleInput<'_>) -> Option<bool> {
    let other = input.arg(0)?;
    let expected = input.arg(1)?;
    Some(as_text(input.other(other)).is_some_and(|actual| actual == expected))
}

pub(super) fn required_if(input: &RuleInput<'_>) -> bool {
    match other_equals(input) {
        Some(true) => required(input),
        Some(false) => true,
        None => {
            tracing::warn!(attribute = input.attribute, "required_if needs `other,value`");
            false
        }
    }
}

pub(super) fn required_unless(input: &RuleInput<'_>) -> bool {
    match other_equals(input) {
        Some(false) => required(input),
        Some(true) => true,
        None => {
            tracing::warn!(
                attribute = input.attribute,
                "required_unless needs `other,value`"
            );
            false
        }
    }
}

fn others_present<'a>(input: &'a RuleInput<'_>) -> impl Iterator<Item = bool> + 'a {
    input
        .args
        .iter()
        .map(|other| is_present(input.other(other), input.trim))
}

pub(super) fn required_with(input: &RuleInput<'_>) -> bool {
    if others_present(input).any(|present| present) {
        required(input)
    } else {
        true
    }
}

pub(super) fn required_without(input: &RuleInput<'_>) -> bool {
    if others_present(input).any(|present| !present) {
        required(input)
    } else {
        true
    }
}

pub(super) fn accepted(input: &RuleInput<'_>) -> bool {
    match input.value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => matches!(s.as_str(), "yes" | "on" | "1" | "true"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::check;
    use serde_json::json;

    #[test]
    fn required_rejects_blank() {
        assert!(check("required", "name", &json!({"name": "Ann"})));
        assert!(!check("required", "name", &json!({"name": "  "})));
        assert!(!check("required", "name", &json!({})));
        assert!(!check("required", "name", &json!({"name": null})));
    }

    #[test]
    fn required_if_follows_other_value() {
        let input = json!({"kind": "company"});
        assert!(!check("required_if:kind,company", "vat", &input));
        assert!(check("required_if:kind,person", "vat", &input));
        assert!(check(
            "required_if:kind,company",
            "vat",
            &json!({"kind": "company", "vat": "X1"})
        ));
    }

    #[test]
    fn required_if_compares_numbers_as_text() {
        assert!(!check("required_if:level,2", "reason", &json!({"level": 2})));
    }

    #[test]
    fn required_unless_inverts() {
        let input = json!({"kind": "person"});
        assert!(!check("required_unless:kind,company", "name", &input));
        assert!(check("required_unless:kind,person", "name", &input));
    }

    #[test]
    fn required_with_and_without() {
        let input = json!({"phone": "555"});
        assert!(!check("required_with:phone,fax", "country", &input));
        assert!(check("required_with:fax", "country", &input));
        assert!(!check("required_without:email", "name", &input));
        assert!(check("required_without:phone", "name", &input));
    }

    #[test]
    fn missing_arguments_fail() {
        assert!(!check("required_if:kind", "vat", &json!({})));
    }

    #[test]
    fn accepted_values() {
        for value in [json!("yes"), json!("on"), json!("1"), json!(1), json!(true), json!("true")] {
            assert!(check("accepted", "terms", &json!({ "terms": value })));
        }
        for value in [json!("no"), json!(0), json!(false), json!(null)] {
            assert!(!check("accepted", "terms", &json!({ "terms": value })));
        }
    }
}
