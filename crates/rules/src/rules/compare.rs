//! Comparison rules: membership, equality with other attributes, date order

use super::format::parse_date;
use crate::foundation::RuleInput;
use crate::foundation::value::as_text;
use chrono::NaiveDateTime;
use std::cmp::Ordering;

fn is_listed(input: &RuleInput<'_>) -> Option<bool> {
    let text = as_text(input.value)?;
    Some(input.args.iter().any(|candidate| *candidate == text))
}

pub(super) fn in_list(input: &RuleInput<'_>) -> bool {
    is_listed(input) == Some(true)
}

pub(super) fn not_in_list(input: &RuleInput<'_>) -> bool {
    is_listed(input) == Some(false)
}

pub(super) fn same(input: &RuleInput<'_>) -> bool {
    input
        .arg(0)
        .is_some_and(|other| input.other(other) == input.value)
}

pub(super) fn different(input: &RuleInput<'_>) -> bool {
    input
        .arg(0)
        .is_some_and(|other| input.other(other) != input.value)
}

pub(super) fn confirmed(input: &RuleInput<'_>) -> bool {
    let confirmation = format!("{}_confirmation", input.attribute);
    input.other(&confirmation) == input.value
}

/// The comparison point of `after`/`before`: another attribute's date when
/// the argument names one, otherwise the argument as a date literal.
fn reference_date(input: &RuleInput<'_>) -> Option<NaiveDateTime> {
    let raw = input.argument?;
    match input.input.get(raw) {
        Some(other) => other.as_str().and_then(parse_date),
        None => parse_date(raw),
    }
}

fn date_order(input: &RuleInput<'_>) -> Option<Ordering> {
    let value = input.value.as_str().and_then(parse_date)?;
    let Some(reference) = reference_date(input) else {
        tracing::warn!(
            attribute = input.attribute,
            argument = ?input.argument,
            "date comparison has no usable reference date"
        );
        return None;
    };
    Some(value.cmp(&reference))
}

pub(super) fn after(input: &RuleInput<'_>) -> bool {
    date_order(input) == Some(Ordering::Greater)
}

pub(super) fn before(input: &RuleInput<'_>) -> bool {
    date_order(input) == Some(Ordering::Less)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::check;
    use serde_json::json;

    #[test]
    fn membership_compares_text() {
        assert!(check("in:draft,published", "status", &json!({"status": "draft"})));
        assert!(!check("in:draft,published", "status", &json!({"status": "gone"})));
        assert!(check("in:1,2,3", "n", &json!({"n": 2})));
        assert!(check("not_in:admin,root", "user", &json!({"user": "ann"})));
        assert!(!check("not_in:admin,root", "user", &json!({"user": "root"})));
    }

    #[test]
    fn membership_needs_a_scalar() {
        assert!(!check("in:a", "v", &json!({"v": ["a"]})));
        assert!(!check("not_in:a", "v", &json!({"v": ["b"]})));
    }

    #[test]
    fn same_and_different() {
        let input = json!({"a": "x", "b": "x", "c": "y"});
        assert!(check("same:b", "a", &input));
        assert!(!check("same:c", "a", &input));
        assert!(check("different:c", "a", &input));
        assert!(!check("different:b", "a", &input));
        assert!(!check("same:missing", "a", &input));
    }

    #[test]
    fn confirmed_reads_confirmation_attribute() {
        assert!(check(
            "confirmed",
            "password",
            &json!({"password": "s3cret", "password_confirmation": "s3cret"})
        ));
        assert!(!check("confirmed", "password", &json!({"password": "s3cret"})));
    }

    #[test]
    fn dates_against_literals() {
        let input = json!({"start": "2024-05-01"});
        assert!(check("after:2024-01-01", "start", &input));
        assert!(!check("after:2024-05-01", "start", &input));
        assert!(check("before:2024-12-31", "start", &input));
    }

    #[test]
    fn dates_against_other_attribute() {
        let input = json!({"start": "2024-05-01", "end": "2024-05-03 10:00"});
        assert!(check("after:start", "end", &input));
        assert!(!check("before:start", "end", &input));
    }

    #[test]
    fn unparseable_dates_fail() {
        assert!(!check("after:2024-01-01", "d", &json!({"d": "soon"})));
        assert!(!check("after:someday", "d", &json!({"d": "2024-01-01"})));
    }
}
