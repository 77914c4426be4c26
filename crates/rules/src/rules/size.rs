//! Size rules
//!
//! Numbers compare by value, strings by character count, arrays by element
//! count. A numeric string compares by value when the attribute also carries
//! a `numeric` or `integer` rule.

use super::numeric_arg;
use crate::foundation::RuleInput;
use crate::foundation::value::{as_text, size_of};

fn measured(input: &RuleInput<'_>) -> Option<f64> {
    size_of(input.value, input.numeric)
}

pub(super) fn min(input: &RuleInput<'_>) -> bool {
    match (measured(input), numeric_arg(input, 0)) {
        (Some(size), Some(min)) => size >= min,
        _ => false,
    }
}

pub(super) fn max(input: &RuleInput<'_>) -> bool {
    match (measured(input), numeric_arg(input, 0)) {
        (Some(size), Some(max)) => size <= max,
        _ => false,
    }
}

pub(super) fn between(input: &RuleInput<'_>) -> bool {
    match (measured(input), numeric_arg(input, 0), numeric_arg(input, 1)) {
        (Some(size), Some(min), Some(max)) => size >= min && size <= max,
        _ => false,
    }
}

pub(super) fn size(input: &RuleInput<'_>) -> bool {
    match (measured(input), numeric_arg(input, 0)) {
        (Some(size), Some(expected)) => (size - expected).abs() < f64::EPSILON,
        _ => false,
    }
}

/// Number of digits in an unsigned integer value, if it is one.
fn digit_count(input: &RuleInput<'_>) -> Option<usize> {
    let text = as_text(input.value)?;
    let text = text.trim();
    (!text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())).then_some(text.len())
}

#[allow(clippy::cast_precision_loss)]
pub(super) fn digits(input: &RuleInput<'_>) -> bool {
    match (digit_count(input), numeric_arg(input, 0)) {
        (Some(count), Some(expected)) => (count as f64 - expected).abs() < f64::EPSILON,
        _ => false,
    }
}

#[allow(clippy::cast_precision_loss)]
pub(super) fn digits_between(input: &RuleInput<'_>) -> bool {
    match (digit_count(input), numeric_arg(input, 0), numeric_arg(input, 1)) {
        (Some(count), Some(min), Some(max)) => {
            let count = count as f64;
            count >= min && count <= max
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{check, check_numeric};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case("between:18,99", json!(15), false)]
    #[case("between:18,99", json!(18), true)]
    #[case("between:18,99", json!(99.5), false)]
    #[case("between:3,5", json!("abcd"), true)]
    #[case("between:3,5", json!("ab"), false)]
    #[case("between:1,2", json!([1, 2, 3]), false)]
    #[case("min:3", json!("héllo"), true)]
    #[case("min:3", json!(2), false)]
    #[case("max:2", json!([1, 2]), true)]
    #[case("max:2", json!("abc"), false)]
    #[case("size:3", json!("abc"), true)]
    #[case("size:3", json!(3), true)]
    #[case("size:3", json!(true), false)]
    fn size_rules(#[case] rule: &str, #[case] value: Value, #[case] expected: bool) {
        assert_eq!(check(rule, "field", &json!({ "field": value })), expected);
    }

    #[test]
    fn numeric_rule_changes_string_measurement() {
        let input = json!({"age": "25"});
        assert!(!check("min:18", "age", &input));
        assert!(check_numeric("min:18", "age", &input));
    }

    #[test]
    fn bad_argument_fails_the_rule() {
        assert!(!check("min:abc", "name", &json!({"name": "long enough"})));
        assert!(!check("between:1", "name", &json!({"name": "x"})));
        assert!(!check("min:", "name", &json!({"name": "x"})));
    }

    #[test]
    fn digits_rules() {
        assert!(check("digits:4", "pin", &json!({"pin": "0123"})));
        assert!(check("digits:4", "pin", &json!({"pin": 1234})));
        assert!(!check("digits:4", "pin", &json!({"pin": "12a4"})));
        assert!(!check("digits:4", "pin", &json!({"pin": -123})));
        assert!(check("digits_between:2,4", "pin", &json!({"pin": "123"})));
        assert!(!check("digits_between:2,4", "pin", &json!({"pin": "12345"})));
    }
}
