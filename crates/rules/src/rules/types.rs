//! Type rules

use crate::foundation::RuleInput;
use crate::foundation::value::as_number;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("integer pattern is valid"));

pub(super) fn numeric(input: &RuleInput<'_>) -> bool {
    as_number(input.value).is_some()
}

pub(super) fn integer(input: &RuleInput<'_>) -> bool {
    match input.value {
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0),
        Value::String(s) => INTEGER.is_match(s.trim()),
        _ => false,
    }
}

pub(super) fn string(input: &RuleInput<'_>) -> bool {
    input.value.is_string()
}

pub(super) fn boolean(input: &RuleInput<'_>) -> bool {
    match input.value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_i64(), Some(0 | 1)),
        Value::String(s) => matches!(s.as_str(), "true" | "false" | "0" | "1"),
        _ => false,
    }
}

pub(super) fn array(input: &RuleInput<'_>) -> bool {
    input.value.is_array()
}
