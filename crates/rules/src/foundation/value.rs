//! Helpers for inspecting `serde_json::Value` input

use serde_json::Value;
use std::borrow::Cow;

/// Shared `null` returned for absent attributes.
pub(crate) static NULL: Value = Value::Null;

/// Get the type name of a Value for error messages
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Presence check behind the built-in `required` rule.
///
/// `null` is absent. Strings are absent when empty (after trimming, if
/// `trim` is set). Arrays and objects are absent when empty.
#[must_use]
pub fn is_present(value: &Value, trim: bool) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) if trim => !s.trim().is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Numeric reading of a value: numbers directly, strings when they parse.
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

/// Textual reading of a scalar value, used by format and membership rules.
#[must_use]
pub fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        _ => None,
    }
}

// ============================================================================
// SIZE
// ============================================================================

/// How a size-aware rule measures a value, and which message variant it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeKind {
    /// Compare the numeric value.
    Numeric,
    /// Compare the character count.
    String,
    /// Compare the element count.
    Array,
    /// The value has no size.
    Unsized,
}

impl SizeKind {
    /// Classifies `value`. Numeric strings count as numbers when the
    /// attribute also carries a `numeric` or `integer` rule.
    #[must_use]
    pub fn of(value: &Value, numeric_rule: bool) -> Self {
        match value {
            Value::Number(_) => Self::Numeric,
            Value::String(_) if numeric_rule && as_number(value).is_some() => Self::Numeric,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            _ => Self::Unsized,
        }
    }

    /// Message-key suffix for this kind (`min.string`, `min.numeric`, ...).
    #[must_use]
    pub const fn key(self) -> Option<&'static str> {
        match self {
            Self::Numeric => Some("numeric"),
            Self::String => Some("string"),
            Self::Array => Some("array"),
            Self::Unsized => None,
        }
    }
}

/// Measures `value` according to its [`SizeKind`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn size_of(value: &Value, numeric_rule: bool) -> Option<f64> {
    match (SizeKind::of(value, numeric_rule), value) {
        (SizeKind::Numeric, _) => as_number(value),
        (SizeKind::String, Value::String(s)) => Some(s.chars().count() as f64),
        (SizeKind::Array, Value::Array(items)) => Some(items.len() as f64),
        _ => None,
    }
}
