//! Built-in rule catalog
//!
//! Every built-in rule is a variant of [`BuiltinRule`]. The registry maps
//! names to variants; user-registered rules live next to them as closures
//! and may shadow a built-in name.
//!
//! # Categories
//!
//! - **Presence** (implicit): `required`, `required_if`, `required_unless`,
//!   `required_with`, `required_without`, `accepted`
//! - **Type**: `numeric`, `integer`, `string`, `boolean`, `array`
//! - **Size**: `min`, `max`, `between`, `size`, `digits`, `digits_between`
//! - **Format**: `email`, `url`, `alpha`, `alpha_dash`, `alpha_num`, `regex`,
//!   `date`, `ip`
//! - **Comparison**: `in`, `not_in`, `same`, `different`, `confirmed`,
//!   `after`, `before`

mod compare;
mod format;
mod presence;
mod size;
mod types;

use crate::foundation::RuleInput;

// ============================================================================
// CATALOG MACRO
// ============================================================================

/// Declares the [`BuiltinRule`] enum together with its name table and
/// implicit flags, keeping the three in one place.
macro_rules! builtin_rules {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $name:literal $(, implicit = $implicit:literal)?;
        )+
    ) => {
        /// A rule shipped with the engine.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum BuiltinRule {
            $( $(#[$meta])* $variant, )+
        }

        impl BuiltinRule {
            /// Every built-in rule, in catalog order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// The name used in rule strings.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// Whether the rule runs even when the value is absent.
            #[must_use]
            pub const fn is_implicit(self) -> bool {
                match self {
                    $(Self::$variant => builtin_rules!(@implicit $($implicit)?),)+
                }
            }
        }
    };
    (@implicit $implicit:literal) => { $implicit };
    (@implicit) => { false };
}

builtin_rules! {
    /// Value must be present (not null, not blank, not an empty container).
    Required => "required", implicit = true;
    /// `required_if:other,value`
    RequiredIf => "required_if", implicit = true;
    /// `required_unless:other,value`
    RequiredUnless => "required_unless", implicit = true;
    /// `required_with:a,b,...`: required when any listed attribute is present.
    RequiredWith => "required_with", implicit = true;
    /// `required_without:a,b,...`: required when any listed attribute is absent.
    RequiredWithout => "required_without", implicit = true;
    /// `yes`, `on`, `1`, `true`.
    Accepted => "accepted", implicit = true;
    /// A number or numeric string.
    Numeric => "numeric";
    /// An integer or integer string.
    Integer => "integer";
    /// A JSON string.
    String => "string";
    /// `true`, `false`, `0`, `1` and their string forms.
    Boolean => "boolean";
    /// A JSON array.
    Array => "array";
    /// `min:n`
    Min => "min";
    /// `max:n`
    Max => "max";
    /// `between:min,max`
    Between => "between";
    /// `size:n`
    Size => "size";
    /// `digits:n`
    Digits => "digits";
    /// `digits_between:min,max`
    DigitsBetween => "digits_between";
    /// An email address.
    Email => "email";
    /// An http(s) or ftp URL.
    Url => "url";
    /// ASCII letters only.
    Alpha => "alpha";
    /// ASCII letters, digits, dashes and underscores.
    AlphaDash => "alpha_dash";
    /// ASCII letters and digits.
    AlphaNum => "alpha_num";
    /// `regex:pattern` or `regex:/pattern/flags`; the argument is not split on commas.
    Regex => "regex";
    /// A parseable date or date-time.
    Date => "date";
    /// An IPv4 or IPv6 address.
    Ip => "ip";
    /// `in:a,b,...`
    In => "in";
    /// `not_in:a,b,...`
    NotIn => "not_in";
    /// `same:other`
    Same => "same";
    /// `different:other`
    Different => "different";
    /// Matches `<attribute>_confirmation`.
    Confirmed => "confirmed";
    /// `after:date` or `after:other_attribute`
    After => "after";
    /// `before:date` or `before:other_attribute`
    Before => "before";
}

// ============================================================================
// PLACEHOLDERS
// ============================================================================

/// How a named message placeholder is filled for a built-in rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `:name` is the argument at the given index.
    Arg(&'static str, usize),
    /// `:name` is the display name of the attribute named by the argument.
    Attribute(&'static str, usize),
    /// `:name` is every argument, comma separated.
    Args(&'static str),
    /// `:name` is the display names of every argument, comma separated.
    Attributes(&'static str),
}

const MIN: &[Placeholder] = &[Placeholder::Arg("min", 0)];
const MAX: &[Placeholder] = &[Placeholder::Arg("max", 0)];
const SIZE: &[Placeholder] = &[Placeholder::Arg("size", 0)];
const DIGITS: &[Placeholder] = &[Placeholder::Arg("digits", 0)];
const RANGE: &[Placeholder] = &[Placeholder::Arg("min", 0), Placeholder::Arg("max", 1)];
const VALUES: &[Placeholder] = &[Placeholder::Args("values")];
const OTHER: &[Placeholder] = &[Placeholder::Attribute("other", 0)];
const OTHER_VALUE: &[Placeholder] = &[
    Placeholder::Attribute("other", 0),
    Placeholder::Arg("value", 1),
];
const ATTRIBUTES: &[Placeholder] = &[Placeholder::Attributes("values")];
const DATE: &[Placeholder] = &[Placeholder::Arg("date", 0)];

impl BuiltinRule {
    /// Looks up a built-in rule by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|rule| rule.name() == name)
    }

    /// Named placeholders this rule's messages use.
    #[must_use]
    pub fn placeholders(self) -> &'static [Placeholder] {
        match self {
            Self::Min => MIN,
            Self::Max => MAX,
            Self::Size => SIZE,
            Self::Digits => DIGITS,
            Self::Between | Self::DigitsBetween => RANGE,
            Self::In | Self::NotIn => VALUES,
            Self::Same | Self::Different => OTHER,
            Self::RequiredIf | Self::RequiredUnless => OTHER_VALUE,
            Self::RequiredWith | Self::RequiredWithout => ATTRIBUTES,
            Self::After | Self::Before => DATE,
            _ => &[],
        }
    }

    /// Whether this rule's message varies with the kind of value
    /// (`min.string`, `min.numeric`, ...).
    #[must_use]
    pub const fn is_size_aware(self) -> bool {
        matches!(self, Self::Min | Self::Max | Self::Between | Self::Size)
    }

    /// Evaluates the rule.
    #[must_use]
    pub fn evaluate(self, input: &RuleInput<'_>) -> bool {
        match self {
            Self::Required => presence::required(input),
            Self::RequiredIf => presence::required_if(input),
            Self::RequiredUnless => presence::required_unless(input),
            Self::RequiredWith => presence::required_with(input),
            Self::RequiredWithout => presence::required_without(input),
            Self::Accepted => presence::accepted(input),
            Self::Numeric => types::numeric(input),
            Self::Integer => types::integer(input),
            Self::String => types::string(input),
            Self::Boolean => types::boolean(input),
            Self::Array => types::array(input),
            Self::Min => size::min(input),
            Self::Max => size::max(input),
            Self::Between => size::between(input),
            Self::Size => size::size(input),
            Self::Digits => size::digits(input),
            Self::DigitsBetween => size::digits_between(input),
            Self::Email => format::email(input),
            Self::Url => format::url(input),
            Self::Alpha => format::alpha(input),
            Self::AlphaDash => format::alpha_dash(input),
            Self::AlphaNum => format::alpha_num(input),
            Self::Regex => format::regex(input),
            Self::Date => format::date(input),
            Self::Ip => format::ip(input),
            Self::In => compare::in_list(input),
            Self::NotIn => compare::not_in_list(input),
            Self::Same => compare::same(input),
            Self::Different => compare::different(input),
            Self::Confirmed => compare::confirmed(input),
            Self::After => compare::after(input),
            Self::Before => compare::before(input),
        }
    }
}

/// Parses a numeric rule argument, logging misconfiguration.
pub(crate) fn numeric_arg(input: &RuleInput<'_>, index: usize) -> Option<f64> {
    let parsed = input.arg(index).and_then(|raw| raw.trim().parse::<f64>().ok());
    if parsed.is_none() {
        tracing::warn!(
            attribute = input.attribute,
            argument = ?input.argument,
            index,
            "rule argument is not a number; treating the rule as failed"
        );
    }
    parsed
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::foundation::{RuleDirective, RuleInput};
    use serde_json::{Map, Value};

    fn evaluate(rule: &str, attribute: &str, input: &Value, numeric: bool) -> bool {
        let map: &Map<String, Value> = input.as_object().expect("test input must be an object");
        let value = map.get(attribute).unwrap_or(&Value::Null);
        let directive = RuleDirective::parse(rule);
        let builtin = super::BuiltinRule::from_name(directive.name()).expect("unknown builtin");
        let mut rule_input =
            RuleInput::new(value, attribute, map).with_argument(directive.argument());
        rule_input.numeric = numeric;
        builtin.evaluate(&rule_input)
    }

    /// Evaluates `rule` against the value stored under `attribute` in `input`.
    pub fn check(rule: &str, attribute: &str, input: &Value) -> bool {
        evaluate(rule, attribute, input, false)
    }

    /// Like [`check`], as if the attribute also carried a `numeric` rule.
    pub fn check_numeric(rule: &str, attribute: &str, input: &Value) -> bool {
        evaluate(rule, attribute, input, true)
    }
}
