//! Rule specification parsing
//!
//! A rule specification is either a `|`-delimited string such as
//! `"required|between:3,10"` or an ordered list of tokens such as
//! `["required", "between:3,10"]`. Each token becomes one [`RuleDirective`].
//!
//! Only the first `:` separates the rule name from its argument; any further
//! colons are part of the argument, so `"after:2020-01-01T10:00"` keeps its
//! time component intact.

use crate::error::{RuleError, RuleResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

// ============================================================================
// DIRECTIVE
// ============================================================================

/// One parsed `{name, argument}` pair for one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleDirective {
    name: String,
    argument: Option<String>,
}

impl RuleDirective {
    /// Creates a directive from a rule name and an optional raw argument.
    pub fn new(name: impl Into<String>, argument: Option<String>) -> Self {
        Self {
            name: name.into(),
            argument,
        }
    }

    /// Parses a single token like `"between:3,10"`.
    ///
    /// The token is trimmed; the argument is kept verbatim.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token.trim().split_once(':') {
            Some((name, argument)) => Self::new(name.trim(), Some(argument.to_owned())),
            None => Self::new(token.trim(), None),
        }
    }

    /// The rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw argument string, if the token had a `:`.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// Splits the argument on `,`, keeping empty segments.
    ///
    /// A directive without an argument has no args; `"min:"` has one empty arg.
    #[must_use]
    pub fn args(&self) -> SmallVec<[&str; 4]> {
        self.argument
            .as_deref()
            .map(|argument| argument.split(',').collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for RuleDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(argument) => write!(f, "{}:{argument}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

// ============================================================================
// RAW SPECIFICATION
// ============================================================================

/// The raw, unparsed rules for one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// `"required|min:3"`
    Piped(String),
    /// `["required", "min:3"]`
    List(Vec<String>),
}

impl RuleSpec {
    fn tokens(&self) -> Vec<&str> {
        match self {
            Self::Piped(raw) => raw.split('|').collect(),
            Self::List(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(raw: &str) -> Self {
        Self::Piped(raw.to_owned())
    }
}

impl From<String> for RuleSpec {
    fn from(raw: String) -> Self {
        Self::Piped(raw)
    }
}

impl From<Vec<String>> for RuleSpec {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for RuleSpec {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RuleSpec {
    fn from(items: [&str; N]) -> Self {
        Self::List(items.iter().map(|s| (*s).to_owned()).collect())
    }
}

/// Raw rules for every attribute, in specification order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRules(IndexMap<String, RuleSpec>);

impl RawRules {
    /// Creates an empty specification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the rules for `attribute`.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule(mut self, attribute: impl Into<String>, spec: impl Into<RuleSpec>) -> Self {
        self.0.insert(attribute.into(), spec.into());
        self
    }

    /// Builds raw rules from a JSON object of strings or string arrays.
    pub fn from_json(value: &serde_json::Value) -> RuleResult<Self> {
        if !value.is_object() {
            return Err(RuleError::invalid_input(format!(
                "rules must be a JSON object, got {}",
                super::value::type_name(value)
            )));
        }
        serde_json::from_value(value.clone()).map_err(|err| {
            RuleError::invalid_input(format!(
                "rules must map attributes to a string or an array of strings: {err}"
            ))
        })
    }

    /// Number of attributes with rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no attribute has rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, S> FromIterator<(K, S)> for RawRules
where
    K: Into<String>,
    S: Into<RuleSpec>,
{
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(attribute, spec)| (attribute.into(), spec.into()))
                .collect(),
        )
    }
}

impl TryFrom<serde_json::Value> for RawRules {
    type Error = RuleError;

    fn try_from(value: serde_json::Value) -> RuleResult<Self> {
        Self::from_json(&value)
    }
}

// ============================================================================
// PARSED RULE SET
// ============================================================================

/// Parsed directives for every attribute, in specification order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    attributes: IndexMap<String, Vec<RuleDirective>>,
}

impl RuleSet {
    /// Parses a raw specification.
    ///
    /// Empty tokens (for example from a trailing `|`) are skipped.
    #[must_use]
    pub fn parse(raw: &RawRules) -> Self {
        let attributes = raw
            .0
            .iter()
            .map(|(attribute, spec)| {
                let directives = spec
                    .tokens()
                    .into_iter()
                    .filter(|token| !token.trim().is_empty())
                    .map(RuleDirective::parse)
                    .collect();
                (attribute.clone(), directives)
            })
            .collect();
        Self { attributes }
    }

    /// Directives for one attribute.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&[RuleDirective]> {
        self.attributes.get(attribute).map(Vec::as_slice)
    }

    /// Iterates attributes and their directives in specification order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RuleDirective])> {
        self.attributes
            .iter()
            .map(|(attribute, directives)| (attribute.as_str(), directives.as_slice()))
    }

    /// Iterates every directive paired with its attribute.
    pub fn directives(&self) -> impl Iterator<Item = (&str, &RuleDirective)> {
        self.iter().flat_map(|(attribute, directives)| {
            directives.iter().map(move |directive| (attribute, directive))
        })
    }

    /// Returns true if `attribute` carries a rule named `name`.
    #[must_use]
    pub fn has_rule(&self, attribute: &str, name: &str) -> bool {
        self.get(attribute)
            .is_some_and(|directives| directives.iter().any(|d| d.name() == name))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
