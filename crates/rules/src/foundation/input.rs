//! The view of one attribute that a rule predicate receives

use super::value::NULL;
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// Everything a predicate needs to evaluate one directive.
#[derive(Debug, Clone)]
pub struct RuleInput<'a> {
    /// The attribute's value; `null` when the attribute is absent.
    pub value: &'a Value,
    /// The attribute being validated.
    pub attribute: &'a str,
    /// The directive's raw argument string.
    pub argument: Option<&'a str>,
    /// The argument split on `,`.
    pub args: SmallVec<[&'a str; 4]>,
    /// The full input, for rules that compare against other attributes.
    pub input: &'a Map<String, Value>,
    /// Whether the attribute also carries a `numeric` or `integer` rule.
    pub numeric: bool,
    /// Whether `required` treats whitespace-only strings as absent.
    pub trim: bool,
}

impl<'a> RuleInput<'a> {
    /// Builds an input for a standalone predicate call.
    #[must_use]
    pub fn new(value: &'a Value, attribute: &'a str, input: &'a Map<String, Value>) -> Self {
        Self {
            value,
            attribute,
            argument: None,
            args: SmallVec::new(),
            input,
            numeric: false,
            trim: true,
        }
    }

    /// Sets the raw argument (and its split form).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_argument(mut self, argument: Option<&'a str>) -> Self {
        self.argument = argument;
        self.args = argument
            .map(|argument| argument.split(',').collect())
            .unwrap_or_default();
        self
    }

    /// The `index`th argument.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).copied()
    }

    /// Another attribute's value; `null` when absent.
    #[must_use]
    pub fn other(&self, attribute: &str) -> &'a Value {
        self.input.get(attribute).unwrap_or(&NULL)
    }
}
