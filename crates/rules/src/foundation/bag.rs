//! Per-attribute collection of rendered failure messages

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Rendered failure messages keyed by attribute.
///
/// Attributes appear in the order their first failure was recorded. Within
/// one attribute, messages appear in the order they were reported, which for
/// asynchronous rules is completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorBag {
    errors: IndexMap<String, Vec<String>>,
}

impl ErrorBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message for `attribute`.
    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(attribute.into())
            .or_default()
            .push(message.into());
    }

    /// First message for `attribute`.
    #[must_use]
    pub fn first(&self, attribute: &str) -> Option<&str> {
        self.errors
            .get(attribute)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// All messages for `attribute`; empty if it has none.
    #[must_use]
    pub fn get(&self, attribute: &str) -> &[String] {
        self.errors.get(attribute).map_or(&[], Vec::as_slice)
    }

    /// Every attribute with its messages.
    #[must_use]
    pub fn all(&self) -> &IndexMap<String, Vec<String>> {
        &self.errors
    }

    /// Returns true if `attribute` has at least one message.
    #[must_use]
    pub fn has(&self, attribute: &str) -> bool {
        self.errors.contains_key(attribute)
    }

    /// Total number of messages across all attributes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Returns true if nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Removes every message.
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Iterates attributes and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(attribute, messages)| (attribute.as_str(), messages.as_slice()))
    }
}

impl fmt::Display for ErrorBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.count())?;
        for (attribute, messages) in &self.errors {
            for message in messages {
                writeln!(f, "  [{attribute}] {message}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn groups_by_attribute() {
        let mut bag = ErrorBag::new();
        bag.add("email", "first");
        bag.add("name", "other");
        bag.add("email", "second");

        assert_eq!(bag.count(), 3);
        assert_eq!(bag.first("email"), Some("first"));
        assert_eq!(bag.get("email"), ["first", "second"]);
        assert!(bag.get("missing").is_empty());
        assert!(bag.has("name"));
        assert!(!bag.has("missing"));
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut bag = ErrorBag::new();
        bag.add("age", "too young");
        assert_eq!(
            serde_json::to_value(&bag).unwrap(),
            json!({"age": ["too young"]})
        );
    }

    #[test]
    fn clear_empties_the_bag() {
        let mut bag = ErrorBag::new();
        bag.add("age", "too young");
        bag.clear();
        assert!(bag.is_empty());
        assert_eq!(bag.count(), 0);
    }
}
