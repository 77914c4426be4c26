//! Rule registry
//!
//! Maps rule names to predicates. Built-in rules resolve without being
//! stored; registered rules are kept as closures and shadow a built-in rule
//! of the same name.

use crate::error::{RuleError, RuleResult};
use crate::foundation::RuleInput;
use crate::rules::BuiltinRule;
use crate::run::Completion;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A synchronous user rule.
pub type SyncRule = Arc<dyn Fn(&RuleInput<'_>) -> bool + Send + Sync>;

/// An asynchronous user rule. It must eventually resolve the [`Completion`].
pub type AsyncRule = Arc<dyn Fn(&RuleInput<'_>, Completion) + Send + Sync>;

/// A resolved rule implementation.
#[derive(Clone)]
pub enum Predicate {
    /// A rule shipped with the engine.
    Builtin(BuiltinRule),
    /// A registered synchronous rule.
    Sync(SyncRule),
    /// A registered asynchronous rule.
    Async(AsyncRule),
}

impl Predicate {
    /// Returns true for asynchronous rules.
    #[must_use]
    pub const fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    /// Evaluates a synchronous predicate; `None` for asynchronous ones.
    #[must_use]
    pub fn evaluate(&self, input: &RuleInput<'_>) -> Option<bool> {
        match self {
            Self::Builtin(rule) => Some(rule.evaluate(input)),
            Self::Sync(rule) => Some(rule(input)),
            Self::Async(_) => None,
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(rule) => f.debug_tuple("Builtin").field(rule).finish(),
            Self::Sync(_) => f.write_str("Sync(<fn>)"),
            Self::Async(_) => f.write_str("Async(<fn>)"),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    predicate: Predicate,
    implicit: bool,
}

/// Registered rules by name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: HashMap<String, Entry>,
}

impl Registry {
    /// Creates a registry holding only the built-in rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `name` to its predicate.
    pub fn make(&self, name: &str) -> RuleResult<Predicate> {
        if let Some(entry) = self.entries.get(name) {
            return Ok(entry.predicate.clone());
        }
        BuiltinRule::from_name(name)
            .map(Predicate::Builtin)
            .ok_or_else(|| RuleError::unknown_rule(name))
    }

    /// Returns true if `name` resolves to a rule.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name) || BuiltinRule::from_name(name).is_some()
    }

    /// Returns true if `name` is an asynchronous rule.
    #[must_use]
    pub fn is_async(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .is_some_and(|entry| entry.predicate.is_async())
    }

    /// Returns true if `name` runs even when the value is absent.
    #[must_use]
    pub fn is_implicit(&self, name: &str) -> bool {
        match self.entries.get(name) {
            Some(entry) => entry.implicit,
            None => BuiltinRule::from_name(name).is_some_and(BuiltinRule::is_implicit),
        }
    }

    /// Adds or replaces a synchronous rule.
    pub fn register<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&RuleInput<'_>) -> bool + Send + Sync + 'static,
    {
        self.insert(name.into(), Predicate::Sync(Arc::new(rule)), false);
    }

    /// Adds or replaces a synchronous rule that also runs on absent values.
    pub fn register_implicit<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&RuleInput<'_>) -> bool + Send + Sync + 'static,
    {
        self.insert(name.into(), Predicate::Sync(Arc::new(rule)), true);
    }

    /// Adds or replaces an asynchronous rule.
    pub fn register_async<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&RuleInput<'_>, Completion) + Send + Sync + 'static,
    {
        self.insert(name.into(), Predicate::Async(Arc::new(rule)), false);
    }

    /// Adds or replaces an asynchronous rule that also runs on absent values.
    pub fn register_async_implicit<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&RuleInput<'_>, Completion) + Send + Sync + 'static,
    {
        self.insert(name.into(), Predicate::Async(Arc::new(rule)), true);
    }

    /// Removes a registered rule. A shadowed built-in becomes visible again.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    fn insert(&mut self, name: String, predicate: Predicate, implicit: bool) {
        debug!(
            rule = %name,
            asynchronous = predicate.is_async(),
            implicit,
            overrides_builtin = BuiltinRule::from_name(&name).is_some(),
            "registering validation rule"
        );
        self.entries.insert(name, Entry { predicate, implicit });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value, json};

    #[test]
    fn builtins_resolve_without_registration() {
        let registry = Registry::new();
        assert!(matches!(
            registry.make("between"),
            Ok(Predicate::Builtin(BuiltinRule::Between))
        ));
        assert!(registry.is_implicit("required"));
        assert!(!registry.is_implicit("email"));
        assert!(!registry.is_async("email"));
    }

    #[test]
    fn unknown_names_are_errors() {
        let err = Registry::new().make("betwen").unwrap_err();
        assert_eq!(err, RuleError::unknown_rule("betwen"));
    }

    #[test]
    fn registration_shadows_and_unregister_restores() {
        let mut registry = Registry::new();
        registry.register("required", |_| true);
        let map = Map::new();
        let input = RuleInput::new(&Value::Null, "x", &map);
        let predicate = registry.make("required").unwrap();
        assert_eq!(predicate.evaluate(&input), Some(true));
        assert!(!registry.is_implicit("required"));

        assert!(registry.unregister("required"));
        let predicate = registry.make("required").unwrap();
        assert_eq!(predicate.evaluate(&input), Some(false));
        assert!(registry.is_implicit("required"));
    }

    #[test]
    fn async_rules_are_flagged() {
        let mut registry = Registry::new();
        registry.register_async("unique", |_, done| done.pass());
        assert!(registry.is_async("unique"));
        assert!(!registry.is_implicit("unique"));
        assert!(registry.contains("unique"));

        let map = json!({}).as_object().cloned().unwrap();
        let input = RuleInput::new(&Value::Null, "x", &map);
        assert_eq!(registry.make("unique").unwrap().evaluate(&input), None);
    }

    #[test]
    fn async_rules_can_be_implicit() {
        let mut registry = Registry::new();
        registry.register_async_implicit("exists", |_, done| done.fail());
        assert!(registry.is_async("exists"));
        assert!(registry.is_implicit("exists"));

        registry.register_async("exists", |_, done| done.fail());
        assert!(!registry.is_implicit("exists"));
    }
}
