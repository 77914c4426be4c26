//! # nebula-rules
//!
//! Declarative rule-string validation for request and form input in Nebula.
//!
//! ## Quick Start
//!
//! ```rust
//! use nebula_rules::prelude::*;
//! use serde_json::json;
//!
//! let rules = RawRules::new()
//!     .rule("name", "required|min:3")
//!     .rule("email", "required|email");
//! let validator = Validator::new(json!({"name": "Al", "email": "al@example.com"}), rules)?;
//!
//! assert!(validator.fails()?);
//! assert_eq!(
//!     validator.errors().first("name"),
//!     Some("The name must be at least 3 characters.")
//! );
//! # Ok::<(), nebula_rules::RuleError>(())
//! ```
//!
//! ## Rule strings
//!
//! `"<rule>[:<arg1>[,<arg2>...]][|<rule>...]"`, or a list of such tokens.
//! Only the first `:` of a token separates name from argument. See
//! [`rules`] for the built-in catalog.
//!
//! ## Custom rules
//!
//! [`register`], [`register_implicit`], [`register_async`] and
//! [`register_async_implicit`] add rules to the process-wide [`RuleContext`].
//! Validators built with [`Validator::with_context`] use their own context
//! instead.
//!
//! ## Asynchronous rules
//!
//! An asynchronous rule receives a [`Completion`] and resolves it whenever
//! its answer is ready. Rule sets containing one must be run with
//! [`Validator::check_async`], [`Validator::passes_with`] or
//! [`Validator::passes_async`].

pub mod config;
pub mod context;
pub mod error;
pub mod foundation;
pub mod messages;
pub mod prelude;
pub mod registry;
pub mod rules;
pub mod run;
pub mod validator;

pub use config::RulesConfig;
pub use context::RuleContext;
pub use error::{RuleError, RuleResult};
pub use foundation::{ErrorBag, RawRules, RuleDirective, RuleInput, RuleSet, RuleSpec, SizeKind};
pub use messages::{LanguageStore, Messages};
pub use registry::{Predicate, Registry};
pub use rules::BuiltinRule;
pub use run::{AsyncRun, Completion, Failure};
pub use validator::Validator;

// ============================================================================
// PROCESS-WIDE REGISTRATION
// ============================================================================

/// Registers a synchronous rule in the global context.
///
/// `message` becomes the rule's template in the current default language.
///
/// # Examples
///
/// ```
/// use nebula_rules::{RawRules, Validator};
/// use serde_json::json;
///
/// nebula_rules::register(
///     "even",
///     |input| input.value.as_i64().is_some_and(|n| n % 2 == 0),
///     "The :attribute must be even.",
/// );
///
/// let validator = Validator::new(json!({"n": 3}), RawRules::new().rule("n", "even")).unwrap();
/// assert!(validator.fails().unwrap());
/// assert_eq!(validator.errors().first("n"), Some("The n must be even."));
/// ```
pub fn register<F>(name: impl Into<String>, rule: F, message: impl Into<String>)
where
    F: Fn(&RuleInput<'_>) -> bool + Send + Sync + 'static,
{
    RuleContext::global().register(name, rule, message);
}

/// Registers a synchronous rule that also runs when the value is absent.
pub fn register_implicit<F>(name: impl Into<String>, rule: F, message: impl Into<String>)
where
    F: Fn(&RuleInput<'_>) -> bool + Send + Sync + 'static,
{
    RuleContext::global().register_implicit(name, rule, message);
}

/// Registers an asynchronous rule in the global context.
pub fn register_async<F>(name: impl Into<String>, rule: F, message: impl Into<String>)
where
    F: Fn(&RuleInput<'_>, Completion) + Send + Sync + 'static,
{
    RuleContext::global().register_async(name, rule, message);
}

/// Registers an asynchronous rule that also runs when the value is absent.
pub fn register_async_implicit<F>(name: impl Into<String>, rule: F, message: impl Into<String>)
where
    F: Fn(&RuleInput<'_>, Completion) + Send + Sync + 'static,
{
    RuleContext::global().register_async_implicit(name, rule, message);
}

/// Switches the global default message language.
pub fn set_default_language(language: impl Into<String>) {
    RuleContext::global().set_default_language(language);
}

/// Restores the global context to built-in rules and bundled messages.
pub fn reset() {
    RuleContext::global().reset();
}
