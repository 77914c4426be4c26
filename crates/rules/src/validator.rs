//! The validation engine
//!
//! A [`Validator`] pairs one input object with one parsed [`RuleSet`] and can
//! be run any number of times. Every run resolves rules against its
//! [`RuleContext`] afresh, so rules registered after construction are seen
//! by later runs.
//!
//! # Modes
//!
//! - [`check`](Validator::check), [`passes`](Validator::passes),
//!   [`fails`](Validator::fails): synchronous; refuse rule sets that contain
//!   asynchronous rules.
//! - [`check_async`](Validator::check_async),
//!   [`passes_with`](Validator::passes_with),
//!   [`fails_with`](Validator::fails_with): callback based; work for any rule
//!   set.
//! - [`passes_async`](Validator::passes_async),
//!   [`fails_async`](Validator::fails_async): the same as futures.
//!
//! # Examples
//!
//! ```
//! use nebula_rules::{RawRules, Validator};
//! use serde_json::json;
//!
//! let rules = RawRules::new().rule("age", "required|integer|between:18,99");
//! let validator = Validator::new(json!({"age": 15}), rules).unwrap();
//!
//! assert!(validator.fails().unwrap());
//! assert_eq!(
//!     validator.errors().first("age"),
//!     Some("The age field must be between 18 and 99.")
//! );
//! ```

use crate::context::RuleContext;
use crate::error::{RuleError, RuleResult};
use crate::foundation::value::{NULL, type_name};
use crate::foundation::{ErrorBag, RawRules, RuleDirective, RuleInput, RuleSet, SizeKind};
use crate::messages::Messages;
use crate::registry::Predicate;
use crate::rules::BuiltinRule;
use crate::run::{AsyncRun, Failure};
use futures::channel::oneshot;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, trace};

// ============================================================================
// REPORTER
// ============================================================================

/// Renders failures and collects them. Shared with in-flight async runs.
#[derive(Debug)]
struct Reporter {
    context: Arc<RuleContext>,
    messages: RwLock<Messages>,
    errors: Mutex<ErrorBag>,
}

impl Reporter {
    fn record(
        &self,
        attribute: &str,
        directive: &RuleDirective,
        kind: SizeKind,
        template: Option<&str>,
    ) {
        let message = {
            let languages = self.context.languages();
            self.messages
                .read()
                .render(&languages, directive, attribute, kind, template)
        };
        debug!(
            attribute,
            rule = directive.name(),
            message = %message,
            "validation rule failed"
        );
        self.errors.lock().add(attribute, message);
    }

    fn reset(&self) {
        self.errors.lock().clear();
    }
}

// ============================================================================
// PLAN
// ============================================================================

/// One directive resolved against the registry.
struct Step<'r> {
    attribute: &'r str,
    directive: &'r RuleDirective,
    predicate: Predicate,
    implicit: bool,
    numeric: bool,
}

/// Every directive of a run, resolved before any of them executes.
struct Plan<'r> {
    steps: Vec<Step<'r>>,
    has_async: bool,
    presence: Predicate,
    trim: bool,
}

impl Plan<'_> {
    /// Non-implicit rules only run when the `required` rule accepts the value.
    fn applies(&self, step: &Step<'_>, input: &RuleInput<'_>) -> bool {
        if step.implicit {
            return true;
        }
        let mut presence = RuleInput::new(input.value, input.attribute, input.input);
        presence.trim = input.trim;
        self.presence.evaluate(&presence).unwrap_or(false)
    }
}

type Verdict = Mutex<Option<oneshot::Sender<bool>>>;

fn settle(verdict: &Verdict, passed: bool) {
    if let Some(tx) = verdict.lock().take() {
        // The receiver is gone only if the caller dropped the future.
        let _ = tx.send(passed);
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Validates one input object against one rule specification.
#[derive(Debug)]
pub struct Validator {
    input: Map<String, Value>,
    rules: RuleSet,
    context: Arc<RuleContext>,
    reporter: Arc<Reporter>,
}

impl Validator {
    /// Creates a validator using the process-wide [`RuleContext`].
    ///
    /// # Errors
    ///
    /// [`RuleError::InvalidInput`] if `input` is not a JSON object,
    /// [`RuleError::UnknownRule`] if a directive names an unregistered rule.
    pub fn new(input: Value, rules: RawRules) -> RuleResult<Self> {
        Self::with_context(RuleContext::global(), input, rules)
    }

    /// Creates a validator with custom message templates.
    ///
    /// Keys are `rule` or `rule.attribute`.
    pub fn with_messages<K, V>(
        input: Value,
        rules: RawRules,
        custom_messages: impl IntoIterator<Item = (K, V)>,
    ) -> RuleResult<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let validator = Self::new(input, rules)?;
        validator.set_custom_messages(custom_messages);
        Ok(validator)
    }

    /// Creates a validator from JSON rules such as
    /// `{"name": "required|min:3", "tags": ["array"]}`.
    pub fn from_json(input: Value, rules: &Value) -> RuleResult<Self> {
        Self::new(input, RawRules::from_json(rules)?)
    }

    /// Creates a validator bound to an explicit context.
    pub fn with_context(
        context: Arc<RuleContext>,
        input: Value,
        rules: RawRules,
    ) -> RuleResult<Self> {
        let input = match input {
            Value::Object(map) => map,
            other => {
                return Err(RuleError::invalid_input(format!(
                    "input must be a JSON object, got {}",
                    type_name(&other)
                )));
            }
        };
        let validator = Self {
            input,
            rules: RuleSet::parse(&rules),
            reporter: Arc::new(Reporter {
                context: Arc::clone(&context),
                messages: RwLock::new(Messages::new()),
                errors: Mutex::new(ErrorBag::new()),
            }),
            context,
        };
        validator.plan()?;
        Ok(validator)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The validated input.
    #[must_use]
    pub fn input(&self) -> &Map<String, Value> {
        &self.input
    }

    /// The parsed rules.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The context rules and messages are resolved against.
    #[must_use]
    pub fn context(&self) -> &Arc<RuleContext> {
        &self.context
    }

    /// Messages recorded by the most recent run.
    #[must_use]
    pub fn errors(&self) -> ErrorBag {
        self.reporter.errors.lock().clone()
    }

    /// Returns true if any directive currently resolves to an asynchronous rule.
    pub fn has_async(&self) -> RuleResult<bool> {
        self.plan().map(|plan| plan.has_async)
    }

    // ------------------------------------------------------------------------
    // Message settings
    // ------------------------------------------------------------------------

    /// Sets display names used for `:attribute` and attribute placeholders.
    pub fn set_attribute_names<K, V>(&self, names: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.reporter.messages.write().set_attribute_names(names);
    }

    /// Adds custom templates keyed by `rule` or `rule.attribute`.
    pub fn set_custom_messages<K, V>(&self, messages: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.reporter.messages.write().set_custom(messages);
    }

    /// Sets how attributes without an explicit display name are shown.
    pub fn set_attribute_formatter<F>(&self, formatter: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.reporter.messages.write().set_formatter(Arc::new(formatter));
    }

    /// Renders messages in `language` instead of the context default.
    pub fn set_language(&self, language: impl Into<String>) {
        self.reporter
            .messages
            .write()
            .set_language(Some(language.into()));
    }

    // ------------------------------------------------------------------------
    // Synchronous mode
    // ------------------------------------------------------------------------

    /// Runs every applicable rule and returns true if none failed.
    ///
    /// # Errors
    ///
    /// [`RuleError::InvalidUsage`] if the rules include an asynchronous rule;
    /// no rule runs in that case.
    pub fn check(&self) -> RuleResult<bool> {
        let plan = self.plan()?;
        if plan.has_async {
            return Err(RuleError::invalid_usage(
                "rules include asynchronous rules; use check_async, passes_with or passes_async",
            ));
        }
        self.reporter.reset();
        debug!(
            attributes = self.rules.len(),
            directives = plan.steps.len(),
            "validation run started"
        );

        let mut failed = 0_usize;
        for step in &plan.steps {
            let input = self.rule_input(step, plan.trim);
            if !plan.applies(step, &input) {
                trace!(
                    attribute = step.attribute,
                    rule = step.directive.name(),
                    "value absent; skipping rule"
                );
                continue;
            }
            if step.predicate.evaluate(&input) == Some(false) {
                failed += 1;
                self.reporter.record(
                    step.attribute,
                    step.directive,
                    SizeKind::of(input.value, step.numeric),
                    None,
                );
            }
        }

        debug!(failed, "validation run finished");
        Ok(failed == 0)
    }

    /// Returns true if every applicable rule passes.
    pub fn passes(&self) -> RuleResult<bool> {
        self.check()
    }

    /// Returns true if any applicable rule fails.
    pub fn fails(&self) -> RuleResult<bool> {
        self.check().map(|passed| !passed)
    }

    // ------------------------------------------------------------------------
    // Asynchronous mode
    // ------------------------------------------------------------------------

    /// Runs every applicable rule and calls exactly one of the callbacks once
    /// all of them have resolved.
    ///
    /// Synchronous rules resolve before this returns. Asynchronous rules
    /// resolve whenever they call their [`Completion`](crate::Completion); the
    /// callback runs on whichever thread resolves last. Failure messages are
    /// recorded as failures happen, so for asynchronous rules they appear in
    /// completion order.
    ///
    /// # Errors
    ///
    /// [`RuleError::UnknownRule`] if a rule was unregistered since
    /// construction. Nothing runs in that case.
    pub fn check_async<P, F>(&self, on_pass: P, on_fail: F) -> RuleResult<()>
    where
        P: FnOnce() + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        let plan = self.plan()?;
        self.reporter.reset();
        debug!(
            attributes = self.rules.len(),
            directives = plan.steps.len(),
            has_async = plan.has_async,
            "asynchronous validation run started"
        );

        let reporter = Arc::clone(&self.reporter);
        let run = AsyncRun::new(
            move |failure: Failure| {
                reporter.record(
                    &failure.attribute,
                    &failure.directive,
                    failure.kind,
                    failure.message.as_deref(),
                );
            },
            move |passed| {
                debug!(passed, "asynchronous validation run finished");
                if passed {
                    on_pass();
                } else {
                    on_fail();
                }
            },
        );

        for step in &plan.steps {
            let input = self.rule_input(step, plan.trim);
            if !plan.applies(step, &input) {
                trace!(
                    attribute = step.attribute,
                    rule = step.directive.name(),
                    "value absent; skipping rule"
                );
                continue;
            }
            let completion = run.add(Failure {
                attribute: step.attribute.to_owned(),
                directive: step.directive.clone(),
                kind: SizeKind::of(input.value, step.numeric),
                message: None,
            });
            match &step.predicate {
                Predicate::Async(rule) => rule(&input, completion),
                predicate => completion.resolve(predicate.evaluate(&input).unwrap_or(false)),
            }
        }

        run.arm();
        Ok(())
    }

    /// Asynchronous run that calls `callback` only if every rule passes.
    pub fn passes_with<P>(&self, callback: P) -> RuleResult<()>
    where
        P: FnOnce() + Send + 'static,
    {
        self.check_async(callback, || {})
    }

    /// Asynchronous run that calls `callback` only if some rule fails.
    pub fn fails_with<F>(&self, callback: F) -> RuleResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.check_async(|| {}, callback)
    }

    /// Runs every rule and resolves to true if none failed.
    ///
    /// # Errors
    ///
    /// [`RuleError::Abandoned`] if an asynchronous rule dropped its
    /// completion handle without resolving it.
    pub async fn passes_async(&self) -> RuleResult<bool> {
        let (tx, rx) = oneshot::channel();
        let on_pass = Arc::new(Mutex::new(Some(tx)));
        let on_fail = Arc::clone(&on_pass);
        self.check_async(
            move || settle(&on_pass, true),
            move || settle(&on_fail, false),
        )?;
        rx.await.map_err(|_| RuleError::Abandoned)
    }

    /// Runs every rule and resolves to true if any failed.
    pub async fn fails_async(&self) -> RuleResult<bool> {
        self.passes_async().await.map(|passed| !passed)
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn plan(&self) -> RuleResult<Plan<'_>> {
        let registry = self.context.registry();
        let steps = self
            .rules
            .directives()
            .map(|(attribute, directive)| {
                Ok(Step {
                    attribute,
                    directive,
                    predicate: registry.make(directive.name())?,
                    implicit: registry.is_implicit(directive.name()),
                    numeric: self.rules.has_rule(attribute, BuiltinRule::Numeric.name())
                        || self.rules.has_rule(attribute, BuiltinRule::Integer.name()),
                })
            })
            .collect::<RuleResult<Vec<_>>>()?;

        let required = BuiltinRule::Required.name();
        let presence = registry
            .make(required)
            .ok()
            .filter(|predicate| !predicate.is_async())
            .unwrap_or(Predicate::Builtin(BuiltinRule::Required));
        drop(registry);

        Ok(Plan {
            has_async: steps.iter().any(|step| step.predicate.is_async()),
            steps,
            presence,
            trim: self.context.config().trim_strings_for_required,
        })
    }

    fn rule_input<'a>(&'a self, step: &Step<'a>, trim: bool) -> RuleInput<'a> {
        let value = self.input.get(step.attribute).unwrap_or(&NULL);
        let mut input = RuleInput::new(value, step.attribute, &self.input)
            .with_argument(step.directive.argument());
        input.numeric = step.numeric;
        input.trim = trim;
        input
    }
}
