//! Shared engine state: registry, message store and configuration
//!
//! Validators hold an `Arc<RuleContext>` and look rules and templates up
//! live on every run. Most applications use [`RuleContext::global`]; tests
//! and embedders that need isolation build their own context.

use crate::config::RulesConfig;
use crate::foundation::RuleInput;
use crate::messages::LanguageStore;
use crate::registry::Registry;
use crate::run::Completion;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::{Arc, LazyLock};

static GLOBAL: LazyLock<Arc<RuleContext>> = LazyLock::new(|| Arc::new(RuleContext::new()));

/// Rule registry, message store and configuration shared by validators.
#[derive(Debug, Default)]
pub struct RuleContext {
    registry: RwLock<Registry>,
    languages: RwLock<LanguageStore>,
    config: RwLock<RulesConfig>,
}

impl RuleContext {
    /// Creates a context with the built-in rules and English messages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with the given configuration.
    #[must_use]
    pub fn with_config(config: RulesConfig) -> Self {
        let mut languages = LanguageStore::new();
        languages.set_default(config.language.clone());
        Self {
            registry: RwLock::new(Registry::new()),
            languages: RwLock::new(languages),
            config: RwLock::new(config),
        }
    }

    /// The process-wide context used by [`Validator::new`](crate::Validator::new).
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Registers a synchronous rule and its message in the default language.
    pub fn register<F>(&self, name: impl Into<String>, rule: F, message: impl Into<String>)
    where
        F: Fn(&RuleInput<'_>) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        self.languages.write().set_rule_message(&name, message);
        self.registry.write().register(name, rule);
    }

    /// Registers a synchronous rule that also runs on absent values.
    pub fn register_implicit<F>(&self, name: impl Into<String>, rule: F, message: impl Into<String>)
    where
        F: Fn(&RuleInput<'_>) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        self.languages.write().set_rule_message(&name, message);
        self.registry.write().register_implicit(name, rule);
    }

    /// Registers an asynchronous rule and its message in the default language.
    pub fn register_async<F>(&self, name: impl Into<String>, rule: F, message: impl Into<String>)
    where
        F: Fn(&RuleInput<'_>, Completion) + Send + Sync + 'static,
    {
        let name = name.into();
        self.languages.write().set_rule_message(&name, message);
        self.registry.write().register_async(name, rule);
    }

    /// Registers an asynchronous rule that also runs on absent values.
    pub fn register_async_implicit<F>(
        &self,
        name: impl Into<String>,
        rule: F,
        message: impl Into<String>,
    ) where
        F: Fn(&RuleInput<'_>, Completion) + Send + Sync + 'static,
    {
        let name = name.into();
        self.languages.write().set_rule_message(&name, message);
        self.registry.write().register_async_implicit(name, rule);
    }

    /// Switches the language used for new messages and registrations.
    pub fn set_default_language(&self, language: impl Into<String>) {
        let language = language.into();
        self.languages.write().set_default(language.clone());
        self.config.write().language = language;
    }

    /// The current default language.
    #[must_use]
    pub fn default_language(&self) -> String {
        self.languages.read().default_language().to_owned()
    }

    /// Loads translated templates for `language`.
    pub fn add_language<K, T>(
        &self,
        language: impl Into<String>,
        templates: impl IntoIterator<Item = (K, T)>,
    ) where
        K: Into<String>,
        T: Into<String>,
    {
        self.languages.write().extend(language, templates);
    }

    /// A snapshot of the configuration.
    #[must_use]
    pub fn config(&self) -> RulesConfig {
        self.config.read().clone()
    }

    /// Replaces the configuration, switching the default language with it.
    pub fn set_config(&self, config: RulesConfig) {
        self.languages.write().set_default(config.language.clone());
        *self.config.write() = config;
    }

    /// Read access to the registry.
    pub fn registry(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read()
    }

    /// Write access to the registry, for removing or replacing rules.
    pub fn registry_mut(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write()
    }

    /// Read access to the message store.
    pub fn languages(&self) -> RwLockReadGuard<'_, LanguageStore> {
        self.languages.read()
    }

    /// Restores built-in rules, bundled messages and default configuration.
    pub fn reset(&self) {
        *self.registry.write() = Registry::new();
        *self.languages.write() = LanguageStore::new();
        *self.config.write() = RulesConfig::default();
        tracing::debug!("rule context reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_installs_message_in_default_language() {
        let context = RuleContext::new();
        context.set_default_language("fr");
        context.register("even", |_| true, "Le champ :attribute doit être pair.");

        let languages = context.languages();
        assert_eq!(
            languages.template("fr", "even"),
            Some("Le champ :attribute doit être pair.")
        );
        assert_eq!(languages.template("en", "even"), None);
        drop(languages);
        assert!(context.registry().contains("even"));
        assert_eq!(context.config().language, "fr");
    }

    #[test]
    fn reset_forgets_registrations() {
        let context = RuleContext::new();
        context.register_async("unique", |_, done| done.pass(), "taken");
        context.set_default_language("de");
        context.reset();

        assert!(!context.registry().contains("unique"));
        assert_eq!(context.default_language(), "en");
        assert_eq!(context.config(), RulesConfig::default());
    }

    #[test]
    fn config_language_becomes_default() {
        let context = RuleContext::with_config(RulesConfig::new().with_language("es"));
        assert_eq!(context.default_language(), "es");
    }
}
