//! Per-language message templates

use crate::config::DEFAULT_LANGUAGE;
use std::collections::HashMap;

/// Key of the template used when nothing more specific exists.
pub const FALLBACK_KEY: &str = "def";

/// Bundled English templates.
const EN: &[(&str, &str)] = &[
    ("accepted", "The :attribute must be accepted."),
    ("after", "The :attribute must be after :date."),
    ("alpha", "The :attribute field must contain only alphabetic characters."),
    (
        "alpha_dash",
        "The :attribute field may only contain alpha-numeric characters, as well as dashes and underscores.",
    ),
    ("alpha_num", "The :attribute field must be alphanumeric."),
    ("array", "The :attribute must be an array."),
    ("before", "The :attribute must be before :date."),
    ("between.numeric", "The :attribute field must be between :min and :max."),
    ("between.string", "The :attribute field must be between :min and :max characters."),
    ("between.array", "The :attribute must have between :min and :max items."),
    ("boolean", "The :attribute attribute must be true or false."),
    ("confirmed", "The :attribute confirmation does not match."),
    ("date", "The :attribute is not a valid date format."),
    (FALLBACK_KEY, "The :attribute attribute has errors."),
    ("different", "The :attribute and :other must be different."),
    ("digits", "The :attribute must be :digits digits."),
    ("digits_between", "The :attribute field must be between :min and :max digits."),
    ("email", "The :attribute format is invalid."),
    ("in", "The selected :attribute is invalid."),
    ("integer", "The :attribute must be an integer."),
    ("ip", "The :attribute must be a valid IP address."),
    ("max.numeric", "The :attribute may not be greater than :max."),
    ("max.string", "The :attribute may not be greater than :max characters."),
    ("max.array", "The :attribute may not have more than :max items."),
    ("min.numeric", "The :attribute must be at least :min."),
    ("min.string", "The :attribute must be at least :min characters."),
    ("min.array", "The :attribute must have at least :min items."),
    ("not_in", "The selected :attribute is invalid."),
    ("numeric", "The :attribute must be a number."),
    ("regex", "The :attribute format is invalid."),
    ("required", "The :attribute field is required."),
    ("required_if", "The :attribute field is required when :other is :value."),
    ("required_unless", "The :attribute field is required when :other is not :value."),
    ("required_with", "The :attribute field is required when :values is present."),
    ("required_without", "The :attribute field is required when :values is not present."),
    ("same", "The :attribute and :other fields must match."),
    ("size.numeric", "The :attribute must be :size."),
    ("size.string", "The :attribute must be :size characters."),
    ("size.array", "The :attribute must contain :size items."),
    ("string", "The :attribute must be a string."),
    ("url", "The :attribute format is invalid."),
];

/// Message templates for every loaded language, plus the default language.
#[derive(Debug, Clone)]
pub struct LanguageStore {
    languages: HashMap<String, HashMap<String, String>>,
    default: String,
}

impl Default for LanguageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageStore {
    /// Creates a store with the bundled English templates.
    #[must_use]
    pub fn new() -> Self {
        let english = EN
            .iter()
            .map(|(key, template)| ((*key).to_owned(), (*template).to_owned()))
            .collect();
        Self {
            languages: HashMap::from([(DEFAULT_LANGUAGE.to_owned(), english)]),
            default: DEFAULT_LANGUAGE.to_owned(),
        }
    }

    /// The language used by new validators and by rule registration.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default
    }

    /// Switches the default language. Unknown languages start empty and
    /// fall back to English.
    pub fn set_default(&mut self, language: impl Into<String>) {
        let language = language.into();
        tracing::debug!(language = %language, "default message language changed");
        self.languages.entry(language.clone()).or_default();
        self.default = language;
    }

    /// Adds or replaces one template.
    pub fn insert(
        &mut self,
        language: impl Into<String>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) {
        self.languages
            .entry(language.into())
            .or_default()
            .insert(key.into(), template.into());
    }

    /// Installs a registered rule's message in the default language.
    ///
    /// Kind-specific variants (`name.string`, ...) of the same rule are
    /// removed so the new message is the one rendered.
    pub fn set_rule_message(&mut self, rule: &str, message: impl Into<String>) {
        let templates = self.languages.entry(self.default.clone()).or_default();
        templates.retain(|key, _| {
            key.strip_prefix(rule)
                .and_then(|rest| rest.strip_prefix('.'))
                .is_none()
        });
        templates.insert(rule.to_owned(), message.into());
    }

    /// Loads a batch of templates for `language`.
    pub fn extend<K, T>(
        &mut self,
        language: impl Into<String>,
        templates: impl IntoIterator<Item = (K, T)>,
    ) where
        K: Into<String>,
        T: Into<String>,
    {
        self.languages
            .entry(language.into())
            .or_default()
            .extend(templates.into_iter().map(|(k, t)| (k.into(), t.into())));
    }

    /// Returns true if templates were ever loaded for `language`.
    #[must_use]
    pub fn has_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// Looks up `key` in `language` only.
    #[must_use]
    pub fn template(&self, language: &str, key: &str) -> Option<&str> {
        self.languages
            .get(language)
            .and_then(|templates| templates.get(key))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::BuiltinRule;

    #[test]
    fn english_covers_every_builtin() {
        let store = LanguageStore::new();
        for rule in BuiltinRule::ALL {
            let covered = if rule.is_size_aware() {
                ["numeric", "string", "array"]
                    .iter()
                    .all(|kind| store.template("en", &format!("{}.{kind}", rule.name())).is_some())
            } else {
                store.template("en", rule.name()).is_some()
            };
            assert!(covered, "missing template for `{}`", rule.name());
        }
    }

    #[test]
    fn lookups_stay_in_one_language() {
        let mut store = LanguageStore::new();
        store.insert("ru", "required", "Поле :attribute обязательно.");
        assert_eq!(store.template("ru", "required"), Some("Поле :attribute обязательно."));
        assert_eq!(store.template("ru", "email"), None);
    }

    #[test]
    fn rule_messages_target_current_language() {
        let mut store = LanguageStore::new();
        store.set_default("de");
        store.set_rule_message("unique", "Der Wert :attribute ist vergeben.");
        assert_eq!(store.default_language(), "de");
        assert!(store.has_language("de"));
        assert_eq!(store.template("de", "unique"), Some("Der Wert :attribute ist vergeben."));
        assert_eq!(store.template("en", "unique"), None);
    }

    #[test]
    fn rule_message_replaces_kind_variants() {
        let mut store = LanguageStore::new();
        store.set_rule_message("min", "Too short.");
        assert_eq!(store.template("en", "min"), Some("Too short."));
        assert_eq!(store.template("en", "min.string"), None);
        assert!(store.template("en", "minute").is_none());
        assert!(store.template("en", "max.string").is_some());
    }
}
