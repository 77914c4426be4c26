//! Failure message rendering
//!
//! A validator owns a [`Messages`] value: its language, custom template
//! overrides, and attribute display names. Templates come from the shared
//! [`LanguageStore`].
//!
//! # Template lookup
//!
//! 1. custom `rule.attribute`
//! 2. custom `rule`
//! 3. language `rule.kind` for size-aware rules (`min.string`, ...)
//! 4. language `rule`
//! 5. steps 3 and 4 again in English, when the language is not English
//! 6. language `def`, then English `def`
//!
//! # Placeholders
//!
//! `:attribute` is the attribute's display name. Built-in rules fill their
//! named placeholders (`:min`, `:other`, `:values`, ...); every rule fills
//! positional `:0`, `:1`, ... from its arguments. Unknown placeholders are
//! left untouched.

pub mod lang;

pub use lang::LanguageStore;

use crate::config::DEFAULT_LANGUAGE;
use crate::foundation::{RuleDirective, SizeKind};
use crate::rules::{BuiltinRule, Placeholder};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Turns an attribute key into a display name when no explicit name is set.
pub type AttributeFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Default display name: `_` and `[` become spaces, `]` is dropped.
///
/// `"user_name"` becomes `"user name"`, `"items[0]"` becomes `"items 0"`.
#[must_use]
pub fn default_attribute_name(attribute: &str) -> String {
    attribute
        .chars()
        .filter(|c| *c != ']')
        .map(|c| if c == '_' || c == '[' { ' ' } else { c })
        .collect()
}

/// Per-validator message settings.
#[derive(Clone, Default)]
pub struct Messages {
    language: Option<String>,
    custom: HashMap<String, String>,
    attribute_names: HashMap<String, String>,
    formatter: Option<AttributeFormatter>,
}

impl fmt::Debug for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messages")
            .field("language", &self.language)
            .field("custom", &self.custom)
            .field("attribute_names", &self.attribute_names)
            .field("formatter", &self.formatter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Messages {
    /// Creates settings that follow the store's default language.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the language. `None` follows the store's default language.
    pub fn set_language(&mut self, language: Option<String>) {
        self.language = language;
    }

    /// The pinned language, if any.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Adds custom templates keyed by `rule` or `rule.attribute`.
    pub fn set_custom<K, V>(&mut self, overrides: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.custom
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Sets explicit display names for attributes.
    pub fn set_attribute_names<K, V>(&mut self, names: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attribute_names
            .extend(names.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Replaces the formatter used for attributes without an explicit name.
    pub fn set_formatter(&mut self, formatter: AttributeFormatter) {
        self.formatter = Some(formatter);
    }

    /// Display name of `attribute`.
    #[must_use]
    pub fn display_name(&self, attribute: &str) -> String {
        if let Some(name) = self.attribute_names.get(attribute) {
            return name.clone();
        }
        match &self.formatter {
            Some(formatter) => formatter(attribute),
            None => default_attribute_name(attribute),
        }
    }

    /// Picks the template for a failing directive.
    #[must_use]
    pub fn template<'a>(
        &'a self,
        store: &'a LanguageStore,
        directive: &RuleDirective,
        attribute: &str,
        kind: SizeKind,
    ) -> Cow<'a, str> {
        let rule = directive.name();
        if let Some(custom) = self
            .custom
            .get(&format!("{rule}.{attribute}"))
            .or_else(|| self.custom.get(rule))
        {
            return Cow::Borrowed(custom.as_str());
        }

        let language = self
            .language
            .as_deref()
            .unwrap_or_else(|| store.default_language());
        let languages = [
            Some(language),
            (language != DEFAULT_LANGUAGE).then_some(DEFAULT_LANGUAGE),
        ];
        let sized = BuiltinRule::from_name(rule)
            .filter(|builtin| builtin.is_size_aware())
            .and(kind.key())
            .map(|suffix| format!("{rule}.{suffix}"));

        languages
            .iter()
            .flatten()
            .find_map(|language| {
                sized
                    .as_deref()
                    .and_then(|key| store.template(language, key))
                    .or_else(|| store.template(language, rule))
            })
            .or_else(|| {
                languages
                    .iter()
                    .flatten()
                    .find_map(|language| store.template(language, lang::FALLBACK_KEY))
            })
            .map_or_else(
                || Cow::Owned(format!("The :attribute attribute has errors ({rule}).")),
                Cow::Borrowed,
            )
    }

    /// Renders the message for a failing directive.
    ///
    /// `template` replaces the looked-up template when a rule supplied its own.
    #[must_use]
    pub fn render(
        &self,
        store: &LanguageStore,
        directive: &RuleDirective,
        attribute: &str,
        kind: SizeKind,
        template: Option<&str>,
    ) -> String {
        let template = match template {
            Some(template) => Cow::Borrowed(template),
            None => self.template(store, directive, attribute, kind),
        };
        let display_name = self.display_name(attribute);
        substitute(&template, |placeholder| {
            self.placeholder(placeholder, directive, &display_name)
        })
    }

    fn placeholder(
        &self,
        name: &str,
        directive: &RuleDirective,
        display_name: &str,
    ) -> Option<String> {
        if name == "attribute" {
            return Some(display_name.to_owned());
        }
        let args = directive.args();
        if let Ok(index) = name.parse::<usize>() {
            return args.get(index).map(|arg| (*arg).to_owned());
        }
        let builtin = BuiltinRule::from_name(directive.name())?;
        let placeholder = builtin.placeholders().iter().find(|p| match p {
            Placeholder::Arg(key, _)
            | Placeholder::Attribute(key, _)
            | Placeholder::Args(key)
            | Placeholder::Attributes(key) => *key == name,
        })?;
        match *placeholder {
            Placeholder::Arg(_, index) => args.get(index).map(|arg| (*arg).to_owned()),
            Placeholder::Attribute(_, index) => args.get(index).map(|arg| self.display_name(arg)),
            Placeholder::Args(_) => Some(args.join(", ")),
            Placeholder::Attributes(_) => Some(
                args.iter()
                    .map(|arg| self.display_name(arg))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        }
    }
}

/// Replaces `:name` and `:0` style placeholders using `resolve`.
///
/// A placeholder is a `:` followed by an identifier or by digits. When
/// `resolve` returns `None` the text is kept as written.
pub fn substitute(template: &str, mut resolve: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(':') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let len = placeholder_len(after);
        if len == 0 {
            out.push(':');
            rest = after;
            continue;
        }
        let name = &after[..len];
        match resolve(name) {
            Some(value) => out.push_str(&value),
            None => {
                out.push(':');
                out.push_str(name);
            }
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    out
}

fn placeholder_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_digit() => bytes.iter().take_while(|b| b.is_ascii_digit()).count(),
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => bytes
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count(),
        _ => 0,
    }
}
