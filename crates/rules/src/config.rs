//! Engine configuration

use crate::error::{RuleError, RuleResult};
use serde::{Deserialize, Serialize};

/// Default language code for bundled messages.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Configuration shared by every validator built from one
/// [`RuleContext`](crate::RuleContext).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Language used for messages of newly created validators and for
    /// templates installed by `register`.
    pub language: String,
    /// Whether the built-in `required` rule treats whitespace-only strings
    /// as absent.
    pub trim_strings_for_required: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_owned(),
            trim_strings_for_required: true,
        }
    }
}

impl RulesConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from JSON; missing keys take their defaults.
    pub fn from_json(raw: &str) -> RuleResult<Self> {
        serde_json::from_str(raw)
            .map_err(|err| RuleError::invalid_input(format!("invalid rules config: {err}")))
    }

    /// Sets the language.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets whether `required` trims strings.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_trim_strings_for_required(mut self, trim: bool) -> Self {
        self.trim_strings_for_required = trim;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = RulesConfig::from_json(r#"{"language": "ru"}"#).unwrap();
        assert_eq!(config.language, "ru");
        assert!(config.trim_strings_for_required);
    }

    #[test]
    fn rejects_wrong_types() {
        let err = RulesConfig::from_json(r#"{"trim_strings_for_required": "yes"}"#).unwrap_err();
        assert_eq!(err.code(), "RULES_INVALID_INPUT");
    }
}
