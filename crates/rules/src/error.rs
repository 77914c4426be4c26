//! Error types for structural misuse of the engine.
//!
//! A rule that *fails* is not an error: failures are data, collected into an
//! [`ErrorBag`](crate::ErrorBag). `RuleError` covers the cases where the
//! engine cannot run at all.

/// Error type for rule resolution and engine usage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// A directive names a rule that is not registered.
    #[error("unknown validation rule `{name}`")]
    UnknownRule { name: String },

    /// A synchronous entry point was used while asynchronous rules are present.
    #[error("invalid usage: {reason}")]
    InvalidUsage { reason: String },

    /// The input or the raw rule specification has the wrong shape.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// An asynchronous run was dropped before it reached a verdict.
    #[error("asynchronous validation run was abandoned before completion")]
    Abandoned,
}

impl RuleError {
    /// Creates an [`UnknownRule`](Self::UnknownRule) error.
    pub fn unknown_rule(name: impl Into<String>) -> Self {
        Self::UnknownRule { name: name.into() }
    }

    /// Creates an [`InvalidUsage`](Self::InvalidUsage) error.
    pub fn invalid_usage(reason: impl Into<String>) -> Self {
        Self::InvalidUsage {
            reason: reason.into(),
        }
    }

    /// Creates an [`InvalidInput`](Self::InvalidInput) error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownRule { .. } => "RULES_UNKNOWN_RULE",
            Self::InvalidUsage { .. } => "RULES_INVALID_USAGE",
            Self::InvalidInput { .. } => "RULES_INVALID_INPUT",
            Self::Abandoned => "RULES_ABANDONED",
        }
    }
}

/// Result alias used throughout the crate.
pub type RuleResult<T> = Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_rule_display_names_the_rule() {
        let err = RuleError::unknown_rule("betwen");
        assert_eq!(err.to_string(), "unknown validation rule `betwen`");
        assert_eq!(err.code(), "RULES_UNKNOWN_RULE");
    }

    #[test]
    fn codes_are_distinct() {
        let codes = [
            RuleError::unknown_rule("x").code(),
            RuleError::invalid_usage("x").code(),
            RuleError::invalid_input("x").code(),
            RuleError::Abandoned.code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
