//! Prelude module for convenient imports.
//!
//! ```rust
//! use nebula_rules::prelude::*;
//! ```

pub use crate::config::RulesConfig;
pub use crate::context::RuleContext;
pub use crate::error::{RuleError, RuleResult};
pub use crate::foundation::{ErrorBag, RawRules, RuleInput, RuleSpec};
pub use crate::run::Completion;
pub use crate::validator::Validator;
