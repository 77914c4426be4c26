//! Core data types of the engine
//!
//! - **Directives**: [`RuleDirective`], [`RuleSet`], and the raw forms
//!   [`RawRules`] / [`RuleSpec`] they are parsed from
//! - **Predicate input**: [`RuleInput`]
//! - **Results**: [`ErrorBag`]
//! - **Value helpers**: presence, size and text readings of JSON values

pub mod bag;
pub mod directive;
pub mod input;
pub mod value;

pub use bag::ErrorBag;
pub use directive::{RawRules, RuleDirective, RuleSet, RuleSpec};
pub use input::RuleInput;
pub use value::SizeKind;
