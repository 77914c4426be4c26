//! Process-wide registration. Kept to a single test so nothing else in this
//! binary observes the global context mid-change.

use nebula_rules::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[test]
fn global_registration_lifecycle() {
    nebula_rules::reset();

    nebula_rules::register(
        "slug",
        |input| {
            input
                .value
                .as_str()
                .is_some_and(|s| s.bytes().all(|b| b.is_ascii_lowercase() || b == b'-'))
        },
        "The :attribute must be a slug.",
    );
    let validator = Validator::new(
        json!({"path": "Hello World"}),
        RawRules::new().rule("path", "required|slug"),
    )
    .unwrap();
    assert!(validator.fails().unwrap());
    assert_eq!(validator.errors().first("path"), Some("The path must be a slug."));

    // Implicit rules see absent values.
    nebula_rules::register_implicit(
        "present",
        |input| !input.value.is_null(),
        "The :attribute key must be sent.",
    );
    let validator = Validator::new(json!({}), RawRules::new().rule("flag", "present")).unwrap();
    assert!(validator.fails().unwrap());
    assert_eq!(validator.errors().first("flag"), Some("The flag key must be sent."));

    // Messages land in whatever language is the default at registration time.
    nebula_rules::set_default_language("de");
    nebula_rules::register_async(
        "taken",
        |_, done| done.fail(),
        "Der Wert :attribute ist vergeben.",
    );
    let validator = Validator::with_messages(
        json!({"user": "ann"}),
        RawRules::new().rule("user", "taken"),
        [("taken.other", "unused")],
    )
    .unwrap();
    let failed = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&failed);
    validator
        .fails_with(move || seen.store(true, Ordering::SeqCst))
        .unwrap();
    assert!(failed.load(Ordering::SeqCst));
    assert_eq!(validator.errors().first("user"), Some("Der Wert user ist vergeben."));

    nebula_rules::reset();
    assert_eq!(RuleContext::global().default_language(), "en");
    let err = Validator::new(json!({}), RawRules::new().rule("path", "slug")).unwrap_err();
    assert_eq!(err, RuleError::unknown_rule("slug"));
}
