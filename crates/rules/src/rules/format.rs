//! Format rules

use crate::foundation::RuleInput;
use crate::foundation::value::as_text;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use moka::sync::Cache;
use regex::{Regex, RegexBuilder};
use std::net::IpAddr;
use std::sync::LazyLock;

const MAX_CACHED_PATTERNS: u64 = 256;

/// Compiled `regex` rule arguments, keyed by the raw argument. LRU-bounded.
static PATTERNS: LazyLock<Cache<String, Regex>> =
    LazyLock::new(|| Cache::builder().max_capacity(MAX_CACHED_PATTERNS).build());

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect(concat!("pattern ", $re, " is valid")));
    };
}

pattern!(EMAIL, r"^[^\s@]+@[^\s@]+\.[^\s@]+$");
pattern!(
    URL,
    r"^(?i)(https?|ftp)://(-\.)?([^\s/?\.#]+\.?)+(/[^\s]*)?$"
);
pattern!(ALPHA, r"^[a-zA-Z]+$");
pattern!(ALPHA_DASH, r"^[a-zA-Z0-9_\-]+$");
pattern!(ALPHA_NUM, r"^[a-zA-Z0-9]+$");

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses the date and date-time shapes accepted by `date`, `after` and
/// `before`. Zoned timestamps are normalized to UTC.
pub(super) fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return Some(zoned.naive_utc());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn matches(input: &RuleInput<'_>, pattern: &Regex) -> bool {
    as_text(input.value).is_some_and(|text| pattern.is_match(&text))
}

pub(super) fn email(input: &RuleInput<'_>) -> bool {
    matches(input, &EMAIL)
}

pub(super) fn url(input: &RuleInput<'_>) -> bool {
    matches(input, &URL)
}

pub(super) fn alpha(input: &RuleInput<'_>) -> bool {
    matches(input, &ALPHA)
}

pub(super) fn alpha_dash(input: &RuleInput<'_>) -> bool {
    matches(input, &ALPHA_DASH)
}

pub(super) fn alpha_num(input: &RuleInput<'_>) -> bool {
    matches(input, &ALPHA_NUM)
}

/// Compiles `pattern` or `/pattern/flags`. Supported flags: `i`, `m`, `s`, `x`.
fn compile(raw: &str) -> Result<Regex, regex::Error> {
    let (source, flags) = match raw.strip_prefix('/').and_then(|rest| rest.rsplit_once('/')) {
        Some((source, flags)) if flags.chars().all(|c| "imsx".contains(c)) => (source, flags),
        _ => (raw, ""),
    };
    RegexBuilder::new(source)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .ignore_whitespace(flags.contains('x'))
        .build()
}

fn cached(raw: &str) -> Result<Regex, regex::Error> {
    if let Some(pattern) = PATTERNS.get(raw) {
        return Ok(pattern);
    }
    let pattern = compile(raw)?;
    PATTERNS.insert(raw.to_owned(), pattern.clone());
    Ok(pattern)
}

pub(super) fn regex(input: &RuleInput<'_>) -> bool {
    let Some(raw) = input.argument else {
        tracing::warn!(attribute = input.attribute, "regex rule has no pattern");
        return false;
    };
    match cached(raw) {
        Ok(pattern) => matches(input, &pattern),
        Err(err) => {
            tracing::warn!(
                attribute = input.attribute,
                pattern = raw,
                error = %err,
                "regex rule pattern does not compile"
            );
            false
        }
    }
}

pub(super) fn date(input: &RuleInput<'_>) -> bool {
    input.value.as_str().and_then(parse_date).is_some()
}

pub(super) fn ip(input: &RuleInput<'_>) -> bool {
    input
        .value
        .as_str()
        .is_some_and(|raw| raw.trim().parse::<IpAddr>().is_ok())
}
