//! Detection of attribute values that must never be sent for translation

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Values shorter than this many characters are left alone
const MIN_TRANSLATABLE_CHARS: usize = 3;

/// Schemes whose URLs carry no host
const HOSTLESS_SCHEMES: &[&str] = &["mailto", "news", "file"];

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?\s*$").expect("valid numeric regex")
});

/// True when `value` is an absolute URL, a numeric literal or too short to
/// carry meaning
///
/// ```
/// use blockdoc_mt::is_non_translatable;
///
/// assert!(is_non_translatable("https://example.com/a"));
/// assert!(is_non_translatable("42"));
/// assert!(is_non_translatable("ok"));
/// assert!(!is_non_translatable("Hallo Welt"));
/// ```
pub fn is_non_translatable(value: &str) -> bool {
    is_absolute_url(value) || value.chars().count() < MIN_TRANSLATABLE_CHARS || is_numeric(value)
}

fn is_absolute_url(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    match Url::parse(value) {
        Ok(url) => url.has_host() || HOSTLESS_SCHEMES.contains(&url.scheme()),
        Err(_) => false,
    }
}

fn is_numeric(value: &str) -> bool {
    NUMERIC.is_match(value)
}
