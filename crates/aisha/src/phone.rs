//! Phone number canonicalization and intake validation.
//!
//! Numbers are canonicalized to `+<countrycode><subscriber>`, with local
//! Kenyan numbers (`07...`) mapped onto the `+254` country code.

use std::sync::LazyLock;

use regex::Regex;

const KENYA_PREFIX: &str = "+254";

static KENYAN_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:254|\+254|0)[0-9]{9}$").expect("valid phone regex"));

static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s-]{2,50}$").expect("valid username regex"));

/// Canonicalize `raw` into `+<countrycode><subscriber>` form.
///
/// Only the prefix is rewritten; length and country code are not checked.
/// Input without any digits yields `"+"`.
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if let Some(rest) = cleaned.strip_prefix('0') {
        format!("{KENYA_PREFIX}{rest}")
    } else if cleaned.starts_with("254") || !cleaned.starts_with('+') {
        format!("+{cleaned}")
    } else {
        cleaned
    }
}

/// Accepts `254XXXXXXXXX`, `+254XXXXXXXXX` or `0XXXXXXXXX`.
pub fn is_valid_kenyan_phone(value: &str) -> bool {
    KENYAN_PHONE.is_match(value)
}

/// Letters, spaces and hyphens only, 2 to 50 characters.
pub fn is_valid_username(value: &str) -> bool {
    USERNAME.is_match(value)
}
