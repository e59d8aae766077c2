//! Email address validation.
//!
//! Deliberately loose: something, an `@`, something, a dot, something, with
//! no whitespace and exactly one `@`. The provider does the real check.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && EMAIL.is_match(email)
}
