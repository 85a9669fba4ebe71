//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email regex is valid")
});

/// Returns true when `email` looks like a deliverable address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Lowercases and trims an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
