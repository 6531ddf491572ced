//! Shared input checks.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Returns true if the value has the shape `local@domain.tld`.
///
/// Deliverability is the server's business.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.io"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }
}
