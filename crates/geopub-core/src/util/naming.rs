//! Naming rules for workspaces and publications.
//!
//! ## Summary
//! Workspace and publication names double as URL path segments and as schema
//! or layer names in the backing geospatial services, so they are restricted
//! to lowercase snake-case identifiers.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::constants::WORKSPACE_NAME_PATTERN;

static WORKSPACE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::unwrap_used)]
    Regex::new(WORKSPACE_NAME_PATTERN).unwrap()
});

/// Check whether a proposed workspace name is acceptable.
///
/// Publication names follow the same rule, so this doubles as the
/// publication-name check.
#[must_use]
pub fn is_valid_workspace_name(name: &str) -> bool {
    WORKSPACE_NAME_RE.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert!(is_valid_workspace_name("alice"));
    }

    #[test]
    fn test_snake_case() {
        assert!(is_valid_workspace_name("city_plans_2026"));
    }

    #[test]
    fn test_leading_digit_rejected() {
        assert!(!is_valid_workspace_name("2026_plans"));
    }

    #[test]
    fn test_uppercase_rejected() {
        assert!(!is_valid_workspace_name("Alice"));
    }

    #[test]
    fn test_double_underscore_rejected() {
        assert!(!is_valid_workspace_name("a__b"));
    }

    #[test]
    fn test_trailing_underscore_rejected() {
        assert!(!is_valid_workspace_name("alice_"));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(!is_valid_workspace_name(""));
    }
}
