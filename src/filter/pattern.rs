//! Name pattern matching

use glob::{MatchOptions, Pattern};

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Match a name against a pattern.
///
/// A pattern matches when either the glob form (`*`, `?`, `[...]`) matches the
/// whole name, or the pattern occurs anywhere in the name ignoring case.
/// Patterns that are not valid globs can still match as substrings.
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    glob_match(pattern, name) || name.to_lowercase().contains(&pattern.to_lowercase())
}

/// Match a glob pattern against a whole name.
pub fn glob_match(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches_with(name, GLOB_OPTIONS))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match() {
        assert!(glob_match("*.rs", "main.rs"));
        assert!(!glob_match("*.rs", "main.py"));
        assert!(glob_match("test*", "test_foo"));
        assert!(!glob_match("test*", "foo_test"));

        // Single character wildcard
        assert!(glob_match("test?.rs", "test1.rs"));
        assert!(!glob_match("test?.rs", "test12.rs"));

        // Character classes
        assert!(glob_match("[abc].txt", "a.txt"));
        assert!(!glob_match("[abc].txt", "d.txt"));

        // Extensions compare without regard to case
        assert!(glob_match("*.tmp", "report.TMP"));

        // Invalid globs never match as globs
        assert!(!glob_match("[", "["));
    }

    #[test]
    fn test_glob_half_of_union() {
        // "*.tmp" is not a substring of the name, so only the glob can match
        assert!(matches_pattern("report.TMP", "*.tmp"));
        assert!(matches_pattern("core_utils", "core*"));
    }

    #[test]
    fn test_substring_half_of_union() {
        // "report" is not a glob match for "myreport", only a substring
        assert!(!glob_match("report", "myreport"));
        assert!(matches_pattern("myreport", "report"));
        assert!(matches_pattern("MyReport.txt", "REPORT"));
        assert!(matches_pattern("a[b", "["));
    }

    #[test]
    fn test_no_match() {
        assert!(!matches_pattern("abc", "xyz"));
        assert!(!matches_pattern("helpers", "core*"));
    }
}
