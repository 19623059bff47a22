//! Selection predicates.
//!
//! Matching is pure: each predicate looks at a path or a key and nothing else.
//! The orchestrator evaluates them in priority order (path, key, auto-detect)
//! and stops at the first hit.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::document::Key;

/// Key names treated as sensitive when auto-detection is enabled.
///
/// Comparison is whole-key and ASCII case-insensitive.
pub const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "token",
    "access_token",
    "refresh_token",
    "secret",
    "apiKey",
    "jwt",
    "ssn",
    "creditCard",
    "email",
];

/// Returns `true` if `path` satisfies the dot-notation `pattern`.
///
/// A `*` segment matches exactly one path segment. Wildcards never span a
/// variable number of segments and never match part of a segment.
pub fn path_matches(path: &str, pattern: &str) -> bool {
    if path == pattern {
        return true;
    }
    if !pattern.contains('*') {
        return false;
    }

    let mut path_segments = path.split('.');
    let mut pattern_segments = pattern.split('.');
    loop {
        match (path_segments.next(), pattern_segments.next()) {
            (None, None) => return true,
            (Some(_), Some("*")) => {}
            (Some(segment), Some(expected)) if segment == expected => {}
            _ => return false,
        }
    }
}

/// A rule tested against bare key names anywhere in the tree.
#[derive(Clone, Debug)]
pub enum KeyMatcher {
    /// Matches a key equal to the string.
    Literal(String),
    /// Matches a key the regular expression finds a match in. Anchoring and
    /// case sensitivity are up to the pattern, e.g. `(?i)^token$`.
    Pattern(Regex),
}

impl KeyMatcher {
    pub fn literal(key: impl Into<String>) -> Self {
        KeyMatcher::Literal(key.into())
    }

    /// Compiles `pattern` into a [`KeyMatcher::Pattern`].
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(KeyMatcher::Pattern)
    }

    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyMatcher::Literal(literal) => literal == key,
            KeyMatcher::Pattern(regex) => regex.is_match(key),
        }
    }
}

impl From<&str> for KeyMatcher {
    fn from(key: &str) -> Self {
        KeyMatcher::literal(key)
    }
}

impl From<String> for KeyMatcher {
    fn from(key: String) -> Self {
        KeyMatcher::Literal(key)
    }
}

impl From<Regex> for KeyMatcher {
    fn from(regex: Regex) -> Self {
        KeyMatcher::Pattern(regex)
    }
}

/// Wire form: a plain string is a literal, `{"pattern": "..."}` is a regex.
#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum KeyMatcherRepr {
    Literal(String),
    Pattern { pattern: String },
}

impl<'de> Deserialize<'de> for KeyMatcher {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match KeyMatcherRepr::deserialize(deserializer)? {
            KeyMatcherRepr::Literal(literal) => Ok(KeyMatcher::Literal(literal)),
            KeyMatcherRepr::Pattern { pattern } => {
                KeyMatcher::pattern(&pattern).map_err(serde::de::Error::custom)
            }
        }
    }
}

impl Serialize for KeyMatcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self {
            KeyMatcher::Literal(literal) => KeyMatcherRepr::Literal(literal.clone()),
            KeyMatcher::Pattern(regex) => KeyMatcherRepr::Pattern {
                pattern: regex.as_str().to_string(),
            },
        };
        repr.serialize(serializer)
    }
}

/// Returns `true` if `key` is a field name accepted by any of `matchers`.
///
/// List indices never match.
pub fn key_matches(key: &Key, matchers: &[KeyMatcher]) -> bool {
    key.as_field()
        .is_some_and(|field| matchers.iter().any(|m| m.matches(field)))
}

/// Returns `true` if `key` is one of [`SENSITIVE_KEYS`], ignoring ASCII case.
pub fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS
        .iter()
        .any(|sensitive| sensitive.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::{is_sensitive_key, key_matches, path_matches, KeyMatcher};
    use crate::document::Key;

    #[test]
    fn exact_path_matches() {
        assert!(path_matches("user.profile.email", "user.profile.email"));
        assert!(!path_matches("user.profile.email", "user.profile"));
    }

    #[test]
    fn wildcard_matches_one_segment() {
        assert!(path_matches("users.0.ssn", "users.*.ssn"));
        assert!(path_matches("users.17.ssn", "users.*.ssn"));
        assert!(path_matches("a.b", "*.*"));
        assert!(!path_matches("users.0.ssn", "users.*.name"));
    }

    #[test]
    fn wildcard_segment_count_must_match() {
        assert!(!path_matches("users.0.profile.ssn", "users.*.ssn"));
        assert!(!path_matches("users.ssn", "users.*.ssn"));
        assert!(!path_matches("a", "*.*"));
    }

    #[test]
    fn partial_segment_wildcards_are_literal() {
        assert!(!path_matches("user", "use*"));
        assert!(path_matches("use*", "use*"));
    }

    #[test]
    fn literal_and_pattern_keys() {
        let matchers = vec![
            KeyMatcher::pattern("(?i)key").unwrap(),
            KeyMatcher::literal("access_token"),
        ];
        assert!(key_matches(&Key::from("apiKey"), &matchers));
        assert!(key_matches(&Key::from("KEYRING"), &matchers));
        assert!(key_matches(&Key::from("access_token"), &matchers));
        assert!(!key_matches(&Key::from("refresh_token"), &matchers));
    }

    #[test]
    fn pattern_case_sensitivity_comes_from_pattern() {
        let matchers = vec![KeyMatcher::pattern("key").unwrap()];
        assert!(!key_matches(&Key::from("apiKey"), &matchers));
        assert!(key_matches(&Key::from("monkey"), &matchers));
    }

    #[test]
    fn index_keys_never_match() {
        let matchers = vec![KeyMatcher::literal("0"), KeyMatcher::pattern(".*").unwrap()];
        assert!(!key_matches(&Key::Index(0), &matchers));
    }

    #[test]
    fn empty_matchers_never_match() {
        assert!(!key_matches(&Key::from("password"), &[]));
    }

    #[test]
    fn sensitive_keys_are_whole_word_and_case_insensitive() {
        assert!(is_sensitive_key("password"));
        assert!(is_sensitive_key("PASSWORD"));
        assert!(is_sensitive_key("ApiKey"));
        assert!(is_sensitive_key("creditcard"));
        assert!(!is_sensitive_key("password_hint"));
        assert!(!is_sensitive_key("my_token"));
        assert!(!is_sensitive_key("public"));
    }

    #[test]
    fn key_matcher_deserializes_literal_and_pattern() {
        let matchers: Vec<KeyMatcher> =
            serde_json::from_str(r#"["session", {"pattern": "(?i)^auth"}]"#).unwrap();
        assert!(matches!(&matchers[0], KeyMatcher::Literal(s) if s == "session"));
        assert!(matchers[1].matches("Authorization"));
        assert!(!matchers[1].matches("preauth"));
    }

    #[test]
    fn key_matcher_rejects_bad_regex() {
        let result: Result<Vec<KeyMatcher>, _> = serde_json::from_str(r#"[{"pattern": "("}]"#);
        assert!(result.is_err());
    }
}
