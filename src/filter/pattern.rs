//! Compiled pattern set.
//!
//! Patterns are unanchored searches: a pattern matches if it occurs anywhere
//! in the input. Matching runs over bytes so request bodies need not be UTF-8.

use regex::bytes::Regex;

use super::error::ConfigError;

/// Ordered, immutable set of compiled patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    regexes: Vec<Regex>,
}

impl PatternSet {
    /// Compile every pattern in order, stopping at the first failure.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let regexes = patterns
            .iter()
            .enumerate()
            .map(|(index, pattern)| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    index,
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { regexes })
    }

    pub fn is_empty(&self) -> bool {
        self.regexes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.regexes.len()
    }

    /// Index of the first pattern, in configuration order, found in `haystack`.
    pub fn first_match(&self, haystack: &[u8]) -> Option<usize> {
        self.regexes.iter().position(|re| re.is_match(haystack))
    }

    /// Source text of the pattern at `index`.
    pub fn source(&self, index: usize) -> Option<&str> {
        self.regexes.get(index).map(Regex::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_semantics() {
        let set = PatternSet::compile(&["sensitive"]).unwrap();
        assert_eq!(set.first_match(b"/sensitive-data"), Some(0));
        assert_eq!(set.first_match(b"/public-data"), None);
    }

    #[test]
    fn test_first_match_in_order() {
        let set = PatternSet::compile(&["b", "a"]).unwrap();
        assert_eq!(set.first_match(b"ab"), Some(0));
        assert_eq!(set.source(0), Some("b"));

        let set = PatternSet::compile(&["a", "b"]).unwrap();
        assert_eq!(set.first_match(b"ab"), Some(0));
        assert_eq!(set.first_match(b"b"), Some(1));
    }

    #[test]
    fn test_invalid_pattern_reports_index() {
        let err = PatternSet::compile(&["ok", "[", "(also bad"]).unwrap_err();
        match err {
            ConfigError::InvalidPattern { index, pattern, .. } => {
                assert_eq!(index, 1);
                assert_eq!(pattern, "[");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_utf8_haystack() {
        let set = PatternSet::compile(&["secret"]).unwrap();
        assert_eq!(set.first_match(b"\xff\xfesecret\x00"), Some(0));
    }

    #[test]
    fn test_empty_set() {
        let set = PatternSet::compile::<&str>(&[]).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.first_match(b"anything"), None);
    }
}
