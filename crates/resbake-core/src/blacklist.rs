//! Entry exclusion rules.
//!
//! A [`Blacklist`] is an ordered list of regular expressions checked against
//! each entry's file name. Matching is unanchored: a rule excludes an entry
//! when it matches anywhere in the name, so `logo_square` also excludes
//! `logo_square_64.png`. Anchor a rule with `^`/`$` when that is not wanted.

use crate::error::{Error, Result};
use regex::Regex;

/// Patterns excluded by default: editor sources, vector originals that get
/// rasterized before the run, and installer-only artwork.
pub const DEFAULT_BLACKLIST: &[&str] = &[
    ".*drawio",
    ".*svg",
    r"logo_fit\.png",
    "logo_fit_314x163",
    "logo_fit_highres",
    "logo_icon_uninstall",
    "logo_square",
];

/// Ordered set of exclusion rules, fixed for the duration of a run
#[derive(Debug, Clone)]
pub struct Blacklist {
    rules: Vec<Regex>,
}

impl Default for Blacklist {
    fn default() -> Self {
        Self::from_patterns(DEFAULT_BLACKLIST.iter().copied())
            .expect("built-in blacklist patterns are valid")
    }
}

impl Blacklist {
    /// Creates a blacklist with no rules; nothing is excluded
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Compiles the given patterns in order
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .map(|p| {
                let pattern = p.as_ref();
                Regex::new(pattern).map_err(|source| Error::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Appends one more rule
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let rule = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.rules.push(rule);
        Ok(self)
    }

    /// Returns true if any rule matches somewhere in `name`
    pub fn is_excluded(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.is_match(name))
    }

    /// The source text of every rule, in order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(Regex::as_str)
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let blacklist = Blacklist::default();
        assert_eq!(blacklist.len(), DEFAULT_BLACKLIST.len());

        assert!(blacklist.is_excluded("diagram.drawio"));
        assert!(blacklist.is_excluded("open.svg"));
        assert!(blacklist.is_excluded("logo_fit.png"));
        assert!(blacklist.is_excluded("logo_square"));

        assert!(!blacklist.is_excluded("open.png"));
        assert!(!blacklist.is_excluded("logo_fit_png"));
        assert!(!blacklist.is_excluded("icons"));
    }

    #[test]
    fn test_unanchored_match() {
        let blacklist = Blacklist::from_patterns(["square"]).unwrap();
        assert!(blacklist.is_excluded("logo_square_64.png"));
        assert!(blacklist.is_excluded("square"));
        assert!(!blacklist.is_excluded("squar"));
    }

    #[test]
    fn test_anchored_rule() {
        let blacklist = Blacklist::from_patterns(["^tmp$"]).unwrap();
        assert!(blacklist.is_excluded("tmp"));
        assert!(!blacklist.is_excluded("tmp2"));
    }

    #[test]
    fn test_empty_excludes_nothing() {
        let blacklist = Blacklist::empty();
        assert!(blacklist.is_empty());
        assert!(!blacklist.is_excluded("diagram.drawio"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Blacklist::from_patterns(["ok", "(unclosed"]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
        assert!(Blacklist::empty().with_pattern("[").is_err());
    }

    #[test]
    fn test_patterns_preserve_order() {
        let blacklist = Blacklist::empty()
            .with_pattern("b")
            .unwrap()
            .with_pattern("a")
            .unwrap();
        assert_eq!(blacklist.patterns().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
