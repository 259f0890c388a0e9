use regex::Regex;

use super::compile;
use crate::errors::Result;

/// Strip a cutset from both ends of matched string leaves before comparing
#[derive(Debug, Clone)]
pub struct TrimRule {
    pattern: Regex,
    cutset: String,
}

impl TrimRule {
    /// # Errors
    ///
    /// `InvalidPattern` when `pattern` does not compile.
    pub fn new(pattern: &str, cutset: impl Into<String>) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            cutset: cutset.into(),
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    pub fn cutset(&self) -> &str {
        &self.cutset
    }

    pub fn trim<'a>(&self, s: &'a str) -> &'a str {
        s.trim_matches(|c: char| self.cutset.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_cutset_both_ends() {
        let rule = TrimRule::new("Person.Name", " _").unwrap();
        assert_eq!(rule.trim("__ sjl _"), "sjl");
        assert_eq!(rule.trim("s j l"), "s j l");
    }

    #[test]
    fn test_empty_cutset_is_identity() {
        let rule = TrimRule::new("x", "").unwrap();
        assert_eq!(rule.trim("  x  "), "  x  ");
    }

    #[test]
    fn test_matches() {
        let rule = TrimRule::new(r"^Person\.Name$", " ").unwrap();
        assert!(rule.matches("Person.Name"));
        assert!(!rule.matches("Person.Names"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(TrimRule::new("[", " ").is_err());
    }
}
