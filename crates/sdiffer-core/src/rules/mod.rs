//! Path-matched policy: filters, trim rules, sort rules and custom comparators.
//!
//! Every rule pairs a compiled path pattern with behavior. Patterns follow
//! `regex` search semantics: a pattern matches when it occurs anywhere in the
//! path, so anchor with `^...$` for an exact field.

use regex::Regex;

use crate::errors::{DiffError, Result};

pub mod comparator;
pub mod filter;
pub mod sort;
pub mod trim;

pub use comparator::{Comparator, ComparatorFault, PathComparator, Verdict};
pub use filter::{FilterMode, PathFilter, PatternSet};
pub use sort::{quicksort, SortRule, Sorter};
pub use trim::TrimRule;

/// Compile a caller-supplied path pattern
pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| DiffError::invalid_pattern(pattern, &e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_reports_pattern() {
        let err = compile("Person.(").unwrap_err();
        assert_eq!(err.kind(), crate::errors::ExErrorKind::InvalidPattern);
        assert!(err.to_string().contains("Person.("));
    }

    #[test]
    fn test_patterns_are_unanchored() {
        let re = compile("Person.Name").unwrap();
        assert!(re.is_match("Person.Name"));
        assert!(re.is_match("Person.Parents[0].Person.Name"));
    }
}
