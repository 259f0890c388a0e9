use std::any::{type_name, Any};
use std::fmt::Display;

use regex::Regex;
use thiserror::Error;

use super::compile;
use crate::errors::Result;

/// Outcome of a custom comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Operands are equal; nothing is recorded
    NoDiff,
    /// Record both operands' lengths under `<path>[Length]`
    LengthDiff,
    /// Record presence markers for both operands
    NilDiff,
    /// Record the supplied values as they are
    ElemDiff { a: String, b: String },
}

impl Verdict {
    /// `ElemDiff` from any two displayable values
    pub fn elem(a: impl Display, b: impl Display) -> Self {
        Verdict::ElemDiff {
            a: a.to_string(),
            b: b.to_string(),
        }
    }
}

/// A comparator that could not produce a verdict
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ComparatorFault(pub String);

impl ComparatorFault {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Takes over comparison of every subtree whose path it matches.
///
/// Once a comparator matches, the engine does not descend into the subtree;
/// the verdict alone decides what is recorded. Operands are the values at the
/// matched path, type-erased.
pub trait Comparator {
    fn matches(&self, path: &str) -> bool;

    /// # Errors
    ///
    /// A `ComparatorFault` aborts the comparison.
    fn equals(&self, a: &dyn Any, b: &dyn Any) -> std::result::Result<Verdict, ComparatorFault>;
}

/// Typed comparator over values of type `T`, selected by a path pattern
pub struct PathComparator<T> {
    pattern: Regex,
    equals: Box<dyn Fn(&T, &T) -> Verdict>,
}

impl<T: Any> PathComparator<T> {
    /// # Errors
    ///
    /// `InvalidPattern` when `pattern` does not compile.
    pub fn new(pattern: &str, equals: impl Fn(&T, &T) -> Verdict + 'static) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            equals: Box::new(equals),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl<T> std::fmt::Debug for PathComparator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathComparator")
            .field("pattern", &self.pattern.as_str())
            .field("operand", &type_name::<T>())
            .finish()
    }
}

impl<T: Any> Comparator for PathComparator<T> {
    fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    fn equals(&self, a: &dyn Any, b: &dyn Any) -> std::result::Result<Verdict, ComparatorFault> {
        match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
            (Some(a), Some(b)) => Ok((self.equals)(a, b)),
            _ => Err(ComparatorFault::new(format!(
                "expected operands of type {}",
                type_name::<T>()
            ))),
        }
    }
}
