//! sdiffer Core - structural comparison engine
//!
//! Walks two values of the same shape in lock-step and reports every
//! field-level divergence, addressed by a dotted/indexed path such as
//! `Person.Parents[0].Name`.
//!
//! This crate provides:
//! - A kind-tagged value-representation layer (`reflect`) with std impls
//!   and declarative macros for user structs
//! - The `Differ` engine: depth-limited recursion, include/exclude filters,
//!   custom comparators, trim rules and sort normalization
//! - The diff store with exact and pattern-based lookup
//! - Template-based rendering of the accumulated report
//! - YAML profiles for declarative configuration
//!
//! # Example
//!
//! ```
//! use sdiffer_core::{diffable_struct, Differ};
//!
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//! diffable_struct!(Person { name as "Name", age as "Age" });
//!
//! let a = Person { name: "sjl".into(), age: 20 };
//! let b = Person { name: "kxc".into(), age: 20 };
//!
//! let mut differ = Differ::new();
//! differ.compare(&a, &b)?;
//! assert_eq!(differ.diffs().len(), 1);
//! assert!(differ.find_diff("Person.Name").is_some());
//! # Ok::<(), sdiffer_core::DiffError>(())
//! ```

pub mod diff;
pub mod engine;
pub mod errors;
pub mod logging_facility;
pub mod path;
pub mod profile;
pub mod reflect;
pub mod rules;

mod normalize;

#[doc(hidden)]
pub use sdiffer_core_types as core_types;

// Re-export commonly used types
pub use diff::{Diff, DiffStore, DiffValue, Presence, Template};
pub use engine::{Differ, DEFAULT_MAX_DEPTH};
pub use errors::{DiffError, ExError, ExErrorKind, Result};
pub use profile::DiffProfile;
pub use reflect::{Diffable, Peek, PeekMut, Shape};
pub use rules::{Comparator, ComparatorFault, PathComparator, SortRule, Sorter, TrimRule, Verdict};
