//! The comparison engine.
//!
//! A [`Differ`] is one comparison session: it owns its configuration (path
//! filters, trim rules, comparators, sorters, depth limit, template) and the
//! diffs found by the last comparison.
//!
//! ## Traversal
//!
//! Both operands are walked in lock-step. At every step the engine checks,
//! in order: the depth limit, shape equality, custom comparators, and then
//! dispatches on the value's kind. Only leaves, lengths and presence produce
//! diffs; every failure aborts the whole comparison and leaves no diffs.
//!
//! Depth grows by one per struct field and per dynamic unwrap. Sequence
//! elements, map entries and pointer targets stay at the same depth.

use std::fmt;
use std::time::Instant;

use sdiffer_core_types::SessionId;

use crate::diff::{Diff, DiffStore, DiffValue, Presence, Template};
use crate::errors::{DiffError, Result};
use crate::normalize::Normalizer;
use crate::path;
use crate::reflect::{Diffable, Mapping, Peek, Sequence};
use crate::rules::filter::{PathFilter, PatternSet};
use crate::rules::sort::sorted_order;
use crate::rules::{Comparator, Sorter, TrimRule, Verdict};
use crate::{log_op_end, log_op_error, log_op_start};

/// Default recursion ceiling
pub const DEFAULT_MAX_DEPTH: usize = 30;

/// Structural comparison session.
///
/// Not meant to be shared between threads; use one `Differ` per comparison
/// session and call [`reset`](Differ::reset) to reuse it.
pub struct Differ {
    session_id: SessionId,
    store: DiffStore,
    filter: PathFilter,
    trim_spaces: PatternSet,
    trims: Vec<TrimRule>,
    comparators: Vec<Box<dyn Comparator>>,
    sorters: Vec<Box<dyn Sorter>>,
    max_depth: usize,
    template: Template,
}

impl Default for Differ {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Differ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Differ")
            .field("session_id", &self.session_id)
            .field("diffs", &self.store.len())
            .field("includes", &self.filter.includes().as_strs())
            .field("ignores", &self.filter.ignores().as_strs())
            .field("trim_spaces", &self.trim_spaces.as_strs())
            .field("trims", &self.trims.len())
            .field("comparators", &self.comparators.len())
            .field("sorters", &self.sorters.len())
            .field("max_depth", &self.max_depth)
            .field("template", &self.template.as_str())
            .finish()
    }
}

impl Differ {
    pub fn new() -> Self {
        Self {
            session_id: SessionId::new(),
            store: DiffStore::new(),
            filter: PathFilter::default(),
            trim_spaces: PatternSet::default(),
            trims: Vec::new(),
            comparators: Vec::new(),
            sorters: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            template: Template::default(),
        }
    }

    // ===== Configuration =====

    /// Set the recursion ceiling; comparisons deeper than this fail
    pub fn with_max_depth(&mut self, depth: usize) -> &mut Self {
        self.max_depth = depth;
        self
    }

    /// Set the report template; a blank template restores the default
    ///
    /// # Errors
    ///
    /// `InvalidTemplate` unless the template has exactly three `{}` slots.
    pub fn with_template(&mut self, template: &str) -> Result<&mut Self> {
        self.template = if template.trim().is_empty() {
            Template::default()
        } else {
            Template::parse(template)?
        };
        Ok(self)
    }

    /// Replace the exclude patterns
    ///
    /// Has no effect once include patterns are set, though the patterns are
    /// still validated.
    ///
    /// # Errors
    ///
    /// `InvalidPattern` for the first pattern that does not compile.
    pub fn ignore<I, S>(&mut self, patterns: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = PatternSet::compile(patterns)?;
        if !self.filter.set_ignores(set) {
            tracing::debug!(session_id = %self.session_id, "include patterns set, ignore patterns dropped");
        }
        Ok(self)
    }

    /// Replace the include patterns; once non-empty, exclude patterns are inert
    ///
    /// # Errors
    ///
    /// `InvalidPattern` for the first pattern that does not compile.
    pub fn includes<I, S>(&mut self, patterns: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filter.set_includes(PatternSet::compile(patterns)?);
        Ok(self)
    }

    /// Register a comparator; the first registered match wins
    pub fn with_comparator(&mut self, comparator: impl Comparator + 'static) -> &mut Self {
        self.comparators.push(Box::new(comparator));
        self
    }

    /// Trim `cutset` from both ends of string leaves at matching paths
    ///
    /// # Errors
    ///
    /// `InvalidPattern` when `pattern` does not compile.
    pub fn with_trim(&mut self, pattern: &str, cutset: &str) -> Result<&mut Self> {
        self.trims.push(TrimRule::new(pattern, cutset)?);
        Ok(self)
    }

    /// Ignore leading and trailing whitespace of string leaves at matching paths
    ///
    /// # Errors
    ///
    /// `InvalidPattern` for the first pattern that does not compile.
    pub fn with_trim_space<I, S>(&mut self, patterns: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.trim_spaces.extend(PatternSet::compile(patterns)?);
        Ok(self)
    }

    /// Register a sorter; the first registered match wins
    pub fn with_sorter(&mut self, sorter: impl Sorter + 'static) -> &mut Self {
        self.sorters.push(Box::new(sorter));
        self
    }

    /// Drop every rule and diff and restore the default depth and template.
    ///
    /// The session gets a fresh id.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::new();
        self
    }

    // ===== Accessors =====

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Diffs found by the last comparison
    pub fn diffs(&self) -> &[Diff] {
        self.store.as_slice()
    }

    pub fn store(&self) -> &DiffStore {
        &self.store
    }

    /// Diff recorded at exactly `path`
    pub fn find_diff(&self, path: &str) -> Option<&Diff> {
        self.store.find(path)
    }

    /// Diffs whose path matches `pattern`
    ///
    /// # Errors
    ///
    /// `InvalidPattern` when `pattern` does not compile.
    pub fn find_diff_fuzzily(&self, pattern: &str) -> Result<Vec<&Diff>> {
        self.store.find_fuzzily(pattern)
    }

    /// Report with one template line per diff
    pub fn render(&self) -> String {
        self.store.render(&self.template)
    }

    // ===== Comparison =====

    /// Compare two values of the same shape.
    ///
    /// Previous diffs are discarded. Sequences matched by a sorter are visited
    /// in sorted order without touching the caller's data.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch`, `InvalidValue`, `DepthExceeded` or `FaultyComparator`;
    /// no diffs are kept on failure.
    pub fn compare(&mut self, a: &dyn Diffable, b: &dyn Diffable) -> Result<&mut Self> {
        log_op_start!("compare", session_id = %self.session_id);
        let start = Instant::now();

        self.store.clear();
        let result = root_path(a, b).and_then(|root| self.do_compare(a, b, &root, 0));
        self.finish("compare", start, result)
    }

    /// Compare two values of the same shape, then sort matched sequences in place.
    ///
    /// The diffs are the ones [`compare`](Differ::compare) reports. After a
    /// successful comparison every sequence whose path matches a sorter is
    /// reordered in both operands and stays reordered. Sequences behind a
    /// shared `Rc` or `Arc` are left in their original order.
    ///
    /// # Errors
    ///
    /// As [`compare`](Differ::compare). Nothing is reordered when the
    /// comparison fails.
    pub fn compare_mut(
        &mut self,
        a: &mut dyn Diffable,
        b: &mut dyn Diffable,
    ) -> Result<&mut Self> {
        log_op_start!("compare_mut", session_id = %self.session_id);
        let start = Instant::now();

        self.store.clear();
        let result = root_path(&*a, &*b).and_then(|root| {
            self.do_compare(&*a, &*b, &root, 0)?;
            let normalizer = Normalizer::new(&self.sorters, &self.comparators, self.max_depth);
            normalizer.run(a, &root, 0);
            normalizer.run(b, &root, 0);
            Ok(())
        });
        self.finish("compare_mut", start, result)
    }

    fn finish(&mut self, op: &str, start: Instant, result: Result<()>) -> Result<&mut Self> {
        match result {
            Ok(()) => {
                log_op_end!(
                    op,
                    duration_ms = start.elapsed().as_millis() as u64,
                    session_id = %self.session_id,
                    diff_count = self.store.len() as u64
                );
                Ok(self)
            }
            Err(e) => {
                self.store.clear();
                log_op_error!(
                    op,
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    session_id = %self.session_id
                );
                Err(e)
            }
        }
    }

    fn do_compare(
        &mut self,
        a: &dyn Diffable,
        b: &dyn Diffable,
        path: &str,
        depth: usize,
    ) -> Result<()> {
        if depth > self.max_depth {
            return Err(DiffError::DepthExceeded {
                path: path.to_string(),
                depth,
                max_depth: self.max_depth,
            });
        }

        let (shape_a, shape_b) = (a.shape(), b.shape());
        if shape_a != shape_b {
            return Err(DiffError::ShapeMismatch {
                path: path.to_string(),
                a: shape_a.to_string(),
                b: shape_b.to_string(),
            });
        }

        if let Some(verdict) = self
            .comparators
            .iter()
            .find(|c| c.matches(path))
            .map(|c| c.equals(a.as_any(), b.as_any()))
        {
            return self.apply_verdict(verdict, a, b, path);
        }

        match (a.peek(), b.peek()) {
            (Peek::Array(x), Peek::Array(y)) => {
                for i in 0..x.len().min(y.len()) {
                    if let (Some(ea), Some(eb)) = (x.get(i), y.get(i)) {
                        self.do_compare(ea, eb, &path::index(path, i), depth)?;
                    }
                }
                Ok(())
            }
            (Peek::List(x), Peek::List(y)) => self.compare_lists(x, y, path, depth),
            (Peek::Dynamic(x), Peek::Dynamic(y)) => {
                self.do_compare(x, y, &path::dynamic(path, x.shape().name()), depth + 1)
            }
            (Peek::Pointer(x), Peek::Pointer(y)) => match (x, y) {
                (Some(x), Some(y)) => {
                    if std::ptr::addr_eq(x, y) {
                        return Ok(());
                    }
                    self.do_compare(x, y, path, depth)
                }
                (None, None) => Ok(()),
                _ => {
                    self.set_presence_diff(path, x.is_some(), y.is_some());
                    Ok(())
                }
            },
            (Peek::Struct(x), Peek::Struct(y)) => {
                for ((name, fa), (_, fb)) in x.fields().into_iter().zip(y.fields()) {
                    self.do_compare(fa, fb, &path::field(path, name), depth + 1)?;
                }
                Ok(())
            }
            (Peek::Map(x), Peek::Map(y)) => self.compare_maps(x, y, path, depth),
            (Peek::Text(x), Peek::Text(y)) => {
                self.compare_text(x, y, path);
                Ok(())
            }
            (Peek::Scalar(x), Peek::Scalar(y)) => {
                if !x.same_as(b.as_any()) {
                    self.set_diff(
                        path.to_string(),
                        DiffValue::Value(x.render()),
                        DiffValue::Value(y.render()),
                    );
                }
                Ok(())
            }
            (x, y) => Err(DiffError::ShapeMismatch {
                path: path.to_string(),
                a: format!("{} ({})", shape_a, x.kind()),
                b: format!("{} ({})", shape_b, y.kind()),
            }),
        }
    }

    fn apply_verdict(
        &mut self,
        verdict: std::result::Result<Verdict, crate::rules::ComparatorFault>,
        a: &dyn Diffable,
        b: &dyn Diffable,
        path: &str,
    ) -> Result<()> {
        let faulty = |reason: String| DiffError::FaultyComparator {
            path: path.to_string(),
            reason,
        };
        let customized = path::customized(path);

        match verdict.map_err(|fault| faulty(fault.to_string()))? {
            Verdict::NoDiff => {}
            Verdict::LengthDiff => match (length_of(a.peek()), length_of(b.peek())) {
                (Some(la), Some(lb)) => self.set_diff(
                    path::length(&customized),
                    DiffValue::Length(la),
                    DiffValue::Length(lb),
                ),
                _ => return Err(faulty("LengthDiff returned for operands without length".into())),
            },
            Verdict::NilDiff => match (a.peek().presence(), b.peek().presence()) {
                (Some(pa), Some(pb)) => self.set_presence_diff(&customized, pa, pb),
                _ => return Err(faulty("NilDiff returned for operands that cannot be absent".into())),
            },
            Verdict::ElemDiff { a, b } => {
                self.set_diff(customized, DiffValue::Value(a), DiffValue::Value(b))
            }
        }
        Ok(())
    }

    fn compare_lists(
        &mut self,
        a: &dyn Sequence,
        b: &dyn Sequence,
        path: &str,
        depth: usize,
    ) -> Result<()> {
        if a.len() != b.len() {
            self.set_diff(
                path::length(path),
                DiffValue::Length(a.len()),
                DiffValue::Length(b.len()),
            );
        }
        if a.storage() == b.storage() {
            return Ok(());
        }

        let (order_a, order_b) = (self.visit_order(a, path), self.visit_order(b, path));
        for (i, (&ia, &ib)) in order_a.iter().zip(order_b.iter()).enumerate() {
            if let (Some(ea), Some(eb)) = (a.get(ia), b.get(ib)) {
                self.do_compare(ea, eb, &path::index(path, i), depth)?;
            }
        }
        Ok(())
    }

    /// Index order in which a sequence is visited, sorted when a sorter matches
    fn visit_order(&self, seq: &dyn Sequence, path: &str) -> Vec<usize> {
        let identity = || (0..seq.len()).collect();
        let Some(sorter) = self.sorters.iter().find(|s| s.matches(path)) else {
            return identity();
        };
        if let Some(first) = seq.get(0) {
            if !sorter.accepts(first.as_any()) {
                tracing::warn!(
                    session_id = %self.session_id,
                    path,
                    element = %first.shape(),
                    "sorter does not accept element type, order kept"
                );
                return identity();
            }
        }
        sorted_order(seq.len(), &|i, j| match (seq.get(i), seq.get(j)) {
            (Some(x), Some(y)) => sorter.less(x.as_any(), y.as_any()),
            _ => false,
        })
    }

    fn compare_maps(
        &mut self,
        a: &dyn Mapping,
        b: &dyn Mapping,
        path: &str,
        depth: usize,
    ) -> Result<()> {
        if a.len() != b.len() {
            self.set_diff(
                path::length(path),
                DiffValue::Length(a.len()),
                DiffValue::Length(b.len()),
            );
        }
        // only A's keys are visited
        for entry in a.entries() {
            let entry_path = path::key(path, &entry.rendered);
            let Some(other) = b.lookup(entry.key) else {
                return Err(DiffError::InvalidValue {
                    path: entry_path,
                    reason: "key missing in B".to_string(),
                });
            };
            self.do_compare(entry.value, other, &entry_path, depth)?;
        }
        Ok(())
    }

    fn compare_text(&mut self, a: &str, b: &str, path: &str) {
        let differs = if self.trim_spaces.is_match(path) {
            a.trim() != b.trim()
        } else if let Some(rule) = self.trims.iter().find(|t| t.matches(path)) {
            rule.trim(a) != rule.trim(b)
        } else {
            a != b
        };
        if differs {
            self.set_diff(
                path.to_string(),
                DiffValue::Value(a.to_string()),
                DiffValue::Value(b.to_string()),
            );
        }
    }

    fn set_presence_diff(&mut self, path: &str, a: bool, b: bool) {
        self.set_diff(
            path.to_string(),
            DiffValue::Presence(Presence::of(a)),
            DiffValue::Presence(Presence::of(b)),
        );
    }

    fn set_diff(&mut self, path: String, a: DiffValue, b: DiffValue) {
        if !self.filter.admits(&path) {
            tracing::trace!(session_id = %self.session_id, path = %path, "diff filtered");
            return;
        }
        tracing::trace!(session_id = %self.session_id, path = %path, a = %a, b = %b, "diff recorded");
        self.store.push(Diff::new(path, a, b));
    }
}

impl fmt::Display for Differ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Root path for a comparison, after checking the root shapes agree
fn root_path(a: &dyn Diffable, b: &dyn Diffable) -> Result<String> {
    let (shape_a, shape_b) = (a.shape(), b.shape());
    if shape_a != shape_b {
        return Err(DiffError::ShapeMismatch {
            path: path::ROOT.to_string(),
            a: shape_a.to_string(),
            b: shape_b.to_string(),
        });
    }
    if shape_a.is_named() {
        return Ok(shape_a.name().to_string());
    }
    if let Peek::Pointer(Some(target)) = a.peek() {
        let target_shape = target.shape();
        if target_shape.is_named() {
            return Ok(target_shape.name().to_string());
        }
    }
    Ok(path::ROOT.to_string())
}

/// Length of a value, looking through pointers and dynamic wrappers
fn length_of(peek: Peek<'_>) -> Option<usize> {
    match peek {
        Peek::Pointer(Some(target)) | Peek::Dynamic(target) => length_of(target.peek()),
        other => other.len(),
    }
}
