//! In-place sort pass run by `Differ::compare_mut` after a successful comparison.
//!
//! Paths and depth follow the comparison walk exactly, so a sorter matches
//! the same sequences here as it would during `Differ::compare`. Subtrees
//! claimed by a comparator and anything below the depth limit are left alone.

use crate::path;
use crate::reflect::{Diffable, PeekMut};
use crate::rules::{Comparator, Sorter};

pub(crate) struct Normalizer<'d> {
    sorters: &'d [Box<dyn Sorter>],
    comparators: &'d [Box<dyn Comparator>],
    max_depth: usize,
}

impl<'d> Normalizer<'d> {
    pub(crate) fn new(
        sorters: &'d [Box<dyn Sorter>],
        comparators: &'d [Box<dyn Comparator>],
        max_depth: usize,
    ) -> Self {
        Self {
            sorters,
            comparators,
            max_depth,
        }
    }

    pub(crate) fn run(&self, value: &mut dyn Diffable, path: &str, depth: usize) {
        if self.sorters.is_empty() || depth > self.max_depth {
            return;
        }
        if self.comparators.iter().any(|c| c.matches(path)) {
            return;
        }

        match value.peek_mut() {
            PeekMut::List(seq) => {
                if let Some(sorter) = self.sorters.iter().find(|s| s.matches(path)) {
                    let accepted = seq.get(0).map_or(true, |e| sorter.accepts(e.as_any()));
                    if accepted {
                        seq.reorder(&|x, y| sorter.less(x, y));
                    } else {
                        tracing::warn!(path, "sorter does not accept element type, order kept");
                    }
                }
                for (i, element) in seq.elements_mut().into_iter().enumerate() {
                    self.run(element, &path::index(path, i), depth);
                }
            }
            PeekMut::Children(children) => {
                for (segment, child) in children {
                    self.run(child, &segment.apply(path), depth + segment.depth_cost());
                }
            }
            PeekMut::Opaque => {}
        }
    }
}
