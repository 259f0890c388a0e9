use std::any::{type_name, Any};

use regex::Regex;

use super::compile;
use crate::errors::Result;

/// Orders a matched sequence before it is compared.
///
/// `less` receives two elements of the sequence, type-erased. A sorter that
/// only understands one element type should say so through `accepts`;
/// sequences it does not accept are compared in their original order.
pub trait Sorter {
    fn matches(&self, path: &str) -> bool;

    /// Whether this sorter can order elements like `element`
    fn accepts(&self, _element: &dyn Any) -> bool {
        true
    }

    fn less(&self, a: &dyn Any, b: &dyn Any) -> bool;
}

/// Typed sorter over elements of type `T`, selected by a path pattern
pub struct SortRule<T> {
    pattern: Regex,
    less: Box<dyn Fn(&T, &T) -> bool>,
}

impl<T: Any> SortRule<T> {
    /// # Errors
    ///
    /// `InvalidPattern` when `pattern` does not compile.
    pub fn new(pattern: &str, less: impl Fn(&T, &T) -> bool + 'static) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            less: Box::new(less),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl<T> std::fmt::Debug for SortRule<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortRule")
            .field("pattern", &self.pattern.as_str())
            .field("element", &type_name::<T>())
            .finish()
    }
}

impl<T: Any> Sorter for SortRule<T> {
    fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    fn accepts(&self, element: &dyn Any) -> bool {
        element.is::<T>()
    }

    fn less(&self, a: &dyn Any, b: &dyn Any) -> bool {
        match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
            (Some(a), Some(b)) => (self.less)(a, b),
            _ => false,
        }
    }
}

/// In-place partition sort.
///
/// The first element of each range is the pivot. The scan alternates from
/// the right and the left, swapping the pivot across each out-of-place
/// element, so the pivot lands at its final index when the scans meet. The
/// smaller partition is sorted recursively and the larger one in the loop,
/// which keeps the stack depth logarithmic even for presorted input. Not
/// stable.
pub fn quicksort<T>(mut items: &mut [T], less: &dyn Fn(&T, &T) -> bool) {
    while items.len() >= 2 {
        let pivot = partition(items, less);
        let (left, right) = std::mem::take(&mut items).split_at_mut(pivot);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quicksort(left, less);
            items = right;
        } else {
            quicksort(right, less);
            items = left;
        }
    }
}

/// Place the first element at its final index and return that index
fn partition<T>(items: &mut [T], less: &dyn Fn(&T, &T) -> bool) -> usize {
    let (mut l, mut r) = (0, items.len() - 1);
    while l < r {
        // pivot at l
        while l < r && less(&items[l], &items[r]) {
            r -= 1;
        }
        if l < r {
            items.swap(l, r);
            l += 1;
        }
        // pivot at r
        while l < r && less(&items[l], &items[r]) {
            l += 1;
        }
        if l < r {
            items.swap(l, r);
            r -= 1;
        }
    }
    l
}

/// Visiting order for a sequence of `len` elements under `less`, leaving the
/// sequence itself untouched
pub fn sorted_order(len: usize, less: &dyn Fn(usize, usize) -> bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    quicksort(&mut order, &|i: &usize, j: &usize| less(*i, *j));
    order
}
