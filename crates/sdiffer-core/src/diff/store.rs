use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::model::Diff;
use super::render::Template;
use crate::errors::{ExError, ExErrorKind, Result};
use crate::rules::filter::PatternSet;

/// Diff records from one comparison, in the order they were found
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiffStore {
    diffs: Vec<Diff>,
}

impl DiffStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, diff: Diff) {
        self.diffs.push(diff);
    }

    pub(crate) fn clear(&mut self) {
        self.diffs.clear();
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diff> {
        self.diffs.iter()
    }

    pub fn as_slice(&self) -> &[Diff] {
        &self.diffs
    }

    /// First record whose path equals `path`
    pub fn find(&self, path: &str) -> Option<&Diff> {
        self.diffs.iter().find(|d| d.path() == path)
    }

    /// Every record whose path matches `pattern`, in accumulation order
    ///
    /// # Errors
    ///
    /// `InvalidPattern` when `pattern` does not compile.
    pub fn find_fuzzily(&self, pattern: &str) -> Result<Vec<&Diff>> {
        let patterns = PatternSet::compile([pattern])?;
        Ok(self
            .diffs
            .iter()
            .filter(|d| patterns.is_match(d.path()))
            .collect())
    }

    /// Records grouped by their tag, each group in accumulation order
    pub fn group_by_tag(&self) -> BTreeMap<String, Vec<&Diff>> {
        let mut groups: BTreeMap<String, Vec<&Diff>> = BTreeMap::new();
        for diff in &self.diffs {
            groups.entry(diff.tag()).or_default().push(diff);
        }
        groups
    }

    /// Full report, one line per record, each terminated by a newline
    pub fn render(&self, template: &Template) -> String {
        let mut out = String::new();
        for diff in &self.diffs {
            out.push_str(&diff.render(template));
            out.push('\n');
        }
        out
    }

    /// Pretty JSON array of all records
    ///
    /// # Errors
    ///
    /// `Serialization` if encoding fails.
    pub fn to_json(&self) -> std::result::Result<String, ExError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("to_json")
                .with_message(format!("failed to encode diffs: {}", e))
        })
    }
}

impl<'a> IntoIterator for &'a DiffStore {
    type Item = &'a Diff;
    type IntoIter = std::slice::Iter<'a, Diff>;

    fn into_iter(self) -> Self::IntoIter {
        self.diffs.iter()
    }
}
