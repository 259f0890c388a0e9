use regex::Regex;

use super::compile;
use crate::errors::Result;

/// Ordered set of compiled path patterns
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compile every pattern, failing on the first invalid one
    ///
    /// # Errors
    ///
    /// `InvalidPattern` naming the offending pattern.
    pub fn compile<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// True when any pattern matches `path`
    pub fn is_match(&self, path: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(path))
    }

    /// Append every pattern of `other`
    pub fn extend(&mut self, other: PatternSet) {
        self.patterns.extend(other.patterns);
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn as_strs(&self) -> Vec<&str> {
        self.patterns.iter().map(Regex::as_str).collect()
    }
}

/// Which filter decides whether a diff is recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Record only paths matching an include pattern
    Include,
    /// Record every path not matching an exclude pattern
    Exclude,
    /// Record everything
    All,
}

/// Include/exclude filtering of recorded diffs.
///
/// Include patterns take absolute precedence: once any exist, exclude
/// patterns are inert and further `set_ignores` calls are ignored.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    includes: PatternSet,
    ignores: PatternSet,
}

impl PathFilter {
    /// Replace the exclude set; no-op while include patterns exist
    ///
    /// Returns `false` when the call was ignored.
    pub fn set_ignores(&mut self, ignores: PatternSet) -> bool {
        if !self.includes.is_empty() {
            return false;
        }
        self.ignores = ignores;
        true
    }

    /// Replace the include set
    pub fn set_includes(&mut self, includes: PatternSet) {
        self.includes = includes;
    }

    pub fn mode(&self) -> FilterMode {
        if !self.includes.is_empty() {
            FilterMode::Include
        } else if !self.ignores.is_empty() {
            FilterMode::Exclude
        } else {
            FilterMode::All
        }
    }

    /// Whether a diff at `path` should be recorded
    pub fn admits(&self, path: &str) -> bool {
        match self.mode() {
            FilterMode::Include => self.includes.is_match(path),
            FilterMode::Exclude => !self.ignores.is_match(path),
            FilterMode::All => true,
        }
    }

    pub fn includes(&self) -> &PatternSet {
        &self.includes
    }

    pub fn ignores(&self) -> &PatternSet {
        &self.ignores
    }
}
