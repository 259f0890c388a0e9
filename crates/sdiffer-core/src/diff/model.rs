//! Diff record types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::render::Template;
use crate::path;

/// Presence marker recorded when one side is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Nil,
    NotNil,
}

impl Presence {
    pub fn of(present: bool) -> Self {
        if present {
            Presence::NotNil
        } else {
            Presence::Nil
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presence::Nil => f.write_str("<nil>"),
            Presence::NotNil => f.write_str("<not nil>"),
        }
    }
}

/// One side of a diff record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DiffValue {
    /// Rendered leaf, or a value supplied by a custom comparator
    Value(String),
    /// Sequence or map length
    Length(usize),
    /// Presence marker
    Presence(Presence),
}

impl fmt::Display for DiffValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffValue::Value(v) => f.write_str(v),
            DiffValue::Length(n) => write!(f, "{}", n),
            DiffValue::Presence(p) => write!(f, "{}", p),
        }
    }
}

/// A single divergence between the two operands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    path: String,
    a: DiffValue,
    b: DiffValue,
}

impl Diff {
    pub fn new(path: impl Into<String>, a: DiffValue, b: DiffValue) -> Self {
        Self {
            path: path.into(),
            a,
            b,
        }
    }

    /// Full path, e.g. `Person.Parents[0].Name`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn a(&self) -> &DiffValue {
        &self.a
    }

    pub fn b(&self) -> &DiffValue {
        &self.b
    }

    /// Path with bracketed segments removed, e.g. `Person.Parents.Name`
    pub fn tag(&self) -> String {
        path::tag(&self.path)
    }

    /// Render as one report line (no trailing newline)
    pub fn render(&self, template: &Template) -> String {
        template.render(&self.path, &self.a, &self.b)
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&Template::default()))
    }
}
