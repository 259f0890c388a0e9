//! Report templates.
//!
//! A template is plain text with exactly three `{}` slots, filled with the
//! path, value A and value B in that order. `{{` and `}}` escape literal braces.

use std::fmt::Display;

use crate::errors::{DiffError, Result};

/// Template used when none is configured
pub const DEFAULT_TEMPLATE: &str = r#"Field: "{}", A: {}, B: {}"#;

const SLOTS: usize = 3;

/// Parsed three-slot line template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    // literal text around the slots; always SLOTS + 1 pieces
    pieces: Vec<String>,
}

impl Template {
    /// Parse a template
    ///
    /// # Errors
    ///
    /// `InvalidTemplate` when the slot count is not three or a brace is unmatched.
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = |reason: String| DiffError::InvalidTemplate {
            template: source.to_string(),
            reason,
        };

        let mut pieces = vec![String::new()];
        let mut chars = source.chars().peekable();
        while let Some(c) = chars.next() {
            match (c, chars.peek()) {
                ('{', Some('{')) | ('}', Some('}')) => {
                    chars.next();
                    push_char(&mut pieces, c);
                }
                ('{', Some('}')) => {
                    chars.next();
                    pieces.push(String::new());
                }
                ('{', _) | ('}', _) => {
                    return Err(invalid(format!("unmatched `{}`", c)));
                }
                _ => push_char(&mut pieces, c),
            }
        }

        let slots = pieces.len() - 1;
        if slots != SLOTS {
            return Err(invalid(format!(
                "expected {} placeholders, found {}",
                SLOTS, slots
            )));
        }

        Ok(Self {
            source: source.to_string(),
            pieces,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Fill the slots with path, value A and value B
    pub fn render(&self, path: &str, a: &dyn Display, b: &dyn Display) -> String {
        let mut out = String::with_capacity(self.source.len() + path.len() + 16);
        let values: [&dyn Display; SLOTS] = [&path, a, b];
        for (piece, value) in self.pieces.iter().zip(values.iter()) {
            out.push_str(piece);
            out.push_str(&value.to_string());
        }
        if let Some(last) = self.pieces.last() {
            out.push_str(last);
        }
        out
    }
}

fn push_char(pieces: &mut [String], c: char) {
    if let Some(last) = pieces.last_mut() {
        last.push(c);
    }
}

impl Default for Template {
    fn default() -> Self {
        Self {
            source: DEFAULT_TEMPLATE.to_string(),
            pieces: vec![
                "Field: \"".to_string(),
                "\", A: ".to_string(),
                ", B: ".to_string(),
                String::new(),
            ],
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
