//! Line/column positions in an editor buffer
//!
//! Positions are zero-based. Columns count Unicode scalar values, not bytes,
//! so a position stays meaningful regardless of how the host stores its text.
//!
//! # Ordering
//!
//! Positions compare in "library order": first by line, then by column.
//! The derived `Ord` relies on the field order of [`Position`], so `line`
//! must stay the first field.
//!
//! # Example
//!
//! ```ignore
//! use imprint_hint::position::Position;
//!
//! let from = Position::new(0, 5);
//! let after = from.advance_over("\\frac{");
//! assert_eq!(after, Position::new(0, 11));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Zero-based line index
    pub line: usize,
    /// Zero-based column, in characters
    pub ch: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }

    /// The position reached after inserting `text` at this position.
    ///
    /// Without a newline the column moves right by the text length. With
    /// newlines the line moves down by their count and the column becomes
    /// the length of the text after the last newline.
    pub fn advance_over(&self, text: &str) -> Position {
        match text.rfind('\n') {
            None => Position::new(self.line, self.ch + char_len(text)),
            Some(idx) => Position::new(
                self.line + newline_count(text),
                char_len(&text[idx + 1..]),
            ),
        }
    }

    /// End of a span given as per-line strings starting at this position.
    ///
    /// This is the shape hosts use for inserted and removed text: the first
    /// entry continues the current line, every further entry is a new line.
    pub fn end_of_span(&self, lines: &[String]) -> Position {
        match lines.len() {
            0 => *self,
            1 => Position::new(self.line, self.ch + char_len(&lines[0])),
            n => Position::new(self.line + n - 1, char_len(&lines[n - 1])),
        }
    }

    /// Whether this position lies within `start..=end` (both ends inclusive).
    pub fn is_within(&self, start: Position, end: Position) -> bool {
        *self >= start && *self <= end
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.ch)
    }
}

impl From<(usize, usize)> for Position {
    fn from((line, ch): (usize, usize)) -> Self {
        Position::new(line, ch)
    }
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Number of `\n` characters in `text`.
pub fn newline_count(text: &str) -> usize {
    text.matches('\n').count()
}
