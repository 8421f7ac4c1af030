//! Buffer change events
//!
//! A [`ChangeEvent`] describes one edit the way hosts report it: where it
//! happened, the text that was removed and the text that was inserted in its
//! place. Both texts are split per line, so `["ab", "c"]` is `"ab\nc"`.

use serde::{Deserialize, Serialize};

use crate::position::Position;

/// One buffer mutation as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Where the edit starts
    pub from: Position,
    /// Inserted text, per line
    pub text: Option<Vec<String>>,
    /// Removed text, per line
    pub removed: Option<Vec<String>>,
}

impl ChangeEvent {
    /// A pure insertion.
    pub fn insert(from: Position, text: &str) -> Self {
        Self {
            from,
            text: Some(lines_of(text)),
            removed: None,
        }
    }

    /// A pure removal.
    pub fn delete(from: Position, removed: &str) -> Self {
        Self {
            from,
            text: None,
            removed: Some(lines_of(removed)),
        }
    }

    /// Removal followed by insertion at the same position.
    pub fn replace(from: Position, removed: &str, text: &str) -> Self {
        Self {
            from,
            text: Some(lines_of(text)),
            removed: Some(lines_of(removed)),
        }
    }

    /// Removed lines, skipping an empty removal.
    pub fn removed_lines(&self) -> Option<&[String]> {
        self.removed.as_deref().filter(|lines| !is_empty_span(lines))
    }

    /// Inserted lines, skipping an empty insertion.
    pub fn inserted_lines(&self) -> Option<&[String]> {
        self.text.as_deref().filter(|lines| !is_empty_span(lines))
    }

    /// Number of lines added (positive) or removed (negative) by this change.
    pub fn line_delta(&self) -> isize {
        let added = self.text.as_ref().map(|t| t.len().saturating_sub(1)).unwrap_or(0);
        let removed = self.removed.as_ref().map(|r| r.len().saturating_sub(1)).unwrap_or(0);
        added as isize - removed as isize
    }
}

/// Split text into the per-line shape used by change events.
pub fn lines_of(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

fn is_empty_span(lines: &[String]) -> bool {
    lines.is_empty() || (lines.len() == 1 && lines[0].is_empty())
}
