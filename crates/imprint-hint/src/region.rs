//! Tracking of the active placeholder region
//!
//! While a snippet session is live, the placeholder the user is filling in is
//! a contiguous region of the buffer that grows and shrinks with every edit.
//! The region is never re-read from the buffer. It is described by:
//!
//! - **start**: the fixed anchor where the placeholder begins
//! - **content**: one entry per line spanned by the region, holding the
//!   column where the region ends on that line
//!
//! The region end is derived: it sits on line `start.line + content.len() - 1`
//! at column `content[last]`. Every change reported by the host is folded into
//! `content` arithmetically, splitting entries when lines are inserted and
//! merging them when line breaks are removed.
//!
//! Edits that end at or before `start` move the whole region: `start` follows
//! the text it is anchored to, and the first `content` entry moves with it.

use crate::change::ChangeEvent;
use crate::position::{char_len, Position};

/// How a change affected the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionUpdate {
    /// The change touched or preceded the region and it was adjusted
    Adjusted,
    /// The change happened after the region end
    Unaffected,
    /// The change removed text across `start`, which can no longer be tracked
    Detached,
}

/// The active placeholder region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    start: Position,
    content: Vec<usize>,
}

impl Region {
    /// An empty region anchored at `start`.
    pub fn new(start: Position) -> Self {
        Self {
            start,
            content: vec![start.ch],
        }
    }

    /// Where the region begins.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Per-line end columns, first line first.
    pub fn content(&self) -> &[usize] {
        &self.content
    }

    /// Where the region ends.
    pub fn end(&self) -> Position {
        Position::new(
            self.start.line + self.content.len() - 1,
            // content always holds at least the first line
            self.content[self.content.len() - 1],
        )
    }

    /// Whether `pos` lies inside the region, both ends included.
    pub fn contains(&self, pos: Position) -> bool {
        pos.is_within(self.start, self.end())
    }

    /// Fold a buffer change into the region.
    pub fn apply_change(&mut self, change: &ChangeEvent) -> RegionUpdate {
        let from = change.from;
        if from < self.start {
            return self.shift(change);
        }
        if from > self.end() {
            return RegionUpdate::Unaffected;
        }

        let origin = from.line - self.start.line;
        if let Some(removed) = change.removed_lines() {
            self.remove(origin, from, removed);
        }
        if let Some(text) = change.inserted_lines() {
            self.insert(origin, from, text);
        }
        RegionUpdate::Adjusted
    }

    /// Move the region for a change starting before it.
    fn shift(&mut self, change: &ChangeEvent) -> RegionUpdate {
        let from = change.from;
        let removed_end = change.removed_lines().map_or(from, |r| from.end_of_span(r));
        if removed_end > self.start {
            return RegionUpdate::Detached;
        }
        let inserted_end = change.inserted_lines().map_or(from, |t| from.end_of_span(t));

        let line = self.start.line.saturating_add_signed(change.line_delta());
        let ch = if self.start.line == removed_end.line {
            inserted_end.ch + (self.start.ch - removed_end.ch)
        } else {
            self.start.ch
        };
        // The first line's end column sits on the same line as start
        self.content[0] = (self.content[0] + ch).saturating_sub(self.start.ch);
        self.start = Position::new(line, ch);
        RegionUpdate::Adjusted
    }

    fn remove(&mut self, origin: usize, from: Position, removed: &[String]) {
        if from.end_of_span(removed) > self.end() {
            // The tail of the region was deleted with the text after it
            self.content.truncate(origin + 1);
            self.content[origin] = from.ch;
            return;
        }

        let len = removed.len() - 1;
        if len > 0 {
            let last = origin + len;
            self.content[last] = self.content[last].saturating_sub(char_len(&removed[len]));
            self.content[origin] =
                self.content[origin].saturating_sub(char_len(&removed[0])) + self.content[last];
            self.content.drain(origin + 1..=last);
        } else {
            self.content[origin] = self.content[origin].saturating_sub(char_len(&removed[0]));
        }
    }

    fn insert(&mut self, origin: usize, from: Position, text: &[String]) {
        let len = text.len() - 1;
        if len > 0 {
            // Region text after the edit point moves to the last inserted line
            let diff = self.content[origin].saturating_sub(from.ch);
            self.content[origin] = from.ch + char_len(&text[0]);
            for (i, line) in text.iter().enumerate().take(len).skip(1) {
                self.content.insert(origin + i, char_len(line));
            }
            self.content.insert(origin + len, char_len(&text[len]) + diff);
        } else {
            self.content[origin] += char_len(&text[0]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_with(start: Position, typed: &str) -> Region {
        let mut region = Region::new(start);
        region.apply_change(&ChangeEvent::insert(start, typed));
        region
    }

    #[test]
    fn test_new_region_is_empty() {
        let region = Region::new(Position::new(2, 6));
        assert_eq!(region.content(), &[6]);
        assert_eq!(region.end(), Position::new(2, 6));
        assert!(region.contains(Position::new(2, 6)));
    }

    #[test]
    fn test_typing_extends_end() {
        let start = Position::new(0, 6);
        let mut region = Region::new(start);
        for (i, c) in ["a", "b", "c"].iter().enumerate() {
            let update = region.apply_change(&ChangeEvent::insert(Position::new(0, 6 + i), c));
            assert_eq!(update, RegionUpdate::Adjusted);
        }
        assert_eq!(region.content(), &[9]);
        assert_eq!(region.end(), Position::new(0, 9));
    }

    #[test]
    fn test_backspace_shrinks_end() {
        let mut region = region_with(Position::new(0, 6), "ab");
        region.apply_change(&ChangeEvent::delete(Position::new(0, 7), "b"));
        assert_eq!(region.end(), Position::new(0, 7));
    }

    #[test]
    fn test_newline_splits_line() {
        // "\frac{a|b}{}" -> "\frac{a" / "b}{}"
        let mut region = region_with(Position::new(0, 6), "ab");
        region.apply_change(&ChangeEvent::insert(Position::new(0, 7), "\n"));
        assert_eq!(region.content(), &[7, 1]);
        assert_eq!(region.end(), Position::new(1, 1));
    }

    #[test]
    fn test_joining_lines_merges_entries() {
        let mut region = region_with(Position::new(0, 6), "ab");
        region.apply_change(&ChangeEvent::insert(Position::new(0, 7), "\n"));
        region.apply_change(&ChangeEvent::delete(Position::new(0, 7), "\n"));
        assert_eq!(region.content(), &[8]);
        assert_eq!(region.end(), Position::new(0, 8));
    }

    #[test]
    fn test_multi_line_paste() {
        // "\frac{a|b}{}" -> "\frac{ax" / "y" / "zb}{}"
        let mut region = region_with(Position::new(0, 6), "ab");
        region.apply_change(&ChangeEvent::insert(Position::new(0, 7), "x\ny\nz"));
        assert_eq!(region.content(), &[8, 1, 2]);
        assert_eq!(region.end(), Position::new(2, 2));
    }

    #[test]
    fn test_multi_line_delete_inside() {
        let mut region = region_with(Position::new(0, 6), "ab");
        region.apply_change(&ChangeEvent::insert(Position::new(0, 7), "x\ny\nz"));
        // remove "\ny\n" leaving "\frac{axzb}{}"
        region.apply_change(&ChangeEvent::delete(Position::new(0, 8), "\ny\n"));
        assert_eq!(region.content(), &[10]);
        assert_eq!(region.end(), Position::new(0, 10));
    }

    #[test]
    fn test_replace_selection_inside() {
        let mut region = region_with(Position::new(0, 6), "abc");
        region.apply_change(&ChangeEvent::replace(Position::new(0, 7), "b", "XYZ"));
        assert_eq!(region.end(), Position::new(0, 11));
    }

    #[test]
    fn test_delete_past_end_clips_region() {
        let mut region = region_with(Position::new(0, 6), "ab");
        region.apply_change(&ChangeEvent::delete(Position::new(0, 7), "b}{"));
        assert_eq!(region.content(), &[7]);
        assert_eq!(region.end(), Position::new(0, 7));
    }

    #[test]
    fn test_delete_past_end_across_lines() {
        let mut region = region_with(Position::new(0, 6), "a\nbc");
        assert_eq!(region.end(), Position::new(1, 2));
        region.apply_change(&ChangeEvent::delete(Position::new(0, 7), "\nbc}{}"));
        assert_eq!(region.content(), &[7]);
    }

    #[test]
    fn test_removal_across_start_detaches() {
        let mut region = region_with(Position::new(0, 6), "ab");
        let update = region.apply_change(&ChangeEvent::delete(Position::new(0, 5), "{a"));
        assert_eq!(update, RegionUpdate::Detached);
        assert_eq!(region.end(), Position::new(0, 8));
    }

    #[test]
    fn test_edit_before_start_shifts_region() {
        // "\frac{ab}{}": deleting the "{" right before start moves the region left
        let mut region = region_with(Position::new(0, 6), "ab");
        let update = region.apply_change(&ChangeEvent::delete(Position::new(0, 5), "{"));
        assert_eq!(update, RegionUpdate::Adjusted);
        assert_eq!(region.start(), Position::new(0, 5));
        assert_eq!(region.end(), Position::new(0, 7));

        // A line break before start carries the region to the next line
        region.apply_change(&ChangeEvent::insert(Position::new(0, 2), "x\n"));
        assert_eq!(region.start(), Position::new(1, 3));
        assert_eq!(region.content(), &[5]);
    }

    #[test]
    fn test_edit_on_earlier_line_keeps_columns() {
        let mut region = region_with(Position::new(2, 4), "a\nbc");
        region.apply_change(&ChangeEvent::delete(Position::new(0, 1), "xy\nz"));
        assert_eq!(region.start(), Position::new(1, 4));
        assert_eq!(region.content(), &[5, 2]);
        assert_eq!(region.end(), Position::new(2, 2));

        region.apply_change(&ChangeEvent::insert(Position::new(0, 0), "\n\n"));
        assert_eq!(region.start(), Position::new(3, 4));
        assert_eq!(region.end(), Position::new(4, 2));
    }

    #[test]
    fn test_edit_after_end_is_ignored() {
        let mut region = region_with(Position::new(0, 6), "ab");
        let update = region.apply_change(&ChangeEvent::insert(Position::new(0, 10), "zz"));
        assert_eq!(update, RegionUpdate::Unaffected);
        let update = region.apply_change(&ChangeEvent::insert(Position::new(3, 0), "zz"));
        assert_eq!(update, RegionUpdate::Unaffected);
        assert_eq!(region.end(), Position::new(0, 8));
    }

    #[test]
    fn test_insert_at_start_keeps_anchor() {
        let mut region = region_with(Position::new(0, 6), "ab");
        region.apply_change(&ChangeEvent::insert(Position::new(0, 6), "xyz"));
        assert_eq!(region.start(), Position::new(0, 6));
        assert_eq!(region.end(), Position::new(0, 11));
    }
}
