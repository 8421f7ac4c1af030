//! Completion matcher
//!
//! Produces the candidate list for the token under the cursor. The search
//! word is the part of the token between its start and the cursor.
//!
//! - A word of exactly `\\` (a LaTeX line break) closes the popup and yields
//!   no candidates.
//! - A word containing anything other than word characters and backslashes
//!   is treated as empty, and the replacement range collapses to the cursor
//!   (the candidate is inserted, nothing is replaced).
//! - Only [`TokenKind::Tag`] tokens are completed; any other token yields an
//!   empty list.
//! - An entry qualifies when the word is empty or its display text starts
//!   with the word (case-sensitive).

use lazy_static::lazy_static;
use regex::Regex;

use crate::host::{HintHost, TokenKind};
use crate::macros::MacroEntry;
use crate::position::{char_len, Position};

lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^A-Za-z0-9_\\]").expect("valid regex");
    static ref ARG_MARKER: Regex = Regex::new(r"#[1-9]").expect("valid regex");
}

/// The escape pair that suppresses completion.
pub const LINE_BREAK: &str = "\\\\";

/// A completion result: candidates and the range they replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hints {
    /// Candidates in dictionary order
    pub list: Vec<Candidate>,
    /// Start of the replaced range
    pub from: Position,
    /// End of the replaced range
    pub to: Position,
}

impl Hints {
    /// Whether there is nothing to offer.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// A single completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Label shown in the popup
    pub display_text: String,
    /// Snippet template inserted on acceptance
    pub text: String,
    /// The search word this candidate matched
    pub word: String,
    /// Replacement start overriding the list-wide range
    pub from: Option<Position>,
    /// Replacement end overriding the list-wide range
    pub to: Option<Position>,
}

impl Candidate {
    fn from_entry(entry: &MacroEntry, word: &str) -> Self {
        Self {
            display_text: entry.text.clone(),
            text: entry.snippet.clone(),
            word: word.to_string(),
            from: None,
            to: None,
        }
    }

    /// Styled label: the typed prefix, then the rest with argument markers set apart.
    pub fn render(&self) -> Vec<LabelSpan> {
        let mut spans = vec![LabelSpan::new(self.word.clone(), LabelStyle::Entered)];

        let rest = self
            .display_text
            .char_indices()
            .nth(char_len(&self.word))
            .map(|(idx, _)| &self.display_text[idx..])
            .unwrap_or("");

        let mut last = 0;
        for m in ARG_MARKER.find_iter(rest) {
            if m.start() > last {
                spans.push(LabelSpan::new(&rest[last..m.start()], LabelStyle::Plain));
            }
            spans.push(LabelSpan::new(m.as_str(), LabelStyle::Arg));
            last = m.end();
        }
        if last < rest.len() {
            spans.push(LabelSpan::new(&rest[last..], LabelStyle::Plain));
        }
        spans
    }
}

/// How a piece of a candidate label is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// The part the user already typed (bold)
    Entered,
    /// Remaining label text
    Plain,
    /// A `#1`..`#9` placeholder marker
    Arg,
}

/// A styled piece of a candidate label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSpan {
    pub text: String,
    pub style: LabelStyle,
}

impl LabelSpan {
    fn new(text: impl Into<String>, style: LabelStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Compute completions for the token under the host's cursor.
pub fn hint<H: HintHost + ?Sized>(host: &mut H, macros: &[MacroEntry]) -> Hints {
    let cur = host.cursor();
    let token = host.token_at(cur);

    let mut start = token.start;
    let mut end = cur.ch;
    let mut word: String = token
        .string
        .chars()
        .take(end.saturating_sub(start))
        .collect();

    if word == LINE_BREAK {
        host.close_completion();
        return Hints {
            list: Vec::new(),
            from: Position::new(cur.line, start),
            to: Position::new(cur.line, end),
        };
    }
    if DISALLOWED.is_match(&word) {
        word.clear();
        start = cur.ch;
        end = cur.ch;
    }

    let list = if token.kind == TokenKind::Tag {
        macros
            .iter()
            .filter(|m| word.is_empty() || m.text.starts_with(&word))
            .map(|m| Candidate::from_entry(m, &word))
            .collect()
    } else {
        Vec::new()
    };

    Hints {
        list,
        from: Position::new(cur.line, start),
        to: Position::new(cur.line, end),
    }
}
