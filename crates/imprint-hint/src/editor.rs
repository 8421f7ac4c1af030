//! Reference host editor
//!
//! [`MemoryEditor`] is a small line-based buffer implementing [`HintHost`].
//! It follows the event model the engine expects from real editors:
//!
//! - every edit emits a `Change`, followed by `CursorActivity`
//! - every cursor move emits `CursorActivity`
//! - events are queued per live listener, in emission order, and a listener's
//!   queued events are dropped when it unsubscribes
//!
//! [`HintEditor`] couples a `MemoryEditor` with a [`SnippetEngine`] and a
//! [`MacroDictionary`], and routes queued events to the engine after every
//! user action. It backs the integration tests and the terminal demo.

use std::collections::{BTreeMap, VecDeque};

use crate::change::{lines_of, ChangeEvent};
use crate::config::HintConfig;
use crate::engine::SnippetEngine;
use crate::error::Result;
use crate::host::{HintHost, ListenerId, Subscription, Token, TokenKind};
use crate::keymap::KeyEvent;
use crate::macros::MacroDictionary;
use crate::matcher::{self, Candidate, Hints};
use crate::position::{char_len, Position};

/// Origin label for typed text.
pub const INPUT_ORIGIN: &str = "+input";
/// Origin label for deletions.
pub const DELETE_ORIGIN: &str = "+delete";

/// An event waiting to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The buffer changed
    Change(ChangeEvent),
    /// The cursor moved or the buffer changed
    CursorActivity,
}

/// An event addressed to one listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub listener: ListenerId,
    pub event: EditorEvent,
}

/// A recorded edit, for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    pub change: ChangeEvent,
    pub origin: Option<String>,
}

/// In-memory line buffer with a LaTeX-aware tokenizer.
#[derive(Debug, Clone)]
pub struct MemoryEditor {
    lines: Vec<String>,
    cursor: Position,
    listeners: BTreeMap<ListenerId, Subscription>,
    next_listener: u64,
    queue: VecDeque<Dispatch>,
    completion_active: bool,
    history: Vec<EditRecord>,
}

impl Default for MemoryEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEditor {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// A buffer holding `text`, cursor at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: lines_of(text),
            cursor: Position::default(),
            listeners: BTreeMap::new(),
            next_listener: 0,
            queue: VecDeque::new(),
            completion_active: false,
            history: Vec::new(),
        }
    }

    /// Full buffer text.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Buffer lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line `line`, or `""` past the end.
    pub fn line(&self, line: usize) -> &str {
        self.lines.get(line).map(String::as_str).unwrap_or("")
    }

    /// Edits applied so far, oldest first.
    pub fn history(&self) -> &[EditRecord] {
        &self.history
    }

    /// Clamp a position into the buffer.
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len() - 1);
        Position::new(line, pos.ch.min(char_len(&self.lines[line])))
    }

    /// Whether the completion popup is open.
    pub fn completion_active(&self) -> bool {
        self.completion_active
    }

    /// Mark the completion popup as open.
    pub fn open_completion(&mut self) {
        self.completion_active = true;
    }

    /// Whether `id` is registered.
    pub fn is_subscribed(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// The listener overriding `key`, if any.
    pub fn key_override(&self, key: KeyEvent) -> Option<ListenerId> {
        self.listeners
            .iter()
            .find(|(_, sub)| **sub == Subscription::KeyOverride(key))
            .map(|(id, _)| *id)
    }

    /// Take the next queued event.
    pub fn pop_event(&mut self) -> Option<Dispatch> {
        self.queue.pop_front()
    }

    /// Insert text at the cursor, leaving the cursor after it.
    pub fn insert_at_cursor(&mut self, text: &str) {
        let at = self.cursor;
        self.replace_range(text, at, at, Some(INPUT_ORIGIN));
    }

    /// Delete the character before the cursor, joining lines at column 0.
    pub fn delete_backward(&mut self) {
        let to = self.cursor;
        let from = if to.ch > 0 {
            Position::new(to.line, to.ch - 1)
        } else if to.line > 0 {
            Position::new(to.line - 1, char_len(&self.lines[to.line - 1]))
        } else {
            return;
        };
        self.replace_range("", from, to, Some(DELETE_ORIGIN));
    }

    /// Text between two positions.
    pub fn range_text(&self, from: Position, to: Position) -> String {
        let (from, to) = (self.clamp(from), self.clamp(to));
        if from.line == to.line {
            return slice_chars(&self.lines[from.line], from.ch, to.ch).to_string();
        }
        let mut text = slice_chars(&self.lines[from.line], from.ch, usize::MAX).to_string();
        for line in &self.lines[from.line + 1..to.line] {
            text.push('\n');
            text.push_str(line);
        }
        text.push('\n');
        text.push_str(slice_chars(&self.lines[to.line], 0, to.ch));
        text
    }

    /// Tokenize one line.
    pub fn tokens(&self, line: usize) -> Vec<Token> {
        tokenize(self.line(line))
    }

    fn emit(&mut self, event: EditorEvent) {
        let wanted = match event {
            EditorEvent::Change(_) => Subscription::Change,
            EditorEvent::CursorActivity => Subscription::CursorActivity,
        };
        for (id, sub) in &self.listeners {
            if *sub == wanted {
                self.queue.push_back(Dispatch {
                    listener: *id,
                    event: event.clone(),
                });
            }
        }
    }

    fn map_cursor(&self, from: Position, to: Position, change_end: Position) -> Position {
        let cursor = self.cursor;
        if cursor < from {
            cursor
        } else if cursor <= to {
            change_end
        } else if cursor.line == to.line {
            Position::new(change_end.line, change_end.ch + (cursor.ch - to.ch))
        } else {
            let line = cursor.line + change_end.line - to.line;
            Position::new(line, cursor.ch)
        }
    }
}

impl HintHost for MemoryEditor {
    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.clamp(pos);
        self.emit(EditorEvent::CursorActivity);
    }

    fn token_at(&self, pos: Position) -> Token {
        let pos = self.clamp(pos);
        if pos.ch == 0 {
            return Token::empty(0);
        }
        let tokens = self.tokens(pos.line);
        tokens
            .iter()
            .find(|t| t.start < pos.ch && pos.ch <= t.end)
            .or_else(|| tokens.last())
            .cloned()
            .unwrap_or_else(|| Token::empty(pos.ch))
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position, origin: Option<&str>) {
        let (mut from, mut to) = (self.clamp(from), self.clamp(to));
        if to < from {
            std::mem::swap(&mut from, &mut to);
        }

        let removed = self.range_text(from, to);
        let inserted = lines_of(text);
        let head = slice_chars(&self.lines[from.line], 0, from.ch).to_string();
        let tail = slice_chars(&self.lines[to.line], to.ch, usize::MAX).to_string();

        let mut new_lines = inserted.clone();
        new_lines[0].insert_str(0, &head);
        if let Some(last) = new_lines.last_mut() {
            last.push_str(&tail);
        }
        self.lines.splice(from.line..=to.line, new_lines);

        let change_end = from.end_of_span(&inserted);
        self.cursor = self.map_cursor(from, to, change_end);

        let change = ChangeEvent {
            from,
            text: Some(inserted),
            removed: Some(lines_of(&removed)),
        };
        self.history.push(EditRecord {
            change: change.clone(),
            origin: origin.map(str::to_string),
        });
        self.emit(EditorEvent::Change(change));
        self.emit(EditorEvent::CursorActivity);
    }

    fn subscribe(&mut self, subscription: Subscription) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, subscription);
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.queue.retain(|d| d.listener != id);
        self.listeners.remove(&id).is_some()
    }

    fn close_completion(&mut self) {
        self.completion_active = false;
    }
}

/// Slice by character columns, clamping to the string.
fn slice_chars(s: &str, from: usize, to: usize) -> &str {
    let byte = |ch: usize| s.char_indices().nth(ch).map(|(i, _)| i).unwrap_or(s.len());
    let start = byte(from);
    let end = byte(to).max(start);
    &s[start..end]
}

/// Split a line into LaTeX tokens with character columns.
fn tokenize(line: &str) -> Vec<Token> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let start = i;
        let kind = match chars[i] {
            '%' => {
                i = chars.len();
                TokenKind::Comment
            }
            '\\' => {
                i += 1;
                if i < chars.len() && chars[i].is_ascii_alphabetic() {
                    while i < chars.len() && chars[i].is_ascii_alphabetic() {
                        i += 1;
                    }
                } else if i < chars.len() {
                    // control symbol such as \\ or \{
                    i += 1;
                }
                TokenKind::Tag
            }
            '{' | '}' | '[' | ']' => {
                i += 1;
                TokenKind::Bracket
            }
            '$' | '&' | '^' | '_' => {
                i += 1;
                TokenKind::Keyword
            }
            _ => {
                while i < chars.len() && !is_special(chars[i]) {
                    i += 1;
                }
                TokenKind::Text
            }
        };
        tokens.push(Token {
            start,
            end: i,
            string: chars[start..i].iter().collect(),
            kind,
        });
    }
    tokens
}

fn is_special(c: char) -> bool {
    matches!(c, '%' | '\\' | '{' | '}' | '[' | ']' | '$' | '&' | '^' | '_')
}

/// A [`MemoryEditor`] wired to a snippet engine and a macro dictionary.
#[derive(Debug, Clone)]
pub struct HintEditor {
    editor: MemoryEditor,
    engine: SnippetEngine,
    macros: MacroDictionary,
    hints: Option<Hints>,
}

impl HintEditor {
    /// Wrap a buffer with the given engine and dictionary.
    pub fn new(editor: MemoryEditor, engine: SnippetEngine, macros: MacroDictionary) -> Self {
        Self {
            editor,
            engine,
            macros,
            hints: None,
        }
    }

    /// A buffer holding `text` with the default engine and built-in macros.
    pub fn with_text(text: &str) -> Self {
        Self::new(
            MemoryEditor::from_text(text),
            SnippetEngine::new(),
            MacroDictionary::builtin(),
        )
    }

    /// A buffer holding `text`, configured from `config`.
    pub fn from_config(config: &HintConfig, text: &str) -> Result<Self> {
        Ok(Self::new(
            MemoryEditor::from_text(text),
            SnippetEngine::from_config(config)?,
            config.load_macros(),
        ))
    }

    /// The underlying buffer.
    pub fn editor(&self) -> &MemoryEditor {
        &self.editor
    }

    /// The snippet engine.
    pub fn engine(&self) -> &SnippetEngine {
        &self.engine
    }

    /// The macro dictionary.
    pub fn macros(&self) -> &MacroDictionary {
        &self.macros
    }

    /// Candidates of the open completion popup.
    pub fn hints(&self) -> Option<&Hints> {
        self.hints.as_ref()
    }

    /// Buffer text.
    pub fn text(&self) -> String {
        self.editor.text()
    }

    /// Cursor position.
    pub fn cursor(&self) -> Position {
        self.editor.cursor()
    }

    /// Type text at the cursor.
    pub fn type_text(&mut self, text: &str) {
        self.editor.insert_at_cursor(text);
        self.dispatch();
        if self.hints.is_some() {
            self.complete();
        }
    }

    /// Insert a line break at the cursor.
    pub fn newline(&mut self) {
        self.type_text("\n");
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        self.editor.delete_backward();
        self.dispatch();
        if self.hints.is_some() {
            self.complete();
        }
    }

    /// Replace a range programmatically.
    pub fn replace_range(&mut self, text: &str, from: Position, to: Position) {
        self.editor.replace_range(text, from, to, None);
        self.dispatch();
    }

    /// Move the cursor.
    pub fn move_cursor(&mut self, pos: Position) {
        self.editor.set_cursor(pos);
        self.dispatch();
    }

    /// Move the cursor one column left, wrapping to the previous line.
    pub fn move_left(&mut self) {
        let cur = self.cursor();
        let pos = if cur.ch > 0 {
            Position::new(cur.line, cur.ch - 1)
        } else if cur.line > 0 {
            Position::new(cur.line - 1, char_len(self.editor.line(cur.line - 1)))
        } else {
            cur
        };
        self.move_cursor(pos);
    }

    /// Move the cursor one column right, wrapping to the next line.
    pub fn move_right(&mut self) {
        let cur = self.cursor();
        let pos = if cur.ch < char_len(self.editor.line(cur.line)) {
            Position::new(cur.line, cur.ch + 1)
        } else if cur.line + 1 < self.editor.lines().len() {
            Position::new(cur.line + 1, 0)
        } else {
            cur
        };
        self.move_cursor(pos);
    }

    /// Deliver a key to the session override, if one holds it.
    ///
    /// Returns `false` when no override exists and the host should handle
    /// the key itself.
    pub fn press_key(&mut self, key: KeyEvent) -> bool {
        if self.editor.key_override(key).is_none() {
            return false;
        }
        let handled = self.engine.on_key(&mut self.editor, key);
        self.dispatch();
        handled
    }

    /// Open (or refresh) the completion popup at the cursor.
    pub fn complete(&mut self) -> Hints {
        self.editor.open_completion();
        let hints = matcher::hint(&mut self.editor, self.macros.entries());
        self.hints = if self.editor.completion_active() && !hints.is_empty() {
            Some(hints.clone())
        } else {
            self.editor.close_completion();
            None
        };
        hints
    }

    /// Close the completion popup.
    pub fn dismiss(&mut self) {
        self.editor.close_completion();
        self.hints = None;
    }

    /// Accept candidate `index` of the open popup.
    pub fn accept(&mut self, index: usize) -> bool {
        let Some(hints) = self.hints.take() else {
            return false;
        };
        let Some(candidate) = hints.list.get(index).cloned() else {
            self.hints = Some(hints);
            return false;
        };
        self.editor.close_completion();
        self.accept_candidate(&hints, &candidate);
        true
    }

    /// Expand a candidate against an explicit completion range.
    pub fn accept_candidate(&mut self, hints: &Hints, candidate: &Candidate) {
        self.engine.accept(&mut self.editor, hints, candidate);
        self.dispatch();
    }

    /// End any snippet session.
    pub fn stop_snippet(&mut self) {
        self.engine.stop(&mut self.editor);
        self.dispatch();
    }

    /// Deliver queued events to the engine, in order.
    fn dispatch(&mut self) {
        while let Some(Dispatch { listener, event }) = self.editor.pop_event() {
            let owned = self
                .engine
                .session()
                .is_some_and(|session| session.owns_listener(listener));
            if !owned || !self.editor.is_subscribed(listener) {
                continue;
            }
            match event {
                EditorEvent::Change(change) => self.engine.on_change(&mut self.editor, &change),
                EditorEvent::CursorActivity => self.engine.on_cursor_activity(&mut self.editor),
            }
        }
    }
}
