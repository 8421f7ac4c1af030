//! The host editor capability surface
//!
//! The completion matcher and the snippet engine never touch an editor
//! widget directly. Everything they need from the host goes through
//! [`HintHost`]:
//!
//! - cursor queries and cursor placement
//! - lexical tokens at a position
//! - text replacement, tagged with an origin label
//! - subscriptions for change events, cursor activity and key overrides
//! - closing the active completion popup
//!
//! Subscriptions return a [`ListenerId`]. Handing the id back to
//! [`HintHost::unsubscribe`] disposes of the listener; ids are never reused.
//! The host is expected to route events for a live listener to the engine
//! (see [`crate::editor::HintEditor`] for the reference routing).

use crate::keymap::KeyEvent;
use crate::position::Position;

/// Lexical category of a token, as classified by the host's tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A macro-like command (`\frac`, `\\`); the only completable kind
    Tag,
    /// `{`, `}`, `[`, `]`
    Bracket,
    /// Math shift and other keyword-like markup (`$`, `&`)
    Keyword,
    /// Line comment
    Comment,
    /// Anything else
    Text,
}

/// The token under a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Start column of the token
    pub start: usize,
    /// End column of the token (exclusive)
    pub end: usize,
    /// Token text
    pub string: String,
    /// Lexical category
    pub kind: TokenKind,
}

impl Token {
    /// An empty text token at a column, for positions with no token.
    pub fn empty(ch: usize) -> Self {
        Self {
            start: ch,
            end: ch,
            string: String::new(),
            kind: TokenKind::Text,
        }
    }
}

/// Handle for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// What a listener is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subscription {
    /// Every buffer change
    Change,
    /// Every cursor movement
    CursorActivity,
    /// Presses of one key, taken over from the host's own binding
    KeyOverride(KeyEvent),
}

/// The editor capabilities the completion engine depends on.
pub trait HintHost {
    /// Current cursor position.
    fn cursor(&self) -> Position;

    /// Move the cursor.
    fn set_cursor(&mut self, pos: Position);

    /// The token ending at or containing `pos`.
    fn token_at(&self, pos: Position) -> Token;

    /// Replace `from..to` with `text`, tagging the edit with `origin`.
    fn replace_range(&mut self, text: &str, from: Position, to: Position, origin: Option<&str>);

    /// Register a listener.
    fn subscribe(&mut self, subscription: Subscription) -> ListenerId;

    /// Remove a listener. Returns `false` if it was not registered.
    fn unsubscribe(&mut self, id: ListenerId) -> bool;

    /// Close the active completion popup, if any.
    fn close_completion(&mut self);
}
