//! Key bindings for snippet sessions.
//!
//! A live snippet session overrides a small set of keys in the host editor.
//! By default only `Tab` is taken, moving to the next placeholder. The
//! override is removed together with the session, so outside a session the
//! key reaches the host unchanged.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::HintError;

/// A key event that can be bound while a session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key character (or special key code).
    pub key: char,
    /// Whether shift modifier is held.
    pub shift: bool,
    /// Whether control modifier is held.
    pub ctrl: bool,
    /// Whether alt/option modifier is held.
    pub alt: bool,
}

impl KeyEvent {
    /// Create a simple key event with no modifiers.
    pub fn new(key: char) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
            alt: false,
        }
    }

    /// Create a key event with shift modifier.
    pub fn shift(key: char) -> Self {
        Self {
            shift: true,
            ..Self::new(key)
        }
    }

    /// Create a key event with control modifier.
    pub fn ctrl(key: char) -> Self {
        Self {
            ctrl: true,
            ..Self::new(key)
        }
    }

    /// Create a key event with alt modifier.
    pub fn alt(key: char) -> Self {
        Self {
            alt: true,
            ..Self::new(key)
        }
    }

    /// The Tab key.
    pub fn tab() -> Self {
        Self::new('\t')
    }

    /// Returns a display string for this key (e.g., "C-j", "S-Tab", "Tab").
    pub fn display(&self) -> String {
        let mut result = String::new();
        if self.ctrl {
            result.push_str("C-");
        }
        if self.alt {
            result.push_str("A-");
        }
        if self.shift && !self.key.is_uppercase() {
            result.push_str("S-");
        }

        match self.key {
            ' ' => result.push_str("Space"),
            '\t' => result.push_str("Tab"),
            '\n' | '\r' => result.push_str("Enter"),
            '\x1b' => result.push_str("Esc"),
            '\x7f' => result.push_str("Backspace"),
            c => result.push(c),
        }
        result
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for KeyEvent {
    type Err = HintError;

    /// Parse the notation produced by [`KeyEvent::display`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut event = KeyEvent::new(' ');
        let mut rest = s;
        loop {
            if let Some(r) = rest.strip_prefix("C-") {
                event.ctrl = true;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("A-") {
                event.alt = true;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("S-") {
                event.shift = true;
                rest = r;
            } else {
                break;
            }
        }

        event.key = match rest {
            "Space" => ' ',
            "Tab" => '\t',
            "Enter" => '\n',
            "Esc" => '\x1b',
            "Backspace" => '\x7f',
            _ => {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => return Err(HintError::InvalidKey(s.to_string())),
                }
            }
        };
        // Hosts fold shift into letters, so "S-a" is the key 'A'
        if event.shift && event.key.is_alphabetic() {
            event.shift = false;
            event.key = event.key.to_uppercase().next().unwrap_or(event.key);
        }
        Ok(event)
    }
}

/// Commands available while a snippet session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetCommand {
    /// Jump to the next placeholder
    NextPlaceholder,
}

impl SnippetCommand {
    /// Returns a description for help display.
    pub fn description(&self) -> &'static str {
        match self {
            SnippetCommand::NextPlaceholder => "next placeholder",
        }
    }
}

/// Keys a snippet session takes over from the host.
#[derive(Debug, Clone)]
pub struct SnippetKeymap {
    map: HashMap<KeyEvent, SnippetCommand>,
    /// Binding order, for stable subscription and display
    order: Vec<KeyEvent>,
}

impl Default for SnippetKeymap {
    fn default() -> Self {
        Self::with_advance_key(KeyEvent::tab())
    }
}

impl SnippetKeymap {
    /// Create an empty keymap.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// A keymap binding only the given advance key.
    pub fn with_advance_key(key: KeyEvent) -> Self {
        let mut keymap = Self::new();
        keymap.bind(key, SnippetCommand::NextPlaceholder);
        keymap
    }

    /// Bind a key, replacing any previous binding for it.
    pub fn bind(&mut self, key: KeyEvent, command: SnippetCommand) {
        if self.map.insert(key, command).is_none() {
            self.order.push(key);
        }
    }

    /// Look up the command bound to a key.
    pub fn lookup(&self, key: &KeyEvent) -> Option<SnippetCommand> {
        self.map.get(key).copied()
    }

    /// Bound keys in binding order.
    pub fn keys(&self) -> &[KeyEvent] {
        &self.order
    }

    /// (key, description) pairs for help display.
    pub fn describe(&self) -> Vec<(String, &'static str)> {
        self.order
            .iter()
            .filter_map(|k| self.map.get(k).map(|c| (k.display(), c.description())))
            .collect()
    }
}
