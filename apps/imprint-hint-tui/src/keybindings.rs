//! Keybinding definitions

use crossterm::event::{KeyCode, KeyModifiers};

use imprint_hint::KeyEvent;

/// Keybinding action while editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application
    Quit,
    /// Toggle help
    ToggleHelp,
    /// Open the completion popup
    Complete,
    /// End the snippet session
    Cancel,
    /// Type a character
    Insert(char),
    /// Break the line
    Newline,
    /// Delete before the cursor
    Backspace,
    /// Insert indentation
    Indent,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
}

/// Keybinding action while the completion popup is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupAction {
    /// Select the previous candidate
    Prev,
    /// Select the next candidate
    Next,
    /// Accept the selected candidate
    Accept,
    /// Close the popup
    Dismiss,
}

/// Get the action for a key while editing
pub fn edit_action(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('q') | KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char(' ') => Some(Action::Complete),
            _ => None,
        };
    }
    match code {
        // Some terminals report Ctrl-Space as NUL
        KeyCode::Null => Some(Action::Complete),
        KeyCode::F(1) => Some(Action::ToggleHelp),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Char(c) => Some(Action::Insert(c)),
        KeyCode::Enter => Some(Action::Newline),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Tab => Some(Action::Indent),
        KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        _ => None,
    }
}

/// Get the action for a key while the popup is open
pub fn popup_action(code: KeyCode) -> Option<PopupAction> {
    match code {
        KeyCode::Up => Some(PopupAction::Prev),
        KeyCode::Down => Some(PopupAction::Next),
        KeyCode::Enter | KeyCode::Tab => Some(PopupAction::Accept),
        KeyCode::Esc => Some(PopupAction::Dismiss),
        _ => None,
    }
}

/// Translate a terminal key into the notation snippet sessions bind.
pub fn hint_key(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyEvent> {
    let (key, shift) = match code {
        KeyCode::Tab => ('\t', false),
        KeyCode::BackTab => ('\t', true),
        KeyCode::Enter => ('\n', false),
        KeyCode::Esc => ('\x1b', false),
        KeyCode::Backspace => ('\x7f', false),
        // Shift is already folded into the character
        KeyCode::Char(c) => (c, false),
        _ => return None,
    };
    Some(KeyEvent {
        key,
        shift: shift || (key == '\t' && modifiers.contains(KeyModifiers::SHIFT)),
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        alt: modifiers.contains(KeyModifiers::ALT),
    })
}

/// Key descriptions for the help overlay.
pub fn help_entries() -> Vec<(&'static str, &'static str)> {
    vec![
        ("C-Space", "Complete macro"),
        ("Up/Down", "Select candidate"),
        ("Enter", "Accept candidate"),
        ("Esc", "Close popup / end snippet"),
        ("F1", "Toggle help"),
        ("C-q", "Quit"),
    ]
}
