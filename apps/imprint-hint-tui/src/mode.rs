//! TUI interaction modes

use imprint_hint::HintEditor;

/// The current interaction mode, derived from editor state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Plain typing (default)
    #[default]
    Edit,
    /// Completion popup open
    Complete,
    /// Snippet session active
    Snippet,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Edit => write!(f, "EDIT"),
            Mode::Complete => write!(f, "COMPLETE"),
            Mode::Snippet => write!(f, "SNIPPET"),
        }
    }
}

impl Mode {
    /// Returns a short code for compact display.
    pub fn short_code(&self) -> &'static str {
        match self {
            Mode::Edit => "EDT",
            Mode::Complete => "CMP",
            Mode::Snippet => "SNP",
        }
    }

    /// The mode an editor is in. An open popup wins over a session.
    pub fn of(editor: &HintEditor) -> Self {
        if editor.hints().is_some() {
            Mode::Complete
        } else if editor.engine().is_active() {
            Mode::Snippet
        } else {
            Mode::Edit
        }
    }
}
