//! Mode indicator widget for the TUI.

use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

use crate::mode::Mode;

/// Displays the current mode, color coded:
/// - Edit: Blue
/// - Complete: Yellow
/// - Snippet: Green
pub struct ModeIndicator {
    mode: Mode,
}

impl ModeIndicator {
    /// Create a new mode indicator for the given mode.
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    /// Get the display color for a mode.
    pub fn mode_color(mode: Mode) -> Color {
        match mode {
            Mode::Edit => Color::Blue,
            Mode::Complete => Color::Yellow,
            Mode::Snippet => Color::Green,
        }
    }

    /// Render as a styled span (for embedding in other widgets).
    pub fn as_span(&self) -> Span<'static> {
        Span::styled(
            format!("[{}]", self.mode.short_code()),
            Style::default()
                .fg(Color::White)
                .bg(Self::mode_color(self.mode))
                .add_modifier(Modifier::BOLD),
        )
    }
}
