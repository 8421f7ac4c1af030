//! Application state and main render loop

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use imprint_hint::{HintConfig, HintEditor, Position};

use crate::keybindings::{self, Action, PopupAction};
use crate::mode::Mode;
use crate::widgets::{CompletionPopup, ModeIndicator};

/// Spaces inserted by Tab outside a snippet session.
const INDENT: &str = "  ";

/// Main application state
pub struct App {
    /// Buffer, completion and snippet engine
    pub editor: HintEditor,
    /// Selected candidate in the popup
    pub selected: usize,
    /// Status message
    pub status_message: Option<String>,
    /// Whether to show the help overlay
    pub show_help: bool,
}

impl App {
    /// Create a new application instance
    pub fn new(config: &HintConfig, text: &str) -> imprint_hint::Result<Self> {
        let editor = HintEditor::from_config(config, text)?;
        tracing::info!("Loaded {} macros", editor.macros().len());
        Ok(Self {
            editor,
            selected: 0,
            status_message: None,
            show_help: false,
        })
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        Mode::of(&self.editor)
    }

    /// Handle a key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if self.show_help {
            self.show_help = false;
            return false;
        }
        self.status_message = None;

        if self.editor.hints().is_some() {
            if let Some(action) = keybindings::popup_action(code) {
                self.handle_popup(action);
                return false;
            }
        } else if let Some(key) = keybindings::hint_key(code, modifiers) {
            // A live session takes its keys before the editor sees them
            if self.editor.press_key(key) {
                self.status_message = self.session_status();
                return false;
            }
        }

        let Some(action) = keybindings::edit_action(code, modifiers) else {
            return false;
        };
        match action {
            Action::Quit => return true,
            Action::ToggleHelp => self.show_help = true,
            Action::Complete => {
                self.selected = 0;
                if self.editor.complete().is_empty() {
                    self.status_message = Some("No completions".to_string());
                }
            }
            Action::Cancel => self.editor.stop_snippet(),
            Action::Insert(c) => self.editor.type_text(c.encode_utf8(&mut [0; 4])),
            Action::Newline => self.editor.newline(),
            Action::Backspace => self.editor.backspace(),
            Action::Indent => self.editor.type_text(INDENT),
            Action::MoveLeft => self.editor.move_left(),
            Action::MoveRight => self.editor.move_right(),
            Action::MoveUp => {
                let cur = self.editor.cursor();
                if cur.line > 0 {
                    self.editor.move_cursor(Position::new(cur.line - 1, cur.ch));
                }
            }
            Action::MoveDown => {
                let cur = self.editor.cursor();
                self.editor.move_cursor(Position::new(cur.line + 1, cur.ch));
            }
        }
        self.clamp_selection();
        false
    }

    fn handle_popup(&mut self, action: PopupAction) {
        let len = self.editor.hints().map_or(0, |h| h.list.len());
        match action {
            PopupAction::Prev => self.selected = self.selected.checked_sub(1).unwrap_or(len - 1),
            PopupAction::Next => self.selected = (self.selected + 1) % len,
            PopupAction::Accept => {
                self.editor.accept(self.selected);
                self.selected = 0;
                self.status_message = self.session_status();
            }
            PopupAction::Dismiss => {
                self.editor.dismiss();
                self.selected = 0;
            }
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = match self.editor.hints() {
            Some(hints) => self.selected.min(hints.list.len().saturating_sub(1)),
            None => 0,
        };
    }

    fn session_status(&self) -> Option<String> {
        let session = self.editor.engine().session()?;
        let keys: Vec<String> = self
            .editor
            .engine()
            .keymap()
            .describe()
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        Some(format!(
            "{} more stop(s), {} to advance",
            session.remaining_stops(),
            keys.join("/")
        ))
    }

    /// Render the application
    pub fn render(&self, frame: &mut Frame) {
        let size = frame.area();

        // Status bar at top, buffer in the middle, message line at bottom
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Min(0),    // Buffer
                Constraint::Length(1), // Message line
            ])
            .split(size);

        self.render_status_bar(frame, chunks[0]);
        let cursor = self.render_buffer(frame, chunks[1]);
        self.render_message_line(frame, chunks[2]);

        if let Some(hints) = self.editor.hints() {
            let popup = CompletionPopup::new(hints, self.selected);
            let area = popup.area(cursor, chunks[1]);
            frame.render_widget(popup, area);
        }

        if self.show_help {
            self.render_help_overlay(frame, size);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let cursor = self.editor.cursor();
        let mut spans = vec![
            ModeIndicator::new(self.mode()).as_span(),
            Span::raw(format!(" Ln {}, Col {} ", cursor.line + 1, cursor.ch + 1)),
        ];
        if let Some(session) = self.editor.engine().session() {
            spans.push(Span::styled(
                format!("| stop {}..{} ", session.start(), session.end()),
                Style::default().fg(Color::Green),
            ));
        }
        spans.push(Span::raw("| F1 for help "));

        let status_bar =
            Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(status_bar, area);
    }

    /// Draw the buffer and place the terminal cursor. Returns the cursor cell.
    fn render_buffer(&self, frame: &mut Frame, area: Rect) -> (u16, u16) {
        let cursor = self.editor.cursor();
        let offset = cursor.line.saturating_sub(area.height.saturating_sub(1) as usize);
        let region = self.editor.engine().session().map(|s| (s.start(), s.end()));

        let lines: Vec<Line> = self
            .editor
            .editor()
            .lines()
            .iter()
            .enumerate()
            .skip(offset)
            .take(area.height as usize)
            .map(|(i, line)| buffer_line(i, line, region))
            .collect();
        frame.render_widget(Paragraph::new(lines), area);

        let cell = cursor_cell(area, cursor, offset);
        frame.set_cursor_position(cell);
        cell
    }

    fn render_message_line(&self, frame: &mut Frame, area: Rect) {
        let text = self.status_message.as_deref().unwrap_or("");
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
            area,
        );
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let mut entries: Vec<(String, &str)> = keybindings::help_entries()
            .into_iter()
            .map(|(key, desc)| (key.to_string(), desc))
            .collect();
        entries.extend(self.editor.engine().keymap().describe());

        let lines: Vec<Line> = entries
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:>10}  ", key),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*desc),
                ])
            })
            .collect();

        let width = 48.min(area.width);
        let height = (lines.len() as u16 + 2).min(area.height);
        let rect = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Keys ")),
            rect,
        );
    }
}

/// Terminal cell for `cursor`, clamped to the right edge of `area`.
fn cursor_cell(area: Rect, cursor: Position, offset: usize) -> (u16, u16) {
    let col = u16::try_from(cursor.ch).unwrap_or(u16::MAX);
    let row = u16::try_from(cursor.line.saturating_sub(offset)).unwrap_or(u16::MAX);
    let x = area.x.saturating_add(col).min(area.right().saturating_sub(1));
    let y = area.y.saturating_add(row).min(area.bottom().saturating_sub(1));
    (x, y)
}

/// One buffer line, with the active placeholder shaded.
fn buffer_line(index: usize, line: &str, region: Option<(Position, Position)>) -> Line<'static> {
    let Some((start, end)) = region.filter(|(s, e)| s.line <= index && index <= e.line) else {
        return Line::raw(line.to_string());
    };
    let len = line.chars().count();
    let from = if index == start.line { start.ch.min(len) } else { 0 };
    let to = if index == end.line { end.ch.min(len) } else { len };

    let before: String = line.chars().take(from).collect();
    let inside: String = line.chars().skip(from).take(to.saturating_sub(from)).collect();
    let after: String = line.chars().skip(to.max(from)).collect();
    Line::from(vec![
        Span::raw(before),
        Span::styled(inside, Style::default().bg(Color::DarkGray)),
        Span::raw(after),
    ])
}
