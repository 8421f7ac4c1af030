//! Completion popup widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use imprint_hint::{Candidate, Hints, LabelStyle};

/// Rows shown before the list scrolls.
const MAX_ROWS: usize = 8;

/// Candidate list drawn next to the cursor.
pub struct CompletionPopup<'a> {
    hints: &'a Hints,
    selected: usize,
}

impl<'a> CompletionPopup<'a> {
    pub fn new(hints: &'a Hints, selected: usize) -> Self {
        Self { hints, selected }
    }

    /// Where the popup goes: below `anchor` if it fits, above otherwise,
    /// shifted left to stay inside `bounds`.
    pub fn area(&self, anchor: (u16, u16), bounds: Rect) -> Rect {
        let label_width = self
            .hints
            .list
            .iter()
            .map(|c| c.display_text.chars().count())
            .max()
            .unwrap_or(0);
        let width = (label_width as u16 + 2).min(bounds.width);
        let height = (self.hints.list.len().min(MAX_ROWS) as u16 + 2).min(bounds.height);

        let x = anchor.0.min(bounds.right().saturating_sub(width)).max(bounds.x);
        let below = anchor.1 + 1;
        let y = if below + height <= bounds.bottom() {
            below
        } else {
            anchor.1.saturating_sub(height).max(bounds.y)
        };
        Rect::new(x, y, width, height)
    }
}

/// A candidate label: typed prefix in bold, argument markers highlighted.
pub fn label_line(candidate: &Candidate) -> Line<'static> {
    let spans: Vec<Span> = candidate
        .render()
        .into_iter()
        .filter(|span| !span.text.is_empty())
        .map(|span| {
            let style = match span.style {
                LabelStyle::Entered => Style::default().add_modifier(Modifier::BOLD),
                LabelStyle::Plain => Style::default(),
                LabelStyle::Arg => Style::default().fg(Color::Cyan),
            };
            Span::styled(span.text, style)
        })
        .collect();
    Line::from(spans)
}

impl Widget for CompletionPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let visible = inner.height as usize;
        // Scroll just enough to keep the selection in view
        let first = self.selected.saturating_sub(visible.saturating_sub(1));
        for (row, (index, candidate)) in self
            .hints
            .list
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .enumerate()
        {
            let y = inner.y + row as u16;
            if index == self.selected {
                buf.set_style(
                    Rect::new(inner.x, y, inner.width, 1),
                    Style::default().bg(Color::Blue),
                );
            }
            buf.set_line(inner.x, y, &label_line(candidate), inner.width);
        }
    }
}
