//! Snippet template segmentation
//!
//! A template such as `\frac{#1}{#2}` is split at every placeholder marker
//! into literal segments: `["\frac{", "}{", "}"]`. Markers contribute no
//! text to the buffer; they only mark the boundaries between segments.
//!
//! # Preconditions
//!
//! Templates must only use `#<digit>` markers with a digit in `1..=9`.
//! [`SnippetTemplate::parse`] does not check this: the character after any
//! `#` is consumed as the index, whatever it is. Use
//! [`SnippetTemplate::validate`] when templates come from untrusted input.

use crate::error::TemplateError;

/// Marker character that starts a placeholder.
pub const PLACEHOLDER_MARKER: char = '#';

/// A snippet template split into literal segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetTemplate {
    segments: Vec<String>,
}

impl SnippetTemplate {
    /// Split a template on its placeholder markers.
    ///
    /// There is always one more segment than there are markers.
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars();

        while let Some(c) = chars.next() {
            if c == PLACEHOLDER_MARKER {
                segments.push(std::mem::take(&mut current));
                // The index digit carries no meaning beyond template order
                chars.next();
            } else {
                current.push(c);
            }
        }
        segments.push(current);

        Self { segments }
    }

    /// Check that every marker is followed by a digit in `1..=9`.
    ///
    /// Offsets in the returned error are character offsets into `text`.
    pub fn validate(text: &str) -> Result<(), TemplateError> {
        let mut chars = text.chars().enumerate();
        while let Some((offset, c)) = chars.next() {
            if c != PLACEHOLDER_MARKER {
                continue;
            }
            match chars.next() {
                None => return Err(TemplateError::BareMarker { offset }),
                Some((_, d)) if ('1'..='9').contains(&d) => {}
                Some((_, found)) => return Err(TemplateError::InvalidIndex { offset, found }),
            }
        }
        Ok(())
    }

    /// The literal segments in template order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Consume the template, returning its segments.
    pub fn into_segments(self) -> Vec<String> {
        self.segments
    }

    /// Number of placeholder markers in the template.
    pub fn placeholder_count(&self) -> usize {
        self.segments.len() - 1
    }

    /// Whether expansion needs a tab-stop session (two or more stops).
    pub fn has_tab_stops(&self) -> bool {
        self.placeholder_count() >= 2
    }

    /// The text actually inserted into the buffer.
    pub fn literal_text(&self) -> String {
        self.segments.concat()
    }
}
