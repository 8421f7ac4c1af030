//! Snippet expansion engine
//!
//! Accepting a candidate inserts its template with the placeholder markers
//! removed and puts the cursor at the first placeholder. When the template
//! has two or more placeholders a tab-stop session opens:
//!
//! - a change listener keeps the active placeholder [`Region`] in step with
//!   every edit
//! - a cursor listener ends the session once the cursor leaves the region
//! - the advance key jumps to the next placeholder
//!
//! Edits before the region move it along. The session ends when the cursor
//! leaves the region, when a deletion crosses the region start, or when the
//! advance key reaches the last placeholder.
//! [`SnippetEngine::stop`] is the only place listeners are removed, and it
//! removes all of them at once.
//!
//! # Event routing
//!
//! The engine does not own the host. The host (or a wrapper such as
//! [`crate::editor::HintEditor`]) forwards events for the listeners the
//! engine registered to [`SnippetEngine::on_change`],
//! [`SnippetEngine::on_cursor_activity`] and [`SnippetEngine::on_key`]. For a
//! single user action the change must be forwarded before the cursor
//! activity, otherwise the containment check runs against a stale region.

use std::collections::VecDeque;

use crate::change::ChangeEvent;
use crate::config::HintConfig;
use crate::host::{HintHost, ListenerId, Subscription};
use crate::keymap::{KeyEvent, SnippetCommand, SnippetKeymap};
use crate::matcher::{Candidate, Hints};
use crate::position::Position;
use crate::region::{Region, RegionUpdate};
use crate::template::SnippetTemplate;

/// Origin label attached to snippet insertions by default.
pub const COMPLETE_ORIGIN: &str = "complete";

/// Listener handles owned by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionListeners {
    keys: Vec<ListenerId>,
    change: ListenerId,
    cursor: ListenerId,
}

impl SessionListeners {
    fn install<H: HintHost + ?Sized>(host: &mut H, keymap: &SnippetKeymap) -> Self {
        // Change before cursor activity so hosts that dispatch in
        // registration order update the region before checking it
        let change = host.subscribe(Subscription::Change);
        let cursor = host.subscribe(Subscription::CursorActivity);
        let keys = keymap
            .keys()
            .iter()
            .map(|key| host.subscribe(Subscription::KeyOverride(*key)))
            .collect();
        Self { keys, change, cursor }
    }

    fn ids(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.keys.iter().copied().chain([self.change, self.cursor])
    }
}

/// A live tab-stop session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    region: Region,
    /// Literal segments not yet passed, next one first
    pending: VecDeque<String>,
    listeners: SessionListeners,
}

impl Session {
    /// The active placeholder region.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Start of the active placeholder.
    pub fn start(&self) -> Position {
        self.region.start()
    }

    /// End of the active placeholder.
    pub fn end(&self) -> Position {
        self.region.end()
    }

    /// Placeholders left to visit after the active one.
    pub fn remaining_stops(&self) -> usize {
        self.pending.len().saturating_sub(1)
    }

    /// Whether `id` is one of this session's listeners.
    pub fn owns_listener(&self, id: ListenerId) -> bool {
        self.listeners.ids().any(|own| own == id)
    }
}

/// The snippet expansion engine. Holds at most one session.
#[derive(Debug, Clone)]
pub struct SnippetEngine {
    keymap: SnippetKeymap,
    origin_label: String,
    session: Option<Session>,
}

impl Default for SnippetEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SnippetEngine {
    /// An engine advancing on `Tab` and tagging edits as `"complete"`.
    pub fn new() -> Self {
        Self::with_keymap(SnippetKeymap::default())
    }

    /// An engine with custom session keys.
    pub fn with_keymap(keymap: SnippetKeymap) -> Self {
        Self {
            keymap,
            origin_label: COMPLETE_ORIGIN.to_string(),
            session: None,
        }
    }

    /// An engine configured from [`HintConfig`].
    pub fn from_config(config: &HintConfig) -> crate::error::Result<Self> {
        let mut engine = Self::with_keymap(SnippetKeymap::with_advance_key(config.advance_key()?));
        engine.origin_label = config.origin_label.clone();
        Ok(engine)
    }

    /// The keys a session takes over.
    pub fn keymap(&self) -> &SnippetKeymap {
        &self.keymap
    }

    /// Whether a session is active.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The active session.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Expand `candidate` into the buffer.
    ///
    /// The candidate's own `from`/`to` take precedence over the list-wide
    /// range in `hints`. An active session is stopped first.
    pub fn accept<H: HintHost + ?Sized>(&mut self, host: &mut H, hints: &Hints, candidate: &Candidate) {
        if self.session.is_some() {
            tracing::debug!("Replacing active snippet session");
            self.stop(host);
        }

        let template = SnippetTemplate::parse(&candidate.text);
        let opens_session = template.has_tab_stops();
        let literal = template.literal_text();
        let mut pending: VecDeque<String> = template.into_segments().into();
        // parse always yields at least one segment
        let first = pending.pop_front().unwrap_or_default();

        let from = candidate.from.unwrap_or(hints.from);
        let to = candidate.to.unwrap_or(hints.to);
        let region = Region::new(from.advance_over(&first));

        host.replace_range(&literal, from, to, Some(&self.origin_label));
        host.set_cursor(region.end());

        if opens_session {
            let listeners = SessionListeners::install(host, &self.keymap);
            tracing::debug!(
                "Snippet session opened for {} at {} with {} more stops",
                candidate.display_text,
                region.start(),
                pending.len() - 1
            );
            self.session = Some(Session {
                region,
                pending,
                listeners,
            });
        }
    }

    /// Fold a buffer change into the active region.
    pub fn on_change<H: HintHost + ?Sized>(&mut self, host: &mut H, change: &ChangeEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.region.apply_change(change) {
            RegionUpdate::Adjusted => {
                tracing::trace!(
                    "Region now {}..{} ({:?})",
                    session.region.start(),
                    session.region.end(),
                    session.region.content()
                );
            }
            RegionUpdate::Unaffected => {}
            RegionUpdate::Detached => {
                tracing::debug!("Edit at {} removed the snippet region start", change.from);
                self.stop(host);
            }
        }
    }

    /// End the session if the cursor left the active region.
    pub fn on_cursor_activity<H: HintHost + ?Sized>(&mut self, host: &mut H) {
        let Some(session) = &self.session else {
            return;
        };

        let cursor = host.cursor();
        if !session.region.contains(cursor) {
            tracing::debug!(
                "Cursor {} left snippet region {}..{}",
                cursor,
                session.region.start(),
                session.region.end()
            );
            self.stop(host);
        }
    }

    /// Handle an overridden key. Returns `true` if the key was consumed.
    pub fn on_key<H: HintHost + ?Sized>(&mut self, host: &mut H, key: KeyEvent) -> bool {
        if self.session.is_none() {
            return false;
        }
        match self.keymap.lookup(&key) {
            Some(SnippetCommand::NextPlaceholder) => {
                self.advance(host);
                true
            }
            None => false,
        }
    }

    /// Jump to the next placeholder.
    ///
    /// The session ends on arrival at the last placeholder, when only the
    /// trailing literal segment is left.
    pub fn advance<H: HintHost + ?Sized>(&mut self, host: &mut H) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let Some(segment) = session.pending.pop_front() {
            let start = session.region.end().advance_over(&segment);
            session.region = Region::new(start);
            host.set_cursor(start);
            tracing::debug!("Advanced to placeholder at {}", start);
        }

        if session.pending.len() <= 1 {
            self.stop(host);
        }
    }

    /// End the session and remove all of its listeners. Safe to call twice.
    pub fn stop<H: HintHost + ?Sized>(&mut self, host: &mut H) {
        let Some(session) = self.session.take() else {
            return;
        };
        for id in session.listeners.ids() {
            if !host.unsubscribe(id) {
                tracing::warn!("Snippet listener {:?} was already removed", id);
            }
        }
        tracing::debug!("Snippet session ended");
    }
}
