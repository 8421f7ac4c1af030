//! Snippet session integration tests
//!
//! Drives the engine through `HintEditor`, so every edit goes through the
//! same change/cursor event routing a real host would use.

use imprint_hint::{Candidate, HintEditor, Hints, KeyEvent, MacroEntry, Position};
use proptest::prelude::*;
use rstest::rstest;

fn candidate(snippet: &str) -> Candidate {
    Candidate {
        display_text: snippet.to_string(),
        text: snippet.to_string(),
        word: String::new(),
        from: None,
        to: None,
    }
}

fn range(from: Position, to: Position) -> Hints {
    Hints {
        list: Vec::new(),
        from,
        to,
    }
}

/// Expand `snippet` at the end of a single-line buffer.
fn expand_at_end(text: &str, snippet: &str) -> HintEditor {
    let mut editor = HintEditor::with_text(text);
    let end = Position::new(0, text.chars().count());
    editor.move_cursor(end);
    editor.accept_candidate(&range(end, end), &candidate(snippet));
    editor
}

fn session_end(editor: &HintEditor) -> Position {
    editor.engine().session().expect("session active").end()
}

// === Expansion ===

#[rstest]
#[case("\\alpha", "\\alpha", 6)]
#[case("\\infty", "\\infty", 6)]
#[case("x^2", "x^2", 3)]
fn test_plain_template_inserts_verbatim(
    #[case] snippet: &str,
    #[case] expected: &str,
    #[case] cursor: usize,
) {
    let editor = expand_at_end("", snippet);
    assert_eq!(editor.text(), expected);
    assert_eq!(editor.cursor(), Position::new(0, cursor));
    assert!(!editor.engine().is_active());
    assert_eq!(editor.editor().listener_count(), 0);
}

#[test]
fn test_single_placeholder_places_cursor_without_session() {
    let editor = expand_at_end("$", "\\sqrt{#1}");
    assert_eq!(editor.text(), "$\\sqrt{}");
    assert_eq!(editor.cursor(), Position::new(0, 7));
    assert!(!editor.engine().is_active());
    assert_eq!(editor.editor().listener_count(), 0);
}

#[test]
fn test_frac_scenario() {
    let mut editor = expand_at_end("abcde", "\\frac{#1}{#2}");
    assert_eq!(editor.text(), "abcde\\frac{}{}");
    assert_eq!(editor.cursor(), Position::new(0, 11));
    assert!(editor.engine().is_active());

    assert!(editor.press_key(KeyEvent::tab()));
    assert_eq!(editor.cursor(), Position::new(0, 13));

    // Arriving at the last placeholder ends the session
    assert!(!editor.engine().is_active());
    assert_eq!(editor.editor().listener_count(), 0);
    assert!(!editor.press_key(KeyEvent::tab()));
}

#[test]
fn test_replacement_range_is_replaced() {
    let mut editor = HintEditor::with_text("x \\fr");
    editor.move_cursor(Position::new(0, 5));
    editor.accept_candidate(
        &range(Position::new(0, 2), Position::new(0, 5)),
        &candidate("\\frac{#1}{#2}"),
    );
    assert_eq!(editor.text(), "x \\frac{}{}");
    assert_eq!(editor.cursor(), Position::new(0, 8));
    assert_eq!(
        editor.editor().history().last().unwrap().origin.as_deref(),
        Some("complete")
    );
}

// === Advancing ===

#[test]
fn test_advance_visits_each_placeholder_in_order() {
    let mut editor = expand_at_end("", "\\int_{#1}^{#2}#3\\,d#4");
    assert_eq!(editor.text(), "\\int_{}^{}\\,d");

    let mut visited = vec![editor.cursor()];
    while editor.press_key(KeyEvent::tab()) {
        visited.push(editor.cursor());
    }

    assert_eq!(
        visited,
        vec![
            Position::new(0, 6),
            Position::new(0, 9),
            Position::new(0, 10),
            Position::new(0, 13),
        ]
    );
    assert!(!editor.engine().is_active());
}

#[test]
fn test_typed_text_shifts_next_stop() {
    let mut editor = expand_at_end("", "\\frac{#1}{#2}");
    editor.type_text("a+b");
    assert_eq!(editor.text(), "\\frac{a+b}{}");

    editor.press_key(KeyEvent::tab());
    assert_eq!(editor.cursor(), Position::new(0, 11));
    editor.type_text("c");
    assert_eq!(editor.text(), "\\frac{a+b}{c}");
}

#[test]
fn test_multiline_template_stops() {
    let mut editor = expand_at_end("", "\\begin{cases}\n#1 & #2 \\\\\n#3 & #4\n\\end{cases}");
    assert_eq!(editor.cursor(), Position::new(1, 0));

    editor.type_text("x");
    editor.press_key(KeyEvent::tab());
    assert_eq!(editor.cursor(), Position::new(1, 4));

    editor.type_text("y");
    editor.press_key(KeyEvent::tab());
    assert_eq!(editor.cursor(), Position::new(2, 0));

    editor.press_key(KeyEvent::tab());
    assert_eq!(editor.cursor(), Position::new(2, 3));
    assert!(!editor.engine().is_active());
    assert_eq!(editor.text(), "\\begin{cases}\nx & y \\\\\n & \n\\end{cases}");
}

#[test]
fn test_newline_inside_placeholder_moves_next_stop() {
    let mut editor = expand_at_end("", "\\frac{#1}{#2}");
    editor.type_text("a");
    editor.newline();
    editor.type_text("b");
    assert_eq!(session_end(&editor), Position::new(1, 1));

    editor.press_key(KeyEvent::tab());
    assert_eq!(editor.cursor(), Position::new(1, 3));
    assert_eq!(editor.text(), "\\frac{a\nb}{}");
}

#[test]
fn test_custom_advance_key() {
    use imprint_hint::{HintConfig, MacroDictionary};

    let config = HintConfig {
        advance_key: "C-j".to_string(),
        builtin_macros: false,
        ..HintConfig::default()
    };
    let mut editor = HintEditor::from_config(&config, "").unwrap();
    assert!(editor.macros().is_empty());
    assert_eq!(editor.macros(), &MacroDictionary::new());

    editor.accept_candidate(
        &range(Position::new(0, 0), Position::new(0, 0)),
        &candidate("\\frac{#1}{#2}"),
    );
    assert!(!editor.press_key(KeyEvent::tab()));
    assert!(editor.press_key(KeyEvent::ctrl('j')));
    assert_eq!(editor.cursor(), Position::new(0, 8));
}

// === Region tracking ===

#[test]
fn test_typing_extends_region() {
    let mut editor = expand_at_end("", "\\frac{#1}{#2}");
    let before = session_end(&editor);
    editor.type_text("abc");
    let after = session_end(&editor);
    assert_eq!(after.line, before.line);
    assert_eq!(after.ch, before.ch + 3);
    assert_eq!(editor.engine().session().unwrap().region().content(), &[9]);
}

#[test]
fn test_backspace_inside_region() {
    let mut editor = expand_at_end("", "\\frac{#1}{#2}");
    editor.type_text("abc");
    editor.backspace();
    assert_eq!(session_end(&editor), Position::new(0, 8));
    assert!(editor.engine().is_active());
}

#[test]
fn test_edit_after_region_does_not_move_it() {
    let mut editor = HintEditor::with_text("\n tail");
    editor.accept_candidate(
        &range(Position::new(0, 0), Position::new(0, 0)),
        &candidate("\\frac{#1}{#2}"),
    );
    editor.replace_range("!", Position::new(1, 5), Position::new(1, 5));
    assert!(editor.engine().is_active());
    assert_eq!(session_end(&editor), Position::new(0, 6));
}

#[test]
fn test_line_inserted_above_moves_region_down() {
    let mut editor = HintEditor::with_text("top\n");
    editor.accept_candidate(
        &range(Position::new(1, 0), Position::new(1, 0)),
        &candidate("\\frac{#1}{#2}"),
    );
    editor.type_text("ab");
    assert_eq!(editor.cursor(), Position::new(1, 8));

    editor.replace_range("new line\n", Position::new(0, 0), Position::new(0, 0));
    assert!(editor.engine().is_active());
    assert_eq!(editor.cursor(), Position::new(2, 8));
    assert_eq!(editor.engine().session().unwrap().start(), Position::new(2, 6));
    assert_eq!(session_end(&editor), Position::new(2, 8));

    assert!(editor.press_key(KeyEvent::tab()));
    assert_eq!(editor.cursor(), Position::new(2, 10));
    assert_eq!(editor.text(), "new line\ntop\n\\frac{ab}{}");
}

#[rstest]
#[case::insert_before("ZZ", (0, 0), (0, 0), (0, 10), (0, 11))]
#[case::delete_before("", (0, 0), (0, 1), (0, 7), (0, 8))]
#[case::break_line_before("\n", (0, 1), (0, 1), (1, 7), (1, 8))]
#[case::replace_before("y", (0, 0), (0, 2), (0, 7), (0, 8))]
fn test_edit_before_region_on_same_line(
    #[case] text: &str,
    #[case] from: (usize, usize),
    #[case] to: (usize, usize),
    #[case] start: (usize, usize),
    #[case] cursor: (usize, usize),
) {
    let mut editor = expand_at_end("ab", "\\frac{#1}{#2}");
    editor.type_text("x");
    editor.replace_range(text, from.into(), to.into());

    assert!(editor.engine().is_active());
    assert_eq!(editor.engine().session().unwrap().start(), start.into());
    assert_eq!(session_end(&editor), cursor.into());
    assert_eq!(editor.cursor(), cursor.into());

    // The next stop is still right after the filled placeholder's "}{"
    editor.press_key(KeyEvent::tab());
    let next: Position = cursor.into();
    assert_eq!(editor.cursor(), Position::new(next.line, next.ch + 2));
}

// === Termination ===

#[test]
fn test_cursor_at_region_edges_keeps_session() {
    let mut editor = expand_at_end("", "\\frac{#1}{#2}");
    editor.type_text("ab");
    let session = editor.engine().session().unwrap();
    let (start, end) = (session.start(), session.end());

    editor.move_cursor(start);
    assert!(editor.engine().is_active());
    editor.move_cursor(end);
    assert!(editor.engine().is_active());
}

#[test]
fn test_cursor_before_start_ends_session() {
    let mut editor = expand_at_end("", "\\frac{#1}{#2}");
    editor.type_text("ab");
    editor.move_cursor(Position::new(0, 5));
    assert!(!editor.engine().is_active());
    assert_eq!(editor.editor().listener_count(), 0);
}

#[test]
fn test_cursor_after_end_ends_session() {
    let mut editor = expand_at_end("", "\\frac{#1}{#2}");
    editor.type_text("ab");
    editor.move_right();
    assert_eq!(editor.cursor(), Position::new(0, 9));
    assert!(!editor.engine().is_active());
}

#[test]
fn test_backspace_at_start_moves_region() {
    let mut editor = expand_at_end("", "\\frac{#1}{#2}");
    editor.backspace();
    assert_eq!(editor.text(), "\\frac}{}");
    assert!(editor.engine().is_active());
    assert_eq!(editor.engine().session().unwrap().start(), Position::new(0, 5));
    assert_eq!(editor.cursor(), Position::new(0, 5));
}

#[test]
fn test_deleting_across_start_ends_session() {
    let mut editor = expand_at_end("", "\\frac{#1}{#2}");
    editor.type_text("ab");
    editor.replace_range("", Position::new(0, 5), Position::new(0, 7));
    assert_eq!(editor.text(), "\\fracb}{}");
    assert!(!editor.engine().is_active());
    assert_eq!(editor.editor().listener_count(), 0);
}

#[test]
fn test_tab_after_session_end_is_not_consumed() {
    let mut editor = expand_at_end("", "\\frac{#1}{#2}");
    editor.move_cursor(Position::new(0, 0));
    assert!(!editor.press_key(KeyEvent::tab()));
}

#[test]
fn test_stop_twice_is_harmless() {
    let mut editor = expand_at_end("", "\\frac{#1}{#2}");
    editor.stop_snippet();
    editor.stop_snippet();
    assert!(!editor.engine().is_active());
    assert_eq!(editor.editor().listener_count(), 0);
}

#[test]
fn test_new_expansion_replaces_old_session() {
    let mut editor = expand_at_end("", "\\frac{#1}{#2}");
    let end = editor.cursor();
    editor.accept_candidate(&range(end, end), &candidate("\\binom{#1}{#2}"));

    assert_eq!(editor.text(), "\\frac{\\binom{}{}}{}");
    assert_eq!(editor.editor().listener_count(), 3);

    editor.press_key(KeyEvent::tab());
    assert_eq!(editor.cursor(), Position::new(0, 15));
    assert!(!editor.engine().is_active());
}

#[test]
fn test_completion_flow_through_popup() {
    let mut editor = HintEditor::new(
        imprint_hint::MemoryEditor::new(),
        imprint_hint::SnippetEngine::new(),
        imprint_hint::MacroDictionary::from_entries(vec![
            MacroEntry::new("\\frac{#1}{#2}", "\\frac{#1}{#2}"),
            MacroEntry::new("\\alpha", "\\alpha"),
        ]),
    );
    editor.type_text("\\fr");
    let hints = editor.complete();
    assert_eq!(hints.list.len(), 1);

    assert!(editor.accept(0));
    assert!(editor.hints().is_none());
    assert_eq!(editor.text(), "\\frac{}{}");
    assert_eq!(editor.cursor(), Position::new(0, 6));
    assert!(editor.engine().is_active());
}

// === Property-Based Tests ===

proptest! {
    #[test]
    fn test_insert_then_delete_restores_end(
        text in "[a-z \\n]{1,12}",
        typed_first in "[a-z]{0,4}",
    ) {
        let mut editor = expand_at_end("", "\\frac{#1}{#2}");
        editor.type_text(&typed_first);
        let start = editor.engine().session().unwrap().start();
        let before = session_end(&editor);

        editor.replace_range(&text, start, start);
        prop_assert!(editor.engine().is_active());

        let inserted_end = start.advance_over(&text);
        editor.replace_range("", start, inserted_end);
        prop_assert!(editor.engine().is_active());
        prop_assert_eq!(session_end(&editor), before);
        prop_assert_eq!(editor.text(), format!("\\frac{{{}}}{{}}", typed_first));
    }

    #[test]
    fn test_region_end_matches_buffer(chunks in prop::collection::vec("[a-z]{1,3}|\\n", 1..8)) {
        let mut editor = expand_at_end("", "\\frac{#1}{#2}");
        for chunk in &chunks {
            editor.type_text(chunk);
        }
        let typed: String = chunks.concat();
        let expected = Position::new(0, 6).advance_over(&typed);
        prop_assert_eq!(session_end(&editor), expected);
        prop_assert_eq!(editor.cursor(), expected);
    }
}
