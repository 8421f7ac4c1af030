//! Imprint Hint - LaTeX macro completion with tab-stop snippets
//!
//! This crate provides completion of backslash macros inside a text editor and
//! the expansion engine for multi-argument snippets:
//!
//! - **Matcher**: filters a macro dictionary by the word under the cursor and
//!   computes the range a completion replaces
//! - **Engine**: expands a snippet template, then tracks the active
//!   placeholder through every edit and jumps between placeholders on `Tab`
//! - **Region**: the arithmetic that keeps a placeholder's span correct as
//!   text is inserted and deleted, without re-reading the buffer
//! - **Host**: the trait an editor implements to host the engine
//! - **Editor**: an in-memory reference host used by tests and the TUI demo
//! - **Macros / Config**: the macro dictionary and user configuration
//!
//! # Snippet templates
//!
//! Templates mark placeholders with `#1`..`#9`:
//!
//! ```ignore
//! use imprint_hint::{HintEditor, KeyEvent};
//!
//! let mut editor = HintEditor::with_text("");
//! editor.type_text("\\fra");
//! editor.complete();
//! editor.accept(0);              // inserts "\frac{}{}", cursor inside first {}
//! editor.type_text("a");
//! editor.press_key(KeyEvent::tab()); // cursor inside second {}
//! ```

pub mod change;
pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod host;
pub mod keymap;
pub mod macros;
pub mod matcher;
pub mod position;
pub mod region;
pub mod template;

pub use change::*;
pub use config::*;
pub use editor::*;
pub use engine::*;
pub use error::*;
pub use host::*;
pub use keymap::*;
pub use macros::*;
pub use matcher::*;
pub use position::*;
pub use region::*;
pub use template::*;
