//! TUI widgets

mod completion_popup;
mod mode_indicator;

pub use completion_popup::CompletionPopup;
pub use mode_indicator::ModeIndicator;
