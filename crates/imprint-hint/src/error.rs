//! Error types for imprint-hint
//!
//! Completion and snippet expansion never fail: malformed input degrades
//! silently (see the matcher and engine docs). Errors only arise when
//! loading configuration and macro dictionaries.

use thiserror::Error;

/// Result type alias for imprint-hint operations
pub type Result<T> = std::result::Result<T, HintError>;

/// Main error type for imprint-hint operations
#[derive(Error, Debug)]
pub enum HintError {
    /// Reading a config or dictionary file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON dictionary or config could not be parsed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A snippet template uses a malformed placeholder marker
    #[error("Invalid template for {name}: {source}")]
    InvalidTemplate {
        name: String,
        #[source]
        source: TemplateError,
    },

    /// A key binding could not be parsed
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Configuration values are inconsistent
    #[error("Config error: {0}")]
    Config(String),
}

/// Template marker errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `#` with no placeholder index after it
    #[error("bare '#' at offset {offset}")]
    BareMarker { offset: usize },

    /// A `#` followed by something other than 1-9
    #[error("invalid placeholder index {found:?} at offset {offset}")]
    InvalidIndex { offset: usize, found: char },
}
