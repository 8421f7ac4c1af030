//! Configuration for imprint-hint
//!
//! Loaded from `hint.toml` in the imprint config directory:
//!
//! ```toml
//! advance_key = "Tab"
//! origin_label = "complete"
//! builtin_macros = true
//! macro_files = ["~/tex/macros.json"]
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HintError, Result};
use crate::keymap::KeyEvent;
use crate::macros::MacroDictionary;

/// File name of the config inside the imprint config directory.
pub const CONFIG_FILE_NAME: &str = "hint.toml";

/// Completion and snippet settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HintConfig {
    /// Key that jumps to the next placeholder, in `KeyEvent` notation
    pub advance_key: String,
    /// Origin label attached to snippet insertions
    pub origin_label: String,
    /// Whether the built-in LaTeX macros are offered
    pub builtin_macros: bool,
    /// Additional JSON macro dictionaries, loaded in order
    pub macro_files: Vec<PathBuf>,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            advance_key: "Tab".to_string(),
            origin_label: crate::engine::COMPLETE_ORIGIN.to_string(),
            builtin_macros: true,
            macro_files: Vec::new(),
        }
    }
}

impl HintConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config location, `<config dir>/imprint/hint.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("imprint").join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load the config at the default location, or defaults if there is none.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading hint config from {:?}", path);
                Self::from_path(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// The parsed advance key.
    pub fn advance_key(&self) -> Result<KeyEvent> {
        self.advance_key.parse()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.advance_key()?;
        if self.origin_label.trim().is_empty() {
            return Err(HintError::Config("origin_label must not be empty".to_string()));
        }
        Ok(())
    }

    /// Build the macro dictionary this config describes.
    ///
    /// A dictionary file that fails to load is skipped with a warning.
    pub fn load_macros(&self) -> MacroDictionary {
        let mut dict = if self.builtin_macros {
            MacroDictionary::builtin()
        } else {
            MacroDictionary::new()
        };

        for path in &self.macro_files {
            match MacroDictionary::from_path(path) {
                Ok(extra) => dict.extend(extra.entries().iter().cloned()),
                Err(e) => tracing::warn!("Failed to load macros from {:?}: {}", path, e),
            }
        }
        dict
    }
}
