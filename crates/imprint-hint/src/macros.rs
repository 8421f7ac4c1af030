//! The LaTeX macro dictionary
//!
//! Macro entries map a display text (the match key, e.g. `\frac`) to a
//! snippet template (e.g. `\frac{#1}{#2}`). The dictionary is loaded once at
//! startup and never mutated while completions are served.
//!
//! Dictionaries on disk are JSON arrays in the same shape as [`MacroEntry`]:
//!
//! ```json
//! [
//!   { "text": "\\frac", "snippet": "\\frac{#1}{#2}" },
//!   { "text": "\\alpha", "snippet": "\\alpha" }
//! ]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HintError, Result};
use crate::template::SnippetTemplate;

/// A single completable macro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroEntry {
    /// Display text and match key
    pub text: String,
    /// Expansion template with `#1`..`#9` placeholders
    pub snippet: String,
}

impl MacroEntry {
    /// Create a new entry.
    pub fn new(text: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            snippet: snippet.into(),
        }
    }

    /// Check the snippet template for malformed markers.
    pub fn validate(&self) -> Result<()> {
        SnippetTemplate::validate(&self.snippet).map_err(|source| HintError::InvalidTemplate {
            name: self.text.clone(),
            source,
        })
    }
}

/// An ordered, immutable collection of macro entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroDictionary {
    entries: Vec<MacroEntry>,
}

impl MacroDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in LaTeX macro set.
    pub fn builtin() -> Self {
        Self {
            entries: builtin_macros(),
        }
    }

    /// Build a dictionary from entries, dropping those with malformed templates.
    pub fn from_entries(entries: Vec<MacroEntry>) -> Self {
        let mut dict = Self::new();
        dict.extend(entries);
        dict
    }

    /// Parse a JSON dictionary.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<MacroEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Load a JSON dictionary from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let dict = Self::from_json(&json)?;
        tracing::debug!("Loaded {} macros from {:?}", dict.len(), path);
        Ok(dict)
    }

    /// Append entries, skipping malformed templates.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = MacroEntry>) {
        for entry in entries {
            match entry.validate() {
                Ok(()) => self.entries.push(entry),
                Err(e) => tracing::warn!("Skipping macro: {}", e),
            }
        }
    }

    /// All entries in load order.
    pub fn entries(&self) -> &[MacroEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn builtin_macros() -> Vec<MacroEntry> {
    const MACROS: &[(&str, &str)] = &[
        // Greek letters
        ("\\alpha", "\\alpha"),
        ("\\beta", "\\beta"),
        ("\\gamma", "\\gamma"),
        ("\\delta", "\\delta"),
        ("\\epsilon", "\\epsilon"),
        ("\\varepsilon", "\\varepsilon"),
        ("\\zeta", "\\zeta"),
        ("\\eta", "\\eta"),
        ("\\theta", "\\theta"),
        ("\\vartheta", "\\vartheta"),
        ("\\kappa", "\\kappa"),
        ("\\lambda", "\\lambda"),
        ("\\mu", "\\mu"),
        ("\\nu", "\\nu"),
        ("\\xi", "\\xi"),
        ("\\pi", "\\pi"),
        ("\\rho", "\\rho"),
        ("\\sigma", "\\sigma"),
        ("\\tau", "\\tau"),
        ("\\phi", "\\phi"),
        ("\\varphi", "\\varphi"),
        ("\\chi", "\\chi"),
        ("\\psi", "\\psi"),
        ("\\omega", "\\omega"),
        ("\\Gamma", "\\Gamma"),
        ("\\Delta", "\\Delta"),
        ("\\Theta", "\\Theta"),
        ("\\Lambda", "\\Lambda"),
        ("\\Sigma", "\\Sigma"),
        ("\\Phi", "\\Phi"),
        ("\\Omega", "\\Omega"),
        // Operators and relations
        ("\\sum", "\\sum"),
        ("\\prod", "\\prod"),
        ("\\int", "\\int"),
        ("\\oint", "\\oint"),
        ("\\partial", "\\partial"),
        ("\\nabla", "\\nabla"),
        ("\\infty", "\\infty"),
        ("\\cdot", "\\cdot"),
        ("\\times", "\\times"),
        ("\\pm", "\\pm"),
        ("\\leq", "\\leq"),
        ("\\geq", "\\geq"),
        ("\\neq", "\\neq"),
        ("\\approx", "\\approx"),
        ("\\equiv", "\\equiv"),
        ("\\in", "\\in"),
        ("\\subset", "\\subset"),
        ("\\to", "\\to"),
        ("\\rightarrow", "\\rightarrow"),
        ("\\Rightarrow", "\\Rightarrow"),
        ("\\leftrightarrow", "\\leftrightarrow"),
        // Structures with arguments
        ("\\frac{#1}{#2}", "\\frac{#1}{#2}"),
        ("\\dfrac{#1}{#2}", "\\dfrac{#1}{#2}"),
        ("\\binom{#1}{#2}", "\\binom{#1}{#2}"),
        ("\\sqrt{#1}", "\\sqrt{#1}"),
        ("\\sqrt[#1]{#2}", "\\sqrt[#1]{#2}"),
        ("\\sum_{#1}^{#2}", "\\sum_{#1}^{#2}"),
        ("\\prod_{#1}^{#2}", "\\prod_{#1}^{#2}"),
        ("\\int_{#1}^{#2}", "\\int_{#1}^{#2}"),
        ("\\lim_{#1}", "\\lim_{#1}"),
        ("\\overline{#1}", "\\overline{#1}"),
        ("\\underline{#1}", "\\underline{#1}"),
        ("\\hat{#1}", "\\hat{#1}"),
        ("\\vec{#1}", "\\vec{#1}"),
        ("\\mathbb{#1}", "\\mathbb{#1}"),
        ("\\mathcal{#1}", "\\mathcal{#1}"),
        ("\\mathrm{#1}", "\\mathrm{#1}"),
        ("\\text{#1}", "\\text{#1}"),
        ("\\textbf{#1}", "\\textbf{#1}"),
        ("\\emph{#1}", "\\emph{#1}"),
        ("\\left(#1\\right)", "\\left(#1\\right)"),
        ("\\overset{#1}{#2}", "\\overset{#1}{#2}"),
        ("\\underset{#1}{#2}", "\\underset{#1}{#2}"),
        // Environments
        (
            "\\begin{matrix}",
            "\\begin{matrix}\n#1 & #2 \\\\\n#3 & #4\n\\end{matrix}",
        ),
        (
            "\\begin{pmatrix}",
            "\\begin{pmatrix}\n#1 & #2 \\\\\n#3 & #4\n\\end{pmatrix}",
        ),
        (
            "\\begin{cases}",
            "\\begin{cases}\n#1 & #2 \\\\\n#3 & #4\n\\end{cases}",
        ),
        (
            "\\begin{aligned}",
            "\\begin{aligned}\n#1 &= #2 \\\\\n#3 &= #4\n\\end{aligned}",
        ),
    ];

    MACROS
        .iter()
        .map(|(text, snippet)| MacroEntry::new(*text, *snippet))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_are_valid() {
        let dict = MacroDictionary::builtin();
        assert!(!dict.is_empty());
        for entry in dict.entries() {
            assert!(entry.validate().is_ok(), "{} is malformed", entry.text);
        }
    }

    #[test]
    fn test_builtin_texts_unique() {
        let dict = MacroDictionary::builtin();
        let mut texts: Vec<_> = dict.entries().iter().map(|e| &e.text).collect();
        texts.sort();
        texts.dedup();
        assert_eq!(texts.len(), dict.len());
    }

    #[test]
    fn test_from_json_skips_malformed() {
        let json = r##"[
            { "text": "\\frac", "snippet": "\\frac{#1}{#2}" },
            { "text": "\\broken", "snippet": "\\broken{#}" }
        ]"##;
        let dict = MacroDictionary::from_json(json).unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.entries()[0].text, "\\frac");
    }

    #[test]
    fn test_from_json_rejects_bad_shape() {
        assert!(MacroDictionary::from_json(r#"{"text": "\\a"}"#).is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("macros.json");
        std::fs::write(&path, r#"[{ "text": "\\alpha", "snippet": "\\alpha" }]"#).unwrap();

        let dict = MacroDictionary::from_path(&path).unwrap();
        assert_eq!(dict.entries(), &[MacroEntry::new("\\alpha", "\\alpha")]);

        assert!(MacroDictionary::from_path(&dir.path().join("missing.json")).is_err());
    }
}
