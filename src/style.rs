//! Emphasis palette for the render collaborator.
//!
//! The palette maps each [`Emphasis`] category to concrete fill/border/text
//! colors. It is an immutable lookup passed by reference to whatever does the
//! drawing; the layout engine itself never reads it and the position store
//! never carries it. A default palette ships embedded as TOML, and callers
//! can load an override from a file in the same format.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::spec::Emphasis;

/// Errors that can occur when loading or parsing a palette file.
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("failed to read palette file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse palette TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Colors for one emphasis category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmphasisStyle {
    pub fill: String,
    pub border: String,
    pub text: String,
}

/// An immutable emphasis-to-color lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StylePalette {
    pub normal: EmphasisStyle,
    pub primary: EmphasisStyle,
    pub success: EmphasisStyle,
    pub warning: EmphasisStyle,
    pub muted: EmphasisStyle,
}

const DEFAULT_PALETTE: &str = r##"
[normal]
fill = "#ffffff"
border = "#555555"
text = "#222222"

[primary]
fill = "#e3f2fd"
border = "#1565c0"
text = "#0d47a1"

[success]
fill = "#e8f5e9"
border = "#2e7d32"
text = "#1b5e20"

[warning]
fill = "#fff3e0"
border = "#e65100"
text = "#bf360c"

[muted]
fill = "#f5f5f5"
border = "#9e9e9e"
text = "#616161"
"##;

impl StylePalette {
    /// Load a palette from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, StyleError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a palette from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, StyleError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the colors for an emphasis category.
    pub fn resolve(&self, emphasis: Emphasis) -> &EmphasisStyle {
        match emphasis {
            Emphasis::Normal => &self.normal,
            Emphasis::Primary => &self.primary,
            Emphasis::Success => &self.success,
            Emphasis::Warning => &self.warning,
            Emphasis::Muted => &self.muted,
        }
    }
}

impl Default for StylePalette {
    fn default() -> Self {
        // The embedded default is known-good TOML.
        toml::from_str(DEFAULT_PALETTE).expect("embedded default palette must parse")
    }
}
