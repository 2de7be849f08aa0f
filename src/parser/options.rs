//! Layout heuristics configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default symbol, numeric and single-letter marker patterns, in match order.
pub const DEFAULT_BULLET_PATTERNS: [&str; 3] = [
    r"^\s*[•\-\*\+○●◦‣▪▫■□▸▹▶▷]\s*",
    r"^\s*\d+[\.\)]\s*",
    r"^\s*[a-zA-Z][\.\)]\s*",
];

/// Default glyphs recognized by the leading-symbol rule.
pub const DEFAULT_BULLET_GLYPHS: [char; 10] = ['•', '▪', '▫', '■', '□', '◦', '‣', '-', '*', '+'];

/// Tunable thresholds and marker sets for line assembly and bullet detection.
///
/// All distances are in layout units (PDF points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Vertical distance separating two lines for character streams
    pub line_gap_threshold: f32,

    /// Vertical distance separating two lines for span streams
    pub block_gap_threshold: f32,

    /// Leftmost x beyond which a line counts as an indented list item
    pub bullet_indent_threshold: f32,

    /// Glyphs treated as a bullet when they start a character-stream line
    pub bullet_glyphs: Vec<char>,

    /// Ordered marker patterns (regular expressions matched at line start)
    pub bullet_patterns: Vec<String>,
}

impl LayoutOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the character-stream line gap.
    pub fn with_line_gap(mut self, gap: f32) -> Self {
        self.line_gap_threshold = gap;
        self
    }

    /// Set the span-stream line gap.
    pub fn with_block_gap(mut self, gap: f32) -> Self {
        self.block_gap_threshold = gap;
        self
    }

    /// Set the indentation threshold for the positional bullet rule.
    pub fn with_indent_threshold(mut self, threshold: f32) -> Self {
        self.bullet_indent_threshold = threshold;
        self
    }

    /// Replace the leading-symbol glyph set.
    pub fn with_bullet_glyphs(mut self, glyphs: impl IntoIterator<Item = char>) -> Self {
        self.bullet_glyphs = glyphs.into_iter().collect();
        self
    }

    /// Replace the marker patterns.
    pub fn with_bullet_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullet_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Parse options from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject thresholds that would make the heuristics meaningless.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("line_gap_threshold", self.line_gap_threshold),
            ("block_gap_threshold", self.block_gap_threshold),
            ("bullet_indent_threshold", self.bullet_indent_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_gap_threshold: 3.0,
            block_gap_threshold: 6.0,
            bullet_indent_threshold: 50.0,
            bullet_glyphs: DEFAULT_BULLET_GLYPHS.to_vec(),
            bullet_patterns: DEFAULT_BULLET_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}
