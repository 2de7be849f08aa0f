//! Paragraph and paragraph-style types.

use serde::{Deserialize, Serialize};

/// A paragraph of text content.
///
/// The text is trimmed, free of control characters other than tabs, and never
/// empty; [`Paragraph::new`] refuses blank input instead of producing a
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    text: String,
    style: ParagraphStyle,
}

impl Paragraph {
    /// Create a paragraph, or `None` if the text is empty or whitespace-only.
    pub fn new(text: impl AsRef<str>, style: ParagraphStyle) -> Option<Self> {
        let cleaned: String = text
            .as_ref()
            .chars()
            .filter(|c| !c.is_control() || *c == '\t')
            .collect();
        let trimmed = cleaned.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            text: trimmed.to_string(),
            style,
        })
    }

    /// Create a plain paragraph.
    pub fn normal(text: impl AsRef<str>) -> Option<Self> {
        Self::new(text, ParagraphStyle::Normal)
    }

    /// Create a bullet list item.
    pub fn bullet(text: impl AsRef<str>) -> Option<Self> {
        Self::new(text, ParagraphStyle::ListBullet)
    }

    /// Get the paragraph text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the paragraph style.
    pub fn style(&self) -> ParagraphStyle {
        self.style
    }

    /// Check if this is a list item.
    pub fn is_list_item(&self) -> bool {
        self.style == ParagraphStyle::ListBullet
    }
}

/// Paragraph style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphStyle {
    /// Ordinary body text
    #[default]
    Normal,
    /// Bulleted list item
    ListBullet,
}

impl ParagraphStyle {
    /// Style identifier used by word-processor style sheets.
    pub fn style_id(&self) -> &'static str {
        match self {
            ParagraphStyle::Normal => "Normal",
            ParagraphStyle::ListBullet => "ListBullet",
        }
    }
}
