//! Document-level types.

use super::{Paragraph, ParagraphStyle};
use serde::Serialize;

/// A reconstructed document: paragraphs in source page/line order.
///
/// Built once per conversion and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    metadata: Metadata,
    paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Create a document from metadata and paragraphs.
    pub fn new(metadata: Metadata, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            metadata,
            paragraphs,
        }
    }

    /// Create a document from `(text, style)` pairs, dropping blank entries.
    pub fn from_texts<I, S>(metadata: Metadata, items: I) -> Self
    where
        I: IntoIterator<Item = (S, ParagraphStyle)>,
        S: AsRef<str>,
    {
        let paragraphs = items
            .into_iter()
            .filter_map(|(text, style)| Paragraph::new(text, style))
            .collect();
        Self::new(metadata, paragraphs)
    }

    /// Document metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Paragraphs in reading order.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Number of paragraphs.
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Check if the document has no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Number of bullet list items.
    pub fn list_item_count(&self) -> usize {
        self.paragraphs.iter().filter(|p| p.is_list_item()).count()
    }

    /// Consume the document, returning its parts.
    pub fn into_parts(self) -> (Metadata, Vec<Paragraph>) {
        (self.metadata, self.paragraphs)
    }

    /// Get plain text content of the entire document, one paragraph per line.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Document title, usually the source base name
    pub title: Option<String>,

    /// Number of source pages scanned
    pub page_count: u32,
}

impl Metadata {
    /// Create metadata with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}
