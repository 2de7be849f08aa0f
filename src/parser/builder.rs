//! Document assembly from classified lines.

use super::bullet::ClassifiedLine;
use crate::model::{Document, Metadata, Paragraph, ParagraphStyle};

/// Collects classified lines, across pages, into a [`Document`].
///
/// Blank lines produce nothing; every other line becomes one paragraph,
/// styled as a list item when the classifier flagged it.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    metadata: Metadata,
    paragraphs: Vec<Paragraph>,
    dropped: usize,
}

impl DocumentBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    /// Record that another source page has been scanned.
    pub fn begin_page(&mut self) {
        self.metadata.page_count += 1;
    }

    /// Append one classified line.
    pub fn push(&mut self, line: ClassifiedLine) {
        let style = if line.is_bullet {
            ParagraphStyle::ListBullet
        } else {
            ParagraphStyle::Normal
        };

        match Paragraph::new(&line.cleaned_text, style) {
            Some(paragraph) => self.paragraphs.push(paragraph),
            None => self.dropped += 1,
        }
    }

    /// Number of paragraphs collected so far.
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Check if no paragraph has been collected.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Finish the document.
    pub fn build(self) -> Document {
        if self.dropped > 0 {
            log::debug!("Dropped {} blank lines", self.dropped);
        }
        Document::new(self.metadata, self.paragraphs)
    }
}

impl Extend<ClassifiedLine> for DocumentBuilder {
    fn extend<T: IntoIterator<Item = ClassifiedLine>>(&mut self, iter: T) {
        for line in iter {
            self.push(line);
        }
    }
}
