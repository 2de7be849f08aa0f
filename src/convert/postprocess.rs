//! Bullet glyph normalization for opaque converter output.
//!
//! External converters tend to carry symbol-font bullets through as
//! private-use code points or as assorted square glyphs. This pass maps them
//! back to a single canonical marker, and turns paragraphs that open with one
//! into list items.

use crate::model::{Document, Paragraph, ParagraphStyle};

/// The marker every stray bullet glyph is rewritten to.
pub const CANONICAL_MARKER: char = '\u{2022}';

/// Private Use Area, where symbol fonts usually map their bullets.
const PRIVATE_USE: std::ops::RangeInclusive<u32> = 0xE000..=0xF8FF;

/// Glyphs treated as bullets besides the private-use range.
const BULLET_LIKE: [char; 15] = [
    '□', '■', '▪', '▫', '▬', '▭', '▮', '▯', '⬜', '⬛',
    '\u{2022}', // •
    '\u{25CF}', // ●
    '\u{2219}', // ∙
    '\u{2043}', // ⁃
    '\u{204C}', // ⁌
];

/// Check if a code point is a bullet glyph this pass rewrites.
pub fn is_bullet_glyph(c: char) -> bool {
    PRIVATE_USE.contains(&(c as u32)) || BULLET_LIKE.contains(&c)
}

/// Rewrites stray bullet glyphs in a document.
///
/// - A paragraph opening with bullet glyphs becomes a list item and loses
///   the leading run of glyphs and whitespace.
/// - Any other occurrence is replaced by [`CANONICAL_MARKER`].
/// - Paragraphs with nothing to rewrite are passed through untouched.
/// - A paragraph left without text is dropped.
///
/// Applying the pass twice gives the same result as applying it once.
#[derive(Debug, Clone, Default)]
pub struct PostProcessPass {
    _private: (),
}

impl PostProcessPass {
    /// Create a new pass.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Normalize every paragraph of `doc`.
    pub fn apply(&self, doc: Document) -> Document {
        let (metadata, paragraphs) = doc.into_parts();
        let before = paragraphs.len();
        let mut rewritten = 0usize;

        let paragraphs: Vec<Paragraph> = paragraphs
            .into_iter()
            .filter_map(|p| {
                if !needs_rewrite(p.text()) {
                    return Some(p);
                }
                rewritten += 1;
                self.rewrite(&p)
            })
            .collect();

        if rewritten > 0 {
            log::debug!(
                "Normalized bullets in {} paragraphs ({} dropped)",
                rewritten,
                before - paragraphs.len()
            );
        }

        Document::new(metadata, paragraphs)
    }

    /// Normalize a single paragraph; `None` when nothing visible remains.
    pub fn apply_paragraph(&self, paragraph: Paragraph) -> Option<Paragraph> {
        if needs_rewrite(paragraph.text()) {
            self.rewrite(&paragraph)
        } else {
            Some(paragraph)
        }
    }

    fn rewrite(&self, paragraph: &Paragraph) -> Option<Paragraph> {
        let text = paragraph.text();
        let leading = text.chars().next().is_some_and(is_bullet_glyph);

        let (body, style) = if leading {
            let body = text.trim_start_matches(|c: char| is_bullet_glyph(c) || c.is_whitespace());
            (body, ParagraphStyle::ListBullet)
        } else {
            (text, paragraph.style())
        };

        let body: String = body
            .chars()
            .map(|c| if is_bullet_glyph(c) { CANONICAL_MARKER } else { c })
            .collect();

        Paragraph::new(body, style)
    }
}

/// A paragraph needs work if it opens with a bullet glyph, or carries a
/// non-canonical one anywhere.
fn needs_rewrite(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        None => false,
        Some(first) if is_bullet_glyph(first) => true,
        Some(_) => chars.any(|c| c != CANONICAL_MARKER && is_bullet_glyph(c)),
    }
}
