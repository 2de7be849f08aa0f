//! Positioned-text sources.
//!
//! A source turns document bytes into, per page, an ordered sequence of
//! [`PositionedItem`]s. Two shapes exist: span streams (one item per
//! text-showing run, already loosely grouped into lines) and character
//! streams (one item per glyph). The two are backed by separate PDF
//! interpreters, so one can succeed where the other fails.

use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};

use super::backend::{GlyphRun, LopdfBackend};
use super::layout::{BoundingBox, PositionedItem};
use super::options::LayoutOptions;
use crate::detect::is_pdf_bytes;
use crate::error::{Error, Result};

/// Items of one page, in reading order.
pub type PageItems = Vec<PositionedItem>;

/// The granularity of items a source delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Text runs, loosely grouped into lines
    Spans,
    /// Individual characters
    Chars,
}

impl SourceKind {
    /// Vertical gap separating two lines for this kind of source.
    pub fn line_gap(&self, options: &LayoutOptions) -> f32 {
        match self {
            SourceKind::Spans => options.block_gap_threshold,
            SourceKind::Chars => options.line_gap_threshold,
        }
    }
}

/// A capability that extracts positioned text from document bytes.
///
/// Implementations return [`Error::CapabilityUnavailable`] when they cannot
/// run at all, and any other error when extraction fails part-way.
///
/// [`Error::CapabilityUnavailable`]: crate::Error::CapabilityUnavailable
pub trait TextSource: Send + Sync {
    /// Short name used in logs and attempt records.
    fn name(&self) -> &str;

    /// Granularity of the emitted items.
    fn kind(&self) -> SourceKind;

    /// Extract every page's items.
    fn extract(&self, data: &[u8]) -> Result<Vec<PageItems>>;
}

/// Span-level source backed by the lopdf content walker.
#[derive(Debug, Clone, Default)]
pub struct SpanSource {
    _private: (),
}

impl SpanSource {
    /// Create a new span source.
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn span_item(run: GlyphRun) -> PositionedItem {
        let width = run.width();
        let bbox = BoundingBox::new(run.x, run.y, run.x + width, run.y + run.font_size);
        PositionedItem::new(run.text, bbox)
    }
}

impl TextSource for SpanSource {
    fn name(&self) -> &str {
        "spans"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Spans
    }

    fn extract(&self, data: &[u8]) -> Result<Vec<PageItems>> {
        let backend = LopdfBackend::load_bytes(data)?;
        let mut pages = Vec::new();

        for (page_num, page_id) in backend.pages() {
            let runs = backend.page_runs(page_id)?;
            log::debug!("spans: page {} has {} runs", page_num, runs.len());
            pages.push(runs.into_iter().map(Self::span_item).collect());
        }

        Ok(pages)
    }
}

/// Character-level source backed by `pdf-extract`.
///
/// Independent of the span walker: glyphs are positioned by `pdf-extract`'s
/// own interpreter, which resolves font widths and `ToUnicode` maps.
#[derive(Debug, Clone, Default)]
pub struct CharSource {
    _private: (),
}

impl CharSource {
    /// Create a new character source.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl TextSource for CharSource {
    fn name(&self) -> &str {
        "chars"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Chars
    }

    fn extract(&self, data: &[u8]) -> Result<Vec<PageItems>> {
        if !is_pdf_bytes(data) {
            return Err(Error::UnknownFormat);
        }
        let doc = lopdf::Document::load_mem(data)?;
        if doc.is_encrypted() {
            return Err(Error::PdfParse("document is encrypted".to_string()));
        }

        let mut collector = GlyphCollector::default();
        pdf_extract::output_doc(&doc, &mut collector)
            .map_err(|e| Error::ExtractionFailed(e.to_string()))?;

        for (i, page) in collector.pages.iter().enumerate() {
            log::debug!("chars: page {} has {} glyphs", i + 1, page.len());
        }
        Ok(collector.pages)
    }
}

/// Receives glyphs from `pdf-extract` and keeps one item per character.
#[derive(Debug, Default)]
struct GlyphCollector {
    pages: Vec<PageItems>,
    current: PageItems,
}

impl GlyphCollector {
    /// Item for one glyph. `trm` maps glyph space to page space and already
    /// includes the font size; `width` is the advance in glyph space.
    fn glyph_item(trm: &Transform, width: f64, font_size: f64, text: &str) -> PositionedItem {
        let x = trm.m31 as f32;
        let y = trm.m32 as f32;
        let advance = (width * trm.m11.hypot(trm.m12)) as f32;
        let height = match trm.m21.hypot(trm.m22) {
            h if h > 0.0 => h as f32,
            _ => font_size as f32,
        };
        PositionedItem::new(text, BoundingBox::new(x, y, x + advance, y + height))
    }
}

impl OutputDev for GlyphCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> std::result::Result<(), OutputError> {
        self.current.clear();
        Ok(())
    }

    fn end_page(&mut self) -> std::result::Result<(), OutputError> {
        self.pages.push(std::mem::take(&mut self.current));
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        text: &str,
    ) -> std::result::Result<(), OutputError> {
        if !text.is_empty() {
            self.current.push(Self::glyph_item(trm, width, font_size, text));
        }
        Ok(())
    }

    fn begin_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }
}
