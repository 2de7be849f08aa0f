//! Writing reconstructed documents.
//!
//! A [`DocumentWriter`] serializes a [`Document`] to a file. Writers declare
//! whether they have a native bullet-list style; when they do not, list
//! items are rendered with an equivalent hanging indent instead
//! (see [`ParagraphFormat::resolve`]).

mod docx;
mod json;

pub use docx::DocxWriter;
pub use json::{to_json, JsonFormat};

use std::path::Path;

use crate::error::Result;
use crate::model::{Document, ParagraphStyle};

/// Left indent of an emulated list item: 0.5 in, in twips.
pub const LIST_LEFT_INDENT_TWIPS: i32 = 720;

/// First-line indent of an emulated list item: -0.25 in, in twips.
pub const LIST_FIRST_LINE_INDENT_TWIPS: i32 = -360;

/// What a writer can express natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterCapabilities {
    /// The output format has a named bullet-list paragraph style
    pub native_list_style: bool,
}

/// The concrete paragraph formatting a writer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphFormat {
    /// Unstyled body paragraph
    Plain,
    /// A named paragraph style
    Named(&'static str),
    /// Explicit indents, in twips
    HangingIndent {
        /// Left indent of every line
        left: i32,
        /// Extra indent of the first line (negative hangs it out)
        first_line: i32,
    },
}

impl ParagraphFormat {
    /// Choose the formatting for a paragraph style given the writer's capabilities.
    pub fn resolve(style: ParagraphStyle, capabilities: WriterCapabilities) -> Self {
        match style {
            ParagraphStyle::Normal => ParagraphFormat::Plain,
            ParagraphStyle::ListBullet if capabilities.native_list_style => {
                ParagraphFormat::Named(style.style_id())
            }
            ParagraphStyle::ListBullet => ParagraphFormat::HangingIndent {
                left: LIST_LEFT_INDENT_TWIPS,
                first_line: LIST_FIRST_LINE_INDENT_TWIPS,
            },
        }
    }
}

/// A capability that serializes a document to a file.
pub trait DocumentWriter: Send + Sync {
    /// File extension of the produced files, without the dot.
    fn extension(&self) -> &str;

    /// What this writer can express natively.
    fn capabilities(&self) -> WriterCapabilities;

    /// Write `doc` to `path`.
    ///
    /// Must either leave a complete file at `path` or nothing at all;
    /// failures are reported as [`Error::WriteFailed`].
    ///
    /// [`Error::WriteFailed`]: crate::Error::WriteFailed
    fn write(&self, doc: &Document, path: &Path) -> Result<()>;
}
