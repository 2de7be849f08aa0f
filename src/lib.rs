//! # pdfdocx
//!
//! PDF to DOCX conversion that rebuilds paragraphs and bullet lists from
//! positioned text.
//!
//! Text items are pulled out of the PDF with their positions, grouped into
//! visual lines, classified as list items or plain paragraphs, and written
//! as a word-processor document. Several extraction strategies are tried in
//! order; the last resort is an external converter whose output is cleaned
//! of stray bullet glyphs.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfdocx::convert_file;
//!
//! fn main() -> pdfdocx::Result<()> {
//!     let result = convert_file("notes.pdf", "out")?;
//!     println!("Wrote {} ({} paragraphs)", result.output_path.display(), result.paragraph_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`parser::TextSource`]: positioned items per page (span or character level)
//! - [`parser::LineAssembler`]: items to lines by vertical proximity
//! - [`parser::BulletClassifier`]: marker patterns, indentation, leading glyphs
//! - [`parser::DocumentBuilder`]: classified lines to a [`Document`]
//! - [`convert::Converter`]: strategy fallback and output writing
//! - [`convert::PostProcessPass`]: bullet glyph cleanup for external output
//! - [`render::DocxWriter`]: Office Open XML packaging

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{
    CommandSpec, ConvertOptions, ConvertResult, Converter, Extraction, PostProcessPass, Strategy,
    StrategyOutcome,
};
pub use detect::{is_pdf_bytes, pdf_version};
pub use error::{AttemptFailure, AttemptRecord, Error, Result};
pub use model::{Document, Metadata, Paragraph, ParagraphStyle};
pub use parser::LayoutOptions;
pub use render::{DocumentWriter, DocxWriter, JsonFormat};

use std::path::Path;

/// Convert PDF bytes into a DOCX file inside `out_dir`.
///
/// The output is named after `name` (`report.pdf` becomes `report.docx`).
/// Uses [`ConvertOptions::default`].
///
/// # Example
///
/// ```no_run
/// use pdfdocx::convert_bytes;
///
/// let data = std::fs::read("report.pdf").unwrap();
/// let result = convert_bytes(&data, "report.pdf", "out").unwrap();
/// assert!(result.output_path.ends_with("report.docx"));
/// ```
pub fn convert_bytes<P: AsRef<Path>>(data: &[u8], name: &str, out_dir: P) -> Result<ConvertResult> {
    let converter = Converter::with_defaults(ConvertOptions::default())?;
    converter.convert_to_dir(data, name, out_dir.as_ref())
}

/// Convert a PDF file into a DOCX file inside `out_dir`.
///
/// # Example
///
/// ```no_run
/// use pdfdocx::convert_file;
///
/// let result = convert_file("report.pdf", ".").unwrap();
/// println!("{}", result.strategy);
/// ```
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(path: P, out_dir: Q) -> Result<ConvertResult> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    convert_bytes(&data, name, out_dir)
}

/// Reconstruct the document from PDF bytes without writing anything.
///
/// # Example
///
/// ```no_run
/// use pdfdocx::extract_bytes;
///
/// let data = std::fs::read("report.pdf").unwrap();
/// let doc = extract_bytes(&data).unwrap();
/// println!("{} list items", doc.list_item_count());
/// ```
pub fn extract_bytes(data: &[u8]) -> Result<Document> {
    let converter = Converter::with_defaults(ConvertOptions::default())?;
    Ok(converter.extract(data)?.document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_bytes_not_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert_bytes(b"not a pdf", "notes.pdf", dir.path());

        match result {
            Err(Error::StrategiesExhausted { attempts }) => {
                assert_eq!(attempts[0].strategy, "spans");
                assert_eq!(attempts[1].strategy, "chars");
            }
            other => panic!("expected exhaustion, got {:?}", other.map(|r| r.output_path)),
        }
        assert!(!dir.path().join("notes.docx").exists());
    }

    #[test]
    fn test_convert_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert_file(dir.path().join("missing.pdf"), dir.path());
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_extract_bytes_empty() {
        assert!(matches!(
            extract_bytes(&[]),
            Err(Error::StrategiesExhausted { .. })
        ));
    }
}
