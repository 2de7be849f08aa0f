//! DOCX (Office Open XML) writer built on `docx-rs`.
//!
//! One Word paragraph per [`Paragraph`](crate::model::Paragraph). With the
//! native list style enabled, list items reference a `ListBullet` paragraph
//! style and a single-level bullet numbering; otherwise they carry an
//! explicit hanging indent.

use std::io::{self, Seek, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph as DocxParagraph, Run, SpecialIndentType, Start, Style, StyleType,
};

use super::{
    DocumentWriter, ParagraphFormat, WriterCapabilities, LIST_FIRST_LINE_INDENT_TWIPS,
    LIST_LEFT_INDENT_TWIPS,
};
use crate::error::{Error, Result};
use crate::model::{Document, ParagraphStyle};

/// Abstract numbering holding the bullet level. docx-rs reserves id 1.
const BULLET_ABSTRACT_ID: usize = 2;

/// Numbering instance list items point at.
const BULLET_NUM_ID: usize = 2;

/// Writes documents as `.docx` packages.
#[derive(Debug, Clone)]
pub struct DocxWriter {
    native_list_style: bool,
}

impl DocxWriter {
    /// Create a writer that uses the native `ListBullet` style.
    pub fn new() -> Self {
        Self {
            native_list_style: true,
        }
    }

    /// Enable or disable the native list style.
    ///
    /// Without it, list items are written with an explicit hanging indent.
    pub fn with_native_list_style(mut self, enabled: bool) -> Self {
        self.native_list_style = enabled;
        self
    }

    /// Write the complete package to any seekable sink.
    pub fn write_to<W: Write + Seek>(&self, doc: &Document, sink: W) -> Result<()> {
        self.build(doc)
            .build()
            .pack(sink)
            .map_err(|e| Error::Io(io::Error::other(e.to_string())))
    }

    fn build(&self, doc: &Document) -> Docx {
        let created = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut docx = Docx::new().created_at(&created);

        if self.native_list_style {
            let style_id = ParagraphStyle::ListBullet.style_id();
            let bullet = Level::new(
                0,
                Start::new(1),
                NumberFormat::new("bullet"),
                LevelText::new("•"),
                LevelJc::new("left"),
            )
            .indent(
                Some(LIST_LEFT_INDENT_TWIPS),
                Some(special_indent(LIST_FIRST_LINE_INDENT_TWIPS)),
                None,
                None,
            );

            docx = docx
                .add_style(Style::new(style_id, StyleType::Paragraph).name("List Bullet"))
                .add_abstract_numbering(AbstractNumbering::new(BULLET_ABSTRACT_ID).add_level(bullet))
                .add_numbering(Numbering::new(BULLET_NUM_ID, BULLET_ABSTRACT_ID));
        }

        let capabilities = self.capabilities();
        for paragraph in doc.paragraphs() {
            let mut p = DocxParagraph::new().add_run(Run::new().add_text(paragraph.text()));
            match ParagraphFormat::resolve(paragraph.style(), capabilities) {
                ParagraphFormat::Plain => {}
                ParagraphFormat::Named(style_id) => {
                    p = p
                        .style(style_id)
                        .numbering(NumberingId::new(BULLET_NUM_ID), IndentLevel::new(0));
                }
                ParagraphFormat::HangingIndent { left, first_line } => {
                    p = p.indent(Some(left), Some(special_indent(first_line)), None, None);
                }
            }
            docx = docx.add_paragraph(p);
        }

        docx
    }
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWriter for DocxWriter {
    fn extension(&self) -> &str {
        "docx"
    }

    fn capabilities(&self) -> WriterCapabilities {
        WriterCapabilities {
            native_list_style: self.native_list_style,
        }
    }

    /// Writes to a temporary file next to `path` and renames it into place,
    /// so a failed write never leaves a truncated package behind.
    fn write(&self, doc: &Document, path: &Path) -> Result<()> {
        let write_failed = |reason: String| Error::WriteFailed {
            path: path.to_path_buf(),
            reason,
        };

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(".pdfdocx-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| write_failed(e.to_string()))?;

        self.write_to(doc, tmp.as_file_mut())
            .map_err(|e| write_failed(e.to_string()))?;

        tmp.persist(path).map_err(|e| write_failed(e.error.to_string()))?;

        log::debug!("Wrote {} paragraphs to {}", doc.len(), path.display());
        Ok(())
    }
}

/// A negative first-line indent hangs the first line out.
fn special_indent(first_line: i32) -> SpecialIndentType {
    if first_line < 0 {
        SpecialIndentType::Hanging(-first_line)
    } else {
        SpecialIndentType::FirstLine(first_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Metadata;
    use std::io::Read;

    fn sample() -> Document {
        Document::from_texts(
            Metadata::default(),
            vec![
                ("Shopping list", ParagraphStyle::Normal),
                ("Fish & chips <fresh>", ParagraphStyle::ListBullet),
            ],
        )
    }

    fn read_part(path: &Path, name: &str) -> Option<String> {
        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut part = archive.by_name(name).ok()?;
        let mut body = String::new();
        part.read_to_string(&mut body).unwrap();
        Some(body)
    }

    #[test]
    fn test_native_list_style() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        DocxWriter::new().write(&sample(), &path).unwrap();

        let document = read_part(&path, "word/document.xml").unwrap();
        assert!(document.contains(r#"w:val="ListBullet""#));
        assert!(document.contains("w:numPr"));
        assert!(document.contains("Shopping list"));
        assert!(document.contains("Fish &amp; chips &lt;fresh"));

        let styles = read_part(&path, "word/styles.xml").unwrap();
        assert!(styles.contains(r#"w:styleId="ListBullet""#));

        let numbering = read_part(&path, "word/numbering.xml").unwrap();
        assert!(numbering.contains(r#"w:val="bullet""#));

        let core = read_part(&path, "docProps/core.xml").unwrap();
        assert!(core.contains("dcterms:created"));
    }

    #[test]
    fn test_emulated_list_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        let writer = DocxWriter::new().with_native_list_style(false);
        assert!(!writer.capabilities().native_list_style);
        writer.write(&sample(), &path).unwrap();

        let document = read_part(&path, "word/document.xml").unwrap();
        assert!(document.contains(r#"w:left="720""#));
        assert!(document.contains(r#"w:hanging="360""#));
        assert!(!document.contains("ListBullet"));
        assert!(!document.contains("w:numPr"));
    }

    #[test]
    fn test_write_to_memory() {
        let mut buffer = io::Cursor::new(Vec::new());
        DocxWriter::new().write_to(&sample(), &mut buffer).unwrap();

        let mut archive = zip::ZipArchive::new(io::Cursor::new(buffer.into_inner())).unwrap();
        assert!(archive.by_name("word/document.xml").is_ok());
        assert!(archive.by_name("[Content_Types].xml").is_ok());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        DocxWriter::new().write(&sample(), &path).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.docx")]);
    }

    #[test]
    fn test_missing_directory_is_write_failed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.docx");
        let result = DocxWriter::new().write(&sample(), &path);
        assert!(matches!(result, Err(Error::WriteFailed { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_special_indent() {
        assert!(matches!(special_indent(-360), SpecialIndentType::Hanging(360)));
        assert!(matches!(special_indent(240), SpecialIndentType::FirstLine(240)));
    }
}
