//! lopdf-backed content stream walker.
//!
//! Decodes each page's content stream and emits [`GlyphRun`]s: the text of
//! every text-showing operator together with the position the text matrix
//! puts it at. The span source is built on top of this.

use std::collections::BTreeMap;

use lopdf::{decode_text_string, Document as LopdfDocument, Encoding, Object, ObjectId};

use crate::detect::is_pdf_bytes;
use crate::error::{Error, Result};

/// Fraction of the font size used as the advance of one character when no
/// glyph metrics are consulted.
const CHAR_ADVANCE_RATIO: f32 = 0.5;

/// TJ adjustments (thousandths of text space) larger than this read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Text shown by one operator, positioned by the current text matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    /// Decoded text
    pub text: String,
    /// X of the run origin
    pub x: f32,
    /// Baseline Y
    pub y: f32,
    /// Effective font size (font size scaled by the text matrix)
    pub font_size: f32,
}

impl GlyphRun {
    /// Estimated advance of one character.
    pub fn char_advance(&self) -> f32 {
        self.font_size * CHAR_ADVANCE_RATIO
    }

    /// Estimated width of the run.
    pub fn width(&self) -> f32 {
        self.text.chars().count() as f32 * self.char_advance()
    }
}

/// A loaded PDF document.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        if !is_pdf_bytes(data) {
            return Err(Error::UnknownFormat);
        }
        let doc = LopdfDocument::load_mem(data)?;
        if doc.is_encrypted() {
            return Err(Error::PdfParse("document is encrypted".to_string()));
        }
        Ok(Self { doc })
    }

    /// All pages as (page number → object id).
    pub fn pages(&self) -> BTreeMap<u32, ObjectId> {
        self.doc.get_pages()
    }

    /// Walk a page's content stream and collect its glyph runs in stream order.
    pub fn page_runs(&self, page_id: ObjectId) -> Result<Vec<GlyphRun>> {
        let fonts = self.doc.get_page_fonts(page_id)?;
        let content = self.doc.get_and_decode_page_content(page_id)?;

        let mut runs = Vec::new();
        let mut state = TextState::default();
        let mut encoding = None;
        let mut in_text_block = false;

        for op in content.operations {
            let number = |i: usize| op.operands.get(i).and_then(|o| o.as_float().ok());

            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    state.begin();
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if let Some(Object::Name(name)) = op.operands.first() {
                        encoding = fonts
                            .get(name)
                            .and_then(|font| font.get_font_encoding(&self.doc).ok());
                    }
                    state.font_size = number(1).unwrap_or(12.0);
                }
                "TL" => {
                    if let Some(leading) = number(0) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    let tx = number(0).unwrap_or(0.0);
                    let ty = number(1).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.move_line(tx, ty);
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        let m = [0, 1, 2, 3, 4, 5].map(|i| number(i).unwrap_or(0.0));
                        state.set_matrix(m);
                    }
                }
                "T*" => state.next_line(),
                "Tj" | "TJ" | "'" | "\"" if in_text_block => {
                    if op.operator == "'" || op.operator == "\"" {
                        state.next_line();
                    }
                    let decode = |obj: &Object| decode_string(obj, encoding.as_ref());
                    let text = match op.operator.as_str() {
                        "TJ" => op.operands.first().map(|o| decode_array(o, decode)),
                        "\"" => op.operands.get(2).map(decode),
                        _ => op.operands.first().map(decode),
                    }
                    .unwrap_or_default();

                    if !text.is_empty() {
                        let (x, y) = state.position();
                        let chars = text.chars().count() as f32;
                        let run = GlyphRun {
                            text,
                            x,
                            y,
                            font_size: state.font_size * state.scale(),
                        };
                        // Advance in unscaled text space; the matrix applies the scale.
                        state.advance(chars * CHAR_ADVANCE_RATIO * state.font_size);
                        if !run.text.trim().is_empty() {
                            runs.push(run);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(runs)
    }
}

/// Text and line matrices for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextState {
    /// Text matrix [a b c d e f]
    tm: [f32; 6],
    /// Line matrix (start of the current line)
    lm: [f32; 6],
    font_size: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            tm: IDENTITY,
            lm: IDENTITY,
            font_size: 12.0,
            leading: 0.0,
        }
    }
}

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

impl TextState {
    fn begin(&mut self) {
        self.tm = IDENTITY;
        self.lm = IDENTITY;
    }

    fn set_matrix(&mut self, m: [f32; 6]) {
        self.tm = m;
        self.lm = m;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, e, f] = self.lm;
        self.lm = [a, b, c, d, e + tx * a + ty * c, f + tx * b + ty * d];
        self.tm = self.lm;
    }

    fn next_line(&mut self) {
        // Leading defaults to 0 in PDF; fall back to the font size
        // so stacked lines do not collapse onto one baseline.
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size
        };
        self.move_line(0.0, -leading);
    }

    fn advance(&mut self, width: f32) {
        let [a, b, ..] = self.tm;
        self.tm[4] += width * a;
        self.tm[5] += width * b;
    }

    fn position(&self) -> (f32, f32) {
        (self.tm[4], self.tm[5])
    }

    fn scale(&self) -> f32 {
        let [_, _, c, d, ..] = self.tm;
        let s = (c * c + d * d).sqrt();
        if s > 0.0 {
            s
        } else {
            1.0
        }
    }
}

/// Decode a string operand with the font's encoding, falling back to PDF
/// text-string rules (UTF-16BE with BOM, else PDFDocEncoding).
fn decode_string(obj: &Object, encoding: Option<&Encoding>) -> String {
    let Object::String(bytes, _) = obj else {
        return String::new();
    };
    encoding
        .and_then(|enc| LopdfDocument::decode_text(enc, bytes).ok())
        .or_else(|| decode_text_string(obj).ok())
        .unwrap_or_default()
}

/// Decode a TJ array, turning large negative adjustments into spaces.
fn decode_array(obj: &Object, decode: impl Fn(&Object) -> String) -> String {
    let Ok(items) = obj.as_array() else {
        return String::new();
    };

    let mut combined = String::new();
    for item in items {
        match item.as_float() {
            Ok(adjustment) => {
                if -adjustment > TJ_SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !combined.ends_with(char::is_whitespace)
                {
                    combined.push(' ');
                }
            }
            Err(_) => combined.push_str(&decode(item)),
        }
    }
    combined
}
