//! Input sniffing.

use crate::error::{Error, Result};

/// PDF header marker.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Readers tolerate junk before the header; this is how far we look for it.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Locate the PDF header and return the declared version (e.g. `"1.7"`).
///
/// Returns [`Error::UnknownFormat`] when no `%PDF-x.y` header appears in the
/// first kilobyte.
pub fn pdf_version(data: &[u8]) -> Result<String> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or(Error::UnknownFormat)?;

    let version = data
        .get(start + PDF_MAGIC.len()..start + PDF_MAGIC.len() + 3)
        .ok_or(Error::UnknownFormat)?;

    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(format!("{}.{}", *major as char, *minor as char))
        }
        _ => Err(Error::UnknownFormat),
    }
}

/// Check if bytes carry a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    pdf_version(data).is_ok()
}
