//! Document model types.
//!
//! This module defines the structure handed from the reconstruction
//! pipeline to the document writer: an ordered list of paragraphs, each
//! either plain text or a bullet list item.

mod document;
mod paragraph;

pub use document::{Document, Metadata};
pub use paragraph::{Paragraph, ParagraphStyle};
