//! Text-to-structure reconstruction.
//!
//! Sources deliver positioned items per page; [`LineAssembler`] groups them
//! into lines, [`BulletClassifier`] marks list items and strips markers, and
//! [`DocumentBuilder`] collects the result into a [`Document`].
//!
//! [`Document`]: crate::model::Document

mod backend;
mod builder;
mod bullet;
mod layout;
mod options;
mod source;

pub use backend::{GlyphRun, LopdfBackend};
pub use builder::DocumentBuilder;
pub use bullet::{BulletClassifier, BulletRule, ClassifiedLine};
pub use layout::{BoundingBox, Line, LineAssembler, PositionedItem};
pub use options::{LayoutOptions, DEFAULT_BULLET_GLYPHS, DEFAULT_BULLET_PATTERNS};
pub use source::{CharSource, PageItems, SourceKind, SpanSource, TextSource};
